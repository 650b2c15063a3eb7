//! Mapping targets and the on-disk table format.
//!
//! `TypeTable` mirrors `schema/type_table.schema.json` so table files can be
//! read without ad-hoc JSON handling. Use `ContextTable::load` for validation
//! and indexed lookup.

use crate::catalog::identity::{CapabilityKind, ContextKey};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Concrete context-specific representation of a field type.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Capability {
    pub kind: CapabilityKind,
    /// Ecosystem path of the type, column, control, or generator.
    pub path: String,
}

impl Capability {
    pub fn new(kind: CapabilityKind, path: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }
}

/// Value stored for a name within a context.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Target {
    Capability(Capability),
    /// The context deliberately has no representation for this name.
    Unimplemented,
}

impl Target {
    pub fn capability(&self) -> Option<&Capability> {
        match self {
            Target::Capability(cap) => Some(cap),
            Target::Unimplemented => None,
        }
    }

    pub fn is_unimplemented(&self) -> bool {
        matches!(self, Target::Unimplemented)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
/// Context table as stored on disk.
pub struct TypeTable {
    pub schema_version: String,
    pub context: ContextKey,
    pub kind: CapabilityKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub mappings: Vec<TableEntry>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
/// One `(name, target)` row; a null target is the unimplemented sentinel.
pub struct TableEntry {
    pub name: String,
    pub target: Option<String>,
}

/// Read and parse a table file from disk without additional validation.
pub fn load_table_from_path(path: &Path) -> Result<TypeTable> {
    let data =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let table: TypeTable =
        serde_json::from_str(&data).with_context(|| format!("parsing {}", path.display()))?;
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_target_parses_as_sentinel_row() {
        let value = json!({
            "schema_version": "type_table_v1",
            "context": "graphql",
            "kind": "column",
            "mappings": [
                {"name": "int", "target": "Int"},
                {"name": "yaml", "target": null}
            ]
        });
        let table: TypeTable = serde_json::from_value(value).unwrap();
        assert_eq!(table.context, ContextKey::new("graphql"));
        assert_eq!(table.kind, CapabilityKind::Column);
        assert!(table.description.is_none());
        assert_eq!(table.mappings[0].target.as_deref(), Some("Int"));
        assert!(table.mappings[1].target.is_none());
    }

    #[test]
    fn target_accessors() {
        let target = Target::Capability(Capability::new(CapabilityKind::Primitive, "i64"));
        assert_eq!(target.capability().map(|c| c.path.as_str()), Some("i64"));
        assert!(!target.is_unimplemented());
        assert!(Target::Unimplemented.capability().is_none());
    }
}
