//! Indexed view of one mapping context.
//!
//! The index enforces the supported table schema version and the table
//! invariants (lowercase, unique, non-empty names) so a registry can never
//! hold an ambiguous entry. Definition order is preserved for listings.

use crate::catalog::identity::{CapabilityKind, ContextKey};
use crate::catalog::model::{Capability, TableEntry, Target, TypeTable, load_table_from_path};
use crate::schema_loader::{SchemaLoadOptions, SchemaSource, load_json_schema};
use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Table schema version understood by this crate.
pub const TABLE_SCHEMA_VERSION: &str = "type_table_v1";

#[derive(Clone, Debug)]
/// A context's mappings plus a derived index keyed by canonical name.
pub struct ContextTable {
    key: ContextKey,
    kind: CapabilityKind,
    description: Option<String>,
    order: Vec<String>,
    by_name: BTreeMap<String, Target>,
}

impl ContextTable {
    /// Load and validate a table file from disk.
    ///
    /// Validates against the JSON Schema first, then the schema version and
    /// table invariants, and builds the name index.
    pub fn load(path: &Path) -> Result<Self> {
        validate_against_schema(path)?;

        let table =
            load_table_from_path(path).with_context(|| format!("loading {}", path.display()))?;
        Self::from_table(table).with_context(|| format!("indexing {}", path.display()))
    }

    /// Index an already-parsed table.
    ///
    /// Tables must define at least one mapping; only disabled built-in
    /// contexts are held empty.
    pub fn from_table(table: TypeTable) -> Result<Self> {
        validate_schema_version(&table.schema_version)?;
        if table.mappings.is_empty() {
            bail!("context {} defines no mappings", table.context);
        }
        let mut indexed = Self::from_entries(
            table.context,
            table.kind,
            table.mappings.into_iter().map(|entry| (entry.name, entry.target)),
        )?;
        indexed.description = table.description;
        Ok(indexed)
    }

    /// Build a table from `(name, target)` rows; `None` marks a name unimplemented.
    pub fn from_entries<N, P>(
        key: ContextKey,
        kind: CapabilityKind,
        entries: impl IntoIterator<Item = (N, Option<P>)>,
    ) -> Result<Self>
    where
        N: Into<String>,
        P: Into<String>,
    {
        validate_context_key(&key)?;
        let mut table = Self::empty(key, kind);
        for (name, target) in entries {
            let name = name.into();
            validate_name(&table.key, &name)?;
            if table.by_name.contains_key(&name) {
                bail!("context {} defines '{}' more than once", table.key, name);
            }
            let target: Option<String> = target.map(Into::into);
            let target = match target {
                Some(path) if path.trim().is_empty() => {
                    bail!("context {} maps '{}' to an empty target", table.key, name)
                }
                Some(path) => Target::Capability(Capability::new(table.kind.clone(), path)),
                None => Target::Unimplemented,
            };
            table.order.push(name.clone());
            table.by_name.insert(name, target);
        }
        Ok(table)
    }

    /// Build a table from rows known to satisfy the table invariants.
    pub(crate) fn from_static(
        key: &str,
        kind: CapabilityKind,
        rows: &[(&str, Option<&str>)],
    ) -> Self {
        let mut table = Self::empty(ContextKey::new(key), kind);
        for (name, target) in rows {
            let target = match target {
                Some(path) => Target::Capability(Capability::new(table.kind.clone(), *path)),
                None => Target::Unimplemented,
            };
            table.order.push(name.to_string());
            table.by_name.insert(name.to_string(), target);
        }
        table
    }

    /// A context with no entries; every lookup in it misses.
    pub fn empty(key: ContextKey, kind: CapabilityKind) -> Self {
        Self {
            key,
            kind,
            description: None,
            order: Vec::new(),
            by_name: BTreeMap::new(),
        }
    }

    pub fn key(&self) -> &ContextKey {
        &self.key
    }

    pub fn kind(&self) -> &CapabilityKind {
        &self.kind
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Target for an exact (already lowercased) name.
    pub fn target(&self, name: &str) -> Option<&Target> {
        self.by_name.get(name)
    }

    /// Entry for an exact name, with the stored key.
    pub fn entry(&self, name: &str) -> Option<(&str, &Target)> {
        self.by_name
            .get_key_value(name)
            .map(|(name, target)| (name.as_str(), target))
    }

    /// Entries in definition order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Target)> {
        self.order
            .iter()
            .filter_map(|name| self.entry(name))
    }

    /// Names in stable (sorted) order.
    pub fn names(&self) -> BTreeSet<&str> {
        self.by_name.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Convert back to the on-disk representation.
    pub fn to_table(&self) -> TypeTable {
        TypeTable {
            schema_version: TABLE_SCHEMA_VERSION.to_string(),
            context: self.key.clone(),
            kind: self.kind.clone(),
            description: self.description.clone(),
            mappings: self
                .entries()
                .map(|(name, target)| TableEntry {
                    name: name.to_string(),
                    target: target.capability().map(|cap| cap.path.clone()),
                })
                .collect(),
        }
    }
}

fn validate_schema_version(schema_version: &str) -> Result<()> {
    if schema_version.is_empty() {
        bail!("schema_version must not be empty");
    }
    let allowed = allowed_schema_versions();
    if !allowed.contains(schema_version) {
        bail!(
            "schema_version '{}' not in allowed set {:?}",
            schema_version,
            allowed
        );
    }
    Ok(())
}

fn allowed_schema_versions() -> BTreeSet<String> {
    BTreeSet::from_iter([TABLE_SCHEMA_VERSION.to_string()])
}

fn validate_context_key(key: &ContextKey) -> Result<()> {
    if key.0.is_empty() {
        bail!("context key must not be empty");
    }

    if !key
        .0
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        bail!("context key must match ^[A-Za-z0-9_.-]+$, got {}", key.0);
    }

    Ok(())
}

fn validate_name(key: &ContextKey, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        bail!("context {} contains an entry with no name", key);
    }
    if name.trim() != name {
        bail!("context {} name '{}' has surrounding whitespace", key, name);
    }
    if name.to_lowercase() != name {
        bail!("context {} name '{}' must be lowercase", key, name);
    }
    Ok(())
}

fn validate_against_schema(table_path: &Path) -> Result<()> {
    let table_file = File::open(table_path)
        .with_context(|| format!("opening table {}", table_path.display()))?;
    let table_value: Value = serde_json::from_reader(BufReader::new(table_file))
        .with_context(|| format!("parsing table {}", table_path.display()))?;

    let table_version = table_value
        .get("schema_version")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let allowed = allowed_schema_versions();
    let options = SchemaLoadOptions {
        allowed_versions: Some(&allowed),
        expected_version: Some(&table_version),
        patch_schema_version_const: true,
        ..Default::default()
    };
    let schema = match resolve_table_schema_path(table_path) {
        Some(schema_path) => load_json_schema(SchemaSource::Path(&schema_path), options)
            .with_context(|| format!("loading table schema {}", schema_path.display()))?,
        None => load_json_schema(SchemaSource::Embedded, options)
            .context("loading embedded table schema")?,
    };

    debug!(
        table = %table_path.display(),
        schema_version = %schema.schema_version,
        "validating type table"
    );
    if let Err(errors) = schema.compiled.validate(&table_value) {
        let details = errors
            .map(|err| err.to_string())
            .collect::<Vec<_>>()
            .join("\n");
        bail!(
            "type table {} failed schema validation:\n{}",
            table_path.display(),
            details
        );
    }
    Ok(())
}

/// A `schema/` directory beside the table's parent overrides the embedded schema.
fn resolve_table_schema_path(table_path: &Path) -> Option<PathBuf> {
    let base = table_path.parent().and_then(|p| p.parent())?;
    let candidate = base.join("schema/type_table.schema.json");
    candidate.is_file().then_some(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<(&'static str, Option<&'static str>)> {
        vec![("int", Some("Int")), ("str", Some("String")), ("yaml", None)]
    }

    #[test]
    fn entries_keep_definition_order() {
        let table =
            ContextTable::from_entries(ContextKey::new("graphql"), CapabilityKind::Column, rows())
                .unwrap();
        let names: Vec<&str> = table.entries().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["int", "str", "yaml"]);
        assert_eq!(table.len(), 3);
        assert!(table.target("yaml").unwrap().is_unimplemented());
        assert_eq!(
            table.target("int").and_then(Target::capability),
            Some(&Capability::new(CapabilityKind::Column, "Int"))
        );
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = ContextTable::from_entries(
            ContextKey::new("graphql"),
            CapabilityKind::Column,
            vec![("int", Some("Int")), ("int", Some("BigInt"))],
        )
        .unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn uppercase_and_blank_names_are_rejected() {
        let upper = ContextTable::from_entries(
            ContextKey::new("graphql"),
            CapabilityKind::Column,
            vec![("Int", Some("Int"))],
        );
        assert!(upper.unwrap_err().to_string().contains("lowercase"));

        let blank = ContextTable::from_entries(
            ContextKey::new("graphql"),
            CapabilityKind::Column,
            vec![(" ", Some("Int"))],
        );
        assert!(blank.unwrap_err().to_string().contains("no name"));
    }

    #[test]
    fn empty_target_and_bad_key_are_rejected() {
        let empty_target = ContextTable::from_entries(
            ContextKey::new("graphql"),
            CapabilityKind::Column,
            vec![("int", Some("  "))],
        );
        assert!(empty_target.unwrap_err().to_string().contains("empty target"));

        let bad_key = ContextTable::from_entries(
            ContextKey::new("has space"),
            CapabilityKind::Column,
            rows(),
        );
        assert!(bad_key.unwrap_err().to_string().contains("must match"));
    }

    #[test]
    fn unknown_schema_version_is_rejected() {
        let table = TypeTable {
            schema_version: "type_table_v0".into(),
            context: ContextKey::new("graphql"),
            kind: CapabilityKind::Column,
            description: None,
            mappings: Vec::new(),
        };
        let err = ContextTable::from_table(table).unwrap_err();
        assert!(err.to_string().contains("not in allowed set"));
    }

    #[test]
    fn table_without_mappings_is_rejected() {
        let table = TypeTable {
            schema_version: TABLE_SCHEMA_VERSION.into(),
            context: ContextKey::new("orm"),
            kind: CapabilityKind::Column,
            description: None,
            mappings: Vec::new(),
        };
        let err = ContextTable::from_table(table).unwrap_err();
        assert_eq!(err.to_string(), "context orm defines no mappings");
    }

    #[test]
    fn to_table_round_trips_sentinels_as_null() {
        let table =
            ContextTable::from_entries(ContextKey::new("graphql"), CapabilityKind::Column, rows())
                .unwrap();
        let value = serde_json::to_value(table.to_table()).unwrap();
        assert_eq!(value["schema_version"], "type_table_v1");
        assert_eq!(value["mappings"][2]["name"], "yaml");
        assert!(value["mappings"][2]["target"].is_null());
    }
}
