//! Multi-context field-type lookup tables.
//!
//! A canonical field-type name (`int`, `datetime`, `enum`, ...) resolves to a
//! target for a consumer context: Rust primitives (`vanilla`), sea-query
//! columns (`orm`), HTML form controls (`form`), or `fake` generators
//! (`factory`). Extra contexts can be loaded from JSON table files. The
//! crate only supplies lookup data; it never validates or generates values.

use anyhow::Result;
use std::path::Path;
use std::sync::OnceLock;

pub mod builtin;
pub mod catalog;
pub mod error;
pub mod field_types;
pub mod runtime;
mod schema_loader;

pub use catalog::{
    Capability, CapabilityKind, CompletenessGap, ContextKey, ContextTable, RegistryBuilder,
    Resolution, TABLE_SCHEMA_VERSION, Target, TypeRegistry, TypeTable, load_table_from_path,
};
pub use error::{LookupMiss, ResolveError};
pub use field_types::{CANONICAL_FIELD_TYPES, FieldFamily, family_of};

/// Process-wide registry of the built-in contexts, built on first use.
pub fn default_registry() -> &'static TypeRegistry {
    static REGISTRY: OnceLock<TypeRegistry> = OnceLock::new();
    REGISTRY.get_or_init(|| TypeRegistry::from_tables(builtin::builtin_tables()))
}

/// Resolve against the built-in registry. See `TypeRegistry::resolve`.
pub fn resolve(
    fieldtype: &str,
    context: &str,
    fallback: Option<&str>,
) -> Result<&'static Capability, ResolveError> {
    default_registry().resolve(fieldtype, context, fallback)
}

/// Built-in contexts plus the given table files, completeness enforced.
pub fn registry_with_tables<P: AsRef<Path>>(paths: &[P]) -> Result<TypeRegistry> {
    let mut builder = RegistryBuilder::with_builtins();
    for path in paths {
        builder = builder.load_table(path.as_ref())?;
    }
    builder.build()
}

/// Built-in contexts plus any tables listed in `FIELDMAP_TABLES`.
pub fn registry_from_env() -> Result<TypeRegistry> {
    registry_with_tables(&runtime::table_paths_from_env())
}

/// Split comma- or whitespace-delimited configuration lists into tokens.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .replace(',', " ")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_list_accepts_commas_and_spaces() {
        assert_eq!(
            split_list("a.json, b.json  c.json,,"),
            vec!["a.json", "b.json", "c.json"]
        );
        assert!(split_list("  ,  ").is_empty());
    }

    #[test]
    fn default_registry_is_shared() {
        assert!(std::ptr::eq(default_registry(), default_registry()));
    }

    #[test]
    fn free_resolve_uses_builtins() {
        assert_eq!(resolve("INT", "vanilla", None).unwrap().path, "i64");
        assert!(resolve("yaml", "vanilla", None).unwrap_err().is_unimplemented());
        assert_eq!(resolve("yaml", "vanilla", Some("str")).unwrap().path, "String");
        assert!(resolve("bogus_type", "vanilla", None).unwrap_err().is_lookup());
    }
}
