//! JSON Schema loading for type table files.
//!
//! Schemas come either from disk (a `schema/` directory shipped next to the
//! tables) or from the copy embedded in the crate. The loader enforces the
//! allowed `schema_version` set, optionally patches the version const, and
//! compiles a validator.

use anyhow::{Context, Result, anyhow, bail};
use jsonschema::JSONSchema;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub(crate) const EMBEDDED_TABLE_SCHEMA: &str = include_str!("../schema/type_table.schema.json");

/// Where to read the schema payload from.
pub(crate) enum SchemaSource<'a> {
    Path(&'a Path),
    Embedded,
}

impl SchemaSource<'_> {
    fn describe(&self) -> String {
        match self {
            SchemaSource::Path(path) => path.display().to_string(),
            SchemaSource::Embedded => "<embedded type_table schema>".to_string(),
        }
    }

    fn read(&self) -> Result<Value> {
        match self {
            SchemaSource::Path(path) => serde_json::from_reader(BufReader::new(
                File::open(path).with_context(|| format!("opening schema {}", path.display()))?,
            ))
            .with_context(|| format!("parsing schema {}", path.display())),
            SchemaSource::Embedded => serde_json::from_str(EMBEDDED_TABLE_SCHEMA)
                .context("parsing embedded type_table schema"),
        }
    }
}

/// Result of loading and compiling a JSON Schema.
pub(crate) struct SchemaLoadResult {
    pub schema_version: String,
    pub compiled: JSONSchema,
}

/// Controls how schemas are normalized before compilation.
pub(crate) struct SchemaLoadOptions<'a> {
    /// Where to find the schema_version const inside the schema payload.
    pub schema_version_pointer: &'a str,
    /// Override schema_version when provided (used to align consts).
    pub expected_version: Option<&'a str>,
    /// Allowed schema_version values; enforced when present.
    pub allowed_versions: Option<&'a BTreeSet<String>>,
    /// Patch the schema_version const to match `expected_version`.
    pub patch_schema_version_const: bool,
}

impl Default for SchemaLoadOptions<'_> {
    fn default() -> Self {
        Self {
            schema_version_pointer: "/properties/schema_version/const",
            expected_version: None,
            allowed_versions: None,
            patch_schema_version_const: false,
        }
    }
}

pub(crate) fn load_json_schema(
    source: SchemaSource<'_>,
    options: SchemaLoadOptions<'_>,
) -> Result<SchemaLoadResult> {
    let mut schema_value = source.read()?;

    let schema_version = match options.expected_version {
        Some(version) => version.to_string(),
        None => extract_schema_version(&schema_value, options.schema_version_pointer)
            .ok_or_else(|| anyhow!("schema {} missing schema_version const", source.describe()))?,
    };

    if let Some(allowed) = options.allowed_versions {
        if !allowed.contains(&schema_version) {
            bail!(
                "schema_version '{}' not in allowed set {:?}",
                schema_version,
                allowed
            );
        }
    }

    if options.patch_schema_version_const {
        let target = schema_value
            .pointer_mut(options.schema_version_pointer)
            .ok_or_else(|| {
                anyhow!(
                    "schema missing pointer {} for schema_version const",
                    options.schema_version_pointer
                )
            })?;
        *target = Value::String(schema_version.clone());
    }

    let compiled = JSONSchema::compile(&schema_value)
        .map_err(|err| anyhow!("compiling schema {}: {err}", source.describe()))?;

    Ok(SchemaLoadResult {
        schema_version,
        compiled,
    })
}

fn extract_schema_version(schema: &Value, pointer: &str) -> Option<String> {
    let version = schema.pointer(pointer).and_then(Value::as_str)?;
    if version
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        Some(version.to_string())
    } else {
        None
    }
}
