use anyhow::{Context, Result};
use serde_json::{Value, json};
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

pub fn helper_binary(name: &str) -> PathBuf {
    match name {
        "resolve-type" => PathBuf::from(env!("CARGO_BIN_EXE_resolve-type")),
        "type-tables" => PathBuf::from(env!("CARGO_BIN_EXE_type-tables")),
        other => panic!("unknown helper {other}"),
    }
}

/// Command for a helper with a clean table environment.
pub fn helper_command(name: &str) -> Command {
    let mut cmd = Command::new(helper_binary(name));
    cmd.env_remove("FIELDMAP_TABLES");
    cmd
}

/// Run a command without judging its exit status.
pub fn run_command(mut cmd: Command) -> Result<Output> {
    cmd.output()
        .with_context(|| format!("failed to run command: {:?}", cmd))
}

/// Rows covering every canonical name; `overrides` replace individual targets.
pub fn full_mappings(prefix: &str, overrides: &[(&str, Option<&str>)]) -> Vec<Value> {
    fieldmap::field_types::canonical_names()
        .map(|name| {
            let target = overrides
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, t)| t.map(str::to_string))
                .unwrap_or_else(|| Some(format!("{prefix}::{name}")));
            json!({"name": name, "target": target})
        })
        .collect()
}

pub fn table_value(context: &str, mappings: Vec<Value>) -> Value {
    json!({
        "schema_version": "type_table_v1",
        "context": context,
        "kind": "scalar",
        "description": "fixture table",
        "mappings": mappings,
    })
}

/// Write `value` to `<dir>/tables/<file>` and return the path.
pub fn write_table(dir: &TempDir, file: &str, value: &Value) -> Result<PathBuf> {
    let tables = dir.path().join("tables");
    fs::create_dir_all(&tables)?;
    let path = tables.join(file);
    fs::write(&path, serde_json::to_vec_pretty(value)?)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

pub fn stdout_json(output: &Output) -> Result<Value> {
    serde_json::from_slice(&output.stdout).with_context(|| {
        format!(
            "stdout is not JSON: {}",
            String::from_utf8_lossy(&output.stdout)
        )
    })
}
