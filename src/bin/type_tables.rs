//! Dump the registered type tables as JSON and optionally check completeness.
//!
//! Without `--check` the registry is built leniently so mismatched tables can
//! still be inspected; `--check` reports the names each context is missing
//! and exits 1 when any are.

use anyhow::{Result, anyhow, bail};
use fieldmap::runtime;
use fieldmap::{CompletenessGap, RegistryBuilder, TypeTable};
use serde::Serialize;
use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

fn main() {
    runtime::init_tracing();
    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(runtime::EXIT_FAILURE),
        Err(err) => {
            eprintln!("{err:#}");
            std::process::exit(runtime::EXIT_FAILURE);
        }
    }
}

#[derive(Serialize)]
struct Report {
    contexts: Vec<TypeTable>,
    #[serde(skip_serializing_if = "Option::is_none")]
    gaps: Option<Vec<CompletenessGap>>,
}

/// Returns false when `--check` found gaps.
fn run() -> Result<bool> {
    let args = CliArgs::parse(env::args_os().skip(1))?;

    let mut tables = runtime::table_paths_from_env();
    tables.extend(args.tables);
    let mut builder = RegistryBuilder::with_builtins();
    for path in &tables {
        builder = builder.load_table(path)?;
    }
    let registry = builder.allow_incomplete().build()?;

    let contexts: Vec<TypeTable> = match &args.context {
        Some(key) => {
            let table = registry
                .context(key)
                .ok_or_else(|| anyhow!("unknown context \"{key}\""))?;
            vec![table.to_table()]
        }
        None => registry.contexts().map(|table| table.to_table()).collect(),
    };

    let gaps = args.check.then(|| registry.completeness_gaps());
    let complete = gaps.as_ref().is_none_or(|gaps| gaps.is_empty());

    let report = Report { contexts, gaps };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(complete)
}

struct CliArgs {
    tables: Vec<PathBuf>,
    context: Option<String>,
    check: bool,
}

impl CliArgs {
    fn parse(mut args: impl Iterator<Item = OsString>) -> Result<Self> {
        let mut tables: Vec<PathBuf> = Vec::new();
        let mut context: Option<String> = None;
        let mut check = false;

        while let Some(arg_os) = args.next() {
            let arg = arg_os
                .into_string()
                .map_err(|_| anyhow!("argument is not valid UTF-8"))?;
            match arg.as_str() {
                "--table" => tables.push(PathBuf::from(next_value(&mut args, "--table")?)),
                "--context" => {
                    if context.is_some() {
                        bail!("--context may only be provided once");
                    }
                    context = Some(next_value(&mut args, "--context")?);
                }
                "--check" => check = true,
                "--help" | "-h" => {
                    print!("{}", usage());
                    std::process::exit(0);
                }
                other => bail!("unknown argument: {other}\n{}", usage()),
            }
        }

        Ok(CliArgs {
            tables,
            context,
            check,
        })
    }
}

fn next_value(args: &mut impl Iterator<Item = OsString>, flag: &str) -> Result<String> {
    args.next()
        .map(|os| {
            os.into_string()
                .map_err(|_| anyhow!("value for {flag} is not valid UTF-8"))
        })
        .transpose()?
        .ok_or_else(|| anyhow!("missing value for {flag}"))
}

fn usage() -> &'static str {
    "Usage: type-tables [--table PATH]... [--context KEY] [--check]\n\
Prints the built-in and loaded type tables as JSON. --check also reports missing names per context.\n"
}
