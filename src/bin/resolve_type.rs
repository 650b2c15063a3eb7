//! Resolve one field type within a context and print the result as JSON.
//!
//! Exit codes separate the failure kinds so shell callers can skip
//! unsupported fields without treating them as bugs: 2 for an unknown
//! context or field type, 3 for an unimplemented mapping, 1 for anything
//! else (bad flags, unreadable table files).

use anyhow::{Result, anyhow, bail};
use fieldmap::ResolveError;
use fieldmap::runtime::{self, EXIT_FAILURE};
use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

fn main() {
    runtime::init_tracing();
    if let Err(err) = run() {
        eprintln!("{err:#}");
        let code = err
            .downcast_ref::<ResolveError>()
            .map(runtime::exit_code_for)
            .unwrap_or(EXIT_FAILURE);
        std::process::exit(code);
    }
}

fn run() -> Result<()> {
    let args = CliArgs::parse(env::args_os().skip(1))?;

    let mut tables = runtime::table_paths_from_env();
    tables.extend(args.tables);
    let registry = fieldmap::registry_with_tables(&tables)?;

    let resolution =
        registry.resolve_detailed(&args.fieldtype, &args.context, args.fallback.as_deref())?;
    println!("{}", serde_json::to_string(&resolution)?);
    Ok(())
}

struct CliArgs {
    fieldtype: String,
    context: String,
    fallback: Option<String>,
    tables: Vec<PathBuf>,
}

impl CliArgs {
    fn parse(mut args: impl Iterator<Item = OsString>) -> Result<Self> {
        let mut positional: Vec<String> = Vec::new();
        let mut fallback: Option<String> = None;
        let mut tables: Vec<PathBuf> = Vec::new();

        while let Some(arg_os) = args.next() {
            let arg = arg_os
                .into_string()
                .map_err(|_| anyhow!("argument is not valid UTF-8"))?;
            match arg.as_str() {
                "--fallback" => {
                    if fallback.is_some() {
                        bail!("--fallback may only be provided once");
                    }
                    fallback = Some(next_value(&mut args, "--fallback")?);
                }
                "--table" => {
                    tables.push(PathBuf::from(next_value(&mut args, "--table")?));
                }
                "--help" | "-h" => {
                    print!("{}", usage());
                    std::process::exit(0);
                }
                flag if flag.starts_with("--") => bail!("unknown flag: {flag}\n{}", usage()),
                _ => positional.push(arg),
            }
        }

        let [fieldtype, context]: [String; 2] = positional
            .try_into()
            .map_err(|_| anyhow!("expected FIELDTYPE and CONTEXT\n{}", usage()))?;

        Ok(CliArgs {
            fieldtype,
            context,
            fallback,
            tables,
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
    "Usage: resolve-type FIELDTYPE CONTEXT [--fallback NAME] [--table PATH]...\n\
Resolves FIELDTYPE (case-insensitive) in CONTEXT and prints the capability as JSON.\n\
Extra table files may also be listed in FIELDMAP_TABLES.\n"
}
