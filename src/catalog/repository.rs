//! Holds every mapping context and resolves lookups against them.
//!
//! A `TypeRegistry` is immutable once built. `RegistryBuilder` collects
//! tables (built-in or loaded from disk) and enforces cross-context
//! completeness before handing one out.

use crate::catalog::identity::ContextKey;
use crate::catalog::index::ContextTable;
use crate::catalog::model::{Capability, Target};
use crate::error::{LookupMiss, ResolveError};
use anyhow::{Result, bail};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::{debug, info, warn};

#[derive(Clone, Debug, Default)]
/// In-memory store of context tables keyed by `ContextKey`.
pub struct TypeRegistry {
    contexts: BTreeMap<ContextKey, ContextTable>,
}

/// Outcome of a successful lookup.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Resolution<'a> {
    pub context: &'a ContextKey,
    /// Lowercased field type that was requested.
    pub fieldtype: String,
    /// Name whose entry produced the capability.
    pub resolved_from: &'a str,
    pub used_fallback: bool,
    pub capability: &'a Capability,
}

/// Names one context has or lacks relative to the union of all contexts.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct CompletenessGap {
    pub context: ContextKey,
    pub missing: Vec<String>,
}

impl TypeRegistry {
    pub(crate) fn from_tables(tables: impl IntoIterator<Item = ContextTable>) -> Self {
        let contexts = tables
            .into_iter()
            .map(|table| (table.key().clone(), table))
            .collect();
        Self { contexts }
    }

    /// Resolve `fieldtype` within `context`, consulting `fallback` once when
    /// the direct entry is unimplemented.
    ///
    /// `fieldtype` is lowercased; `context` and `fallback` are used as given.
    pub fn resolve(
        &self,
        fieldtype: &str,
        context: &str,
        fallback: Option<&str>,
    ) -> Result<&Capability, ResolveError> {
        self.resolve_detailed(fieldtype, context, fallback)
            .map(|resolution| resolution.capability)
    }

    /// Same lookup as `resolve`, also reporting which entry answered.
    pub fn resolve_detailed(
        &self,
        fieldtype: &str,
        context: &str,
        fallback: Option<&str>,
    ) -> Result<Resolution<'_>, ResolveError> {
        let fieldtype = fieldtype.to_lowercase();
        let table = self
            .contexts
            .get(&ContextKey::new(context))
            .ok_or_else(|| ResolveError::Lookup {
                context: context.to_string(),
                name: fieldtype.clone(),
                missing: LookupMiss::Context,
            })?;

        let (name, target) = lookup_entry(table, &fieldtype)?;
        if let Target::Capability(capability) = target {
            debug!(context, fieldtype = %fieldtype, path = %capability.path, "resolved");
            return Ok(Resolution {
                context: table.key(),
                fieldtype,
                resolved_from: name,
                used_fallback: false,
                capability,
            });
        }

        let Some(fallback) = fallback else {
            return Err(unimplemented(context, &fieldtype));
        };

        debug!(context, fieldtype = %fieldtype, fallback, "unimplemented; trying fallback");
        let (fallback_name, fallback_target) = lookup_entry(table, fallback)?;
        match fallback_target {
            Target::Capability(capability) => Ok(Resolution {
                context: table.key(),
                fieldtype,
                resolved_from: fallback_name,
                used_fallback: true,
                capability,
            }),
            Target::Unimplemented => Err(unimplemented(context, &fieldtype)),
        }
    }

    /// Fetch a context table by key, if present.
    pub fn context(&self, key: &str) -> Option<&ContextTable> {
        self.contexts.get(&ContextKey::new(key))
    }

    /// Iterates contexts in key order.
    pub fn contexts(&self) -> impl Iterator<Item = &ContextTable> {
        self.contexts.values()
    }

    pub fn context_keys(&self) -> impl Iterator<Item = &ContextKey> {
        self.contexts.keys()
    }

    /// Names missing from each non-empty context relative to the union of
    /// all non-empty contexts. Empty result means the registry is complete.
    pub fn completeness_gaps(&self) -> Vec<CompletenessGap> {
        let populated: Vec<&ContextTable> =
            self.contexts.values().filter(|t| !t.is_empty()).collect();
        let union: BTreeSet<&str> = populated.iter().flat_map(|t| t.names()).collect();

        populated
            .into_iter()
            .filter_map(|table| {
                let names = table.names();
                let missing: Vec<String> = union
                    .difference(&names)
                    .map(|name| name.to_string())
                    .collect();
                (!missing.is_empty()).then(|| CompletenessGap {
                    context: table.key().clone(),
                    missing,
                })
            })
            .collect()
    }
}

fn lookup_entry<'t>(
    table: &'t ContextTable,
    name: &str,
) -> Result<(&'t str, &'t Target), ResolveError> {
    table.entry(name).ok_or_else(|| ResolveError::Lookup {
        context: table.key().to_string(),
        name: name.to_string(),
        missing: LookupMiss::FieldType,
    })
}

fn unimplemented(context: &str, fieldtype: &str) -> ResolveError {
    ResolveError::Unimplemented {
        context: context.to_string(),
        fieldtype: fieldtype.to_string(),
    }
}

#[derive(Default)]
/// Collects context tables and validates them into a `TypeRegistry`.
pub struct RegistryBuilder {
    tables: BTreeMap<ContextKey, ContextTable>,
    allow_incomplete: bool,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the built-in contexts enabled in this build.
    pub fn with_builtins() -> Self {
        let mut builder = Self::new();
        for table in crate::builtin::builtin_tables() {
            builder.tables.insert(table.key().clone(), table);
        }
        builder
    }

    /// Register a table; a table with the same key replaces the earlier one.
    pub fn register(mut self, table: ContextTable) -> Self {
        if let Some(previous) = self.tables.insert(table.key().clone(), table) {
            warn!(context = %previous.key(), "replacing previously registered context");
        }
        self
    }

    /// Load, validate, and register a table file.
    pub fn load_table(self, path: &Path) -> Result<Self> {
        let table = ContextTable::load(path)?;
        info!(
            context = %table.key(),
            entries = table.len(),
            path = %path.display(),
            "registered type table"
        );
        Ok(self.register(table))
    }

    /// Skip the completeness check in `build`.
    pub fn allow_incomplete(mut self) -> Self {
        self.allow_incomplete = true;
        self
    }

    /// Finish the registry, rejecting contexts whose name sets disagree.
    pub fn build(self) -> Result<TypeRegistry> {
        let registry = TypeRegistry {
            contexts: self.tables,
        };
        if self.allow_incomplete {
            return Ok(registry);
        }
        let gaps = registry.completeness_gaps();
        if !gaps.is_empty() {
            let details = gaps
                .iter()
                .map(|gap| format!("{} is missing {}", gap.context, gap.missing.join(", ")))
                .collect::<Vec<_>>()
                .join("\n");
            bail!("contexts do not define the same field types:\n{details}");
        }
        Ok(registry)
    }
}
