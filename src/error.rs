//! Resolution errors.
//!
//! Lookups distinguish a caller mistake (the context or name does not exist
//! at all) from a table that deliberately leaves a name unmapped. Loading and
//! building errors are reported through `anyhow` instead; see
//! `catalog::index` and `catalog::repository`.

use thiserror::Error;

/// Which part of a lookup was not found.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LookupMiss {
    Context,
    FieldType,
}

/// Failure modes of `TypeRegistry::resolve`.
///
/// Neither variant is retryable: identical inputs reproduce the same error.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ResolveError {
    /// The context is not registered, or the name has no entry in it.
    #[error("{}", lookup_message(.context, .name, .missing))]
    Lookup {
        context: String,
        name: String,
        missing: LookupMiss,
    },

    /// The entry exists but is marked unimplemented, and no usable fallback
    /// resolved either.
    #[error("type \"{fieldtype}\" for \"{context}\" has not been implemented")]
    Unimplemented { context: String, fieldtype: String },
}

impl ResolveError {
    pub fn is_lookup(&self) -> bool {
        matches!(self, ResolveError::Lookup { .. })
    }

    pub fn is_unimplemented(&self) -> bool {
        matches!(self, ResolveError::Unimplemented { .. })
    }

    /// Context named by the failed lookup.
    pub fn context(&self) -> &str {
        match self {
            ResolveError::Lookup { context, .. } | ResolveError::Unimplemented { context, .. } => {
                context
            }
        }
    }
}

fn lookup_message(context: &str, name: &str, missing: &LookupMiss) -> String {
    match missing {
        LookupMiss::Context => format!("unknown context \"{context}\""),
        LookupMiss::FieldType => format!("unknown field type \"{name}\" in context \"{context}\""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_display_names_the_missing_part() {
        let err = ResolveError::Lookup {
            context: "nosuch".into(),
            name: "int".into(),
            missing: LookupMiss::Context,
        };
        assert_eq!(err.to_string(), "unknown context \"nosuch\"");
        assert!(err.is_lookup());
        assert!(!err.is_unimplemented());

        let err = ResolveError::Lookup {
            context: "vanilla".into(),
            name: "bogus".into(),
            missing: LookupMiss::FieldType,
        };
        assert_eq!(
            err.to_string(),
            "unknown field type \"bogus\" in context \"vanilla\""
        );
    }

    #[test]
    fn unimplemented_display() {
        let err = ResolveError::Unimplemented {
            context: "form".into(),
            fieldtype: "tuple".into(),
        };
        assert_eq!(
            err.to_string(),
            "type \"tuple\" for \"form\" has not been implemented"
        );
        assert!(err.is_unimplemented());
        assert_eq!(err.context(), "form");
    }
}
