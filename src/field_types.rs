//! Canonical field-type vocabulary shared by every context.
//!
//! Names are lowercase and grouped into families. The built-in tables cover
//! exactly this set; loaded tables are only held to matching each other.

use serde::Serialize;

/// Broad grouping for canonical field types.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldFamily {
    Number,
    String,
    Boolean,
    Date,
    Binary,
    Password,
    Choice,
    Serialized,
    List,
    Dictionary,
    Tuple,
}

/// Every canonical name with its family, in table order.
pub const CANONICAL_FIELD_TYPES: &[(&str, FieldFamily)] = &[
    ("int", FieldFamily::Number),
    ("integer", FieldFamily::Number),
    ("decimal", FieldFamily::Number),
    ("float", FieldFamily::Number),
    ("number", FieldFamily::Number),
    ("num", FieldFamily::Number),
    ("int32", FieldFamily::Number),
    ("int64", FieldFamily::Number),
    ("uint32", FieldFamily::Number),
    ("uint64", FieldFamily::Number),
    ("double", FieldFamily::Number),
    ("long", FieldFamily::Number),
    ("str", FieldFamily::String),
    ("string", FieldFamily::String),
    ("unicode", FieldFamily::String),
    ("true", FieldFamily::Boolean),
    ("false", FieldFamily::Boolean),
    ("bool", FieldFamily::Boolean),
    ("time", FieldFamily::Date),
    ("datetime", FieldFamily::Date),
    ("date", FieldFamily::Date),
    ("file", FieldFamily::Binary),
    ("blob", FieldFamily::Binary),
    ("binary", FieldFamily::Binary),
    ("bytes", FieldFamily::Binary),
    ("password", FieldFamily::Password),
    ("enum", FieldFamily::Choice),
    ("pickle", FieldFamily::Serialized),
    ("pkl", FieldFamily::Serialized),
    ("json", FieldFamily::Serialized),
    ("yaml", FieldFamily::Serialized),
    ("list", FieldFamily::List),
    ("array", FieldFamily::List),
    ("dict", FieldFamily::Dictionary),
    ("dictionary", FieldFamily::Dictionary),
    ("tuple", FieldFamily::Tuple),
];

/// Family of a canonical name; the lookup ignores case.
pub fn family_of(name: &str) -> Option<FieldFamily> {
    let name = name.to_lowercase();
    CANONICAL_FIELD_TYPES
        .iter()
        .find(|(canonical, _)| *canonical == name)
        .map(|(_, family)| *family)
}

/// Canonical names in table order.
pub fn canonical_names() -> impl Iterator<Item = &'static str> {
    CANONICAL_FIELD_TYPES.iter().map(|(name, _)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn names_are_unique_and_lowercase() {
        let names: BTreeSet<&str> = canonical_names().collect();
        assert_eq!(names.len(), CANONICAL_FIELD_TYPES.len());
        for name in names {
            assert_eq!(name, name.to_lowercase());
        }
    }

    #[test]
    fn family_lookup_ignores_case() {
        assert_eq!(family_of("DateTime"), Some(FieldFamily::Date));
        assert_eq!(family_of("pkl"), Some(FieldFamily::Serialized));
        assert_eq!(family_of("bogus_type"), None);
    }

    #[test]
    fn family_serializes_snake_case() {
        let json = serde_json::to_string(&FieldFamily::Dictionary).unwrap();
        assert_eq!(json, "\"dictionary\"");
    }
}
