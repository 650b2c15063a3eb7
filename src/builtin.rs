//! Built-in contexts.
//!
//! Each table lists every canonical field type in `field_types` order. A
//! context whose cargo feature is disabled is still registered, with no
//! entries, so callers see the key but every lookup in it misses.

use crate::catalog::{CapabilityKind, ContextKey, ContextTable};

pub const VANILLA: &str = "vanilla";
pub const ORM: &str = "orm";
pub const FORM: &str = "form";
pub const FACTORY: &str = "factory";

type Rows = &'static [(&'static str, Option<&'static str>)];

/// Rust standard-library types.
const VANILLA_ROWS: Rows = &[
    ("int", Some("i64")),
    ("integer", Some("i64")),
    // no decimal type in std
    ("decimal", None),
    ("float", Some("f64")),
    ("number", Some("i64")),
    ("num", Some("i64")),
    ("int32", Some("i32")),
    ("int64", Some("i64")),
    ("uint32", Some("u32")),
    ("uint64", Some("u64")),
    ("double", Some("f64")),
    ("long", Some("i64")),
    ("str", Some("String")),
    ("string", Some("String")),
    ("unicode", Some("String")),
    ("true", Some("bool")),
    ("false", Some("bool")),
    ("bool", Some("bool")),
    ("time", Some("std::time::SystemTime")),
    ("datetime", Some("std::time::SystemTime")),
    ("date", None),
    ("file", Some("Vec<u8>")),
    ("blob", Some("Vec<u8>")),
    ("binary", Some("Vec<u8>")),
    ("bytes", Some("Vec<u8>")),
    ("password", Some("String")),
    // enums are declared per field, there is no generic one
    ("enum", None),
    ("pickle", None),
    ("pkl", None),
    ("json", None),
    ("yaml", None),
    ("list", Some("Vec<T>")),
    ("array", Some("Vec<T>")),
    ("dict", Some("std::collections::HashMap<K, V>")),
    ("dictionary", Some("std::collections::HashMap<K, V>")),
    ("tuple", Some("(T0, T1)")),
];

/// sea-query column types.
#[cfg(feature = "orm")]
const ORM_ROWS: Rows = &[
    ("int", Some("sea_query::ColumnType::Integer")),
    ("integer", Some("sea_query::ColumnType::Integer")),
    ("decimal", Some("sea_query::ColumnType::Decimal")),
    ("float", Some("sea_query::ColumnType::Float")),
    ("number", Some("sea_query::ColumnType::Integer")),
    ("num", Some("sea_query::ColumnType::Integer")),
    ("int32", Some("sea_query::ColumnType::Integer")),
    ("int64", Some("sea_query::ColumnType::BigInteger")),
    ("uint32", Some("sea_query::ColumnType::Unsigned")),
    ("uint64", Some("sea_query::ColumnType::BigUnsigned")),
    ("double", Some("sea_query::ColumnType::Double")),
    ("long", Some("sea_query::ColumnType::BigInteger")),
    ("str", Some("sea_query::ColumnType::String")),
    ("string", Some("sea_query::ColumnType::String")),
    ("unicode", Some("sea_query::ColumnType::Text")),
    ("true", Some("sea_query::ColumnType::Boolean")),
    ("false", Some("sea_query::ColumnType::Boolean")),
    ("bool", Some("sea_query::ColumnType::Boolean")),
    ("time", Some("sea_query::ColumnType::Time")),
    ("datetime", Some("sea_query::ColumnType::DateTime")),
    ("date", Some("sea_query::ColumnType::Date")),
    ("file", Some("sea_query::ColumnType::Blob")),
    ("blob", Some("sea_query::ColumnType::Blob")),
    ("binary", Some("sea_query::ColumnType::Binary")),
    ("bytes", Some("sea_query::ColumnType::VarBinary")),
    ("password", Some("sea_query::ColumnType::String")),
    ("enum", Some("sea_query::ColumnType::Enum")),
    ("pickle", None),
    ("pkl", None),
    ("json", Some("sea_query::ColumnType::Json")),
    ("yaml", None),
    ("list", Some("sea_query::ColumnType::Array")),
    ("array", Some("sea_query::ColumnType::Array")),
    ("dict", Some("sea_query::ColumnType::JsonBinary")),
    ("dictionary", Some("sea_query::ColumnType::JsonBinary")),
    ("tuple", None),
];

/// HTML form controls.
#[cfg(feature = "form")]
const FORM_ROWS: Rows = &[
    ("int", Some("input[type=number]")),
    ("integer", Some("input[type=number]")),
    ("decimal", Some("input[type=number][step=any]")),
    ("float", Some("input[type=number][step=any]")),
    ("number", Some("input[type=number]")),
    ("num", Some("input[type=number]")),
    ("int32", Some("input[type=number]")),
    ("int64", Some("input[type=number]")),
    ("uint32", Some("input[type=number][min=0]")),
    ("uint64", Some("input[type=number][min=0]")),
    ("double", Some("input[type=number][step=any]")),
    ("long", Some("input[type=number]")),
    ("str", Some("input[type=text]")),
    ("string", Some("input[type=text]")),
    ("unicode", Some("input[type=text]")),
    ("true", Some("input[type=checkbox]")),
    ("false", Some("input[type=checkbox]")),
    ("bool", Some("input[type=checkbox]")),
    ("time", Some("input[type=time]")),
    ("datetime", Some("input[type=datetime-local]")),
    ("date", Some("input[type=date]")),
    ("file", Some("input[type=file]")),
    ("blob", Some("input[type=file]")),
    ("binary", Some("input[type=file]")),
    ("bytes", Some("input[type=file]")),
    ("password", Some("input[type=password]")),
    ("enum", Some("select")),
    ("pickle", Some("textarea")),
    ("pkl", Some("textarea")),
    ("json", Some("textarea")),
    ("yaml", Some("textarea")),
    ("list", Some("select[multiple]")),
    ("array", Some("select[multiple]")),
    ("dict", None),
    ("dictionary", None),
    ("tuple", None),
];

/// `fake` crate generators; ranges are `Dummy` sources for numeric types.
#[cfg(feature = "factory")]
const FACTORY_ROWS: Rows = &[
    ("int", Some("std::ops::Range<i64>")),
    ("integer", Some("std::ops::Range<i64>")),
    ("decimal", Some("fake::decimal::Decimal")),
    ("float", Some("std::ops::Range<f32>")),
    ("number", Some("std::ops::Range<i64>")),
    ("num", Some("std::ops::Range<i64>")),
    ("int32", Some("std::ops::Range<i32>")),
    ("int64", Some("std::ops::Range<i64>")),
    ("uint32", Some("std::ops::Range<u32>")),
    ("uint64", Some("std::ops::Range<u64>")),
    ("double", Some("std::ops::Range<f64>")),
    ("long", Some("std::ops::Range<i64>")),
    ("str", Some("fake::faker::lorem::en::Word")),
    ("string", Some("fake::faker::lorem::en::Word")),
    ("unicode", Some("fake::faker::lorem::en::Word")),
    // a constant needs no generator
    ("true", None),
    ("false", None),
    ("bool", Some("fake::faker::boolean::en::Boolean")),
    ("time", Some("fake::faker::chrono::en::Time")),
    ("datetime", Some("fake::faker::chrono::en::DateTime")),
    ("date", Some("fake::faker::chrono::en::Date")),
    ("file", None),
    ("blob", None),
    ("binary", None),
    ("bytes", None),
    ("password", Some("fake::faker::internet::en::Password")),
    ("enum", Some("rand::seq::IndexedRandom::choose")),
    ("pickle", None),
    ("pkl", None),
    ("json", None),
    ("yaml", None),
    ("list", Some("fake::Faker")),
    ("array", Some("fake::Faker")),
    ("dict", None),
    ("dictionary", None),
    ("tuple", None),
];

fn gated(key: &str, kind: CapabilityKind, rows: Option<Rows>) -> ContextTable {
    match rows {
        Some(rows) => ContextTable::from_static(key, kind, rows),
        None => ContextTable::empty(ContextKey::new(key), kind),
    }
}

/// Tables for every built-in context, empty where the feature is off.
pub fn builtin_tables() -> Vec<ContextTable> {
    vec![
        gated(VANILLA, CapabilityKind::Primitive, Some(VANILLA_ROWS)),
        gated(ORM, CapabilityKind::Column, orm_rows()),
        gated(FORM, CapabilityKind::Widget, form_rows()),
        gated(FACTORY, CapabilityKind::Generator, factory_rows()),
    ]
}

fn orm_rows() -> Option<Rows> {
    #[cfg(feature = "orm")]
    {
        Some(ORM_ROWS)
    }
    #[cfg(not(feature = "orm"))]
    {
        None
    }
}

fn form_rows() -> Option<Rows> {
    #[cfg(feature = "form")]
    {
        Some(FORM_ROWS)
    }
    #[cfg(not(feature = "form"))]
    {
        None
    }
}

fn factory_rows() -> Option<Rows> {
    #[cfg(feature = "factory")]
    {
        Some(FACTORY_ROWS)
    }
    #[cfg(not(feature = "factory"))]
    {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field_types::canonical_names;

    #[test]
    fn populated_tables_cover_exactly_the_canonical_names_in_order() {
        let canonical: Vec<&str> = canonical_names().collect();
        for table in builtin_tables().iter().filter(|t| !t.is_empty()) {
            let names: Vec<&str> = table.entries().map(|(name, _)| name).collect();
            assert_eq!(names, canonical, "context {}", table.key());
        }
    }

    #[test]
    fn static_rows_pass_table_validation() {
        for table in builtin_tables() {
            let rows: Vec<(String, Option<String>)> = table
                .entries()
                .map(|(name, target)| {
                    (
                        name.to_string(),
                        target.capability().map(|cap| cap.path.clone()),
                    )
                })
                .collect();
            ContextTable::from_entries(table.key().clone(), table.kind().clone(), rows)
                .unwrap_or_else(|err| panic!("{}: {err:#}", table.key()));
        }
    }

    #[test]
    fn str_is_concrete_in_every_populated_context() {
        for table in builtin_tables().iter().filter(|t| !t.is_empty()) {
            let target = table.target("str").unwrap();
            assert!(target.capability().is_some(), "context {}", table.key());
        }
    }

    #[test]
    fn capability_kind_follows_context() {
        for table in builtin_tables() {
            for (_, target) in table.entries() {
                if let Some(cap) = target.capability() {
                    assert_eq!(&cap.kind, table.kind());
                }
            }
        }
    }

    #[cfg(all(feature = "orm", feature = "form", feature = "factory"))]
    #[test]
    fn default_build_populates_all_contexts() {
        assert!(builtin_tables().iter().all(|t| t.len() == 36));
    }
}
