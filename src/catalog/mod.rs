//! Mapping context tables and the registry that resolves against them.
//!
//! Types here mirror `schema/type_table.schema.json`; callers use
//! `ContextTable` for a single validated context and `TypeRegistry` when
//! resolving across contexts.

pub mod identity;
pub mod index;
pub mod model;
pub mod repository;

pub use identity::{CapabilityKind, ContextKey};
pub use index::{ContextTable, TABLE_SCHEMA_VERSION};
pub use model::{Capability, TableEntry, Target, TypeTable};
pub use repository::{CompletenessGap, RegistryBuilder, Resolution, TypeRegistry};

pub use model::load_table_from_path;
