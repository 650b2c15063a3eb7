use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Key naming a mapping context (e.g., `vanilla`, `orm`).
///
/// Callers pass plain strings to `resolve`; the key type keeps registry maps
/// and table files explicit about which string is a context.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContextKey(pub String);

impl ContextKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContextKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What kind of target a context hands back.
///
/// Known variants keep serialization consistent; `Other` lets table files
/// introduce consumers the built-in contexts do not cover.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CapabilityKind {
    /// A language-level type.
    Primitive,
    /// An ORM/SQL column type.
    Column,
    /// A form control.
    Widget,
    /// A fake-data generator.
    Generator,
    Other(String),
}

impl Serialize for CapabilityKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CapabilityKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Self::from_str(&value))
    }
}

impl CapabilityKind {
    pub fn as_str(&self) -> &str {
        match self {
            CapabilityKind::Primitive => "primitive",
            CapabilityKind::Column => "column",
            CapabilityKind::Widget => "widget",
            CapabilityKind::Generator => "generator",
            CapabilityKind::Other(value) => value.as_str(),
        }
    }

    fn from_str(value: &str) -> Self {
        match value {
            "primitive" => CapabilityKind::Primitive,
            "column" => CapabilityKind::Column,
            "widget" => CapabilityKind::Widget,
            "generator" => CapabilityKind::Generator,
            other => CapabilityKind::Other(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_serializes_known_and_unknown() {
        let json = serde_json::to_string(&CapabilityKind::Widget).unwrap();
        assert_eq!(json, "\"widget\"");
        let back: CapabilityKind = serde_json::from_str(&json).unwrap();
        assert_eq!(back, CapabilityKind::Widget);

        let parsed: CapabilityKind = serde_json::from_str("\"graphql_scalar\"").unwrap();
        assert_eq!(parsed, CapabilityKind::Other("graphql_scalar".to_string()));
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "\"graphql_scalar\"");
    }

    #[test]
    fn context_key_is_transparent() {
        let key = ContextKey::new("vanilla");
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"vanilla\"");
        assert_eq!(key.to_string(), "vanilla");
    }
}
