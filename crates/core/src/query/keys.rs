use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A scalar value usable as a query argument.
///
/// Scalars are compared structurally, so freshly built argument records
/// with equal contents always derive equal cache keys. The serialized
/// form keeps the variant tag: a `Text` holding a uuid-shaped string must
/// come back as `Text`, or keys would change identity across a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Uuid(Uuid),
    Text(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{}", value),
            Self::Int(value) => write!(f, "{}", value),
            Self::Uuid(value) => write!(f, "{}", value),
            Self::Text(value) => write!(f, "{}", value),
        }
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<u32> for Scalar {
    fn from(value: u32) -> Self {
        Self::Int(value.into())
    }
}

impl From<Uuid> for Scalar {
    fn from(value: Uuid) -> Self {
        Self::Uuid(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// A named record of query arguments.
///
/// Backed by a `BTreeMap` so iteration order, equality, and hashing are
/// deterministic regardless of insertion order. Absent optional values are
/// skipped entirely, keeping derived keys free of placeholder entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Arguments(BTreeMap<String, Scalar>);

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an argument.
    pub fn set(mut self, name: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Adds an argument only when the value is present.
    pub fn set_opt(self, name: impl Into<String>, value: Option<impl Into<Scalar>>) -> Self {
        match value {
            Some(value) => self.set(name, value),
            None => self,
        }
    }

    pub fn get(&self, name: &str) -> Option<&Scalar> {
        self.0.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (name, value)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}={}", name, value)?;
        }
        write!(f, "}}")
    }
}

/// The caller-declared identity of a query, before argument binding.
///
/// A base key is either a single path segment or a list of segments; lists
/// are flattened one level into the derived key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BaseKey {
    One(String),
    Many(Vec<String>),
}

impl From<&str> for BaseKey {
    fn from(value: &str) -> Self {
        Self::One(value.to_string())
    }
}

impl From<String> for BaseKey {
    fn from(value: String) -> Self {
        Self::One(value)
    }
}

impl From<Vec<&str>> for BaseKey {
    fn from(value: Vec<&str>) -> Self {
        Self::Many(value.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<String>> for BaseKey {
    fn from(value: Vec<String>) -> Self {
        Self::Many(value)
    }
}

/// One part of a derived cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyPart {
    Path(String),
    Arguments(Arguments),
}

impl fmt::Display for KeyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(segment) => write!(f, "{}", segment),
            Self::Arguments(arguments) => write!(f, "{}", arguments),
        }
    }
}

/// The canonical identifier a query's result is stored under.
///
/// Keys compare by structure, never by reference, so the server prefetch
/// path and the client path resolve an identical descriptor to the same
/// cache slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryKey(Vec<KeyPart>);

impl QueryKey {
    pub fn parts(&self) -> &[KeyPart] {
        &self.0
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ":")?;
            }
            write!(f, "{}", part)?;
        }
        Ok(())
    }
}

/// Derives the cache key for a base key plus an optional argument record.
///
/// The base key is flattened one level; the argument record is appended
/// only when it has at least one entry, so `Some(&Arguments::new())` and
/// `None` derive the same key.
pub fn derive_key(base: &BaseKey, arguments: Option<&Arguments>) -> QueryKey {
    let mut parts: Vec<KeyPart> = match base {
        BaseKey::One(segment) => vec![KeyPart::Path(segment.clone())],
        BaseKey::Many(segments) => segments
            .iter()
            .map(|segment| KeyPart::Path(segment.clone()))
            .collect(),
    };

    if let Some(arguments) = arguments {
        if !arguments.is_empty() {
            parts.push(KeyPart::Arguments(arguments.clone()));
        }
    }

    QueryKey(parts)
}
