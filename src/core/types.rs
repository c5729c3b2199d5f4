//! core::types
//!
//! Strong types for registry domain concepts.
//!
//! # Types
//!
//! - [`SchemaType`] - Normalized schema format tag
//! - [`is_internal_subject`] - Classification of system-owned subjects
//!
//! # Examples
//!
//! ```
//! use srstats::core::types::{is_internal_subject, SchemaType};
//!
//! assert_eq!(SchemaType::normalize(""), SchemaType::Avro);
//! assert_eq!(SchemaType::normalize("protobuf"), SchemaType::Protobuf);
//!
//! assert!(is_internal_subject("_confluent-ksql-default_query_1"));
//! assert!(!is_internal_subject("orders-value"));
//! ```

use serde::{Deserialize, Serialize};

/// Name prefix of subjects created by ksqlDB for its own bookkeeping.
pub const INTERNAL_SUBJECT_PREFIX: &str = "_confluent-ksql-";

/// Check whether a subject is an internal/system subject.
///
/// Only a prefix match counts; the marker appearing later in the name does
/// not make a subject internal.
pub fn is_internal_subject(subject: &str) -> bool {
    subject.starts_with(INTERNAL_SUBJECT_PREFIX)
}

/// Schema format as reported by the registry.
///
/// Registries omit the type for Avro schemas, so an empty tag normalizes to
/// [`SchemaType::Avro`]. Tags are compared case-insensitively. Unknown tags
/// are preserved (upper-cased) so they can be counted without being folded
/// into one of the known formats.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum SchemaType {
    /// Apache Avro
    Avro,
    /// Protocol Buffers
    Protobuf,
    /// JSON Schema
    Json,
    /// Any other tag, upper-cased
    Other(String),
}

impl SchemaType {
    /// Normalize a raw type tag.
    pub fn normalize(raw: &str) -> Self {
        let upper = raw.to_uppercase();
        match upper.as_str() {
            "" | "AVRO" => SchemaType::Avro,
            "PROTOBUF" => SchemaType::Protobuf,
            "JSON" => SchemaType::Json,
            _ => SchemaType::Other(upper),
        }
    }

    /// The canonical tag.
    pub fn as_str(&self) -> &str {
        match self {
            SchemaType::Avro => "AVRO",
            SchemaType::Protobuf => "PROTOBUF",
            SchemaType::Json => "JSON",
            SchemaType::Other(tag) => tag,
        }
    }
}

impl std::fmt::Display for SchemaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for SchemaType {
    fn from(s: String) -> Self {
        SchemaType::normalize(&s)
    }
}

impl From<SchemaType> for String {
    fn from(t: SchemaType) -> Self {
        t.as_str().to_string()
    }
}
