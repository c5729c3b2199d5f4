//! core
//!
//! Shared domain types and configuration.
//!
//! # Modules
//!
//! - [`types`] - Strong types: SchemaType, internal subject classification
//! - [`config`] - Configuration schema, loading and connection resolution

pub mod config;
pub mod types;
