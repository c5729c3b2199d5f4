//! registry
//!
//! Read access to a Confluent-compatible schema registry.
//!
//! # Architecture
//!
//! The `Registry` trait is the only way the stats pipeline talks to a
//! registry. Commands obtain one through [`create_registry`]; tests use
//! [`mock::MockRegistry`].
//!
//! # Modules
//!
//! - `traits`: Core `Registry` trait, wire types and `RegistryError`
//! - [`http`]: REST implementation using `reqwest`
//! - [`mock`]: In-memory implementation for deterministic testing
//! - `factory`: Registry creation from a resolved target

mod factory;
pub mod http;
pub mod mock;
mod traits;

pub use factory::{create_registry, RegistryTarget};
pub use traits::*;
