//! Core value types for AssetField.
//!
//! This crate defines the host-agnostic building blocks the sync core works
//! with:
//!
//! - [`Resource`]: the bound for anything that can ride in a field value
//! - [`AssetRecord`]: an opaque keyed record for hosts without a typed model
//! - [`FieldValue`]: the ordered sequence of resources a field holds
//! - [`FieldConfig`]: the read-only configuration record supplied by the host
//!
//! Resource contents are opaque to the sync core. It manages sequence
//! structure and order; what a record means belongs to the host.

mod config;
mod resource;
mod value;

pub use config::FieldConfig;
pub use resource::{AssetRecord, Resource};
pub use value::FieldValue;
