//! Core contracts for combogen.
//!
//! This crate defines the item/selection model, the request and response
//! payloads shared by the engine and its storage adapters, request validation,
//! and small helpers used by the CLI. It performs no I/O.

pub mod error;
pub mod redaction;
pub mod types;
pub mod validation;

pub use error::{Error, Result};
pub use redaction::redact_database_url;
pub use types::{
    GenerationId, GenerationRecord, GenerationRequest, Item, Selection, SelectionSet, TypeLabel,
};
pub use validation::{MAX_LENGTH, MAX_TOTAL_ITEMS, MAX_TYPES, validate_request};
