//! `bpcatalog-core` — shared record types and error taxonomy.
//!
//! This crate contains **pure data** definitions (no IO, no HTTP). The same
//! `Product` type flows through validation, transport and form layers.

pub mod error;
pub mod id;
pub mod product;

pub use error::{DomainError, DomainResult, FieldError};
pub use id::ProductId;
pub use product::{
    Ack, DATE_FORMAT, Field, PRODUCT_ADDED, PRODUCT_REMOVED, PRODUCT_UPDATED, Product,
    ProductUpdate,
};
