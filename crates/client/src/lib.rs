//! `bpcatalog-client`
//!
//! **Responsibility:** administrative client for the product catalog.
//!
//! This crate provides:
//! - The catalog client (`CatalogApi`) over HTTP, plus an in-memory stand-in
//! - Mapping of transport failures to user-facing messages
//! - The list/search/paginate and record form controllers
//! - The confirmation prompt and the exclusive-open popup registry
//!
//! The backend remains the source of truth; nothing here is persisted.

pub mod catalog;
pub mod config;
pub mod errors;
pub mod form;
pub mod list;
pub mod popup;
pub mod prompt;
pub mod routes;

pub use catalog::{CatalogApi, ExistenceCheck, HttpCatalogClient, InMemoryCatalog};
pub use config::{ClientConfig, ConfigError};
pub use errors::ApiError;
pub use form::{FormError, FormMode, ProductFormController};
pub use list::{ListState, ProductListController, RowAction};
pub use popup::{ActionMenu, ExclusiveOpenRegistry, PopupHandle, PopupId};
pub use prompt::{ConfirmPrompt, PromptSignal};
pub use routes::Route;
