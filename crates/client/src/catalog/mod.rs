//! Catalog Client: CRUD calls against the product backend.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use bpcatalog_core::{Ack, Product, ProductUpdate};
use bpcatalog_products::IdExistenceCheck;

use crate::errors::ApiError;

pub mod http;
pub mod in_memory;

pub use http::HttpCatalogClient;
pub use in_memory::InMemoryCatalog;

/// Operations offered by the product backend.
///
/// Blank identifiers are rejected with [`ApiError::MissingId`] before any
/// request is made. No call retries; every failure is terminal for that
/// attempt.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Full catalog. Paging is done client-side.
    async fn list_products(&self) -> Result<Vec<Product>, ApiError>;

    async fn get_product(&self, id: &str) -> Result<Product, ApiError>;

    /// Whether `id` is already taken.
    async fn check_id_exists(&self, id: &str) -> Result<bool, ApiError>;

    /// Create a product; the body carries the full record including `id`.
    async fn create_product(&self, product: &Product) -> Result<Product, ApiError>;

    /// Replace every field except the identifier.
    ///
    /// Only the acknowledgment message is meaningful; `data` is whatever the
    /// backend echoed back.
    async fn update_product(&self, id: &str, update: &ProductUpdate) -> Result<Ack, ApiError>;

    async fn delete_product(&self, id: &str) -> Result<Ack, ApiError>;
}

#[async_trait]
impl<C> CatalogApi for Arc<C>
where
    C: CatalogApi + ?Sized,
{
    async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        (**self).list_products().await
    }

    async fn get_product(&self, id: &str) -> Result<Product, ApiError> {
        (**self).get_product(id).await
    }

    async fn check_id_exists(&self, id: &str) -> Result<bool, ApiError> {
        (**self).check_id_exists(id).await
    }

    async fn create_product(&self, product: &Product) -> Result<Product, ApiError> {
        (**self).create_product(product).await
    }

    async fn update_product(&self, id: &str, update: &ProductUpdate) -> Result<Ack, ApiError> {
        (**self).update_product(id, update).await
    }

    async fn delete_product(&self, id: &str) -> Result<Ack, ApiError> {
        (**self).delete_product(id).await
    }
}

/// Adapter exposing a catalog's existence check to the validation engine.
pub struct ExistenceCheck<'a, C: ?Sized>(pub &'a C);

#[async_trait]
impl<C> IdExistenceCheck for ExistenceCheck<'_, C>
where
    C: CatalogApi + ?Sized,
{
    type Error = ApiError;

    async fn id_exists(&self, id: &str) -> Result<bool, Self::Error> {
        self.0.check_id_exists(id).await
    }
}

/// Payloads arrive either bare or wrapped in `{ "data": ... }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    pub(crate) fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } => data,
            Envelope::Bare(value) => value,
        }
    }
}

/// The verification endpoint answers a bare boolean (or `{ "exists": bool }`).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Existence {
    Flag(bool),
    Object { exists: bool },
}

impl Existence {
    pub(crate) fn exists(&self) -> bool {
        match self {
            Existence::Flag(flag) => *flag,
            Existence::Object { exists } => *exists,
        }
    }
}
