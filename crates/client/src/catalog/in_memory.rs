//! In-memory catalog for tests/dev.

use std::sync::Mutex;

use async_trait::async_trait;

use bpcatalog_core::{Ack, PRODUCT_REMOVED, PRODUCT_UPDATED, Product, ProductUpdate};

use crate::catalog::CatalogApi;
use crate::errors::{ApiError, require_id};

/// Backend stand-in holding products in insertion order.
///
/// - Identifier uniqueness enforced on create (400 otherwise)
/// - Unknown identifiers answer 404
/// - A forced failure can be injected to exercise error paths
/// - The acknowledgment message of updates and deletes can be overridden
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    products: Mutex<Vec<Product>>,
    failure: Mutex<Option<ApiError>>,
    ack_message: Mutex<Option<String>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        Self {
            products: Mutex::new(products.into_iter().collect()),
            ..Self::default()
        }
    }

    /// Make every subsequent call fail with `failure` (or succeed again with `None`).
    pub fn set_failure(&self, failure: Option<ApiError>) {
        if let Ok(mut slot) = self.failure.lock() {
            *slot = failure;
        }
    }

    /// Answer updates and deletes with `message` instead of the usual
    /// success text (`None` restores it). The mutation itself still happens.
    pub fn set_ack_message(&self, message: Option<String>) {
        if let Ok(mut slot) = self.ack_message.lock() {
            *slot = message;
        }
    }

    fn ack(&self, default: &str) -> Ack {
        let message = self.ack_message.lock().ok().and_then(|m| m.clone());
        Ack::new(message.unwrap_or_else(|| default.to_string()))
    }

    /// Current contents, in insertion order.
    pub fn snapshot(&self) -> Vec<Product> {
        self.products.lock().map(|p| p.clone()).unwrap_or_default()
    }

    fn check_failure(&self) -> Result<(), ApiError> {
        let slot = self.failure.lock().map_err(|_| poisoned())?;
        match slot.as_ref() {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn with_products_mut<T>(&self, f: impl FnOnce(&mut Vec<Product>) -> Result<T, ApiError>) -> Result<T, ApiError> {
        self.check_failure()?;
        let mut products = self.products.lock().map_err(|_| poisoned())?;
        f(&mut products)
    }
}

fn poisoned() -> ApiError {
    ApiError::client("catalog lock poisoned")
}

#[async_trait]
impl CatalogApi for InMemoryCatalog {
    async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        self.with_products_mut(|products| Ok(products.clone()))
    }

    async fn get_product(&self, id: &str) -> Result<Product, ApiError> {
        let id = require_id(id)?;
        self.with_products_mut(|products| {
            products.iter().find(|p| p.id == id).cloned().ok_or(ApiError::NotFound)
        })
    }

    async fn check_id_exists(&self, id: &str) -> Result<bool, ApiError> {
        let id = require_id(id)?;
        self.with_products_mut(|products| Ok(products.iter().any(|p| p.id == id)))
    }

    async fn create_product(&self, product: &Product) -> Result<Product, ApiError> {
        self.with_products_mut(|products| {
            if products.iter().any(|p| p.id == product.id) {
                return Err(ApiError::BadRequest);
            }
            products.push(product.clone());
            Ok(product.clone())
        })
    }

    async fn update_product(&self, id: &str, update: &ProductUpdate) -> Result<Ack, ApiError> {
        let id = require_id(id)?;
        self.with_products_mut(|products| {
            let slot = products.iter_mut().find(|p| p.id == id).ok_or(ApiError::NotFound)?;
            *slot = Product::with_id(id, update.clone());
            Ok(())
        })?;
        Ok(self.ack(PRODUCT_UPDATED))
    }

    async fn delete_product(&self, id: &str) -> Result<Ack, ApiError> {
        let id = require_id(id)?;
        self.with_products_mut(|products| {
            let before = products.len();
            products.retain(|p| p.id != id);
            if products.len() == before {
                return Err(ApiError::NotFound);
            }
            Ok(())
        })?;
        Ok(self.ack(PRODUCT_REMOVED))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bpcatalog_core::ProductId;
    use chrono::NaiveDate;

    fn product(id: &str) -> Product {
        Product {
            id: ProductId::new(id).unwrap(),
            name: "Test Product".into(),
            description: "Test Description".into(),
            logo: "test-logo.png".into(),
            date_release: NaiveDate::from_ymd_opt(2030, 2, 20).unwrap(),
            date_revision: NaiveDate::from_ymd_opt(2031, 2, 20).unwrap(),
        }
    }

    #[tokio::test]
    async fn create_rejects_duplicate_ids() {
        let catalog = InMemoryCatalog::with_products([product("abc")]);
        assert_eq!(catalog.create_product(&product("abc")).await.unwrap_err(), ApiError::BadRequest);
        assert!(catalog.check_id_exists("abc").await.unwrap());
        assert!(!catalog.check_id_exists("xyz").await.unwrap());
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let catalog = InMemoryCatalog::new();
        assert_eq!(catalog.get_product("nope").await.unwrap_err(), ApiError::NotFound);
        assert_eq!(catalog.delete_product("nope").await.unwrap_err(), ApiError::NotFound);
    }

    #[tokio::test]
    async fn update_keeps_identifier() {
        let catalog = InMemoryCatalog::with_products([product("abc")]);
        let mut update = product("abc").to_update();
        update.name = "Renamed Product".into();

        let ack = catalog.update_product("abc", &update).await.unwrap();
        assert!(ack.confirms(PRODUCT_UPDATED));
        assert_eq!(catalog.get_product("abc").await.unwrap().name, "Renamed Product");
    }

    #[tokio::test]
    async fn overridden_ack_message_still_mutates() {
        let catalog = InMemoryCatalog::with_products([product("abc"), product("xyz")]);
        catalog.set_ack_message(Some("otro".into()));

        let ack = catalog.delete_product("abc").await.unwrap();
        assert_eq!(ack.message, "otro");
        assert!(!ack.confirms(PRODUCT_REMOVED));
        assert_eq!(catalog.snapshot().len(), 1);

        catalog.set_ack_message(None);
        assert!(catalog.delete_product("xyz").await.unwrap().confirms(PRODUCT_REMOVED));
    }

    #[tokio::test]
    async fn injected_failure_applies_to_every_call() {
        let catalog = InMemoryCatalog::with_products([product("abc")]);
        catalog.set_failure(Some(ApiError::Server));
        assert_eq!(catalog.list_products().await.unwrap_err(), ApiError::Server);

        catalog.set_failure(None);
        assert_eq!(catalog.list_products().await.unwrap().len(), 1);
    }
}
