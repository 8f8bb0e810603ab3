//! `reqwest`-backed catalog client.

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;

use bpcatalog_core::{Ack, Product, ProductUpdate};

use crate::catalog::{CatalogApi, Envelope, Existence};
use crate::config::ClientConfig;
use crate::errors::{ApiError, map_decode, map_status, map_transport, require_id};

/// Talks to `<API_URL>/bp/products`.
#[derive(Debug, Clone)]
pub struct HttpCatalogClient {
    http: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpCatalogClient {
    pub fn new(base_url: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            token: None,
        }
    }

    pub fn with_token(base_url: Url, token: String) -> Self {
        Self {
            token: Some(token),
            ..Self::new(base_url)
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        match &config.auth_token {
            Some(token) => Self::with_token(config.api_url.clone(), token.clone()),
            None => Self::new(config.api_url.clone()),
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `<base>/bp/products/<segments...>`, each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::client(format!("{} cannot be used as a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(["bp", "products"])
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let req = self.http.request(method, url);
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response, ApiError> {
        let resp = req.send().await.map_err(|e| map_transport(&e))?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(map_status(status, &body));
        }
        Ok(resp)
    }

    async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
        let bytes = resp.bytes().await.map_err(|e| map_transport(&e))?;
        serde_json::from_slice(&bytes).map_err(|e| map_decode(&e))
    }

    /// Acknowledgments may come back with an empty body.
    async fn decode_ack(resp: Response) -> Result<Ack, ApiError> {
        let bytes = resp.bytes().await.map_err(|e| map_transport(&e))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Ack::new(String::new()));
        }
        serde_json::from_slice(&bytes).map_err(|e| map_decode(&e))
    }
}

#[async_trait]
impl CatalogApi for HttpCatalogClient {
    async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        let url = self.endpoint(&[])?;
        let resp = self.send(self.request(Method::GET, url)).await?;
        let products = Self::decode::<Envelope<Vec<Product>>>(resp).await?.into_inner();
        tracing::debug!(count = products.len(), "fetched product catalog");
        Ok(products)
    }

    async fn get_product(&self, id: &str) -> Result<Product, ApiError> {
        let id = require_id(id)?;
        let url = self.endpoint(&[id.as_str()])?;
        let resp = self.send(self.request(Method::GET, url)).await?;
        Ok(Self::decode::<Envelope<Product>>(resp).await?.into_inner())
    }

    async fn check_id_exists(&self, id: &str) -> Result<bool, ApiError> {
        let id = require_id(id)?;
        let url = self.endpoint(&["verification", id.as_str()])?;
        let resp = self.send(self.request(Method::GET, url)).await?;
        Ok(Self::decode::<Existence>(resp).await?.exists())
    }

    async fn create_product(&self, product: &Product) -> Result<Product, ApiError> {
        let url = self.endpoint(&[])?;
        let resp = self.send(self.request(Method::POST, url).json(product)).await?;
        let created = Self::decode::<Envelope<Product>>(resp).await?.into_inner();
        tracing::info!(id = %created.id, "product created");
        Ok(created)
    }

    async fn update_product(&self, id: &str, update: &ProductUpdate) -> Result<Ack, ApiError> {
        let id = require_id(id)?;
        let url = self.endpoint(&[id.as_str()])?;
        let resp = self.send(self.request(Method::PUT, url).json(update)).await?;
        let ack = Self::decode_ack(resp).await?;
        tracing::info!(%id, message = %ack.message, "product updated");
        Ok(ack)
    }

    async fn delete_product(&self, id: &str) -> Result<Ack, ApiError> {
        let id = require_id(id)?;
        let url = self.endpoint(&[id.as_str()])?;
        let resp = self.send(self.request(Method::DELETE, url)).await?;
        let ack = Self::decode_ack(resp).await?;
        tracing::info!(%id, message = %ack.message, "product deleted");
        Ok(ack)
    }
}
