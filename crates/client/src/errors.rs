//! Transport failure taxonomy and its mapping to user-facing messages.
//!
//! Every catalog call funnels failures through [`map_status`] or
//! [`map_transport`], which log the failure and return the mapped error.

use reqwest::StatusCode;
use thiserror::Error;

use bpcatalog_core::{DomainError, ProductId};

/// A failed catalog call, already mapped to a human-readable message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Blank identifier; detected locally, no request was sent.
    #[error("El ID del producto es requerido")]
    MissingId,

    #[error("Solicitud incorrecta. Verifique los datos enviados.")]
    BadRequest,

    #[error("No autorizado. Inicie sesión nuevamente.")]
    Unauthorized,

    #[error("Acceso denegado. No tiene permisos suficientes.")]
    Forbidden,

    #[error("Recurso no encontrado.")]
    NotFound,

    #[error("Error interno del servidor. Intente más tarde.")]
    Server,

    /// Any other non-success status.
    #[error("Error del servidor: {status} - {reason}")]
    Status { status: u16, reason: String },

    /// Network-layer or decoding failure (no usable response).
    #[error("Error del cliente: {0}")]
    Client(String),
}

impl ApiError {
    pub fn client(msg: impl Into<String>) -> Self {
        Self::Client(msg.into())
    }

    /// Pure status-code mapping (no logging).
    pub fn from_status(status: u16, reason: impl Into<String>) -> Self {
        match status {
            400 => Self::BadRequest,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            500 => Self::Server,
            _ => Self::Status {
                status,
                reason: reason.into(),
            },
        }
    }

    /// HTTP status behind this error, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::BadRequest => Some(400),
            Self::Unauthorized => Some(401),
            Self::Forbidden => Some(403),
            Self::NotFound => Some(404),
            Self::Server => Some(500),
            Self::Status { status, .. } => Some(*status),
            Self::MissingId | Self::Client(_) => None,
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::MissingId => Self::MissingId,
            other => Self::client(other.to_string()),
        }
    }
}

/// Reject blank identifiers before any request is built.
pub fn require_id(id: &str) -> Result<ProductId, ApiError> {
    ProductId::new(id).map_err(ApiError::from)
}

/// Map a non-success response status.
pub fn map_status(status: StatusCode, body: &str) -> ApiError {
    let reason = if body.trim().is_empty() {
        status.canonical_reason().unwrap_or("unknown").to_string()
    } else {
        body.trim().to_string()
    };
    let err = ApiError::from_status(status.as_u16(), reason);
    tracing::warn!(status = status.as_u16(), error = %err, "catalog request failed");
    err
}

/// Map a failure that produced no usable response.
pub fn map_transport(err: &reqwest::Error) -> ApiError {
    let mapped = ApiError::client(err.to_string());
    tracing::warn!(error = %mapped, "catalog request did not complete");
    mapped
}

/// Map a response body that could not be decoded.
pub fn map_decode(err: &serde_json::Error) -> ApiError {
    let mapped = ApiError::client(format!("respuesta inválida: {err}"));
    tracing::warn!(error = %mapped, "catalog response could not be decoded");
    mapped
}
