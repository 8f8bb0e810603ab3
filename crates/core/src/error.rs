//! Error model shared by the validation and client layers.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::product::Field;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// A single failed rule on one form field.
///
/// These never reach the network layer: they block submission and are
/// rendered inline next to the offending field.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// The field is empty.
    #[error("Este campo es requerido.")]
    Required,

    /// The value's length (in characters) is outside `[min, max]`.
    #[error("Debe tener entre {min} y {max} caracteres.")]
    Length { min: usize, max: usize, actual: usize },

    /// Not a calendar date, or a release date in the past.
    #[error("La fecha debe ser igual o mayor a la fecha actual.")]
    InvalidDate,

    /// The revision date is not exactly one year after the release date.
    #[error("La fecha de revisión debe ser exactamente un año posterior a la fecha de liberación.")]
    InvalidRevisionDate,

    /// The backend already has a product with this identifier.
    #[error("El ID ya existe.")]
    DuplicateId,
}

impl FieldError {
    pub fn length(min: usize, max: usize, actual: usize) -> Self {
        Self::Length { min, max, actual }
    }

    /// Stable machine-readable key (mirrors the keys templates look up).
    pub fn code(&self) -> &'static str {
        match self {
            FieldError::Required => "required",
            FieldError::Length { min, actual, .. } if actual < min => "minlength",
            FieldError::Length { .. } => "maxlength",
            FieldError::InvalidDate => "invalidDate",
            FieldError::InvalidRevisionDate => "invalidRevisionDate",
            FieldError::DuplicateId => "idExists",
        }
    }
}

/// Domain-level error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An identifier was empty or blank. Raised before any network call.
    #[error("El ID del producto es requerido")]
    MissingId,

    /// One or more fields failed validation.
    #[error("validation failed on {} field(s)", .0.len())]
    Validation(BTreeMap<Field, Vec<FieldError>>),
}

impl DomainError {
    pub fn missing_id() -> Self {
        Self::MissingId
    }

    pub fn validation(errors: BTreeMap<Field, Vec<FieldError>>) -> Self {
        Self::Validation(errors)
    }
}
