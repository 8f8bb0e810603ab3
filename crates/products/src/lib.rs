//! Product record rules and form draft state.
//!
//! This crate contains the validation rules for a catalog product implemented
//! as deterministic functions (no IO, no HTTP). The only asynchronous rule,
//! identifier uniqueness, reaches the backend through [`IdExistenceCheck`].

pub mod form;
pub mod validation;

pub use form::{FormControl, ProductForm};
pub use validation::{
    IdExistenceCheck, IdValidation, RecordErrors, next_revision_date, parse_date, validate_description,
    validate_field, validate_id, validate_id_uniqueness, validate_logo, validate_name, validate_record,
    validate_release_date, validate_revision_date,
};
