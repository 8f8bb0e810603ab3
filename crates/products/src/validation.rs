//! Record Validation Engine.
//!
//! Each rule is a plain function over the raw field value(s) and returns the
//! list of failed rules (empty when valid). Dates are compared as calendar
//! dates (`NaiveDate`), never as instants, so time zones cannot shift a day.

use std::collections::BTreeMap;
use std::fmt::Display;

use async_trait::async_trait;
use chrono::{Months, NaiveDate};

use bpcatalog_core::{DATE_FORMAT, Field, FieldError, Product};

/// Inclusive length bounds (in characters) for the identifier.
pub const ID_LENGTH: (usize, usize) = (3, 10);
/// Inclusive length bounds for the name.
pub const NAME_LENGTH: (usize, usize) = (6, 100);
/// Inclusive length bounds for the description.
pub const DESCRIPTION_LENGTH: (usize, usize) = (10, 200);

/// Validation failures keyed by field. Fields without failures are absent.
pub type RecordErrors = BTreeMap<Field, Vec<FieldError>>;

/// Outcome of [`validate_id`]: the rewritten (trimmed) value plus failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdValidation {
    pub trimmed: String,
    pub errors: Vec<FieldError>,
}

impl IdValidation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Asynchronous "is this identifier already taken?" lookup.
#[async_trait]
pub trait IdExistenceCheck: Send + Sync {
    type Error: Display + Send;

    async fn id_exists(&self, id: &str) -> Result<bool, Self::Error>;
}

fn required(value: &str) -> Option<FieldError> {
    value.is_empty().then_some(FieldError::Required)
}

fn length(value: &str, (min, max): (usize, usize)) -> Option<FieldError> {
    if value.is_empty() {
        return None;
    }
    let actual = value.chars().count();
    (actual < min || actual > max).then(|| FieldError::length(min, max, actual))
}

fn text_rules(value: &str, bounds: (usize, usize)) -> Vec<FieldError> {
    required(value).into_iter().chain(length(value, bounds)).collect()
}

/// Trim the identifier and check it is present and 3–10 characters long.
pub fn validate_id(value: &str) -> IdValidation {
    let trimmed = value.trim().to_string();
    let errors = text_rules(&trimmed, ID_LENGTH);
    IdValidation { trimmed, errors }
}

pub fn validate_name(value: &str) -> Vec<FieldError> {
    text_rules(value, NAME_LENGTH)
}

pub fn validate_description(value: &str) -> Vec<FieldError> {
    text_rules(value, DESCRIPTION_LENGTH)
}

pub fn validate_logo(value: &str) -> Vec<FieldError> {
    required(value).into_iter().collect()
}

/// Parse a `YYYY-MM-DD` form value.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

/// The release date must parse and must not be before `today`.
///
/// An empty value is not this rule's concern (see [`validate_field`]).
pub fn validate_release_date(value: &str, today: NaiveDate) -> Vec<FieldError> {
    if value.is_empty() {
        return Vec::new();
    }
    match parse_date(value) {
        Some(release) if release >= today => Vec::new(),
        _ => vec![FieldError::InvalidDate],
    }
}

/// Calendar date one year after `release` (29 Feb maps to 28 Feb).
pub fn next_revision_date(release: NaiveDate) -> Option<NaiveDate> {
    release.checked_add_months(Months::new(12))
}

/// Cross-field rule: `revision == release + 1 year`.
///
/// Valid when either value is empty; anything unparseable fails.
pub fn validate_revision_date(release: &str, revision: &str) -> Vec<FieldError> {
    if release.is_empty() || revision.is_empty() {
        return Vec::new();
    }
    let expected = parse_date(release).and_then(next_revision_date);
    match (expected, parse_date(revision)) {
        (Some(expected), Some(revision)) if expected == revision => Vec::new(),
        _ => vec![FieldError::InvalidRevisionDate],
    }
}

/// Local (single-field) rules for `field`. The revision cross check is
/// separate because it reads two fields.
pub fn validate_field(field: Field, value: &str, today: NaiveDate) -> Vec<FieldError> {
    match field {
        Field::Id => validate_id(value).errors,
        Field::Name => validate_name(value),
        Field::Description => validate_description(value),
        Field::Logo => validate_logo(value),
        Field::DateRelease => required(value)
            .into_iter()
            .chain(validate_release_date(value, today))
            .collect(),
        Field::DateRevision => required(value).into_iter().collect(),
    }
}

/// Validate a complete typed record.
pub fn validate_record(product: &Product, today: NaiveDate) -> RecordErrors {
    let release = product.date_release.format(DATE_FORMAT).to_string();
    let revision = product.date_revision.format(DATE_FORMAT).to_string();

    let values = [
        (Field::Id, product.id.as_str()),
        (Field::Name, product.name.as_str()),
        (Field::Description, product.description.as_str()),
        (Field::Logo, product.logo.as_str()),
        (Field::DateRelease, release.as_str()),
        (Field::DateRevision, revision.as_str()),
    ];

    let mut errors = RecordErrors::new();
    for (field, value) in values {
        let mut found = validate_field(field, value, today);
        if field == Field::DateRevision {
            found.extend(validate_revision_date(&release, &revision));
        }
        if !found.is_empty() {
            errors.insert(field, found);
        }
    }
    errors
}

/// Ask the backend whether `id` is taken.
///
/// Fail-open: if the lookup itself fails the result is inconclusive and no
/// error is reported.
pub async fn validate_id_uniqueness<C>(checker: &C, id: &str) -> Vec<FieldError>
where
    C: IdExistenceCheck + ?Sized,
{
    match checker.id_exists(id).await {
        Ok(true) => vec![FieldError::DuplicateId],
        Ok(false) => Vec::new(),
        Err(err) => {
            tracing::warn!(id, error = %err, "id existence check failed; treating as available");
            Vec::new()
        }
    }
}
