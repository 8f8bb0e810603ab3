//! Draft state of the create/edit form.
//!
//! Values are kept as raw strings (what the user typed) so invalid input can
//! be shown back to the user; [`ProductForm::to_product`] produces the typed
//! record once every rule passes.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use bpcatalog_core::{DATE_FORMAT, DomainError, Field, FieldError, Product, ProductId, ProductUpdate};

use crate::validation::{
    RecordErrors, parse_date, validate_field, validate_id, validate_revision_date,
};

/// One input of the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormControl {
    value: String,
    touched: bool,
    disabled: bool,
    errors: Vec<FieldError>,
    remote_error: Option<FieldError>,
}

impl FormControl {
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn touched(&self) -> bool {
        self.touched
    }

    pub fn disabled(&self) -> bool {
        self.disabled
    }

    /// Local rule failures followed by the async (remote) failure, if any.
    pub fn errors(&self) -> Vec<FieldError> {
        self.errors.iter().cloned().chain(self.remote_error.clone()).collect()
    }

    pub fn has_error(&self, error: &FieldError) -> bool {
        self.errors.contains(error) || self.remote_error.as_ref() == Some(error)
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty() && self.remote_error.is_none()
    }
}

/// The six product inputs plus the cross-field revision rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductForm {
    controls: BTreeMap<Field, FormControl>,
    today: NaiveDate,
}

impl ProductForm {
    /// An empty form. `today` anchors the release-date rule.
    pub fn new(today: NaiveDate) -> Self {
        let mut form = Self {
            controls: Field::ALL.iter().map(|f| (*f, FormControl::default())).collect(),
            today,
        };
        form.validate_all();
        form
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn control(&self, field: Field) -> &FormControl {
        &self.controls[&field]
    }

    fn control_mut(&mut self, field: Field) -> &mut FormControl {
        self.controls.entry(field).or_default()
    }

    pub fn value(&self, field: Field) -> &str {
        self.control(field).value()
    }

    pub fn errors(&self, field: Field) -> Vec<FieldError> {
        self.control(field).errors()
    }

    /// Store a user edit and re-run the field's rules.
    ///
    /// The identifier is trimmed in place; the rewrite does not trigger another
    /// validation pass. Editing the release date re-runs the revision check.
    pub fn set_value(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Id => {
                let checked = validate_id(&value);
                let control = self.control_mut(Field::Id);
                control.value = checked.trimmed;
                control.errors = checked.errors;
                control.remote_error = None;
            }
            _ => {
                self.control_mut(field).value = value;
                self.validate_local(field);
            }
        }

        if matches!(field, Field::DateRelease | Field::DateRevision) {
            self.revalidate_revision();
        }
    }

    /// Record the outcome of an asynchronous check (e.g. id uniqueness).
    pub fn set_remote_error(&mut self, field: Field, error: Option<FieldError>) {
        self.control_mut(field).remote_error = error;
    }

    pub fn touch(&mut self, field: Field) {
        self.control_mut(field).touched = true;
    }

    pub fn mark_all_touched(&mut self) {
        for control in self.controls.values_mut() {
            control.touched = true;
        }
    }

    pub fn set_disabled(&mut self, field: Field, disabled: bool) {
        self.control_mut(field).disabled = disabled;
    }

    /// Clear every value to the empty string and mark every control touched,
    /// so the "required" messages stay visible.
    pub fn reset(&mut self) {
        for control in self.controls.values_mut() {
            control.value.clear();
            control.remote_error = None;
            control.touched = true;
        }
        self.validate_all();
    }

    /// Fill every control from a fetched record, then re-run the revision check.
    pub fn populate(&mut self, product: &Product) {
        let control = self.control_mut(Field::Id);
        control.value = product.id.to_string();
        control.remote_error = None;
        self.control_mut(Field::Name).value = product.name.clone();
        self.control_mut(Field::Description).value = product.description.clone();
        self.control_mut(Field::Logo).value = product.logo.clone();
        self.control_mut(Field::DateRelease).value = product.date_release.format(DATE_FORMAT).to_string();
        self.control_mut(Field::DateRevision).value = product.date_revision.format(DATE_FORMAT).to_string();
        self.validate_all();
    }

    /// Run the cross-field rule and attach its outcome to `date_revision`.
    pub fn revalidate_revision(&mut self) {
        self.validate_local(Field::DateRevision);
        let cross = validate_revision_date(self.value(Field::DateRelease), self.value(Field::DateRevision));
        self.control_mut(Field::DateRevision).errors.extend(cross);
    }

    fn validate_local(&mut self, field: Field) {
        let errors = validate_field(field, self.value(field), self.today);
        self.control_mut(field).errors = errors;
    }

    fn validate_all(&mut self) {
        for field in Field::ALL {
            self.validate_local(field);
        }
        self.revalidate_revision();
    }

    /// Errors of every enabled control, keyed by field.
    pub fn record_errors(&self) -> RecordErrors {
        self.controls
            .iter()
            .filter(|(_, c)| !c.disabled)
            .filter_map(|(field, c)| {
                let errors = c.errors();
                (!errors.is_empty()).then_some((*field, errors))
            })
            .collect()
    }

    /// Disabled controls do not count towards validity.
    pub fn is_valid(&self) -> bool {
        self.controls.values().filter(|c| !c.disabled).all(FormControl::is_valid)
    }

    fn parsed_dates(&self) -> Result<(NaiveDate, NaiveDate), DomainError> {
        let release = parse_date(self.value(Field::DateRelease));
        let revision = parse_date(self.value(Field::DateRevision));
        match (release, revision) {
            (Some(release), Some(revision)) => Ok((release, revision)),
            _ => Err(DomainError::validation(self.record_errors())),
        }
    }

    /// Every enabled field except the identifier, as the update payload.
    pub fn to_update(&self) -> Result<ProductUpdate, DomainError> {
        if !self.is_valid() {
            return Err(DomainError::validation(self.record_errors()));
        }
        let (date_release, date_revision) = self.parsed_dates()?;
        Ok(ProductUpdate {
            name: self.value(Field::Name).to_string(),
            description: self.value(Field::Description).to_string(),
            logo: self.value(Field::Logo).to_string(),
            date_release,
            date_revision,
        })
    }

    /// The full typed record, identifier included.
    pub fn to_product(&self) -> Result<Product, DomainError> {
        let update = self.to_update()?;
        let id = ProductId::new(self.value(Field::Id))?;
        Ok(Product::with_id(id, update))
    }
}
