//! Record Form Controller: create or edit a single product.

use chrono::NaiveDate;
use thiserror::Error;

use bpcatalog_core::{DomainError, Field, FieldError, PRODUCT_UPDATED, Product, ProductId};
use bpcatalog_products::{ProductForm, RecordErrors, validate_id_uniqueness};

use crate::catalog::{CatalogApi, ExistenceCheck};
use crate::errors::{ApiError, require_id};
use crate::routes::Route;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    /// No identifier supplied.
    Create,
    /// Editing an existing record; its identifier is locked.
    Edit(ProductId),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormError {
    /// Submission blocked by failed rules; nothing was sent.
    #[error("el formulario tiene {} campo(s) con errores", .0.len())]
    Invalid(RecordErrors),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("operación no disponible en modo {0}")]
    WrongMode(&'static str),
}

impl From<DomainError> for FormError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(errors) => Self::Invalid(errors),
            DomainError::MissingId => Self::Invalid(RecordErrors::from([(Field::Id, vec![FieldError::Required])])),
        }
    }
}

#[derive(Debug)]
pub struct ProductFormController<C> {
    catalog: C,
    mode: FormMode,
    form: ProductForm,
    submitted: bool,
    submit_disabled: bool,
}

impl<C: CatalogApi> ProductFormController<C> {
    /// A blank form in `Create` mode.
    pub fn new(catalog: C, today: NaiveDate) -> Self {
        Self {
            catalog,
            mode: FormMode::Create,
            form: ProductForm::new(today),
            submitted: false,
            submit_disabled: false,
        }
    }

    /// Create or edit depending on the route. Other routes open a blank form.
    pub async fn for_route(catalog: C, route: &Route, today: NaiveDate) -> (Self, Result<(), ApiError>) {
        let mut controller = Self::new(catalog, today);
        let loaded = match route {
            Route::Edit(id) => controller.enter_edit(id).await,
            _ => Ok(()),
        };
        (controller, loaded)
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn form(&self) -> &ProductForm {
        &self.form
    }

    pub fn submitted(&self) -> bool {
        self.submitted
    }

    pub fn submit_disabled(&self) -> bool {
        self.submit_disabled
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Switch to `Edit`: lock the identifier, then load and populate.
    ///
    /// The lock happens before the fetch, so a failed fetch leaves an empty
    /// form that still cannot change the identifier.
    pub async fn enter_edit(&mut self, id: &str) -> Result<(), ApiError> {
        let id = require_id(id)?;
        self.form.set_disabled(Field::Id, true);
        self.submit_disabled = true;
        self.mode = FormMode::Edit(id.clone());

        let product = self.catalog.get_product(id.as_str()).await?;
        self.form.populate(&product);
        self.form.revalidate_revision();
        tracing::debug!(%id, "form populated for edit");
        Ok(())
    }

    /// Store a user edit. Edits to a disabled control are ignored.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        if self.form.control(field).disabled() {
            tracing::debug!(%field, "ignoring edit of disabled field");
            return;
        }
        self.form.set_value(field, value);
    }

    /// Identifier lost focus: if its local rules pass, ask the backend
    /// whether it is taken and set or clear the duplicate error.
    pub async fn blur_id(&mut self) {
        let control = self.form.control(Field::Id);
        if control.disabled() {
            return;
        }
        self.form.touch(Field::Id);

        let control = self.form.control(Field::Id);
        if !control.errors().iter().all(|e| *e == FieldError::DuplicateId) {
            self.form.set_remote_error(Field::Id, None);
            return;
        }

        let id = control.value().to_string();
        let found = validate_id_uniqueness(&ExistenceCheck(&self.catalog), &id).await;
        self.form.set_remote_error(Field::Id, found.into_iter().next());
    }

    /// Clear every field and keep the validation messages visible.
    pub fn reset(&mut self) {
        self.form.reset();
    }

    /// Validate and create. On success returns the list route to navigate to;
    /// on failure the form keeps its values for correction.
    pub async fn submit_create(&mut self) -> Result<Route, FormError> {
        self.submitted = true;
        if matches!(self.mode, FormMode::Edit(_)) {
            return Err(FormError::WrongMode("edición"));
        }
        if !self.form.is_valid() {
            return Err(FormError::Invalid(self.form.record_errors()));
        }

        let product = self.form.to_product()?;
        match self.catalog.create_product(&product).await {
            Ok(created) => {
                tracing::info!(id = %created.id, "product registered");
                Ok(Route::Home)
            }
            Err(err) => {
                tracing::error!(id = %product.id, error = %err, "Error al crear el producto");
                Err(err.into())
            }
        }
    }

    /// Validate and update the locked record.
    ///
    /// Returns `Some(route)` only when the backend acknowledged the update.
    pub async fn submit_update(&mut self) -> Result<Option<Route>, FormError> {
        self.submitted = true;
        self.form.mark_all_touched();

        let FormMode::Edit(id) = &self.mode else {
            return Err(FormError::WrongMode("creación"));
        };
        if !self.form.is_valid() {
            return Err(FormError::Invalid(self.form.record_errors()));
        }

        let update = self.form.to_update()?;
        let ack = self.catalog.update_product(id.as_str(), &update).await?;
        if ack.confirms(PRODUCT_UPDATED) {
            tracing::info!(%id, "product updated");
            Ok(Some(Route::Root))
        } else {
            tracing::warn!(%id, message = %ack.message, "update not acknowledged");
            Ok(None)
        }
    }

    /// Submit according to the current mode.
    pub async fn submit(&mut self) -> Result<Option<Route>, FormError> {
        match self.mode {
            FormMode::Create => self.submit_create().await.map(Some),
            FormMode::Edit(_) => self.submit_update().await,
        }
    }

    /// The typed record as currently entered (create mode only).
    pub fn draft(&self) -> Result<Product, FormError> {
        Ok(self.form.to_product()?)
    }
}
