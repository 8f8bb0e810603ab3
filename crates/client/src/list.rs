//! List/Search/Paginate controller for the product list view.
//!
//! The controller owns the fetched catalog and replaces it wholesale on every
//! successful fetch. Search and paging are purely client-side.

use bpcatalog_core::{PRODUCT_REMOVED, Product};

use crate::catalog::CatalogApi;
use crate::errors::ApiError;
use crate::prompt::ConfirmPrompt;
use crate::routes::Route;

/// Page sizes offered by the view.
pub const PAGE_SIZE_OPTIONS: [usize; 3] = [5, 10, 20];
pub const DEFAULT_PAGE_SIZE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListState {
    /// No search text: the full catalog is the active set.
    Idle,
    /// Search text present: the matches are the active set.
    Filtered,
}

/// Per-row menu actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    Edit,
    Delete,
}

impl RowAction {
    pub const ALL: [RowAction; 2] = [RowAction::Edit, RowAction::Delete];

    pub fn label(&self) -> &'static str {
        match self {
            RowAction::Edit => "Editar",
            RowAction::Delete => "Eliminar",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.label() == label)
    }
}

/// Confirmation text for deleting the product called `name`.
pub fn delete_message(name: &str) -> String {
    format!("Estas seguro de eliminar el producto {name}?")
}

/// Case-insensitive substring match against name OR description.
///
/// An empty needle matches everything.
pub fn filter_products(products: &[Product], needle: &str) -> Vec<Product> {
    let needle = needle.to_lowercase();
    products
        .iter()
        .filter(|p| p.name.to_lowercase().contains(&needle) || p.description.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

#[derive(Debug)]
pub struct ProductListController<C> {
    catalog: C,
    products: Vec<Product>,
    matches: Vec<Product>,
    displayed: Vec<Product>,
    state: ListState,
    search_text: String,
    page_size: usize,
    total_products: usize,
    prompt: ConfirmPrompt,
    pending_delete: Option<String>,
}

impl<C: CatalogApi> ProductListController<C> {
    pub fn new(catalog: C) -> Self {
        Self {
            catalog,
            products: Vec::new(),
            matches: Vec::new(),
            displayed: Vec::new(),
            state: ListState::Idle,
            search_text: String::new(),
            page_size: DEFAULT_PAGE_SIZE,
            total_products: 0,
            prompt: ConfirmPrompt::new(),
            pending_delete: None,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Rows currently shown (active set sliced to the page size).
    pub fn displayed(&self) -> &[Product] {
        &self.displayed
    }

    /// The full fetched catalog.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Number of rows shown, i.e. after slicing, not the number of matches.
    pub fn total_products(&self) -> usize {
        self.total_products
    }

    pub fn state(&self) -> ListState {
        self.state
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn prompt(&self) -> &ConfirmPrompt {
        &self.prompt
    }

    pub fn pending_delete(&self) -> Option<&str> {
        self.pending_delete.as_deref()
    }

    /// Fetch the catalog and show it unfiltered.
    pub async fn load(&mut self) -> Result<(), ApiError> {
        self.products = self.catalog.list_products().await?;
        self.search_text.clear();
        self.matches.clear();
        self.state = ListState::Idle;
        self.apply_page_size();
        Ok(())
    }

    pub fn set_search_text(&mut self, text: &str) {
        self.search_text = text.to_lowercase();

        if self.search_text.is_empty() {
            self.state = ListState::Idle;
            self.matches.clear();
        } else {
            self.matches = filter_products(&self.products, &self.search_text);
            self.state = ListState::Filtered;
            tracing::debug!(search = %self.search_text, matches = self.matches.len(), "filtered products");
        }

        self.apply_page_size();
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size;
        self.apply_page_size();
    }

    fn apply_page_size(&mut self) {
        let active = match self.state {
            ListState::Idle => &self.products,
            ListState::Filtered => &self.matches,
        };
        self.displayed = active.iter().take(self.page_size).cloned().collect();
        self.total_products = self.displayed.len();
    }

    /// Handle a row menu choice. `Edit` yields the route to navigate to.
    pub fn select_action(&mut self, action: RowAction, id: &str, name: &str) -> Option<Route> {
        match action {
            RowAction::Edit => Some(Route::Edit(id.to_string())),
            RowAction::Delete => {
                self.request_delete(id, name);
                None
            }
        }
    }

    /// Open the confirmation prompt for deleting `id`.
    pub fn request_delete(&mut self, id: &str, name: &str) {
        self.pending_delete = Some(id.to_string());
        self.prompt.open(delete_message(name));
    }

    pub fn cancel_delete(&mut self) {
        self.prompt.cancel();
        self.pending_delete = None;
    }

    /// Confirmed: close the prompt at once, then delete and refresh.
    ///
    /// Returns `Ok(true)` when the backend acknowledged the removal and the
    /// list was re-fetched with the current search text and page size.
    pub async fn confirm_delete(&mut self) -> Result<bool, ApiError> {
        self.prompt.confirm();

        let Some(id) = self.pending_delete.take() else {
            return Ok(false);
        };

        let ack = self.catalog.delete_product(&id).await?;
        if !ack.confirms(PRODUCT_REMOVED) {
            tracing::warn!(%id, message = %ack.message, "delete not acknowledged; list left as is");
            return Ok(false);
        }

        self.products = self.catalog.list_products().await?;
        let search = self.search_text.clone();
        self.set_search_text(&search);
        tracing::info!(%id, remaining = self.products.len(), "product removed from list");
        Ok(true)
    }
}
