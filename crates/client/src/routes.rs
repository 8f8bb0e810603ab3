//! View routes.

/// Where the user is (or should be sent).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// List view at `/`.
    Root,
    /// List view at `/home`.
    Home,
    /// Create form at `/register`.
    Register,
    /// Edit form at `/register/{id}`.
    Edit(String),
}

impl Route {
    /// Resolve a path. Unknown paths redirect to [`Route::Root`].
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Route::Root,
            ["home"] => Route::Home,
            ["register"] => Route::Register,
            ["register", id] => Route::Edit((*id).to_string()),
            _ => Route::Root,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Root => "/".to_string(),
            Route::Home => "/home".to_string(),
            Route::Register => "/register".to_string(),
            Route::Edit(id) => format!("/register/{id}"),
        }
    }

    pub fn is_list_view(&self) -> bool {
        matches!(self, Route::Root | Route::Home)
    }
}

impl core::fmt::Display for Route {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.path())
    }
}
