//! Exclusive-open registry: at most one popup (e.g. a row's action menu) is
//! open at a time.
//!
//! Each popup registers and receives a handle with its own channel. Opening a
//! popup broadcasts its id to every *other* handle, which then closes itself
//! on its next [`ActionMenu::sync`].

use std::sync::{Arc, Mutex, Weak, mpsc};

use thiserror::Error;
use uuid::Uuid;

/// Identifier of one registered popup.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct PopupId(Uuid);

impl PopupId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for PopupId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for PopupId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("popup registry lock poisoned")]
    Poisoned,
}

/// Registration of one popup; receives "someone else opened" notices.
#[derive(Debug)]
pub struct PopupHandle {
    id: PopupId,
    notices: mpsc::Receiver<PopupId>,
    // Held only so the registry can see the handle is alive.
    _alive: Arc<()>,
}

impl PopupHandle {
    pub fn id(&self) -> PopupId {
        self.id
    }

    /// Drain pending notices; `true` if another popup opened since last call.
    pub fn close_requested(&self) -> bool {
        self.notices.try_iter().fold(false, |acc, opener| acc || opener != self.id)
    }
}

struct Registration {
    id: PopupId,
    notices: mpsc::Sender<PopupId>,
    alive: Weak<()>,
}

impl core::fmt::Debug for Registration {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Registration").field("id", &self.id).finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
pub struct ExclusiveOpenRegistry {
    handles: Mutex<Vec<Registration>>,
}

impl ExclusiveOpenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self) -> PopupHandle {
        let (tx, rx) = mpsc::channel();
        let id = PopupId::new();
        let alive = Arc::new(());

        // A poisoned lock still yields a handle; it just never receives notices.
        if let Ok(mut handles) = self.handles.lock() {
            handles.retain(|r| r.alive.strong_count() > 0);
            handles.push(Registration {
                id,
                notices: tx,
                alive: Arc::downgrade(&alive),
            });
        }

        PopupHandle {
            id,
            notices: rx,
            _alive: alive,
        }
    }

    /// Tell every popup except `opener` to close.
    pub fn open_exclusive(&self, opener: PopupId) -> Result<(), RegistryError> {
        let mut handles = self.handles.lock().map_err(|_| RegistryError::Poisoned)?;

        // Drop handles whose popup is gone while broadcasting.
        handles.retain(|r| r.id == opener || r.notices.send(opener).is_ok());

        Ok(())
    }

    /// Number of registrations whose handle is still alive.
    pub fn len(&self) -> usize {
        self.handles
            .lock()
            .map(|h| h.iter().filter(|r| r.alive.strong_count() > 0).count())
            .unwrap_or(0)
    }

    /// Registrations currently stored, live or not.
    #[cfg(test)]
    fn stored(&self) -> usize {
        self.handles.lock().map(|h| h.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A row's action menu ("Editar" / "Eliminar").
#[derive(Debug)]
pub struct ActionMenu {
    registry: Arc<ExclusiveOpenRegistry>,
    handle: PopupHandle,
    options: Vec<String>,
    open: bool,
    selected: Option<String>,
}

impl ActionMenu {
    pub fn new<I, S>(registry: Arc<ExclusiveOpenRegistry>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let handle = registry.register();
        Self {
            registry,
            handle,
            options: options.into_iter().map(Into::into).collect(),
            open: false,
            selected: None,
        }
    }

    pub fn id(&self) -> PopupId {
        self.handle.id()
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Apply close notices from other menus.
    pub fn sync(&mut self) {
        if self.handle.close_requested() {
            self.open = false;
        }
    }

    pub fn is_open(&mut self) -> bool {
        self.sync();
        self.open
    }

    /// Open (closing every other menu first) or close this menu.
    pub fn toggle(&mut self) -> Result<(), RegistryError> {
        self.sync();
        if !self.open {
            self.registry.open_exclusive(self.handle.id())?;
        }
        self.open = !self.open;
        Ok(())
    }

    /// Pick an option; closes the menu and returns the choice.
    pub fn select(&mut self, option: &str) -> Option<String> {
        let choice = self.options.iter().find(|o| o.as_str() == option)?.clone();
        self.selected = Some(choice.clone());
        self.open = false;
        Some(choice)
    }
}
