/// History adapters: the session-history capability the registry drives
///
/// The registry only ever pushes or replaces. Back and forward belong to the
/// adapter (the browser buttons, or `MemoryHistory::back` in tests), which reports
/// the new path through `on_path_changed`.

#[cfg(feature = "browser")]
mod browser;
mod memory;

#[cfg(feature = "browser")]
pub use browser::BrowserHistory;
pub use memory::MemoryHistory;

use crate::error::HistoryError;

/// Callback fired with the new path after an external history move
pub type PathListener = Box<dyn FnMut(&str)>;

/// Session history as seen by the route registry
///
/// Adapters report bare paths: no query string, no fragment, no deployment base.
/// Paths handed to `push_path` and `replace_path` are stored as given.
pub trait HistoryAdapter {
    /// Path of the active history entry
    fn current_path(&self) -> String;

    /// Adds a new history entry after the active one and makes it active
    fn push_path(&mut self, path: &str) -> Result<(), HistoryError>;

    /// Overwrites the active history entry
    fn replace_path(&mut self, path: &str) -> Result<(), HistoryError>;

    /// Registers a listener for back/forward moves
    ///
    /// Must not fire for `push_path` or `replace_path`.
    fn on_path_changed(&mut self, listener: PathListener);
}

/// History adapter chosen at runtime from `HistoryConfig::mode`
#[derive(Debug)]
pub enum ConfiguredHistory {
    Memory(MemoryHistory),
    #[cfg(feature = "browser")]
    Browser(BrowserHistory),
}

impl HistoryAdapter for ConfiguredHistory {
    fn current_path(&self) -> String {
        match self {
            Self::Memory(history) => history.current_path(),
            #[cfg(feature = "browser")]
            Self::Browser(history) => history.current_path(),
        }
    }

    fn push_path(&mut self, path: &str) -> Result<(), HistoryError> {
        match self {
            Self::Memory(history) => history.push_path(path),
            #[cfg(feature = "browser")]
            Self::Browser(history) => history.push_path(path),
        }
    }

    fn replace_path(&mut self, path: &str) -> Result<(), HistoryError> {
        match self {
            Self::Memory(history) => history.replace_path(path),
            #[cfg(feature = "browser")]
            Self::Browser(history) => history.replace_path(path),
        }
    }

    fn on_path_changed(&mut self, listener: PathListener) {
        match self {
            Self::Memory(history) => history.on_path_changed(listener),
            #[cfg(feature = "browser")]
            Self::Browser(history) => history.on_path_changed(listener),
        }
    }
}
