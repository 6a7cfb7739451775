//! # RHTMX Nav
//!
//! Client-side navigation for single-page applications:
//! - Exact-path route table (`/about`), validated once at startup
//! - Name-based navigation (`Name("About")`) decoupled from literal paths
//! - Session history integration through a pluggable [`HistoryAdapter`]
//! - Explicit `NotFound` resolution for unregistered paths
//!
//! ## Resolution
//!
//! Matching is an exact, case-sensitive string comparison in registration order.
//! Paths are not normalized: the history adapter hands over bare paths with query
//! strings and fragments already stripped.
//!
//! ## History
//!
//! The registry pushes (or replaces) entries when it navigates. Back and forward
//! moves come from the adapter and are applied without pushing. Two adapters ship:
//! - [`MemoryHistory`]: in-process stack, for tests and non-browser hosts
//! - `BrowserHistory`: `window.history` via `web-sys` (feature `browser`)
//!
//! ## Example
//!
//! ```
//! use rhtmx_nav::{MemoryHistory, NavigationTarget, RouteEntry, RouteRegistry};
//!
//! let history = MemoryHistory::new("/");
//! let registry = RouteRegistry::new(
//!     vec![
//!         RouteEntry::new("/", "Index", "index"),
//!         RouteEntry::new("/about", "About", "about"),
//!     ],
//!     history.clone(),
//! )
//! .unwrap()
//! .attach();
//!
//! registry.navigate(NavigationTarget::Path("/about")).unwrap();
//! assert_eq!(registry.borrow().resolved().view(), Some(&"about"));
//!
//! // Browser "back" button
//! history.back();
//! assert_eq!(registry.current_path(), "/");
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

pub mod config;
mod error;
pub mod history;
pub mod path;
mod registry;
pub mod route;

// ============================================================================
// Public Re-exports
// ============================================================================

pub use config::{HistoryConfig, HistoryMode, NavConfig, RouteConfig};
pub use error::{ConfigurationError, HistoryError, NavigationError, UnknownRouteName};
#[cfg(feature = "browser")]
pub use history::BrowserHistory;
pub use history::{ConfiguredHistory, HistoryAdapter, MemoryHistory, PathListener};
pub use registry::{
    ListenerId, MountListener, NavigationState, NavigationTarget, RouteRegistry, SharedRegistry,
    WeakRegistry,
};
pub use route::{Resolution, RouteEntry, RouteTable};
