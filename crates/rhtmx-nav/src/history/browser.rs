use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Event, Window};

use super::{HistoryAdapter, PathListener};
use crate::error::HistoryError;
use crate::path::{join_base, strip_base};

/// `window.history` adapter for apps running in the browser
///
/// Paths are reported relative to `base`, so an app deployed under `/app`
/// registers `/about` and the address bar shows `/app/about`.
pub struct BrowserHistory {
    window: Window,
    base: String,
    popstate: Vec<Closure<dyn FnMut(Event)>>,
}

impl BrowserHistory {
    pub fn new() -> Result<Self, HistoryError> {
        Self::with_base("")
    }

    pub fn with_base(base: impl Into<String>) -> Result<Self, HistoryError> {
        let window = web_sys::window()
            .ok_or_else(|| HistoryError::Unavailable("no global window".to_string()))?;

        // Fail early when the History API is missing
        window.history().map_err(|e| HistoryError::Unavailable(js_reason(&e)))?;

        Ok(Self {
            window,
            base: base.into(),
            popstate: Vec::new(),
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    fn history(&self) -> Result<web_sys::History, HistoryError> {
        self.window
            .history()
            .map_err(|e| HistoryError::Unavailable(js_reason(&e)))
    }
}

impl HistoryAdapter for BrowserHistory {
    fn current_path(&self) -> String {
        location_of(&self.window, &self.base)
    }

    fn push_path(&mut self, path: &str) -> Result<(), HistoryError> {
        let url = join_base(&self.base, path);
        self.history()?
            .push_state_with_url(&JsValue::NULL, "", Some(&*url))
            .map_err(|e| HistoryError::Rejected {
                path: path.to_string(),
                reason: js_reason(&e),
            })
    }

    fn replace_path(&mut self, path: &str) -> Result<(), HistoryError> {
        let url = join_base(&self.base, path);
        self.history()?
            .replace_state_with_url(&JsValue::NULL, "", Some(&*url))
            .map_err(|e| HistoryError::Rejected {
                path: path.to_string(),
                reason: js_reason(&e),
            })
    }

    fn on_path_changed(&mut self, mut listener: PathListener) {
        let window = self.window.clone();
        let base = self.base.clone();
        let closure = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
            listener(&location_of(&window, &base));
        });

        match self
            .window
            .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref())
        {
            Ok(()) => self.popstate.push(closure),
            Err(e) => tracing::warn!("Failed to listen for popstate: {}", js_reason(&e)),
        }
    }
}

impl std::fmt::Debug for BrowserHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrowserHistory")
            .field("base", &self.base)
            .field("listeners", &self.popstate.len())
            .finish()
    }
}

impl Drop for BrowserHistory {
    fn drop(&mut self) {
        for closure in self.popstate.drain(..) {
            let _ = self
                .window
                .remove_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }
    }
}

// `location.pathname` never carries query or fragment; only the base is stripped.
fn location_of(window: &Window, base: &str) -> String {
    let pathname = window
        .location()
        .pathname()
        .unwrap_or_else(|_| "/".to_string());

    match strip_base(&pathname, base) {
        Some(path) => path.to_string(),
        None => {
            tracing::warn!("Location {:?} is outside base {:?}", pathname, base);
            pathname
        }
    }
}

fn js_reason(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}
