use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::{HistoryAdapter, PathListener};
use crate::error::HistoryError;
use crate::path::location_path;

/// In-process session history: a stack of paths and a cursor
///
/// Cloning yields another handle to the same history, so a host (or a test) can
/// keep one handle to press "back" while the registry owns another.
///
/// # Examples
///
/// ```
/// use rhtmx_nav::{HistoryAdapter, MemoryHistory};
///
/// let mut history = MemoryHistory::new("/");
/// history.push_path("/about").unwrap();
///
/// assert_eq!(history.current_path(), "/about");
/// assert_eq!(history.back(), Some("/".to_string()));
/// assert_eq!(history.back(), None);
/// assert_eq!(history.forward(), Some("/about".to_string()));
/// ```
#[derive(Clone)]
pub struct MemoryHistory {
    inner: Rc<RefCell<MemoryState>>,
}

struct MemoryState {
    entries: Vec<String>,
    cursor: usize,
    pushes: usize,
    replaces: usize,
    listeners: Vec<PathListener>,
    notifying: bool,
    // Latest move made by a listener while notifying.
    pending: Option<String>,
}

impl MemoryHistory {
    /// Starts a history with a single entry; query and fragment are dropped
    pub fn new(start: &str) -> Self {
        Self {
            inner: Rc::new(RefCell::new(MemoryState {
                entries: vec![location_path(start).into_owned()],
                cursor: 0,
                pushes: 0,
                replaces: 0,
                listeners: Vec::new(),
                notifying: false,
                pending: None,
            })),
        }
    }

    /// Moves one entry back, notifying listeners; `None` at the oldest entry
    pub fn back(&self) -> Option<String> {
        self.go(-1)
    }

    /// Moves one entry forward, notifying listeners; `None` at the newest entry
    pub fn forward(&self) -> Option<String> {
        self.go(1)
    }

    /// Moves `delta` entries, like `history.go(delta)`
    ///
    /// Out-of-range moves and `go(0)` change nothing and notify no one.
    pub fn go(&self, delta: isize) -> Option<String> {
        let path = {
            let mut state = self.inner.borrow_mut();
            let target = state.cursor.checked_add_signed(delta)?;
            if delta == 0 || target >= state.entries.len() {
                return None;
            }
            state.cursor = target;
            state.entries[target].clone()
        };

        tracing::debug!("Memory history moved {} to {:?}", delta, path);
        self.notify(&path);
        Some(path)
    }

    /// All entries, oldest first
    pub fn entries(&self) -> Vec<String> {
        self.inner.borrow().entries.clone()
    }

    /// Index of the active entry
    pub fn position(&self) -> usize {
        self.inner.borrow().cursor
    }

    /// Number of successful `push_path` calls
    pub fn push_count(&self) -> usize {
        self.inner.borrow().pushes
    }

    /// Number of successful `replace_path` calls
    pub fn replace_count(&self) -> usize {
        self.inner.borrow().replaces
    }

    // Listeners run without the state borrowed, so they may read or move this
    // history. A move made from inside a listener is delivered after the current
    // round, with only the latest path.
    fn notify(&self, path: &str) {
        let mut listeners = {
            let mut state = self.inner.borrow_mut();
            if state.notifying {
                state.pending = Some(path.to_string());
                return;
            }
            state.notifying = true;
            std::mem::take(&mut state.listeners)
        };

        let mut path = path.to_string();
        loop {
            for listener in listeners.iter_mut() {
                listener(&path);
            }

            let mut state = self.inner.borrow_mut();
            match state.pending.take() {
                Some(next) => path = next,
                None => {
                    listeners.append(&mut state.listeners);
                    state.listeners = listeners;
                    state.notifying = false;
                    return;
                }
            }
        }
    }
}

impl HistoryAdapter for MemoryHistory {
    fn current_path(&self) -> String {
        let state = self.inner.borrow();
        state.entries[state.cursor].clone()
    }

    fn push_path(&mut self, path: &str) -> Result<(), HistoryError> {
        let mut state = self.inner.borrow_mut();
        let next = state.cursor + 1;
        state.entries.truncate(next);
        state.entries.push(path.to_string());
        state.cursor = next;
        state.pushes += 1;
        Ok(())
    }

    fn replace_path(&mut self, path: &str) -> Result<(), HistoryError> {
        let mut state = self.inner.borrow_mut();
        let cursor = state.cursor;
        state.entries[cursor] = path.to_string();
        state.replaces += 1;
        Ok(())
    }

    fn on_path_changed(&mut self, listener: PathListener) {
        self.inner.borrow_mut().listeners.push(listener);
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new("/")
    }
}

impl fmt::Debug for MemoryHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.borrow();
        f.debug_struct("MemoryHistory")
            .field("entries", &state.entries)
            .field("cursor", &state.cursor)
            .field("listeners", &state.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_push_truncates_forward_entries() {
        let mut history = MemoryHistory::new("/");
        history.push_path("/entries").unwrap();
        history.push_path("/about").unwrap();
        history.back();
        history.back();

        history.push_path("/about").unwrap();
        assert_eq!(history.entries(), vec!["/", "/about"]);
        assert_eq!(history.position(), 1);
        assert_eq!(history.push_count(), 3);
    }

    #[test]
    fn test_replace_keeps_length() {
        let mut history = MemoryHistory::new("/");
        history.replace_path("/about").unwrap();

        assert_eq!(history.entries(), vec!["/about"]);
        assert_eq!(history.replace_count(), 1);
        assert_eq!(history.push_count(), 0);
    }

    #[test]
    fn test_start_path_drops_query_and_fragment() {
        let history = MemoryHistory::new("/entries?page=2#top");
        assert_eq!(history.current_path(), "/entries");
    }

    #[test]
    fn test_go_out_of_range_is_noop() {
        let mut history = MemoryHistory::new("/");
        history.push_path("/about").unwrap();

        assert_eq!(history.go(-5), None);
        assert_eq!(history.go(1), None);
        assert_eq!(history.go(0), None);
        assert_eq!(history.current_path(), "/about");
    }

    #[test]
    fn test_listeners_fire_only_on_external_moves() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut history = MemoryHistory::new("/");

        let sink = Rc::clone(&seen);
        history.on_path_changed(Box::new(move |path: &str| sink.borrow_mut().push(path.to_string())));

        history.push_path("/entries").unwrap();
        history.replace_path("/about").unwrap();
        assert!(seen.borrow().is_empty());

        history.back();
        history.forward();
        assert_eq!(*seen.borrow(), vec!["/", "/about"]);
    }

    #[test]
    fn test_listener_can_read_history() {
        let mut history = MemoryHistory::new("/");
        history.push_path("/about").unwrap();

        let seen = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&seen);
        let handle = history.clone();
        history.on_path_changed(Box::new(move |_: &str| {
            *sink.borrow_mut() = Some(handle.current_path());
        }));

        history.back();
        assert_eq!(seen.borrow().as_deref(), Some("/"));
    }

    #[test]
    fn test_push_keeps_query_and_fragment() {
        let mut history = MemoryHistory::new("/");
        history.push_path("/about?tab=1").unwrap();
        history.replace_path("/about?tab=2#team").unwrap();

        assert_eq!(history.current_path(), "/about?tab=2#team");
        assert_eq!(history.entries(), vec!["/", "/about?tab=2#team"]);
    }

    #[test]
    fn test_move_from_listener_is_delivered() {
        let mut history = MemoryHistory::new("/");
        history.push_path("/entries").unwrap();
        history.push_path("/about").unwrap();

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let handle = history.clone();
        history.on_path_changed(Box::new(move |path: &str| {
            sink.borrow_mut().push(path.to_string());
            if path == "/entries" {
                handle.back();
            }
        }));

        history.back();
        assert_eq!(*seen.borrow(), vec!["/entries", "/"]);
        assert_eq!(history.current_path(), "/");
    }
}
