// File: src/registry.rs
// Purpose: Route registry - resolution, navigation state and history integration

use std::cell::{Cell, Ref, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::error::{ConfigurationError, NavigationError, UnknownRouteName};
use crate::history::HistoryAdapter;
use crate::route::{Resolution, RouteEntry, RouteTable};

/// Transitions a single `navigate` may trigger through listeners before dispatch gives up
const MAX_DISPATCH_ROUNDS: usize = 16;

/// Where a `navigate` or `replace` call should go
///
/// A name is looked up in the route table and must exist. A path is used as-is,
/// registered or not, just like a typed or externally linked URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationTarget<'a> {
    Path(&'a str),
    Name(&'a str),
}

/// Active path and the route it resolves to
///
/// Only the registry mutates this, and it re-resolves on every change, so
/// `resolved` always corresponds to `current_path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    current_path: String,
    resolved: Option<usize>,
}

impl NavigationState {
    pub fn current_path(&self) -> &str {
        &self.current_path
    }

    /// Table index of the resolved route, `None` while unresolved
    pub fn resolved_index(&self) -> Option<usize> {
        self.resolved
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.is_some()
    }
}

/// Handle returned by `subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Mount point callback: receives the active path and its resolution after every change
pub type MountListener<V> = Box<dyn FnMut(&str, Resolution<'_, V>)>;

type Listeners<V> = Vec<(ListenerId, MountListener<V>)>;

/// Listeners taken out of the registry together with the state they must see
///
/// The table is shared, so a dispatch can run after the registry borrow ends.
struct Dispatch<V> {
    table: Rc<RouteTable<V>>,
    path: String,
    resolved: Option<usize>,
    listeners: Listeners<V>,
}

impl<V> Dispatch<V> {
    fn run(&mut self) {
        let Self {
            table,
            path,
            resolved,
            listeners,
        } = self;

        let resolution = Resolution::from(resolved.and_then(|index| table.get(index)));
        for (_, listener) in listeners.iter_mut() {
            listener(path, resolution);
        }
    }
}

/// Maps paths to views and keeps navigation state in step with session history
///
/// # Examples
///
/// ```
/// use rhtmx_nav::{MemoryHistory, NavigationTarget, RouteEntry, RouteRegistry};
///
/// let history = MemoryHistory::new("/");
/// let mut registry = RouteRegistry::new(
///     vec![
///         RouteEntry::new("/", "Index", "index"),
///         RouteEntry::new("/entries", "Entry", "entries"),
///         RouteEntry::new("/about", "About", "about"),
///     ],
///     history.clone(),
/// )
/// .unwrap();
///
/// registry.navigate(NavigationTarget::Name("Entry")).unwrap();
/// assert_eq!(registry.current_path(), "/entries");
/// assert_eq!(registry.resolved().view(), Some(&"entries"));
/// assert_eq!(history.push_count(), 1);
/// ```
pub struct RouteRegistry<V, H> {
    table: Rc<RouteTable<V>>,
    history: H,
    state: NavigationState,
    listeners: Listeners<V>,
    next_listener: u64,
    // Bumped on every transition; `notified` is the last one listeners saw.
    generation: u64,
    notified: u64,
    dispatching: bool,
}

impl<V, H: HistoryAdapter> RouteRegistry<V, H> {
    /// Validates the routes and resolves the adapter's current path
    ///
    /// Duplicate paths or names fail here, before any navigation happens.
    pub fn new<I>(routes: I, history: H) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = RouteEntry<V>>,
    {
        Ok(Self::with_table(RouteTable::new(routes)?, history))
    }

    /// Builds a registry over an already validated table
    pub fn with_table(table: RouteTable<V>, history: H) -> Self {
        let current_path = history.current_path();
        let resolved = table.position(&current_path);

        tracing::info!(
            "Route registry ready: {} routes, starting at {:?} ({})",
            table.len(),
            current_path,
            if resolved.is_some() { "resolved" } else { "unresolved" }
        );

        Self {
            table: Rc::new(table),
            history,
            state: NavigationState {
                current_path,
                resolved,
            },
            listeners: Vec::new(),
            next_listener: 0,
            generation: 0,
            notified: 0,
            dispatching: false,
        }
    }

    /// Matches a path against the route table (exact, case-sensitive)
    pub fn resolve(&self, path: &str) -> Resolution<'_, V> {
        self.table.resolve(path)
    }

    /// Pushes a history entry for the target and re-resolves
    ///
    /// Unknown names and rejected pushes leave the state and history untouched.
    pub fn navigate(&mut self, target: NavigationTarget<'_>) -> Result<(), NavigationError> {
        self.apply_navigate(target)?;
        self.notify();
        Ok(())
    }

    /// Like `navigate`, but overwrites the active history entry instead of adding one
    pub fn replace(&mut self, target: NavigationTarget<'_>) -> Result<(), NavigationError> {
        self.apply_replace(target)?;
        self.notify();
        Ok(())
    }

    /// Applies a back/forward move reported by the history adapter
    ///
    /// The browser has already moved its pointer, so nothing is pushed.
    pub fn handle_path_changed(&mut self, path: &str) {
        self.apply_path_change(path);
        self.notify();
    }

    /// Canonical path for a route name, without navigating
    pub fn url_for(&self, name: &str) -> Option<&str> {
        self.table.get_by_name(name).map(|entry| entry.path.as_str())
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn current_path(&self) -> &str {
        &self.state.current_path
    }

    /// Route for the active path, or `NotFound`
    pub fn resolved(&self) -> Resolution<'_, V> {
        Resolution::from(self.state.resolved.and_then(|index| self.table.get(index)))
    }

    pub fn is_resolved(&self) -> bool {
        self.state.is_resolved()
    }

    pub fn table(&self) -> &RouteTable<V> {
        &self.table
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    /// Registers a mount point callback, run after every state change
    ///
    /// The callback is not invoked for the current state; read `resolved()` for that.
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&str, Resolution<'_, V>) + 'static,
    {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a mount point callback; false when the id is unknown
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    fn target_path(&self, target: NavigationTarget<'_>) -> Result<String, UnknownRouteName> {
        match target {
            NavigationTarget::Path(path) => Ok(path.to_string()),
            NavigationTarget::Name(name) => self
                .url_for(name)
                .map(str::to_string)
                .ok_or_else(|| {
                    tracing::warn!("Navigation to unknown route name {:?}", name);
                    UnknownRouteName(name.to_string())
                }),
        }
    }

    fn apply_navigate(&mut self, target: NavigationTarget<'_>) -> Result<(), NavigationError> {
        let path = self.target_path(target)?;
        self.history.push_path(&path)?;

        tracing::debug!("Navigate (push) to {:?}", path);
        self.transition(path);
        Ok(())
    }

    fn apply_replace(&mut self, target: NavigationTarget<'_>) -> Result<(), NavigationError> {
        let path = self.target_path(target)?;
        self.history.replace_path(&path)?;

        tracing::debug!("Navigate (replace) to {:?}", path);
        self.transition(path);
        Ok(())
    }

    fn apply_path_change(&mut self, path: &str) {
        tracing::debug!("History moved to {:?}", path);
        self.transition(path.to_string());
    }

    fn transition(&mut self, path: String) {
        self.state.resolved = self.table.position(&path);
        self.state.current_path = path;
        self.generation += 1;

        if self.state.resolved.is_none() {
            tracing::warn!("No route registered for {:?}", self.state.current_path);
        }
    }

    /// Hands out the listeners when they have not seen the latest transition
    ///
    /// Returns `None` while another dispatch holds them; that dispatch picks up
    /// the newer state once its callbacks return.
    fn begin_dispatch(&mut self) -> Option<Dispatch<V>> {
        if self.dispatching || self.generation == self.notified {
            return None;
        }

        self.dispatching = true;
        self.notified = self.generation;
        Some(Dispatch {
            table: Rc::clone(&self.table),
            path: self.state.current_path.clone(),
            resolved: self.state.resolved,
            listeners: std::mem::take(&mut self.listeners),
        })
    }

    fn end_dispatch(&mut self, mut listeners: Listeners<V>) {
        // Keep listeners subscribed during the dispatch, after the existing ones
        listeners.append(&mut self.listeners);
        self.listeners = listeners;
        self.dispatching = false;
    }

    fn notify(&mut self) {
        while let Some(mut dispatch) = self.begin_dispatch() {
            dispatch.run();
            self.end_dispatch(dispatch.listeners);
        }
    }
}

impl<V: 'static, H: HistoryAdapter + 'static> RouteRegistry<V, H> {
    /// Moves the registry behind a shared handle and subscribes it to history changes
    ///
    /// The history adapter only holds a weak reference, so dropping every handle
    /// drops the registry.
    pub fn attach(self) -> SharedRegistry<V, H> {
        let shared = SharedRegistry {
            inner: Rc::new(RefCell::new(self)),
            stale: Rc::new(Cell::new(false)),
        };

        let handle = shared.downgrade();
        shared
            .inner
            .borrow_mut()
            .history
            .on_path_changed(Box::new(move |path: &str| {
                if let Some(shared) = handle.upgrade() {
                    shared.path_changed(path);
                }
            }));

        shared
    }
}

impl<V: fmt::Debug, H: fmt::Debug> fmt::Debug for RouteRegistry<V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteRegistry")
            .field("table", &self.table)
            .field("history", &self.history)
            .field("state", &self.state)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Cloneable, single-threaded handle to an attached registry
///
/// Views keep one of these to call `navigate`, including from inside a mount
/// listener. Listeners run after the registry borrow is released; a transition
/// they trigger is delivered to every listener once the current round returns.
pub struct SharedRegistry<V, H> {
    inner: Rc<RefCell<RouteRegistry<V, H>>>,
    // Set when a history move arrived while the registry was borrowed.
    stale: Rc<Cell<bool>>,
}

impl<V, H: HistoryAdapter> SharedRegistry<V, H> {
    pub fn navigate(&self, target: NavigationTarget<'_>) -> Result<(), NavigationError> {
        self.sync();
        self.inner.borrow_mut().apply_navigate(target)?;
        self.dispatch();
        Ok(())
    }

    pub fn replace(&self, target: NavigationTarget<'_>) -> Result<(), NavigationError> {
        self.sync();
        self.inner.borrow_mut().apply_replace(target)?;
        self.dispatch();
        Ok(())
    }

    pub fn subscribe<F>(&self, listener: F) -> ListenerId
    where
        F: FnMut(&str, Resolution<'_, V>) + 'static,
    {
        self.inner.borrow_mut().subscribe(listener)
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.inner.borrow_mut().unsubscribe(id)
    }

    pub fn current_path(&self) -> String {
        self.borrow().current_path().to_string()
    }

    /// Read access to the registry, resynced with history first
    pub fn borrow(&self) -> Ref<'_, RouteRegistry<V, H>> {
        self.sync();
        self.inner.borrow()
    }

    /// Handle that does not keep the registry alive, for use inside listeners
    pub fn downgrade(&self) -> WeakRegistry<V, H> {
        WeakRegistry {
            inner: Rc::downgrade(&self.inner),
            stale: Rc::clone(&self.stale),
        }
    }

    fn path_changed(&self, path: &str) {
        {
            let Ok(mut registry) = self.inner.try_borrow_mut() else {
                tracing::warn!(
                    "History moved to {:?} while the registry was borrowed; resyncing on next access",
                    path
                );
                self.stale.set(true);
                return;
            };
            registry.apply_path_change(path);
        }
        self.dispatch();
    }

    /// Re-reads the history position after a notification that could not be applied
    fn sync(&self) {
        if !self.stale.get() {
            return;
        }

        {
            let Ok(mut registry) = self.inner.try_borrow_mut() else {
                return;
            };
            self.stale.set(false);

            let path = registry.history.current_path();
            if path != registry.current_path() {
                registry.apply_path_change(&path);
            }
        }
        self.dispatch();
    }

    fn dispatch(&self) {
        for _ in 0..MAX_DISPATCH_ROUNDS {
            let dispatch = self.inner.borrow_mut().begin_dispatch();
            let Some(mut dispatch) = dispatch else {
                return;
            };

            dispatch.run();
            self.inner.borrow_mut().end_dispatch(dispatch.listeners);
        }

        tracing::warn!(
            "Listeners kept navigating after {} rounds; stopped at {:?}",
            MAX_DISPATCH_ROUNDS,
            self.inner.borrow().current_path()
        );
    }
}

impl<V, H> Clone for SharedRegistry<V, H> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
            stale: Rc::clone(&self.stale),
        }
    }
}

/// Non-owning counterpart of `SharedRegistry`
///
/// A listener that captures a `SharedRegistry` keeps the registry alive forever;
/// capture one of these instead.
pub struct WeakRegistry<V, H> {
    inner: Weak<RefCell<RouteRegistry<V, H>>>,
    stale: Rc<Cell<bool>>,
}

impl<V, H> WeakRegistry<V, H> {
    pub fn upgrade(&self) -> Option<SharedRegistry<V, H>> {
        self.inner.upgrade().map(|inner| SharedRegistry {
            inner,
            stale: Rc::clone(&self.stale),
        })
    }
}

impl<V, H> Clone for WeakRegistry<V, H> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
            stale: Rc::clone(&self.stale),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryHistory;

    fn registry(start: &str) -> (RouteRegistry<u8, MemoryHistory>, MemoryHistory) {
        let history = MemoryHistory::new(start);
        let registry = RouteRegistry::new(
            vec![
                RouteEntry::new("/", "Index", 1),
                RouteEntry::new("/entries", "Entry", 2),
                RouteEntry::new("/about", "About", 3),
            ],
            history.clone(),
        )
        .unwrap();
        (registry, history)
    }

    #[test]
    fn test_initial_state_resolved() {
        let (registry, _) = registry("/about");
        assert_eq!(registry.current_path(), "/about");
        assert_eq!(registry.state().resolved_index(), Some(2));
        assert!(registry.is_resolved());
    }

    #[test]
    fn test_initial_state_unresolved() {
        let (registry, _) = registry("/missing");
        assert!(!registry.is_resolved());
        assert!(registry.resolved().is_not_found());
    }

    #[test]
    fn test_navigate_to_unregistered_path_is_allowed() {
        let (mut registry, history) = registry("/");
        registry.navigate(NavigationTarget::Path("/nowhere")).unwrap();

        assert_eq!(registry.current_path(), "/nowhere");
        assert!(registry.resolved().is_not_found());
        assert_eq!(history.push_count(), 1);
    }

    #[test]
    fn test_replace_does_not_push() {
        let (mut registry, history) = registry("/");
        registry.replace(NavigationTarget::Name("About")).unwrap();

        assert_eq!(registry.resolved().view(), Some(&3));
        assert_eq!(history.push_count(), 0);
        assert_eq!(history.entries(), vec!["/about"]);
    }

    #[test]
    fn test_unsubscribe() {
        let (mut registry, _) = registry("/");
        let calls = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&calls);
        let id = registry.subscribe(move |_, _| *counter.borrow_mut() += 1);

        registry.navigate(NavigationTarget::Path("/about")).unwrap();
        assert!(registry.unsubscribe(id));
        assert!(!registry.unsubscribe(id));
        registry.navigate(NavigationTarget::Path("/")).unwrap();

        assert_eq!(*calls.borrow(), 1);
    }

    #[test]
    fn test_dispatch_restores_listeners() {
        let (mut registry, _) = registry("/");
        registry.subscribe(|_, _| {});
        registry.navigate(NavigationTarget::Path("/about")).unwrap();

        assert_eq!(registry.listeners.len(), 1);
        assert!(!registry.dispatching);
        assert_eq!(registry.notified, registry.generation);
    }

    #[test]
    fn test_url_for() {
        let (registry, _) = registry("/");
        assert_eq!(registry.url_for("Entry"), Some("/entries"));
        assert_eq!(registry.url_for("Missing"), None);
    }
}
