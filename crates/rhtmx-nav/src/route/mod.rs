/// Route module for the navigation registry
///
/// Contains the route entry type and the validated, immutable route table.
/// Resolution is a pure function of the table: same path in, same entry out.

pub mod table;

pub use table::{Resolution, RouteTable};

/// A single registered route: exact path, logical name and an opaque view
///
/// The view is never inspected or constructed by the router, so `V` carries no
/// trait bounds. Use whatever the mount point renders from (an enum, a component
/// id, a boxed constructor).
///
/// # Examples
///
/// ```
/// use rhtmx_nav::RouteEntry;
///
/// let entry = RouteEntry::new("/entries", "Entry", "entries");
/// assert_eq!(entry.path, "/entries");
/// assert_eq!(entry.name, "Entry");
/// assert_eq!(entry.view, "entries");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry<V> {
    /// Exact URL path, e.g. "/entries"
    pub path: String,
    /// Logical name used for name-based navigation, e.g. "Entry"
    pub name: String,
    /// Renderable unit handed to the view mount point
    pub view: V,
}

impl<V> RouteEntry<V> {
    pub fn new(path: impl Into<String>, name: impl Into<String>, view: V) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            view,
        }
    }

    /// Replaces the view, keeping path and name
    ///
    /// Used to turn configuration entries (string view ids) into real views.
    ///
    /// # Examples
    ///
    /// ```
    /// use rhtmx_nav::RouteEntry;
    ///
    /// let entry = RouteEntry::new("/about", "About", "about").map_view(str::len);
    /// assert_eq!(entry.view, 5);
    /// ```
    pub fn map_view<W>(self, f: impl FnOnce(V) -> W) -> RouteEntry<W> {
        RouteEntry {
            path: self.path,
            name: self.name,
            view: f(self.view),
        }
    }
}
