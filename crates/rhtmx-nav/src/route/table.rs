use std::collections::HashMap;
use std::fmt;

use super::RouteEntry;
use crate::error::ConfigurationError;
use crate::path::is_canonical_path;

/// Ordered, immutable collection of routes
///
/// Built once at startup. Construction checks that every path and every name is
/// unique, so a table that exists is always well-formed.
///
/// # Examples
///
/// ```
/// use rhtmx_nav::{RouteEntry, RouteTable};
///
/// let table = RouteTable::new(vec![
///     RouteEntry::new("/", "Index", "index"),
///     RouteEntry::new("/about", "About", "about"),
/// ])
/// .unwrap();
///
/// assert_eq!(table.len(), 2);
/// assert_eq!(table.resolve("/about").view(), Some(&"about"));
/// assert!(table.resolve("/missing").is_not_found());
/// ```
#[derive(Clone)]
pub struct RouteTable<V> {
    entries: Vec<RouteEntry<V>>,
    names: HashMap<String, usize>,
}

impl<V> RouteTable<V> {
    /// Validates and builds a table, keeping registration order
    ///
    /// Fails on the first duplicate path or name found, reporting both indices.
    pub fn new<I>(entries: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = RouteEntry<V>>,
    {
        let entries: Vec<RouteEntry<V>> = entries.into_iter().collect();
        let mut paths: HashMap<&str, usize> = HashMap::with_capacity(entries.len());
        let mut names: HashMap<String, usize> = HashMap::with_capacity(entries.len());

        for (index, entry) in entries.iter().enumerate() {
            if let Some(&first) = paths.get(entry.path.as_str()) {
                return Err(ConfigurationError::DuplicatePath {
                    path: entry.path.clone(),
                    first,
                    second: index,
                });
            }
            if let Some(&first) = names.get(&entry.name) {
                return Err(ConfigurationError::DuplicateName {
                    name: entry.name.clone(),
                    first,
                    second: index,
                });
            }

            if !is_canonical_path(&entry.path) {
                tracing::warn!(
                    "Route {:?} has non-canonical path {:?}; it only matches that exact string",
                    entry.name,
                    entry.path
                );
            }

            paths.insert(&entry.path, index);
            names.insert(entry.name.clone(), index);
        }

        Ok(Self { entries, names })
    }

    /// Matches a path against every route in registration order
    ///
    /// Exact, case-sensitive comparison. Trailing slashes, query strings and
    /// fragments are not normalized.
    pub fn resolve(&self, path: &str) -> Resolution<'_, V> {
        self.position(path)
            .map(|index| Resolution::Matched(&self.entries[index]))
            .unwrap_or(Resolution::NotFound)
    }

    /// Index of the route registered for `path`
    pub fn position(&self, path: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.path == path)
    }

    pub fn get(&self, index: usize) -> Option<&RouteEntry<V>> {
        self.entries.get(index)
    }

    /// Gets a route by its logical name (O(1) HashMap lookup)
    pub fn get_by_name(&self, name: &str) -> Option<&RouteEntry<V>> {
        self.names.get(name).map(|&index| &self.entries[index])
    }

    pub fn get_by_path(&self, path: &str) -> Option<&RouteEntry<V>> {
        self.resolve(path).entry()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RouteEntry<V>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: fmt::Debug> fmt::Debug for RouteTable<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.entries).finish()
    }
}

impl<'a, V> IntoIterator for &'a RouteTable<V> {
    type Item = &'a RouteEntry<V>;
    type IntoIter = std::slice::Iter<'a, RouteEntry<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Outcome of resolving a path
///
/// `NotFound` is an expected result, not an error: the mount point decides what
/// to show for unmatched paths.
#[derive(Debug, PartialEq)]
pub enum Resolution<'a, V> {
    Matched(&'a RouteEntry<V>),
    NotFound,
}

impl<'a, V> Resolution<'a, V> {
    pub fn entry(&self) -> Option<&'a RouteEntry<V>> {
        match *self {
            Resolution::Matched(entry) => Some(entry),
            Resolution::NotFound => None,
        }
    }

    pub fn view(&self) -> Option<&'a V> {
        self.entry().map(|entry| &entry.view)
    }

    pub fn name(&self) -> Option<&'a str> {
        self.entry().map(|entry| entry.name.as_str())
    }

    pub fn is_matched(&self) -> bool {
        matches!(self, Resolution::Matched(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Resolution::NotFound)
    }
}

// Manual impls: derive would demand `V: Clone`/`V: Copy` for a shared reference.
impl<V> Clone for Resolution<'_, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for Resolution<'_, V> {}

impl<'a, V> From<Option<&'a RouteEntry<V>>> for Resolution<'a, V> {
    fn from(entry: Option<&'a RouteEntry<V>>) -> Self {
        entry.map(Resolution::Matched).unwrap_or(Resolution::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries() -> Vec<RouteEntry<u8>> {
        vec![
            RouteEntry::new("/", "Index", 1),
            RouteEntry::new("/entries", "Entry", 2),
            RouteEntry::new("/about", "About", 3),
        ]
    }

    #[test]
    fn test_table_keeps_registration_order() {
        let table = RouteTable::new(entries()).unwrap();
        let paths: Vec<&str> = table.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["/", "/entries", "/about"]);
    }

    #[test]
    fn test_duplicate_path_reports_both_indices() {
        let mut routes = entries();
        routes.push(RouteEntry::new("/entries", "Archive", 4));

        let err = RouteTable::new(routes).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::DuplicatePath {
                path: "/entries".to_string(),
                first: 1,
                second: 3,
            }
        );
    }

    #[test]
    fn test_duplicate_name_reports_both_indices() {
        let mut routes = entries();
        routes.push(RouteEntry::new("/team", "About", 4));

        let err = RouteTable::new(routes).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::DuplicateName {
                name: "About".to_string(),
                first: 2,
                second: 3,
            }
        );
    }

    #[test]
    fn test_empty_table_is_valid() {
        let table = RouteTable::<u8>::new(Vec::new()).unwrap();
        assert!(table.is_empty());
        assert!(table.resolve("/").is_not_found());
    }

    #[test]
    fn test_non_canonical_path_is_accepted() {
        let table = RouteTable::new(vec![RouteEntry::new("/entries/", "Entry", 2)]).unwrap();
        assert!(table.resolve("/entries/").is_matched());
        assert!(table.resolve("/entries").is_not_found());
    }

    #[test]
    fn test_lookup_by_name() {
        let table = RouteTable::new(entries()).unwrap();
        assert_eq!(table.get_by_name("Entry").map(|e| e.view), Some(2));
        assert!(table.get_by_name("entry").is_none());
        assert_eq!(table.get_by_path("/about").map(|e| e.view), Some(3));
    }

    #[test]
    fn test_resolution_accessors() {
        let table = RouteTable::new(entries()).unwrap();

        let matched = table.resolve("/");
        assert_eq!(matched.name(), Some("Index"));
        assert_eq!(matched.view(), Some(&1));

        let missing = table.resolve("/nope");
        assert_eq!(missing.entry(), None);
        assert_eq!(Resolution::from(table.get(7)), Resolution::NotFound);
    }
}
