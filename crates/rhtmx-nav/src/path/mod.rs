/// Path utilities shared by the history adapters and the route table.
///
/// All functions are **pure**: given same input, always produce same output with no side effects.
/// None of them are applied during resolution; matching stays an exact string comparison.

use std::borrow::Cow;

/// Checks whether a route path is in canonical form
///
/// # Rules
///
/// - Must start with `/`
/// - Must not contain `//`, `\`, `?` or `#`
/// - Must not end with `/` (except root `/`)
///
/// Non-canonical paths are still accepted by the route table. They can only be
/// reached by navigating to the exact same string, so the table warns about them.
///
/// # Examples
///
/// ```
/// use rhtmx_nav::path::is_canonical_path;
///
/// assert!(is_canonical_path("/"));
/// assert!(is_canonical_path("/entries"));
///
/// assert!(!is_canonical_path(""));
/// assert!(!is_canonical_path("about"));
/// assert!(!is_canonical_path("/about/"));
/// assert!(!is_canonical_path("/about?tab=1"));
/// ```
pub fn is_canonical_path(path: &str) -> bool {
    if !path.starts_with('/') {
        return false;
    }

    if path.contains("//") || path.contains(['\\', '?', '#']) {
        return false;
    }

    path == "/" || !path.ends_with('/')
}

/// Extracts the path component of a location, dropping query string and fragment
///
/// Returns `Cow::Borrowed` slices of the input; an empty path becomes `/`.
///
/// # Examples
///
/// ```
/// use rhtmx_nav::path::location_path;
///
/// assert_eq!(location_path("/entries?page=2"), "/entries");
/// assert_eq!(location_path("/about#team"), "/about");
/// assert_eq!(location_path("?q=1"), "/");
/// ```
pub fn location_path(location: &str) -> Cow<'_, str> {
    let end = location.find(['?', '#']).unwrap_or(location.len());
    match &location[..end] {
        "" => Cow::Borrowed("/"),
        path => Cow::Borrowed(path),
    }
}

/// Removes a deployment base (e.g. `/app`) from a browser pathname
///
/// Returns `None` when the pathname lives outside the base. The base itself maps to `/`.
///
/// # Examples
///
/// ```
/// use rhtmx_nav::path::strip_base;
///
/// assert_eq!(strip_base("/app/about", "/app"), Some("/about"));
/// assert_eq!(strip_base("/app", "/app"), Some("/"));
/// assert_eq!(strip_base("/application", "/app"), None);
/// assert_eq!(strip_base("/about", ""), Some("/about"));
/// ```
pub fn strip_base<'a>(pathname: &'a str, base: &str) -> Option<&'a str> {
    let base = base.trim_end_matches('/');
    if base.is_empty() {
        return Some(pathname);
    }

    match pathname.strip_prefix(base)? {
        "" | "/" => Some("/"),
        rest if rest.starts_with('/') => Some(rest),
        _ => None,
    }
}

/// Prefixes a route path with a deployment base
///
/// # Examples
///
/// ```
/// use rhtmx_nav::path::join_base;
///
/// assert_eq!(join_base("/app", "/about"), "/app/about");
/// assert_eq!(join_base("/app/", "/"), "/app/");
/// assert_eq!(join_base("", "/about"), "/about");
/// ```
pub fn join_base<'a>(base: &str, path: &'a str) -> Cow<'a, str> {
    let base = base.trim_end_matches('/');
    if base.is_empty() {
        Cow::Borrowed(path)
    } else {
        Cow::Owned(format!("{}{}", base, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_canonical_path() {
        assert!(is_canonical_path("/"));
        assert!(is_canonical_path("/about"));
        assert!(is_canonical_path("/entries/archive"));

        assert!(!is_canonical_path(""));
        assert!(!is_canonical_path("entries"));
        assert!(!is_canonical_path("/entries/"));
        assert!(!is_canonical_path("/entries//archive"));
        assert!(!is_canonical_path("\\about"));
        assert!(!is_canonical_path("/about#team"));
    }

    #[test]
    fn test_location_path_borrows() {
        let path = location_path("/about");
        assert!(matches!(path, Cow::Borrowed("/about")));

        let path = location_path("/entries?page=2#top");
        assert!(matches!(path, Cow::Borrowed("/entries")));
    }

    #[test]
    fn test_location_path_keeps_trailing_slash() {
        // Only query and fragment are stripped
        assert_eq!(location_path("/entries/?page=2"), "/entries/");
        assert_eq!(location_path(""), "/");
        assert_eq!(location_path("#top"), "/");
    }

    #[test]
    fn test_strip_base() {
        assert_eq!(strip_base("/app/entries", "/app/"), Some("/entries"));
        assert_eq!(strip_base("/app/", "/app"), Some("/"));
        assert_eq!(strip_base("/other", "/app"), None);
        assert_eq!(strip_base("/", "/"), Some("/"));
    }

    #[test]
    fn test_join_base_round_trips_through_strip() {
        let joined = join_base("/app", "/entries");
        assert_eq!(strip_base(&joined, "/app"), Some("/entries"));
    }
}
