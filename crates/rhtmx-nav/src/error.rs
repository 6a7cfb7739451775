// File: src/error.rs
// Purpose: Error types for route table construction and navigation

use thiserror::Error;

/// Misconfigured route table, detected when the table is built
///
/// This is a programmer error: an application that hits it should refuse to start.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("duplicate route path {path:?} (entries {first} and {second})")]
    DuplicatePath {
        path: String,
        first: usize,
        second: usize,
    },
    #[error("duplicate route name {name:?} (entries {first} and {second})")]
    DuplicateName {
        name: String,
        first: usize,
        second: usize,
    },
}

/// Navigation was requested by a logical name that no route carries
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown route name: {0}")]
pub struct UnknownRouteName(pub String);

/// The history adapter refused to move the session history
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    #[error("history is unavailable: {0}")]
    Unavailable(String),
    #[error("history rejected {path:?}: {reason}")]
    Rejected { path: String, reason: String },
}

/// Failure of a `navigate` or `replace` call
///
/// In both cases the navigation state is left exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error(transparent)]
    UnknownRouteName(#[from] UnknownRouteName),
    #[error(transparent)]
    History(#[from] HistoryError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error_message() {
        let err = ConfigurationError::DuplicatePath {
            path: "/about".to_string(),
            first: 0,
            second: 2,
        };
        assert_eq!(
            err.to_string(),
            "duplicate route path \"/about\" (entries 0 and 2)"
        );
    }

    #[test]
    fn test_navigation_error_is_transparent() {
        let err: NavigationError = UnknownRouteName("Missing".to_string()).into();
        assert_eq!(err.to_string(), "unknown route name: Missing");
        assert!(matches!(err, NavigationError::UnknownRouteName(_)));
    }
}
