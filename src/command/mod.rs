//! Per-resource command configs, validation, and action dispatch.

pub mod build;
pub mod dashboard;
pub mod hook;
pub mod log;
pub mod settings;
pub mod step;

use thiserror::Error;

/// Validation failures caught before any network call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidateError {
    #[error("missing required field: {0}")]
    Missing(&'static str),

    #[error("{0} must be greater than zero")]
    InvalidNumber(&'static str),

    #[error("no changes requested; provide at least one update flag")]
    NoChanges,

    #[error("targeting repos requires at least one of --branches or --events")]
    NoOverrides,
}

fn require(field: &'static str, value: &str) -> Result<(), ValidateError> {
    if value.trim().is_empty() {
        return Err(ValidateError::Missing(field));
    }
    Ok(())
}

fn require_number(field: &'static str, value: i64) -> Result<(), ValidateError> {
    if value <= 0 {
        return Err(ValidateError::InvalidNumber(field));
    }
    Ok(())
}

/// Append entries not already present; existing members win.
fn add_unique(list: &mut Vec<String>, additions: &[String]) {
    for addition in additions {
        if !list.contains(addition) {
            list.push(addition.clone());
        }
    }
}

/// Remove every occurrence of the given entries.
fn drop_items(list: &mut Vec<String>, drops: &[String]) {
    list.retain(|item| !drops.contains(item));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_require() {
        assert_eq!(require("org", ""), Err(ValidateError::Missing("org")));
        assert_eq!(require("org", "   "), Err(ValidateError::Missing("org")));
        assert_eq!(require("org", "github"), Ok(()));
    }

    #[test]
    fn test_require_number() {
        assert_eq!(
            require_number("build number", 0),
            Err(ValidateError::InvalidNumber("build number"))
        );
        assert_eq!(require_number("build number", 7), Ok(()));
    }

    #[test]
    fn test_add_unique_deduplicates() {
        let mut list = strings(&["a", "b"]);
        add_unique(&mut list, &strings(&["b", "c", "c"]));
        assert_eq!(list, strings(&["a", "b", "c"]));
    }

    #[test]
    fn test_drop_items() {
        let mut list = strings(&["a", "b", "c"]);
        drop_items(&mut list, &strings(&["b", "missing"]));
        assert_eq!(list, strings(&["a", "c"]));
    }

    #[test]
    fn test_error_messages_name_the_field() {
        assert_eq!(
            ValidateError::Missing("repo").to_string(),
            "missing required field: repo"
        );
        assert_eq!(
            ValidateError::InvalidNumber("hook number").to_string(),
            "hook number must be greater than zero"
        );
    }
}
