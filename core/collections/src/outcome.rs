//! Outcome vocabulary of the collection service.

use std::fmt;
use thiserror::Error;
use tracing::error;

/// Result of a title-changing operation (`add`, `edit`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOutcome {
    /// The provider applied the change and listeners were notified.
    Ok,
    /// Input was rejected before reaching the provider.
    Invalid,
    /// Another collection already holds the title.
    Duplicate,
    /// The provider declined or failed.
    Error,
}

impl ChangeOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, ChangeOutcome::Ok)
    }
}

impl fmt::Display for ChangeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ChangeOutcome::Ok => "ok",
            ChangeOutcome::Invalid => "invalid",
            ChangeOutcome::Duplicate => "duplicate",
            ChangeOutcome::Error => "error",
        };
        f.write_str(text)
    }
}

/// Service operation, used to label log entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Activate,
    Add,
    Delete,
    Edit,
    List,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Operation::Activate => "Activate",
            Operation::Add => "Add",
            Operation::Delete => "Delete",
            Operation::Edit => "Edit",
            Operation::List => "List",
        };
        f.write_str(text)
    }
}

/// Why an operation did not go through.
///
/// Never returned to callers; the service logs it and hands back the
/// matching [`ChangeOutcome`] or `false`.
#[derive(Debug, Error)]
pub enum Failure {
    /// Bad input, caught before touching the provider.
    #[error("{operation} rejected. {reason}")]
    Validation {
        operation: Operation,
        reason: &'static str,
    },

    /// Title collision.
    #[error("{operation} rejected. There is already a collection with the title '{title}'")]
    Duplicate { operation: Operation, title: String },

    /// Provider answered with its negative result.
    #[error("{operation} failed. {detail}")]
    ProviderDeclined { operation: Operation, detail: String },

    /// Provider returned an error.
    #[error("{operation} failed. {source}")]
    Provider {
        operation: Operation,
        #[source]
        source: shelf_common::Error,
    },
}

impl Failure {
    /// Caller-visible outcome. Declined and errored provider calls are
    /// indistinguishable here.
    pub fn outcome(&self) -> ChangeOutcome {
        match self {
            Failure::Validation { .. } => ChangeOutcome::Invalid,
            Failure::Duplicate { .. } => ChangeOutcome::Duplicate,
            Failure::ProviderDeclined { .. } | Failure::Provider { .. } => ChangeOutcome::Error,
        }
    }

    /// Write the single log entry for this failure.
    pub fn report(&self) {
        error!("{}", self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_failures_collapse_to_error() {
        let declined = Failure::ProviderDeclined {
            operation: Operation::Edit,
            detail: "id=c1".to_string(),
        };
        let errored = Failure::Provider {
            operation: Operation::Edit,
            source: shelf_common::Error::Io(std::io::Error::other("disk full")),
        };
        assert_eq!(declined.outcome(), ChangeOutcome::Error);
        assert_eq!(errored.outcome(), declined.outcome());
    }

    #[test]
    fn test_messages_name_the_operation() {
        let failure = Failure::Duplicate {
            operation: Operation::Add,
            title: "Notes".to_string(),
        };
        assert_eq!(failure.outcome(), ChangeOutcome::Duplicate);
        assert_eq!(
            failure.to_string(),
            "Add rejected. There is already a collection with the title 'Notes'"
        );

        let failure = Failure::Provider {
            operation: Operation::Delete,
            source: shelf_common::Error::Io(std::io::Error::other("gone")),
        };
        assert_eq!(failure.to_string(), "Delete failed. I/O error: gone");
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(ChangeOutcome::Duplicate.to_string(), "duplicate");
        assert!(ChangeOutcome::Ok.is_ok());
        assert!(!ChangeOutcome::Invalid.is_ok());
    }
}
