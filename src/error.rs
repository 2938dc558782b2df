//! Domain error types.
//!
//! Every variant here is user-facing and non-fatal: the session reports
//! the message and keeps going.

use crate::models::{RecordField, StakeholderId};
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by record store updates.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no stakeholder with id {0}")]
    UnknownId(StakeholderId),

    #[error("{field} must be a whole number, got '{value}'")]
    InvalidNumber { field: RecordField, value: String },

    #[error("{0}")]
    InvalidRelationship(String),
}

/// Errors raised while building the organisational chart.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HierarchyError {
    #[error("reporting cycle detected: {}", .members.join(" -> "))]
    Cycle { members: Vec<String> },

    #[error("'{child}' reports to '{parent}', which is not a tracked stakeholder")]
    UnknownParent { child: String, parent: String },
}

/// Errors raised by the export flow.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Please add at least {required} stakeholders to generate a meaningful report (currently {current}).")]
    TooFewStakeholders { required: usize, current: usize },

    #[error("Please fill in your name and email")]
    MissingContact,

    #[error("no report has been requested; run `report` first")]
    NotRequested,

    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write report to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_message_lists_members() {
        let err = HierarchyError::Cycle {
            members: vec!["A".to_string(), "B".to_string(), "A".to_string()],
        };
        assert_eq!(err.to_string(), "reporting cycle detected: A -> B -> A");
    }

    #[test]
    fn test_gate_message_mentions_minimum() {
        let err = ExportError::TooFewStakeholders {
            required: 3,
            current: 2,
        };
        assert!(err.to_string().contains("at least 3 stakeholders"));
    }
}
