//! Application error types.
//!
//! `AppError` is the closed domain error taxonomy: every service operation
//! returns one of these variants, and the HTTP layer matches on them
//! exhaustively to pick a status code. Store-level failures are folded into
//! `Database` at the storage boundary; uniqueness violations are translated
//! into `AlreadyExists` by the service that triggered them.

use serde::Serialize;
use thiserror::Error;

/// Application-level errors returned by the service layer.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "type", content = "details")]
pub enum AppError {
    /// Referenced author, PR, reviewer or team does not exist.
    #[error("Not found: {resource}")]
    NotFound {
        resource: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<String>,
    },

    /// Duplicate id on creation (PR, team or user).
    #[error("{resource} already exists")]
    AlreadyExists { resource: Resource },

    /// Merge attempted on a PR with zero reviewers.
    #[error("PR doesn't have reviewers")]
    NoReviewers,

    /// Reassignment attempted on a merged PR.
    #[error("cannot reassign on merged PR")]
    PrMerged,

    /// The old reviewer is not currently assigned to a PR that has reviewers.
    #[error("reviewer {reviewer_id} is not assigned to this PR")]
    NotAssigned { reviewer_id: String },

    /// Reassignment has no eligible replacement candidate in the team.
    #[error("no active replacement candidate in team")]
    NoCandidate,

    /// Request body failed business validation.
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// Underlying store failure (connection, transaction abort).
    #[error("Database error: {message}")]
    Database { message: String },

    /// Internal application error.
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Resource kinds that carry a uniqueness constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Resource {
    PullRequest,
    Team,
    User,
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PullRequest => write!(f, "PR"),
            Self::Team => write!(f, "team"),
            Self::User => write!(f, "user"),
        }
    }
}

impl AppError {
    /// Create a not found error.
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: None,
        }
    }

    /// Create a not found error with the offending id.
    pub fn not_found_with_id(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: Some(id.into()),
        }
    }

    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// True if the underlying sqlx error is a unique-constraint violation.
    ///
    /// Services call this right after an INSERT to decide whether to surface
    /// `AlreadyExists` instead of a generic database error.
    pub fn is_unique_violation(err: &sqlx::Error) -> bool {
        match err {
            sqlx::Error::Database(db) => {
                matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation)
            }
            _ => false,
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        Self::database(err.to_string())
    }
}
