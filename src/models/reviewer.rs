//! Reviewer assignment model for the PR↔reviewer relation.

use serde::Serialize;
use sqlx::FromRow;

/// One reviewer row: `user_id` reviews `pull_request_id`.
///
/// A PR carries 0, 1 or 2 of these at any time. The author of a PR is never
/// among them.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ReviewerAssignment {
    pub pull_request_id: String,
    pub user_id: String,
}
