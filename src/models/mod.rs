//! Data models for the service.
//!
//! These models represent the core entities stored in SQLite: users, teams,
//! pull requests and the PR↔reviewer relation.
//!
//! All models derive Serialize for the HTTP layer and FromRow for SQLx queries.

pub mod pull_request;
pub mod reviewer;
pub mod team;
pub mod user;

// Re-exports for convenient access
pub use pull_request::{PrStatus, PullRequest};
pub use reviewer::ReviewerAssignment;
pub use team::{Team, TeamMember};
pub use user::User;
