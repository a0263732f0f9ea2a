//! Service layer: the assignment engine and its sibling directory services.
//!
//! Handlers call exactly one service operation per request; services own
//! transaction and locking scope.

pub mod assignment;
pub mod locks;
pub mod teams;
pub mod users;

pub use assignment::AssignmentEngine;
