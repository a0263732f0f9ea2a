//! User model.

use serde::Serialize;
use sqlx::FromRow;

/// A team member tracked by the service.
///
/// Identity is `user_id`, globally unique. `is_active` is toggled
/// independently of team or PR state; inactive users are excluded from all
/// reviewer candidate pools but keep their historical assignments.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub user_id: String,
    pub username: String,
    pub team_name: String,
    pub is_active: bool,
}
