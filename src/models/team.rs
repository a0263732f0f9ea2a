//! Team model.

use serde::{Deserialize, Serialize};

/// A member entry inside a team payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMember {
    pub user_id: String,
    pub username: String,
    pub is_active: bool,
}

/// A team with its member list.
///
/// Teams are created once with an initial member list; membership is
/// append-only (there is no removal or move operation).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub team_name: String,
    pub members: Vec<TeamMember>,
}
