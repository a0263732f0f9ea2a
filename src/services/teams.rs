//! Team management service.
//!
//! Teams are created once with their initial member list; membership is
//! append-only in this design.

use crate::db::pool::DbPool;
use crate::db::{teams, users};
use crate::error::{AppError, Resource};
use crate::models::{Team, TeamMember, User};

/// Create a team together with its members, atomically.
///
/// A duplicate team name or member id rolls the whole insert back.
pub async fn create_team(pool: &DbPool, team: Team) -> Result<Team, AppError> {
    log::info!("creating team {} with {} member(s)", team.team_name, team.members.len());

    let mut tx = pool.begin().await?;

    if let Err(err) = teams::insert_team(&mut *tx, &team.team_name).await {
        if AppError::is_unique_violation(&err) {
            log::warn!("team {} already exists", team.team_name);
            return Err(AppError::AlreadyExists {
                resource: Resource::Team,
            });
        }
        return Err(err.into());
    }

    for member in &team.members {
        let user = User {
            user_id: member.user_id.clone(),
            username: member.username.clone(),
            team_name: team.team_name.clone(),
            is_active: member.is_active,
        };

        if let Err(err) = users::insert_user(&mut *tx, &user).await {
            if AppError::is_unique_violation(&err) {
                log::warn!("user {} already exists", member.user_id);
                return Err(AppError::AlreadyExists {
                    resource: Resource::User,
                });
            }
            return Err(err.into());
        }
    }

    tx.commit().await?;

    Ok(team)
}

/// Fetch a team and its member list.
pub async fn get_team(pool: &DbPool, team_name: &str) -> Result<Team, AppError> {
    if !teams::team_exists(pool, team_name).await? {
        return Err(AppError::not_found_with_id("Team", team_name));
    }

    let members = users::get_users_by_team(pool, team_name)
        .await?
        .into_iter()
        .map(|u| TeamMember {
            user_id: u.user_id,
            username: u.username,
            is_active: u.is_active,
        })
        .collect();

    Ok(Team {
        team_name: team_name.to_string(),
        members,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_test_db() -> DbPool {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        std::mem::forget(dir);

        crate::db::initialize(&db_path).await.unwrap()
    }

    fn member(id: &str, active: bool) -> TeamMember {
        TeamMember {
            user_id: id.to_string(),
            username: format!("user {id}"),
            is_active: active,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_team() {
        let pool = setup_test_db().await;

        let team = Team {
            team_name: "backend".to_string(),
            members: vec![member("u1", true), member("u2", false)],
        };
        create_team(&pool, team).await.unwrap();

        let fetched = get_team(&pool, "backend").await.unwrap();
        assert_eq!(fetched.team_name, "backend");
        assert_eq!(fetched.members.len(), 2);
        assert!(!fetched.members[1].is_active);
    }

    #[tokio::test]
    async fn test_duplicate_team_name_is_rejected() {
        let pool = setup_test_db().await;

        let team = Team {
            team_name: "backend".to_string(),
            members: vec![member("u1", true)],
        };
        create_team(&pool, team).await.unwrap();

        let again = Team {
            team_name: "backend".to_string(),
            members: vec![member("u2", true)],
        };
        let err = create_team(&pool, again).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::AlreadyExists {
                resource: Resource::Team
            }
        ));
    }

    #[tokio::test]
    async fn test_duplicate_member_rolls_back_team() {
        let pool = setup_test_db().await;

        create_team(
            &pool,
            Team {
                team_name: "backend".to_string(),
                members: vec![member("u1", true)],
            },
        )
        .await
        .unwrap();

        // u1 already belongs to backend; the whole frontend insert must fail.
        let err = create_team(
            &pool,
            Team {
                team_name: "frontend".to_string(),
                members: vec![member("u2", true), member("u1", true)],
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            AppError::AlreadyExists {
                resource: Resource::User
            }
        ));

        // Rolled back: neither the team nor u2 exists.
        let err = get_team(&pool, "frontend").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
        assert!(!users::user_exists(&pool, "u2").await.unwrap());
    }

    #[tokio::test]
    async fn test_get_unknown_team_fails_not_found() {
        let pool = setup_test_db().await;
        let err = get_team(&pool, "ghosts").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }
}
