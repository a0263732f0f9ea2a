//! Creation atomicity tests.
//!
//! A failed creation must leave no trace: the PR row and its reviewer rows
//! appear together or not at all, and a duplicate-id conflict never touches
//! the reviewer rows of the PR that already owns the id.

use pr_service::db;
use pr_service::db::pool::DbPool;
use pr_service::error::{AppError, Resource};
use pr_service::models::{Team, TeamMember};
use pr_service::services::{assignment::AssignmentEngine, teams};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::tempdir;

async fn setup_db() -> DbPool {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("test.db");
    std::mem::forget(dir);

    db::initialize(&db_path).await.unwrap()
}

fn member(id: &str) -> TeamMember {
    TeamMember {
        user_id: id.to_string(),
        username: format!("user {id}"),
        is_active: true,
    }
}

#[tokio::test]
async fn duplicate_pr_id_leaves_original_reviewers_untouched() {
    let pool = setup_db().await;
    teams::create_team(
        &pool,
        Team {
            team_name: "backend".to_string(),
            members: vec![member("u1"), member("u2"), member("u3")],
        },
    )
    .await
    .unwrap();
    teams::create_team(
        &pool,
        Team {
            team_name: "frontend".to_string(),
            members: vec![member("u4"), member("u5"), member("u6")],
        },
    )
    .await
    .unwrap();

    let engine = AssignmentEngine::with_rng(pool.clone(), StdRng::seed_from_u64(11));

    let created = engine
        .create_pull_request("pr-1", "Original", "u1")
        .await
        .unwrap();
    let mut original = created.assigned_reviewers.clone();
    original.sort();

    // Same id, different author from a different team.
    let err = engine
        .create_pull_request("pr-1", "Impostor", "u4")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::AlreadyExists {
            resource: Resource::PullRequest
        }
    ));

    // Reviewer rows are exactly the first creation's.
    let after = db::reviewers::reviewer_ids_for_pr(&pool, "pr-1")
        .await
        .unwrap();
    assert_eq!(after, original);
    // No frontend member leaked in.
    assert!(after.iter().all(|id| ["u2", "u3"].contains(&id.as_str())));
}

#[tokio::test]
async fn failed_creation_inserts_nothing() {
    let pool = setup_db().await;
    teams::create_team(
        &pool,
        Team {
            team_name: "backend".to_string(),
            members: vec![member("u1"), member("u2")],
        },
    )
    .await
    .unwrap();

    let engine = AssignmentEngine::with_rng(pool.clone(), StdRng::seed_from_u64(12));

    // Unknown author: fails before the PR insert.
    let err = engine
        .create_pull_request("pr-9", "Ghost", "u99")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));

    let pr = db::pull_requests::get_pull_request(&pool, "pr-9")
        .await
        .unwrap();
    assert!(pr.is_none());
    let rows = db::reviewers::reviewer_ids_for_pr(&pool, "pr-9")
        .await
        .unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn team_creation_is_all_or_nothing() {
    let pool = setup_db().await;
    teams::create_team(
        &pool,
        Team {
            team_name: "backend".to_string(),
            members: vec![member("u1")],
        },
    )
    .await
    .unwrap();

    // Second member collides with an existing user id.
    let err = teams::create_team(
        &pool,
        Team {
            team_name: "frontend".to_string(),
            members: vec![member("u2"), member("u1")],
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

    assert!(!db::teams::team_exists(&pool, "frontend").await.unwrap());
    assert!(!db::users::user_exists(&pool, "u2").await.unwrap());
}
