//! End-to-end assignment workflows against a real on-disk database.
//!
//! These tests drive the engine the way the HTTP layer does: seed teams
//! through the team service, then walk PRs through creation, merge and
//! reassignment, checking the reviewer-set invariants at each step.

use pr_service::db;
use pr_service::db::pool::DbPool;
use pr_service::error::AppError;
use pr_service::models::{PrStatus, Team, TeamMember};
use pr_service::services::{assignment::AssignmentEngine, teams, users};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::tempdir;

async fn setup_db() -> DbPool {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("test.db");
    std::mem::forget(dir);

    db::initialize(&db_path).await.unwrap()
}

fn member(id: &str, active: bool) -> TeamMember {
    TeamMember {
        user_id: id.to_string(),
        username: format!("user {id}"),
        is_active: active,
    }
}

async fn seed_team(pool: &DbPool, name: &str, members: Vec<TeamMember>) {
    teams::create_team(
        pool,
        Team {
            team_name: name.to_string(),
            members,
        },
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn full_lifecycle_create_merge_reassign() {
    let pool = setup_db().await;
    seed_team(
        &pool,
        "backend",
        vec![member("u1", true), member("u2", true), member("u3", true)],
    )
    .await;

    let engine = AssignmentEngine::with_rng(pool.clone(), StdRng::seed_from_u64(1));

    // Create: both active teammates become reviewers.
    let created = engine
        .create_pull_request("pr-1", "Add pagination", "u1")
        .await
        .unwrap();
    assert_eq!(created.pr.status, PrStatus::Open);
    let mut assigned = created.assigned_reviewers.clone();
    assigned.sort();
    assert_eq!(assigned, vec!["u2".to_string(), "u3".to_string()]);

    // Both reviewers see the PR in their open-review list.
    assert_eq!(users::open_reviews(&pool, "u2").await.unwrap(), vec!["pr-1"]);
    assert_eq!(users::open_reviews(&pool, "u3").await.unwrap(), vec!["pr-1"]);

    // Merge: status flips, reviewers unchanged.
    let merged = engine.merge_pull_request("pr-1").await.unwrap();
    assert_eq!(merged.pr.status, PrStatus::Merged);
    assert!(merged.pr.merged_at.is_some());
    let mut after_merge = merged.assigned_reviewers.clone();
    after_merge.sort();
    assert_eq!(after_merge, assigned);

    // Merged PRs drop out of the open-review list.
    assert!(users::open_reviews(&pool, "u2").await.unwrap().is_empty());

    // Reassign on a merged PR is refused.
    let err = engine.reassign_reviewer("pr-1", "u2").await.unwrap_err();
    assert!(matches!(err, AppError::PrMerged));
}

#[tokio::test]
async fn solo_author_pr_cannot_merge() {
    let pool = setup_db().await;
    seed_team(&pool, "solo", vec![member("u0", true)]).await;

    let engine = AssignmentEngine::with_rng(pool.clone(), StdRng::seed_from_u64(2));

    let created = engine
        .create_pull_request("pr-2", "One-person show", "u0")
        .await
        .unwrap();
    assert!(created.assigned_reviewers.is_empty());

    let err = engine.merge_pull_request("pr-2").await.unwrap_err();
    assert!(matches!(err, AppError::NoReviewers));

    // Creation still succeeded and the PR is still OPEN.
    let pr = pr_service::db::pull_requests::get_pull_request(&pool, "pr-2")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(pr.status, PrStatus::Open);
}

#[tokio::test]
async fn deactivated_user_is_skipped_for_new_assignments() {
    let pool = setup_db().await;
    seed_team(
        &pool,
        "backend",
        vec![member("u1", true), member("u2", true), member("u3", true)],
    )
    .await;

    users::set_is_active(&pool, "u3", false).await.unwrap();

    let engine = AssignmentEngine::with_rng(pool.clone(), StdRng::seed_from_u64(3));
    let created = engine
        .create_pull_request("pr-1", "No u3 here", "u1")
        .await
        .unwrap();

    assert_eq!(created.assigned_reviewers, vec!["u2".to_string()]);
}

#[tokio::test]
async fn reassignment_never_exceeds_two_reviewers() {
    let pool = setup_db().await;
    seed_team(
        &pool,
        "backend",
        vec![
            member("u1", true),
            member("u2", true),
            member("u3", true),
            member("u4", true),
            member("u5", true),
        ],
    )
    .await;

    let engine = AssignmentEngine::with_rng(pool.clone(), StdRng::seed_from_u64(4));
    let created = engine
        .create_pull_request("pr-1", "Churn", "u1")
        .await
        .unwrap();
    assert_eq!(created.assigned_reviewers.len(), 2);

    // Repeated reassignments keep the set at exactly two.
    let mut old = created.assigned_reviewers[0].clone();
    for _ in 0..4 {
        let result = engine.reassign_reviewer("pr-1", &old).await.unwrap();
        assert_eq!(result.assigned_reviewers.len(), 2);
        assert!(result.assigned_reviewers.contains(&result.replaced_by));
        old = result.replaced_by;
    }
}

#[tokio::test]
async fn concurrent_reassignments_on_same_pr_stay_consistent() {
    let pool = setup_db().await;
    seed_team(
        &pool,
        "backend",
        vec![
            member("u1", true),
            member("u2", true),
            member("u3", true),
            member("u4", true),
            member("u5", true),
            member("u6", true),
        ],
    )
    .await;

    let engine = std::sync::Arc::new(AssignmentEngine::with_rng(
        pool.clone(),
        StdRng::seed_from_u64(5),
    ));
    let created = engine
        .create_pull_request("pr-1", "Race", "u1")
        .await
        .unwrap();

    // Two tasks race to replace the same reviewer. The per-PR lock forces
    // one to observe the other's result: exactly one may succeed, the loser
    // fails NotAssigned (the target was already swapped out), and the set
    // never exceeds two rows.
    let old = created.assigned_reviewers[0].clone();
    let a = tokio::spawn({
        let engine = engine.clone();
        let old = old.clone();
        async move { engine.reassign_reviewer("pr-1", &old).await }
    });
    let b = tokio::spawn({
        let engine = engine.clone();
        let old = old.clone();
        async move { engine.reassign_reviewer("pr-1", &old).await }
    });

    let results = [a.await.unwrap(), b.await.unwrap()];
    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one racer must win");
    for r in &results {
        if let Err(err) = r {
            assert!(matches!(err, AppError::NotAssigned { .. }));
        }
    }

    let final_set = pr_service::db::reviewers::reviewer_ids_for_pr(&pool, "pr-1")
        .await
        .unwrap();
    assert_eq!(final_set.len(), 2);
    assert!(!final_set.contains(&old));
}

#[tokio::test]
async fn operations_on_different_prs_run_in_parallel() {
    let pool = setup_db().await;
    seed_team(
        &pool,
        "backend",
        vec![member("u1", true), member("u2", true), member("u3", true)],
    )
    .await;

    let engine = std::sync::Arc::new(AssignmentEngine::with_rng(
        pool.clone(),
        StdRng::seed_from_u64(6),
    ));

    engine
        .create_pull_request("pr-1", "First", "u1")
        .await
        .unwrap();
    engine
        .create_pull_request("pr-2", "Second", "u2")
        .await
        .unwrap();

    let a = tokio::spawn({
        let engine = engine.clone();
        async move { engine.merge_pull_request("pr-1").await }
    });
    let b = tokio::spawn({
        let engine = engine.clone();
        async move { engine.merge_pull_request("pr-2").await }
    });

    assert!(a.await.unwrap().is_ok());
    assert!(b.await.unwrap().is_ok());
}
