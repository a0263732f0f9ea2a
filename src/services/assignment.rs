//! Reviewer assignment engine.
//!
//! The engine owns the three mutating PR operations: creation (with random
//! reviewer selection), merge, and reviewer reassignment. Each operation is
//! an atomic, invariant-preserving unit: creation runs inside one database
//! transaction, and merge/reassignment hold the per-PR lock for their whole
//! read-then-write span. The engine itself is stateless apart from the lock
//! registry and the injected random source, and is safely shared across
//! concurrent requests.

use crate::db::pool::DbPool;
use crate::db::{pull_requests, reviewers, users};
use crate::error::{AppError, Resource};
use crate::models::{PrStatus, PullRequest, User};
use crate::services::locks::PrLocks;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::Mutex;

/// Upper bound on reviewers assigned at PR creation.
const MAX_REVIEWERS: usize = 2;

/// Result of a successful PR creation.
#[derive(Debug, Clone)]
pub struct CreatedPullRequest {
    pub pr: PullRequest,
    pub assigned_reviewers: Vec<String>,
}

/// Result of a successful merge (first call or idempotent repeat).
#[derive(Debug, Clone)]
pub struct MergedPullRequest {
    pub pr: PullRequest,
    pub assigned_reviewers: Vec<String>,
}

/// Result of a successful reviewer reassignment.
#[derive(Debug, Clone)]
pub struct ReassignedReviewer {
    pub pr: PullRequest,
    pub assigned_reviewers: Vec<String>,
    pub replaced_by: String,
}

/// The reviewer assignment engine.
///
/// Holds the connection pool, the per-PR lock registry and the random source
/// used for reviewer draws. The random source is injected (seedable via
/// [`AssignmentEngine::with_rng`]) so tests can pin the selection.
pub struct AssignmentEngine {
    pool: DbPool,
    locks: PrLocks,
    rng: Mutex<StdRng>,
}

impl AssignmentEngine {
    pub fn new(pool: DbPool) -> Self {
        Self::with_rng(pool, StdRng::from_entropy())
    }

    /// Build an engine with a caller-provided random source.
    pub fn with_rng(pool: DbPool, rng: StdRng) -> Self {
        Self {
            pool,
            locks: PrLocks::new(),
            rng: Mutex::new(rng),
        }
    }

    /// Create a pull request and assign up to two random reviewers.
    ///
    /// Reviewers are drawn uniformly without replacement from the author's
    /// team, excluding the author and inactive members. Zero eligible
    /// candidates is a valid outcome (solo authors are tolerated).
    ///
    /// The PR row and its reviewer rows become visible as a single unit:
    /// everything runs inside one transaction, and any failure after the PR
    /// insert rolls the insert back.
    pub async fn create_pull_request(
        &self,
        pull_request_id: &str,
        pull_request_name: &str,
        author_id: &str,
    ) -> Result<CreatedPullRequest, AppError> {
        log::info!("creating pull request {pull_request_id}");

        let mut tx = self.pool.begin().await?;

        let author = users::get_user_by_id(&mut *tx, author_id)
            .await?
            .ok_or_else(|| {
                log::warn!("author {author_id} not found");
                AppError::not_found_with_id("User", author_id)
            })?;

        let team = users::get_users_by_team(&mut *tx, &author.team_name).await?;
        let mut candidates = creation_candidates(team, author_id);

        let pr = PullRequest {
            pull_request_id: pull_request_id.to_string(),
            pull_request_name: pull_request_name.to_string(),
            author_id: author_id.to_string(),
            status: PrStatus::Open,
            created_at: Utc::now(),
            merged_at: None,
        };

        if let Err(err) = pull_requests::insert_pull_request(&mut *tx, &pr).await {
            if AppError::is_unique_violation(&err) {
                log::warn!("pull request {pull_request_id} already exists");
                return Err(AppError::AlreadyExists {
                    resource: Resource::PullRequest,
                });
            }
            return Err(err.into());
        }

        let count = candidates.len().min(MAX_REVIEWERS);
        let assigned = {
            let mut rng = self.rng.lock().await;
            draw_without_replacement(&mut candidates, count, &mut *rng)
        };

        for user_id in &assigned {
            reviewers::insert_reviewer(&mut *tx, pull_request_id, user_id).await?;
        }

        tx.commit().await?;

        log::info!(
            "created pull request {pull_request_id} with {} reviewer(s)",
            assigned.len()
        );

        Ok(CreatedPullRequest {
            pr,
            assigned_reviewers: assigned,
        })
    }

    /// Merge a pull request.
    ///
    /// Refused with `NoReviewers` while the PR has no reviewer rows,
    /// regardless of status. Merging an already-merged PR is an idempotent
    /// no-op that returns the stored record unchanged.
    pub async fn merge_pull_request(
        &self,
        pull_request_id: &str,
    ) -> Result<MergedPullRequest, AppError> {
        log::info!("merging pull request {pull_request_id}");

        // Serialize against other merges/reassignments of this PR.
        let lock = self.locks.lock_for(pull_request_id);
        let _guard = lock.lock().await;

        let pr = pull_requests::get_pull_request(&self.pool, pull_request_id)
            .await?
            .ok_or_else(|| AppError::not_found_with_id("PullRequest", pull_request_id))?;

        let assigned = reviewers::reviewer_ids_for_pr(&self.pool, pull_request_id).await?;
        if assigned.is_empty() {
            log::warn!("pull request {pull_request_id} has no reviewers, refusing merge");
            return Err(AppError::NoReviewers);
        }

        let pr = if pr.status != PrStatus::Merged {
            let merged_at = Utc::now();
            pull_requests::set_merged(&self.pool, pull_request_id, merged_at).await?;
            PullRequest {
                status: PrStatus::Merged,
                merged_at: Some(merged_at),
                ..pr
            }
        } else {
            // Already merged: return the stored snapshot untouched.
            pr
        };

        Ok(MergedPullRequest {
            pr,
            assigned_reviewers: assigned,
        })
    }

    /// Replace one reviewer of an open pull request with a random teammate.
    ///
    /// When the PR has reviewers, `old_reviewer_id` must be one of them and
    /// is swapped in place; the peer reviewer is never displaced. When the
    /// PR has none, the membership check is skipped and the operation adds a
    /// first reviewer instead (in that case `old_reviewer_id` itself stays
    /// eligible). Reassignment never grows a one-reviewer set to two.
    pub async fn reassign_reviewer(
        &self,
        pull_request_id: &str,
        old_reviewer_id: &str,
    ) -> Result<ReassignedReviewer, AppError> {
        log::info!("reassigning reviewer {old_reviewer_id} on pull request {pull_request_id}");

        let lock = self.locks.lock_for(pull_request_id);
        let _guard = lock.lock().await;

        let pr = pull_requests::get_pull_request(&self.pool, pull_request_id)
            .await?
            .ok_or_else(|| AppError::not_found_with_id("PullRequest", pull_request_id))?;

        if !users::user_exists(&self.pool, old_reviewer_id).await? {
            log::warn!("reviewer {old_reviewer_id} not found");
            return Err(AppError::not_found_with_id("User", old_reviewer_id));
        }

        if pr.status == PrStatus::Merged {
            log::warn!("cannot reassign reviewer on merged PR {pull_request_id}");
            return Err(AppError::PrMerged);
        }

        let current = reviewers::reviewer_ids_for_pr(&self.pool, pull_request_id).await?;
        let had_reviewers = !current.is_empty();

        if had_reviewers && !current.iter().any(|id| id == old_reviewer_id) {
            log::warn!("reviewer {old_reviewer_id} is not assigned to {pull_request_id}");
            return Err(AppError::NotAssigned {
                reviewer_id: old_reviewer_id.to_string(),
            });
        }

        let author = users::get_user_by_id(&self.pool, &pr.author_id)
            .await?
            .ok_or_else(|| AppError::not_found_with_id("User", &pr.author_id))?;
        let team = users::get_users_by_team(&self.pool, &author.team_name).await?;

        let candidates =
            replacement_candidates(team, &pr.author_id, old_reviewer_id, &current, had_reviewers);
        if candidates.is_empty() {
            log::warn!("no replacement candidate for {old_reviewer_id} on {pull_request_id}");
            return Err(AppError::NoCandidate);
        }

        let new_reviewer_id = {
            let mut rng = self.rng.lock().await;
            let idx = rng.gen_range(0..candidates.len());
            candidates[idx].clone()
        };

        if had_reviewers {
            reviewers::replace_reviewer(
                &self.pool,
                pull_request_id,
                old_reviewer_id,
                &new_reviewer_id,
            )
            .await?;
        } else {
            // Nothing to update; the PR gains its first reviewer.
            reviewers::insert_reviewer(&self.pool, pull_request_id, &new_reviewer_id).await?;
        }

        let assigned = reviewers::reviewer_ids_for_pr(&self.pool, pull_request_id).await?;

        log::info!("replaced reviewer {old_reviewer_id} with {new_reviewer_id} on {pull_request_id}");

        Ok(ReassignedReviewer {
            pr,
            assigned_reviewers: assigned,
            replaced_by: new_reviewer_id,
        })
    }
}

/// Candidate pool for PR creation: the author's teammates, minus the author
/// and minus inactive members.
fn creation_candidates(team: Vec<User>, author_id: &str) -> Vec<String> {
    team.into_iter()
        .filter(|u| u.user_id != author_id && u.is_active)
        .map(|u| u.user_id)
        .collect()
}

/// Candidate pool for reassignment.
///
/// Excludes the author, inactive members, the outgoing reviewer (only when
/// the PR actually had reviewers) and every other currently assigned
/// reviewer, so the peer is neither displaced nor duplicated.
fn replacement_candidates(
    team: Vec<User>,
    author_id: &str,
    old_reviewer_id: &str,
    current: &[String],
    had_reviewers: bool,
) -> Vec<String> {
    team.into_iter()
        .filter(|u| u.user_id != author_id && u.is_active)
        .filter(|u| !(had_reviewers && u.user_id == old_reviewer_id))
        .filter(|u| {
            !current
                .iter()
                .any(|assigned| *assigned == u.user_id && assigned != old_reviewer_id)
        })
        .map(|u| u.user_id)
        .collect()
}

/// Draw `count` entries uniformly without replacement: pick a random index,
/// remove it, repeat.
fn draw_without_replacement(
    pool: &mut Vec<String>,
    count: usize,
    rng: &mut impl Rng,
) -> Vec<String> {
    let mut picked = Vec::with_capacity(count);
    for _ in 0..count {
        let idx = rng.gen_range(0..pool.len());
        picked.push(pool.remove(idx));
    }
    picked
}
