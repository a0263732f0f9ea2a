//! REST API routes.
//!
//! Handlers validate request bodies syntactically, call exactly one service
//! operation, and translate `AppError` into a structured `{code, message}`
//! error body with the matching HTTP status.

use crate::db::pool::DbPool;
use crate::error::{AppError, Resource};
use crate::models::{PrStatus, Team};
use crate::services::{teams, users, AssignmentEngine};
use crate::validate;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Shared state for the axum routes.
#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub engine: Arc<AssignmentEngine>,
}

// ── Error handling ───────────────────────────────────────────────────────────

/// JSON error body: `{"error": {"code", "message"}}`.
#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

/// Wrapper to make AppError usable as an axum error response.
pub struct ApiErr(AppError);

/// Map a domain error to its HTTP status and stable error code.
///
/// Conflict-class errors all map to 409; validation to 400; unexpected
/// store failures to 500.
fn status_and_code(err: &AppError) -> (StatusCode, &'static str) {
    match err {
        AppError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        AppError::AlreadyExists { resource } => {
            let code = match resource {
                Resource::PullRequest => "PR_EXISTS",
                Resource::Team => "TEAM_EXISTS",
                Resource::User => "USER_EXISTS",
            };
            (StatusCode::CONFLICT, code)
        }
        AppError::NoReviewers => (StatusCode::CONFLICT, "NO_REVIEWERS"),
        AppError::PrMerged => (StatusCode::CONFLICT, "PR_MERGED"),
        AppError::NotAssigned { .. } => (StatusCode::CONFLICT, "NOT_ASSIGNED"),
        AppError::NoCandidate => (StatusCode::CONFLICT, "NO_CANDIDATE"),
        AppError::InvalidInput { .. } => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
        AppError::Database { .. } | AppError::Internal { .. } => {
            (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
        }
    }
}

impl IntoResponse for ApiErr {
    fn into_response(self) -> Response {
        let (status, code) = status_and_code(&self.0);
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            log::error!("request failed: {}", self.0);
        }
        (
            status,
            Json(ErrorBody {
                error: ErrorDetail {
                    code: code.to_string(),
                    message: self.0.to_string(),
                },
            }),
        )
            .into_response()
    }
}

impl From<AppError> for ApiErr {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

/// Reject a request when validation collected any field errors.
fn reject_invalid(errors: Vec<validate::FieldError>) -> Result<(), ApiErr> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiErr(AppError::invalid_input(validate::describe(&errors))))
    }
}

// ── Wire types ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreatePullRequestBody {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
}

#[derive(Deserialize)]
pub struct PullRequestIdBody {
    pub pull_request_id: String,
}

#[derive(Deserialize)]
pub struct ReassignBody {
    pub pull_request_id: String,
    pub old_reviewer_id: String,
}

#[derive(Deserialize)]
pub struct SetIsActiveBody {
    pub user_id: String,
    pub is_active: bool,
}

#[derive(Deserialize)]
struct TeamQuery {
    team_name: String,
}

#[derive(Deserialize)]
struct UserQuery {
    user_id: String,
}

/// PR snapshot returned by all three mutating PR endpoints.
#[derive(Serialize)]
pub struct PrBody {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
    pub status: PrStatus,
    pub assigned_reviewers: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merged_at: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
pub struct PrResponse {
    pub pr: PrBody,
}

#[derive(Serialize)]
pub struct ReassignResponse {
    pub pr: PrBody,
    pub replaced_by: String,
}

#[derive(Serialize)]
pub struct TeamResponse {
    pub team: Team,
}

#[derive(Serialize)]
pub struct UserResponse {
    pub user: crate::models::User,
}

#[derive(Serialize)]
pub struct UserReviewsResponse {
    pub user_id: String,
    pub pull_requests: Vec<String>,
}

// ── Route builder ────────────────────────────────────────────────────────────

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/team/add", post(add_team))
        .route("/team/get", get(get_team))
        .route("/pullRequest/create", post(create_pull_request))
        .route("/pullRequest/merge", post(merge_pull_request))
        .route("/pullRequest/reassign", post(reassign_reviewer))
        .route("/users/setIsActive", post(set_is_active))
        .route("/users/getReview", get(get_reviews))
        .with_state(state)
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /team/add — create a team with its members.
async fn add_team(
    State(state): State<AppState>,
    Json(team): Json<Team>,
) -> Result<(StatusCode, Json<TeamResponse>), ApiErr> {
    reject_invalid(validate::create_team(&team.team_name, &team.members))?;

    let team = teams::create_team(&state.db, team).await?;
    Ok((StatusCode::CREATED, Json(TeamResponse { team })))
}

/// GET /team/get?team_name= — fetch a team and its members.
async fn get_team(
    State(state): State<AppState>,
    Query(query): Query<TeamQuery>,
) -> Result<Json<TeamResponse>, ApiErr> {
    reject_invalid(validate::team_name(&query.team_name))?;

    let team = teams::get_team(&state.db, &query.team_name).await?;
    Ok(Json(TeamResponse { team }))
}

/// POST /pullRequest/create — create a PR and auto-assign reviewers.
async fn create_pull_request(
    State(state): State<AppState>,
    Json(body): Json<CreatePullRequestBody>,
) -> Result<(StatusCode, Json<PrResponse>), ApiErr> {
    reject_invalid(validate::create_pull_request(
        &body.pull_request_id,
        &body.pull_request_name,
        &body.author_id,
    ))?;

    let created = state
        .engine
        .create_pull_request(&body.pull_request_id, &body.pull_request_name, &body.author_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(PrResponse {
            pr: pr_body(created.pr, created.assigned_reviewers),
        }),
    ))
}

/// POST /pullRequest/merge — transition a PR to MERGED.
async fn merge_pull_request(
    State(state): State<AppState>,
    Json(body): Json<PullRequestIdBody>,
) -> Result<Json<PrResponse>, ApiErr> {
    reject_invalid(validate::merge_pull_request(&body.pull_request_id))?;

    let merged = state.engine.merge_pull_request(&body.pull_request_id).await?;

    Ok(Json(PrResponse {
        pr: pr_body(merged.pr, merged.assigned_reviewers),
    }))
}

/// POST /pullRequest/reassign — replace one reviewer with a random teammate.
async fn reassign_reviewer(
    State(state): State<AppState>,
    Json(body): Json<ReassignBody>,
) -> Result<Json<ReassignResponse>, ApiErr> {
    reject_invalid(validate::reassign_reviewer(
        &body.pull_request_id,
        &body.old_reviewer_id,
    ))?;

    let result = state
        .engine
        .reassign_reviewer(&body.pull_request_id, &body.old_reviewer_id)
        .await?;

    Ok(Json(ReassignResponse {
        pr: pr_body(result.pr, result.assigned_reviewers),
        replaced_by: result.replaced_by,
    }))
}

/// POST /users/setIsActive — toggle a user's active flag.
async fn set_is_active(
    State(state): State<AppState>,
    Json(body): Json<SetIsActiveBody>,
) -> Result<Json<UserResponse>, ApiErr> {
    reject_invalid(validate::user_id(&body.user_id))?;

    let user = users::set_is_active(&state.db, &body.user_id, body.is_active).await?;
    Ok(Json(UserResponse { user }))
}

/// GET /users/getReview?user_id= — list OPEN PRs the user reviews.
async fn get_reviews(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<UserReviewsResponse>, ApiErr> {
    reject_invalid(validate::user_id(&query.user_id))?;

    let pull_requests = users::open_reviews(&state.db, &query.user_id).await?;
    Ok(Json(UserReviewsResponse {
        user_id: query.user_id,
        pull_requests,
    }))
}

fn pr_body(pr: crate::models::PullRequest, assigned_reviewers: Vec<String>) -> PrBody {
    PrBody {
        pull_request_id: pr.pull_request_id,
        pull_request_name: pr.pull_request_name,
        author_id: pr.author_id,
        status: pr.status,
        assigned_reviewers,
        merged_at: pr.merged_at,
    }
}
