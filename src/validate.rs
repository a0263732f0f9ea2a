//! Request body validation.
//!
//! Pure functions that collect field errors per call. Nothing here touches
//! the database or shares state between requests; handlers run the relevant
//! check and reject the request when the returned list is non-empty.

use once_cell::sync::Lazy;
use regex::Regex;

/// Column width shared by all TEXT id/name columns.
const MAX_FIELD_LEN: usize = 255;

static USER_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^u\d+$").expect("valid regex"));
static PR_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^pr-\d+$").expect("valid regex"));

/// One rejected field with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl FieldError {
    fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

/// Render a field-error list as a single message for the error body.
pub fn describe(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

fn check_user_id(field: &'static str, id: &str, out: &mut Vec<FieldError>) {
    if id.is_empty() {
        out.push(FieldError::new(field, "must not be empty"));
    } else if !USER_ID_RE.is_match(id) {
        out.push(FieldError::new(field, "must match u<digits>"));
    } else if id.chars().count() > MAX_FIELD_LEN {
        out.push(FieldError::new(field, "is too long"));
    }
}

fn check_pr_id(field: &'static str, id: &str, out: &mut Vec<FieldError>) {
    if id.is_empty() {
        out.push(FieldError::new(field, "must not be empty"));
    } else if !PR_ID_RE.is_match(id) {
        out.push(FieldError::new(field, "must match pr-<digits>"));
    } else if id.chars().count() > MAX_FIELD_LEN {
        out.push(FieldError::new(field, "is too long"));
    }
}

fn check_name(field: &'static str, name: &str, out: &mut Vec<FieldError>) {
    if name.is_empty() {
        out.push(FieldError::new(field, "must not be empty"));
    } else if name.chars().count() > MAX_FIELD_LEN {
        out.push(FieldError::new(field, "is too long"));
    }
}

/// Validate a PR creation request.
pub fn create_pull_request(
    pull_request_id: &str,
    pull_request_name: &str,
    author_id: &str,
) -> Vec<FieldError> {
    let mut errors = Vec::new();
    check_pr_id("pull_request_id", pull_request_id, &mut errors);
    check_name("pull_request_name", pull_request_name, &mut errors);
    check_user_id("author_id", author_id, &mut errors);
    errors
}

/// Validate a merge request body (PR id only).
pub fn merge_pull_request(pull_request_id: &str) -> Vec<FieldError> {
    let mut errors = Vec::new();
    check_pr_id("pull_request_id", pull_request_id, &mut errors);
    errors
}

/// Validate a reviewer reassignment request.
pub fn reassign_reviewer(pull_request_id: &str, old_reviewer_id: &str) -> Vec<FieldError> {
    let mut errors = Vec::new();
    check_pr_id("pull_request_id", pull_request_id, &mut errors);
    check_user_id("old_reviewer_id", old_reviewer_id, &mut errors);
    errors
}

/// Validate a team creation request, members included.
pub fn create_team(team_name: &str, members: &[crate::models::TeamMember]) -> Vec<FieldError> {
    let mut errors = Vec::new();
    check_name("team_name", team_name, &mut errors);
    for member in members {
        check_user_id("members.user_id", &member.user_id, &mut errors);
        check_name("members.username", &member.username, &mut errors);
    }
    errors
}

/// Validate a team name query parameter.
pub fn team_name(team_name: &str) -> Vec<FieldError> {
    let mut errors = Vec::new();
    check_name("team_name", team_name, &mut errors);
    errors
}

/// Validate a user id (query parameter or activation body).
pub fn user_id(user_id: &str) -> Vec<FieldError> {
    let mut errors = Vec::new();
    check_user_id("user_id", user_id, &mut errors);
    errors
}
