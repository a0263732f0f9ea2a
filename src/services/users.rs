//! User management service: activation flag and review listing.

use crate::db::pool::DbPool;
use crate::db::{reviewers, users};
use crate::error::AppError;
use crate::models::User;

/// Toggle a user's active flag.
///
/// The write is skipped when the stored value already matches. Deactivation
/// only affects future candidate pools; existing reviewer rows stay.
pub async fn set_is_active(
    pool: &DbPool,
    user_id: &str,
    is_active: bool,
) -> Result<User, AppError> {
    let mut user = users::get_user_by_id(pool, user_id)
        .await?
        .ok_or_else(|| AppError::not_found_with_id("User", user_id))?;

    if user.is_active != is_active {
        users::set_is_active(pool, user_id, is_active).await?;
        user.is_active = is_active;
        log::info!("user {user_id} active flag set to {is_active}");
    }

    Ok(user)
}

/// List the OPEN pull requests a user currently reviews.
pub async fn open_reviews(pool: &DbPool, user_id: &str) -> Result<Vec<String>, AppError> {
    if !users::user_exists(pool, user_id).await? {
        return Err(AppError::not_found_with_id("User", user_id));
    }

    Ok(reviewers::open_pr_ids_for_user(pool, user_id).await?)
}
