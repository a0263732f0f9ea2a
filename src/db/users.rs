//! Database queries for users (the directory).
//!
//! All functions are generic over a sqlx executor so callers decide whether
//! a query runs on the pool directly or inside a transaction they control.

use crate::models::User;
use sqlx::Sqlite;

/// Look up a user by id.
pub async fn get_user_by_id<'e, E>(executor: E, user_id: &str) -> Result<Option<User>, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, User>(
        "SELECT user_id, username, team_name, is_active FROM users WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_optional(executor)
    .await
}

/// List every user on a team, active or not.
pub async fn get_users_by_team<'e, E>(executor: E, team_name: &str) -> Result<Vec<User>, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, User>(
        "SELECT user_id, username, team_name, is_active FROM users WHERE team_name = ? ORDER BY user_id",
    )
    .bind(team_name)
    .fetch_all(executor)
    .await
}

/// Check whether a user id exists.
pub async fn user_exists<'e, E>(executor: E, user_id: &str) -> Result<bool, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let row: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM users WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(executor)
        .await?;

    Ok(row.is_some())
}

/// Insert a user. Fails with a unique violation on a duplicate id.
pub async fn insert_user<'e, E>(executor: E, user: &User) -> Result<(), sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query("INSERT INTO users (user_id, username, team_name, is_active) VALUES (?, ?, ?, ?)")
        .bind(&user.user_id)
        .bind(&user.username)
        .bind(&user.team_name)
        .bind(user.is_active)
        .execute(executor)
        .await?;

    Ok(())
}

/// Update the active flag of a user.
pub async fn set_is_active<'e, E>(
    executor: E,
    user_id: &str,
    is_active: bool,
) -> Result<(), sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query("UPDATE users SET is_active = ? WHERE user_id = ?")
        .bind(is_active)
        .bind(user_id)
        .execute(executor)
        .await?;

    Ok(())
}
