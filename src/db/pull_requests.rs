//! Database queries for pull requests.

use crate::models::PullRequest;
use chrono::{DateTime, Utc};
use sqlx::Sqlite;

/// Insert a pull request row. Fails with a unique violation on a duplicate id.
///
/// The row is inserted with whatever status the model carries; the engine
/// always creates PRs as `Open`.
pub async fn insert_pull_request<'e, E>(executor: E, pr: &PullRequest) -> Result<(), sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO pull_requests
            (pull_request_id, pull_request_name, author_id, status, created_at, merged_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&pr.pull_request_id)
    .bind(&pr.pull_request_name)
    .bind(&pr.author_id)
    .bind(pr.status)
    .bind(pr.created_at)
    .bind(pr.merged_at)
    .execute(executor)
    .await?;

    Ok(())
}

/// Look up a pull request by id.
pub async fn get_pull_request<'e, E>(
    executor: E,
    pull_request_id: &str,
) -> Result<Option<PullRequest>, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, PullRequest>(
        r#"
        SELECT pull_request_id, pull_request_name, author_id, status, created_at, merged_at
        FROM pull_requests
        WHERE pull_request_id = ?
        "#,
    )
    .bind(pull_request_id)
    .fetch_optional(executor)
    .await
}

/// Mark a pull request as merged at the given instant.
pub async fn set_merged<'e, E>(
    executor: E,
    pull_request_id: &str,
    merged_at: DateTime<Utc>,
) -> Result<(), sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query("UPDATE pull_requests SET status = 'MERGED', merged_at = ? WHERE pull_request_id = ?")
        .bind(merged_at)
        .bind(pull_request_id)
        .execute(executor)
        .await?;

    Ok(())
}
