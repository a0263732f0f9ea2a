//! Database queries for the PR↔reviewer relation.

use sqlx::Sqlite;

/// Insert a reviewer row for a pull request.
pub async fn insert_reviewer<'e, E>(
    executor: E,
    pull_request_id: &str,
    user_id: &str,
) -> Result<(), sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query("INSERT INTO reviewers (pull_request_id, user_id) VALUES (?, ?)")
        .bind(pull_request_id)
        .bind(user_id)
        .execute(executor)
        .await?;

    Ok(())
}

/// List reviewer ids currently assigned to a pull request.
pub async fn reviewer_ids_for_pr<'e, E>(
    executor: E,
    pull_request_id: &str,
) -> Result<Vec<String>, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let rows: Vec<(String,)> =
        sqlx::query_as("SELECT user_id FROM reviewers WHERE pull_request_id = ? ORDER BY user_id")
            .bind(pull_request_id)
            .fetch_all(executor)
            .await?;

    Ok(rows.into_iter().map(|(id,)| id).collect())
}

/// Replace one reviewer of a PR in place.
///
/// This is an UPDATE of the matching row, not delete+insert, so the peer
/// reviewer (if any) is untouched.
pub async fn replace_reviewer<'e, E>(
    executor: E,
    pull_request_id: &str,
    old_user_id: &str,
    new_user_id: &str,
) -> Result<(), sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query("UPDATE reviewers SET user_id = ? WHERE pull_request_id = ? AND user_id = ?")
        .bind(new_user_id)
        .bind(pull_request_id)
        .bind(old_user_id)
        .execute(executor)
        .await?;

    Ok(())
}

/// List ids of OPEN pull requests the user is currently reviewing.
pub async fn open_pr_ids_for_user<'e, E>(
    executor: E,
    user_id: &str,
) -> Result<Vec<String>, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let rows: Vec<(String,)> = sqlx::query_as(
        r#"
        SELECT reviewers.pull_request_id
        FROM reviewers
        JOIN pull_requests ON reviewers.pull_request_id = pull_requests.pull_request_id
        WHERE reviewers.user_id = ? AND pull_requests.status = 'OPEN'
        ORDER BY reviewers.pull_request_id
        "#,
    )
    .bind(user_id)
    .fetch_all(executor)
    .await?;

    Ok(rows.into_iter().map(|(id,)| id).collect())
}
