//! Database queries for teams.

use sqlx::Sqlite;

/// Insert a team. Fails with a unique violation on a duplicate name.
pub async fn insert_team<'e, E>(executor: E, team_name: &str) -> Result<(), sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query("INSERT INTO teams (team_name) VALUES (?)")
        .bind(team_name)
        .execute(executor)
        .await?;

    Ok(())
}

/// Check whether a team exists.
pub async fn team_exists<'e, E>(executor: E, team_name: &str) -> Result<bool, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let row: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM teams WHERE team_name = ?")
        .bind(team_name)
        .fetch_optional(executor)
        .await?;

    Ok(row.is_some())
}
