//! Session statements. Only the token hash is ever stored.

use super::{DataError, DbPool, Session};

pub async fn insert_session(
    pool: &DbPool,
    user_id: &str,
    token_hash: &str,
    expires_at: &str,
) -> Result<String, DataError> {
    let id = uuid::Uuid::new_v4().to_string();
    sqlx::query("INSERT INTO sessions (id, user_id, token_hash, expires_at) VALUES (?, ?, ?, ?)")
        .bind(&id)
        .bind(user_id)
        .bind(token_hash)
        .bind(expires_at)
        .execute(pool)
        .await?;
    Ok(id)
}

pub async fn find_session_by_token_hash(
    pool: &DbPool,
    token_hash: &str,
) -> Result<Option<Session>, DataError> {
    let session = sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE token_hash = ?")
        .bind(token_hash)
        .fetch_optional(pool)
        .await?;
    Ok(session)
}

pub async fn delete_session_by_token_hash(pool: &DbPool, token_hash: &str) -> Result<u64, DataError> {
    let result = sqlx::query("DELETE FROM sessions WHERE token_hash = ?")
        .bind(token_hash)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
