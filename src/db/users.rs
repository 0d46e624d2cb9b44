//! User statements.

use super::{DataError, DbPool, NewUser, User};

pub async fn find_user_by_email(pool: &DbPool, email: &str) -> Result<Option<User>, DataError> {
    let user = sqlx::query_as::<_, User>("SELECT id, name, email, password FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

/// Insert a user row. A duplicate email surfaces as `DataError::Conflict`.
pub async fn insert_user(pool: &DbPool, user: &NewUser) -> Result<(), DataError> {
    sqlx::query("INSERT INTO users (email, name, password) VALUES (?, ?, ?)")
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.password_hash)
        .execute(pool)
        .await?;
    Ok(())
}

#[cfg(test)]
pub async fn count_users(pool: &DbPool) -> Result<i64, DataError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
