//! Session tokens. The client holds a random bearer token; storage only ever
//! sees its SHA-256.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use sha2::{Digest, Sha256};

use crate::db::{self, DataError, DbPool, Session};

/// A freshly opened session. `token` is the only copy of the bearer secret.
#[derive(Debug, Clone)]
pub struct SessionToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Generate a random token
fn generate_token() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();
    hex::encode(bytes)
}

/// Hash a token for storage
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

pub async fn open_session(
    pool: &DbPool,
    user_id: &str,
    ttl: Duration,
) -> Result<SessionToken, DataError> {
    let token = generate_token();
    let expires_at = Utc::now() + ttl;

    db::insert_session(pool, user_id, &hash_token(&token), &expires_at.to_rfc3339()).await?;

    Ok(SessionToken { token, expires_at })
}

/// Look up the live session for a bearer token. Expired sessions resolve to `None`.
pub async fn resolve_session(pool: &DbPool, token: &str) -> Result<Option<Session>, DataError> {
    let session = db::find_session_by_token_hash(pool, &hash_token(token)).await?;
    Ok(session.filter(|s| !s.is_expired(Utc::now())))
}

pub async fn close_session(pool: &DbPool, token: &str) -> Result<bool, DataError> {
    let removed = db::delete_session_by_token_hash(pool, &hash_token(token)).await?;
    Ok(removed > 0)
}
