use async_trait::async_trait;
use chrono::Duration;
use tracing::{debug, info};

use super::{
    session, verify_password, AuthError, AuthErrorKind, AuthProvider, SignInError, SignedIn,
    CREDENTIALS_PROVIDER,
};
use crate::db::{self, DbPool, UserResponse};
use crate::schema::{parse_credentials_form, FormData};

/// Email + password provider backed by the users table
pub struct CredentialsProvider {
    db: DbPool,
    session_ttl: Duration,
}

impl CredentialsProvider {
    pub fn new(db: DbPool, session_ttl: Duration) -> Self {
        Self { db, session_ttl }
    }
}

#[async_trait]
impl AuthProvider for CredentialsProvider {
    async fn sign_in(&self, provider: &str, credentials: &FormData) -> Result<SignedIn, SignInError> {
        if provider != CREDENTIALS_PROVIDER {
            return Err(AuthError::new(
                AuthErrorKind::Configuration,
                format!("Unknown auth provider: {}", provider),
            )
            .into());
        }

        let credentials = match parse_credentials_form(credentials) {
            Ok(c) => c,
            Err(_) => {
                debug!("Rejected malformed credentials");
                return Err(AuthError::credentials().into());
            }
        };

        let user = db::find_user_by_email(&self.db, &credentials.email)
            .await
            .map_err(|e| AuthError::new(AuthErrorKind::CallbackRouteError, e.to_string()))?;

        let user = match user {
            Some(user) if verify_password(&credentials.password, &user.password) => user,
            _ => {
                debug!(email = %credentials.email, "Credentials did not match");
                return Err(AuthError::credentials().into());
            }
        };

        let session = session::open_session(&self.db, &user.id, self.session_ttl)
            .await
            .map_err(|e| anyhow::Error::new(e).context("Failed to persist session"))?;

        info!(user_id = %user.id, "User signed in");

        Ok(SignedIn {
            user: UserResponse::from(user),
            session,
        })
    }
}
