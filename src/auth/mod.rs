//! Authentication provider seam.
//!
//! Actions never verify credentials themselves; they call
//! [`AuthProvider::sign_in`] and translate the provider's error kinds into
//! form messages. [`CredentialsProvider`] is the built-in implementation that
//! checks the users table and opens a session.

mod credentials;
pub mod password;
pub mod session;

pub use credentials::CredentialsProvider;
pub use password::{hash_password, verify_password};
pub use session::SessionToken;

use async_trait::async_trait;
use thiserror::Error;

use crate::db::UserResponse;
use crate::schema::FormData;

/// Name the credentials provider is registered under
pub const CREDENTIALS_PROVIDER: &str = "credentials";

/// Error kinds inside the provider's taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    /// Submitted credentials did not match a user
    CredentialsSignin,
    /// The credential check itself failed (e.g. the user lookup errored)
    CallbackRouteError,
    /// Unknown provider or bad provider setup
    Configuration,
    AccessDenied,
}

impl AuthErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CredentialsSignin => "CredentialsSignin",
            Self::CallbackRouteError => "CallbackRouteError",
            Self::Configuration => "Configuration",
            Self::AccessDenied => "AccessDenied",
        }
    }
}

impl std::fmt::Display for AuthErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
#[error("{kind}: {message}")]
pub struct AuthError {
    pub kind: AuthErrorKind,
    pub message: String,
}

impl AuthError {
    pub fn new(kind: AuthErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn credentials() -> Self {
        Self::new(AuthErrorKind::CredentialsSignin, "Invalid credentials")
    }
}

#[derive(Error, Debug)]
pub enum SignInError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Failure outside the provider's taxonomy
    #[error("Sign-in failed: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Result of a successful sign-in
#[derive(Debug, Clone)]
pub struct SignedIn {
    pub user: UserResponse,
    pub session: SessionToken,
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Verify `credentials` with the named provider and establish a session.
    async fn sign_in(&self, provider: &str, credentials: &FormData) -> Result<SignedIn, SignInError>;
}
