//! Session cookie handling for the dashboard routes.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::sync::Arc;

use super::error::ApiError;
use crate::auth::{session, SessionToken};
use crate::config::AuthConfig;
use crate::AppState;

/// Where anonymous dashboard requests are sent
pub const LOGIN_PATH: &str = "/login";

pub fn session_cookie(config: &AuthConfig, session: SessionToken) -> Cookie<'static> {
    Cookie::build((config.cookie_name.clone(), session.token))
        .path("/")
        .http_only(true)
        .secure(config.secure_cookies)
        .same_site(SameSite::Lax)
        .build()
}

fn removal_cookie(config: &AuthConfig) -> Cookie<'static> {
    Cookie::build((config.cookie_name.clone(), "")).path("/").build()
}

/// Only requests carrying a live session reach the dashboard; everyone else
/// is sent to the login page.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = match jar.get(&state.config.auth.cookie_name) {
        Some(cookie) => cookie.value().to_string(),
        None => return Ok(Redirect::to(LOGIN_PATH).into_response()),
    };

    match session::resolve_session(&state.db, &token).await? {
        Some(session) => {
            request.extensions_mut().insert(session);
            Ok(next.run(request).await)
        }
        None => {
            let jar = jar.remove(removal_cookie(&state.config.auth));
            Ok((jar, Redirect::to(LOGIN_PATH)).into_response())
        }
    }
}

/// POST /logout
pub async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(cookie) = jar.get(&state.config.auth.cookie_name) {
        if session::close_session(&state.db, cookie.value()).await? {
            tracing::info!("Session closed");
        }
    }
    let jar = jar.remove(removal_cookie(&state.config.auth));
    Ok((jar, Redirect::to(LOGIN_PATH)))
}
