//! Form endpoints. Each one hands the URL-encoded body to its action and
//! renders the outcome: redirects become `303 See Other`, rejections become
//! the JSON form state with a status matching the reason.

use axum::{
    extract::{Path, State},
    Extension,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use axum_extra::extract::CookieJar;
use std::sync::Arc;

use super::auth::session_cookie;
use super::error::{ApiError, ErrorCode};
use crate::actions::{self, ActionOutcome, FormState};
use crate::db::{self, CustomerField, Session};
use crate::schema::FormData;
use crate::AppState;

fn render(state: &AppState, jar: CookieJar, outcome: ActionOutcome) -> Response {
    match outcome {
        ActionOutcome::Redirect { to, session } => {
            let jar = match session {
                Some(session) => jar.add(session_cookie(&state.config.auth, session)),
                None => jar,
            };
            (jar, Redirect::to(to)).into_response()
        }
        ActionOutcome::Completed => StatusCode::NO_CONTENT.into_response(),
        ActionOutcome::Rejected { reason, state } => {
            (ErrorCode::from(reason).status_code(), Json(state)).into_response()
        }
    }
}

/// POST /dashboard/invoices/create
pub async fn create_invoice(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    jar: CookieJar,
    Form(form): Form<FormData>,
) -> Result<Response, ApiError> {
    tracing::debug!(user_id = %session.user_id, "Create invoice submitted");
    let outcome = actions::create_invoice(&state.actions, &FormState::default(), &form).await?;
    Ok(render(&state, jar, outcome))
}

/// POST /dashboard/invoices/:id/edit
pub async fn update_invoice(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    jar: CookieJar,
    Path(id): Path<String>,
    Form(form): Form<FormData>,
) -> Result<Response, ApiError> {
    tracing::debug!(user_id = %session.user_id, invoice_id = %id, "Update invoice submitted");
    let outcome = actions::update_invoice(&state.actions, &id, &form).await?;
    Ok(render(&state, jar, outcome))
}

/// POST /dashboard/invoices/:id/delete
pub async fn delete_invoice(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    tracing::info!(user_id = %session.user_id, invoice_id = %id, "Invoice delete requested");
    let outcome = actions::delete_invoice(&state.actions, &id).await?;
    Ok(render(&state, jar, outcome))
}

/// POST /login
pub async fn authenticate(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<FormData>,
) -> Result<Response, ApiError> {
    let outcome = actions::authenticate(&state.actions, &FormState::default(), &form).await?;
    Ok(render(&state, jar, outcome))
}

/// POST /signup
pub async fn sign_up(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<FormData>,
) -> Result<Response, ApiError> {
    let outcome = actions::sign_up_user(&state.actions, &FormState::default(), &form).await?;
    Ok(render(&state, jar, outcome))
}

/// GET /dashboard/customers
pub async fn list_customers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CustomerField>>, ApiError> {
    Ok(Json(db::list_customers(&state.db).await?))
}
