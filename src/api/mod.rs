pub mod auth;
pub mod error;
mod forms;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Account routes (public)
    let account_routes = Router::new()
        .route("/login", post(forms::authenticate))
        .route("/signup", post(forms::sign_up))
        .route("/logout", post(auth::logout));

    // Dashboard routes require a session
    let dashboard_routes = Router::new()
        .route("/invoices/create", post(forms::create_invoice))
        .route("/invoices/:id/edit", post(forms::update_invoice))
        .route("/invoices/:id/delete", post(forms::delete_invoice))
        .route("/customers", get(forms::list_customers))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_session,
        ));

    Router::new()
        .route("/health", get(health_check))
        .merge(account_routes)
        .nest("/dashboard", dashboard_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::INVOICES_PATH;
    use crate::config::Config;
    use crate::db::{insert_customer, test_pool, Invoice};
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    async fn test_state() -> Arc<AppState> {
        Arc::new(AppState::new(Config::default(), test_pool().await))
    }

    fn form_post(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn send(state: &Arc<AppState>, request: Request<Body>) -> Response {
        create_router(state.clone()).oneshot(request).await.unwrap()
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn location(response: &Response) -> &str {
        response.headers()[header::LOCATION].to_str().unwrap()
    }

    /// Signs up a user and returns the `name=value` session cookie
    async fn signed_in_cookie(state: &Arc<AppState>) -> String {
        let response = send(
            state,
            form_post(
                "/signup",
                "email=user%40nextmail.com&username=User&password=123456",
                None,
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/dashboard");

        let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(set_cookie.starts_with("acme_session="));
        assert!(set_cookie.contains("HttpOnly"));
        set_cookie.split(';').next().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let state = test_state().await;
        let response = send(
            &state,
            Request::builder().uri("/health").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_dashboard_requires_session() {
        let state = test_state().await;

        let response = send(&state, form_post("/dashboard/invoices/create", "", None)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/login");

        let response = send(
            &state,
            form_post("/dashboard/invoices/create", "", Some("acme_session=forged")),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/login");
    }

    #[tokio::test]
    async fn test_create_invoice_redirects_to_list() {
        let state = test_state().await;
        let cookie = signed_in_cookie(&state).await;
        let customer_id = insert_customer(&state.db, "Hector Simpson", "hector@simpson.com")
            .await
            .unwrap();

        let body = format!("customerId={}&amount=45.50&status=paid", customer_id);
        let response = send(&state, form_post("/dashboard/invoices/create", &body, Some(&cookie))).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), INVOICES_PATH);
        assert_eq!(state.cache.generation(INVOICES_PATH), 1);

        let invoice = sqlx::query_as::<_, Invoice>("SELECT * FROM invoices")
            .fetch_one(&state.db)
            .await
            .unwrap();
        assert_eq!(invoice.amount, 4550);
    }

    #[tokio::test]
    async fn test_update_invoice_redirects_to_list() {
        let state = test_state().await;
        let cookie = signed_in_cookie(&state).await;
        let customer_id = insert_customer(&state.db, "Hector Simpson", "hector@simpson.com")
            .await
            .unwrap();
        let id: String = sqlx::query_scalar(
            "INSERT INTO invoices (customer_id, amount, status, date) VALUES (?, 100, 'pending', '2026-10-01') RETURNING id",
        )
        .bind(&customer_id)
        .fetch_one(&state.db)
        .await
        .unwrap();

        let body = format!("customerId={}&amount=12&status=paid", customer_id);
        let uri = format!("/dashboard/invoices/{}/edit", id);
        let response = send(&state, form_post(&uri, &body, Some(&cookie))).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), INVOICES_PATH);

        let invoice = sqlx::query_as::<_, Invoice>("SELECT * FROM invoices")
            .fetch_one(&state.db)
            .await
            .unwrap();
        assert_eq!(invoice.amount, 1200);
        assert_eq!(invoice.status, "paid");
    }

    #[tokio::test]
    async fn test_invalid_invoice_returns_form_state() {
        let state = test_state().await;
        let cookie = signed_in_cookie(&state).await;

        let response = send(
            &state,
            form_post(
                "/dashboard/invoices/create",
                "customerId=c1&amount=0&status=paid",
                Some(&cookie),
            ),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        assert_eq!(body["message"], "Missing Fields. Failed to Create Invoice.");
        assert_eq!(body["errors"]["amount"][0], "Please enter an amount greater than $0.");
    }

    #[tokio::test]
    async fn test_delete_returns_no_content() {
        let state = test_state().await;
        let cookie = signed_in_cookie(&state).await;

        let response = send(&state, form_post("/dashboard/invoices/missing/delete", "", Some(&cookie))).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_login_with_bad_password_is_unauthorized() {
        let state = test_state().await;
        signed_in_cookie(&state).await;

        let response = send(
            &state,
            form_post("/login", "email=user%40nextmail.com&password=nope-nope", None),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = json_body(response).await;
        assert_eq!(body, serde_json::json!({ "message": "Invalid credentials." }));
    }

    #[tokio::test]
    async fn test_duplicate_sign_up_is_conflict() {
        let state = test_state().await;
        signed_in_cookie(&state).await;

        let response = send(
            &state,
            form_post(
                "/signup",
                "email=user%40nextmail.com&username=Other&password=654321",
                None,
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body = json_body(response).await;
        assert_eq!(body["message"], "User Already Exists");
    }

    #[tokio::test]
    async fn test_logout_ends_session() {
        let state = test_state().await;
        let cookie = signed_in_cookie(&state).await;

        let response = send(&state, form_post("/logout", "", Some(&cookie))).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/login");

        let response = send(
            &state,
            Request::builder()
                .uri("/dashboard/customers")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn test_customers_listing() {
        let state = test_state().await;
        let cookie = signed_in_cookie(&state).await;
        insert_customer(&state.db, "Amy Burns", "amy@burns.com").await.unwrap();

        let response = send(
            &state,
            Request::builder()
                .uri("/dashboard/customers")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body[0]["name"], "Amy Burns");
    }
}
