use std::sync::Arc;
use std::time::Duration;

use auth::CredentialCodec;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::categories::create_category;
use super::handlers::categories::delete_category;
use super::handlers::categories::get_category_by_id;
use super::handlers::categories::get_category_by_name;
use super::handlers::categories::list_categories;
use super::handlers::categories::update_category;
use super::handlers::health::health;
use super::handlers::list_accounts::list_accounts;
use super::handlers::login::login;
use super::handlers::logout::logout;
use super::handlers::refresh::refresh;
use super::handlers::sign_up::sign_up;
use super::handlers::update_account::update_account;
use super::middleware::establish_identity;
use super::policy::enforce_policy;
use super::policy::AccessPolicy;
use crate::domain::account::ports::AccountServicePort;
use crate::domain::category::ports::CategoryServicePort;
use crate::domain::session::ports::SessionServicePort;

#[derive(Clone)]
pub struct AppState {
    pub account_service: Arc<dyn AccountServicePort>,
    pub category_service: Arc<dyn CategoryServicePort>,
    pub session_service: Arc<dyn SessionServicePort>,
    pub codec: Arc<CredentialCodec>,
    pub policy: Arc<AccessPolicy>,
}

pub fn create_router(
    account_service: Arc<dyn AccountServicePort>,
    category_service: Arc<dyn CategoryServicePort>,
    session_service: Arc<dyn SessionServicePort>,
    codec: Arc<CredentialCodec>,
    policy: Arc<AccessPolicy>,
) -> Router {
    let state = AppState {
        account_service,
        category_service,
        session_service,
        codec,
        policy,
    };

    let user_routes = Router::new()
        .route("/api/user/:role/sign-up", post(sign_up))
        .route("/api/user/login", post(login))
        .route("/api/user/refresh", post(refresh))
        .route("/api/user/logout", post(logout))
        .route("/api/user/user-list", get(list_accounts))
        .route("/api/user/update/:id", put(update_account));

    let category_routes = Router::new()
        .route("/api/category/list", get(list_categories))
        .route("/api/category/create", post(create_category))
        .route("/api/category/update/:id", put(update_category))
        .route("/api/category/delete/:id", delete(delete_category))
        .route("/api/category/get-by-id", get(get_category_by_id))
        .route("/api/category/get-by-name", get(get_category_by_name));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            // Headers stay out of the span: they carry bearer credentials.
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    // Layers run bottom-up: the gate attaches identity before the policy reads it.
    Router::new()
        .route("/health", get(health))
        .merge(user_routes)
        .merge(category_routes)
        .layer(middleware::from_fn_with_state(state.clone(), enforce_policy))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            establish_identity,
        ))
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
