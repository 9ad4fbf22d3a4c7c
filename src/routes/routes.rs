//! Defines routes for all bucketlist API operations.
//!
//! ## Structure
//! - **Probes** (unauthenticated)
//!   - `GET    /healthz`, `GET /readyz`
//!
//! - **Auth** under `/api/v1/auth`
//!   - `POST   /register`: create an account
//!   - `POST   /login`: issue a token
//!
//! - **Users** under `/api/v1`
//!   - `GET    /users`, `GET /users/{username}`
//!
//! - **Bucketlists** under `/api/v1`
//!   - `GET    /bucketlists`: list own (supports limit, page, q)
//!   - `POST   /bucketlists`: create
//!   - `GET|PUT|DELETE /bucketlists/{id}`
//!   - `POST   /bucketlists/{id}/items`
//!   - `GET|PUT|DELETE /bucketlists/{id}/items/{item_id}`

use crate::{
    handlers::{
        auth_handlers::{login, register},
        bucketlist_handlers::{
            create_bucketlist, create_item, delete_bucketlist, delete_item, get_bucketlist,
            get_item, list_bucketlists, update_bucketlist, update_item,
        },
        health_handlers::{healthz, readyz},
        user_handlers::{get_user, list_users},
    },
    middleware::request_id_layer,
    state::AppState,
};
use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Prefix for every versioned API route.
pub const API_PREFIX: &str = "/api/v1";

/// Build the router for every route, still waiting for its state.
pub fn routes() -> Router<AppState> {
    let api = Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/users", get(list_users))
        .route("/users/{username}", get(get_user))
        .route("/bucketlists", get(list_bucketlists).post(create_bucketlist))
        .route(
            "/bucketlists/{id}",
            get(get_bucketlist)
                .put(update_bucketlist)
                .delete(delete_bucketlist),
        )
        .route("/bucketlists/{id}/items", post(create_item))
        .route(
            "/bucketlists/{id}/items/{item_id}",
            get(get_item).put(update_item).delete(delete_item),
        );

    Router::new()
        // health endpoints (mounted at root)
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .nest(API_PREFIX, api)
}

/// The complete application: routes, state, request tracing and request ids.
pub fn app(state: AppState) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    routes()
        .with_state(state)
        .layer(trace_layer)
        .layer(middleware::from_fn(request_id_layer))
}
