use axum::Router;
use axum::extract::{DefaultBodyLimit, Extension};
use axum::routing::{any, post};
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::module::AppState;

pub(crate) fn register_routes(router: Router, state: AppState) -> Router {
    router
        // POST /add — delete, create, key-auth, acl. Bodies of any size reach
        // the handler so the sequence always runs.
        .route(
            "/add",
            post(handlers::add_api).layer(DefaultBodyLimit::disable()),
        )
        // * /remove — decommission stub
        .route("/remove", any(handlers::remove_apis))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
}
