// Library crate for teamboard
// Exports modules for use by the server binary and tests

pub mod config;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod middlewares;
pub mod models;
pub mod repositories;
pub mod services;
pub mod state;

use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::handlers::{
    create_company, create_project, create_team, delete_project, delete_team, get_company,
    get_project, get_team, list_companies, list_company_teams, list_projects, list_teams, login,
    me, register, update_project_active,
};
use crate::middlewares::auth_middleware;
use crate::state::AppState;

/// Build the application router with the given state
pub fn build_router(state: AppState) -> Router {
    // Protected routes (require authentication)
    let protected_routes = Router::new()
        .route("/api/auth/me", get(me))
        // Company routes
        .route("/api/companies", get(list_companies))
        .route("/api/companies", post(create_company))
        .route("/api/companies/{id}", get(get_company))
        .route("/api/companies/{id}/teams", get(list_company_teams))
        .route("/api/companies/{id}/teams", post(create_team))
        // Team routes
        .route("/api/teams", get(list_teams))
        .route("/api/teams/{id}", get(get_team))
        .route("/api/teams/{id}", delete(delete_team))
        // Project routes
        .route("/api/projects", get(list_projects))
        .route("/api/projects", post(create_project))
        .route("/api/projects/{id}", get(get_project))
        .route("/api/projects/{id}", delete(delete_project))
        .route("/api/projects/{id}/active", patch(update_project_active))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/", get(|| async { "Hello, teamboard!" }))
        // Public auth routes
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .merge(protected_routes)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}
