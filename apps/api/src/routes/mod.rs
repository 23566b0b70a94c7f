pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::insights::handlers as insights;
use crate::onboarding::handlers as onboarding;
use crate::state::AppState;
use crate::users::handlers as users;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/users/sync", post(users::handle_sync_user))
        .route(
            "/api/v1/onboarding",
            post(onboarding::handle_complete_onboarding),
        )
        .route(
            "/api/v1/onboarding/status",
            get(onboarding::handle_onboarding_status),
        )
        .route("/api/v1/dashboard", get(insights::handle_dashboard))
        .route(
            "/api/v1/industries/:industry/insight",
            get(insights::handle_get_insight),
        )
        .with_state(state)
}
