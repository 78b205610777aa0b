use axum::routing::{get, patch, post};
use axum::Router;

use backend_application::AppState;

use crate::handlers::{event_handlers, ops_handlers, scooter_handlers, user_handlers};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/scooters",
            post(scooter_handlers::create_scooter).get(scooter_handlers::list_scooters),
        )
        .route("/scooters/:id", patch(scooter_handlers::update_scooter))
        .route(
            "/events",
            post(event_handlers::create_event).get(event_handlers::list_events),
        )
        .route("/users", post(user_handlers::create_user))
        .route("/ops/health/live", get(ops_handlers::health_live))
        .route("/ops/health/ready", get(ops_handlers::health_ready))
        .route(
            "/ops/metrics/prometheus",
            get(ops_handlers::metrics_prometheus),
        )
        .with_state(state)
}
