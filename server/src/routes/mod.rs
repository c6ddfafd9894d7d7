use std::time::Duration;

use axum::{
    error_handling::HandleErrorLayer,
    routing::{get, post},
    Router,
};
use tower::timeout::TimeoutLayer;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, with_security_headers, Config};
use crate::handlers::{admin, events, health_check, me, rsvp};
use crate::state::AppState;
use crate::utils::error::handle_middleware_error;

/// Middleware settings that vary between deployments.
#[derive(Debug, Clone)]
pub struct RouteOptions {
    pub request_timeout: Duration,
    pub cors_allowed_origins: Option<String>,
    pub include_hsts: bool,
}

impl From<&Config> for RouteOptions {
    fn from(config: &Config) -> Self {
        Self {
            request_timeout: config.request_timeout,
            cors_allowed_origins: config.cors_allowed_origins.clone(),
            include_hsts: config.production,
        }
    }
}

pub fn create_routes(state: AppState, options: &RouteOptions) -> Router {
    let api = Router::new()
        .route("/events", get(events::list_events).post(events::submit_event))
        .route("/events/:id", get(events::get_event))
        .route(
            "/events/:id/rsvp",
            get(rsvp::rsvp_status).post(rsvp::toggle_rsvp),
        )
        .route("/me/events", get(me::my_events))
        .route("/leaderboard", get(me::leaderboard))
        .route("/admin/events/pending", get(admin::pending_events))
        .route("/admin/events/:id/approve", post(admin::approve_event))
        .route("/admin/events/:id/reject", post(admin::reject_event));

    let router = Router::new()
        .route("/health", get(health_check))
        .nest("/api", api)
        .with_state(state);
    let router = with_request_timeout(router, options.request_timeout);

    with_security_headers(router, options.include_hsts)
        .layer(create_cors_layer(options.cors_allowed_origins.as_deref()))
        .layer(TraceLayer::new_for_http())
}

/// Bounds every request by `timeout`; an elapsed request answers 408 inside
/// the error envelope.
fn with_request_timeout<S>(router: Router<S>, timeout: Duration) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(handle_middleware_error))
            .layer(TimeoutLayer::new(timeout)),
    )
}
