//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use clinicflow_app::ports::{EventStore, NotificationRepository};

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Nests API routes under `/api` and includes a [`TraceLayer`] that logs
/// each HTTP request/response using the `tracing` ecosystem.
pub fn build<ES, NR>(state: AppState<ES, NR>) -> Router
where
    ES: EventStore + Send + Sync + 'static,
    NR: NotificationRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", crate::api::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use tower::ServiceExt;

    use crate::test_support::{body_json, request, test_state};

    #[tokio::test]
    async fn should_return_ok_when_health_check_called() {
        let (state, _bus) = test_state();

        let response = build(state).oneshot(request("GET", "/health")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn should_list_builtin_rules() {
        let (state, _bus) = test_state();

        let response = build(state).oneshot(request("GET", "/api/rules")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let names: Vec<_> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|rule| rule["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["critical-vitals", "billing-ready", "emergency-alert"]);
        assert_eq!(body[0]["actions"][0]["type"], "NOTIFY_TEAM");
        assert_eq!(body[0]["actions"][0]["teamId"], "urgence");
    }

    #[tokio::test]
    async fn should_return_404_for_unknown_route() {
        let (state, _bus) = test_state();

        let response = build(state).oneshot(request("GET", "/nope")).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
