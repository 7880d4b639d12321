//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod events;
#[allow(clippy::missing_errors_doc)]
pub mod notifications;
pub mod rules;
pub mod sse;

use axum::Router;
use axum::routing::{get, post, put};

use clinicflow_app::ports::{EventStore, NotificationRepository};

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<ES, NR>() -> Router<AppState<ES, NR>>
where
    ES: EventStore + Send + Sync + 'static,
    NR: NotificationRepository + Send + Sync + 'static,
{
    Router::new()
        // Events
        .route(
            "/events",
            get(events::list::<ES, NR>).post(events::create::<ES, NR>),
        )
        .route("/events/stream", get(sse::stream::<ES, NR>))
        .route("/events/{id}", get(events::get::<ES, NR>))
        .route(
            "/patients/{patient_id}/events",
            get(events::list_for_patient::<ES, NR>),
        )
        // Rules
        .route("/rules", get(rules::list::<ES, NR>))
        // Notifications
        .route(
            "/notifications",
            get(notifications::list::<ES, NR>).delete(notifications::clear::<ES, NR>),
        )
        .route(
            "/notifications/unread-count",
            get(notifications::unread_count::<ES, NR>),
        )
        .route(
            "/notifications/read-all",
            post(notifications::mark_all_read::<ES, NR>),
        )
        .route(
            "/notifications/{id}",
            get(notifications::get::<ES, NR>).delete(notifications::delete::<ES, NR>),
        )
        .route(
            "/notifications/{id}/read",
            put(notifications::mark_read::<ES, NR>),
        )
}
