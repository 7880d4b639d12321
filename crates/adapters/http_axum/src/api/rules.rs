//! Read-only view of the rule catalog.

use axum::Json;
use axum::extract::State;

use clinicflow_app::ports::{EventStore, NotificationRepository};
use clinicflow_domain::rule::Rule;

use crate::state::AppState;

/// `GET /api/rules` — list the rules the engine evaluates, in order.
pub async fn list<ES, NR>(State(state): State<AppState<ES, NR>>) -> Json<Vec<Rule>>
where
    ES: EventStore + Send + Sync + 'static,
    NR: NotificationRepository + Send + Sync + 'static,
{
    Json(state.rules.to_vec())
}
