//! Server-Sent Events (SSE) stream for real-time updates.

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;

use clinicflow_app::ports::{EventStore, NotificationRepository};

use crate::state::AppState;

/// `GET /api/events/stream` — SSE stream of live domain events.
///
/// Subscribes to the event bus and sends each event as a JSON `data:` frame
/// named after its type. Only events published after the client connects
/// are delivered. The stream ends when the client disconnects or the bus
/// is closed.
pub async fn stream<ES, NR>(
    State(state): State<AppState<ES, NR>>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, std::convert::Infallible>>>
where
    ES: EventStore + Send + Sync + 'static,
    NR: NotificationRepository + Send + Sync + 'static,
{
    let event_rx = state.event_bus.subscribe();
    let event_stream = BroadcastStream::new(event_rx).filter_map(|result| match result {
        Ok(event) => match serde_json::to_string(&event) {
            Ok(json) => Some(Ok(Event::default()
                .event(event.event_type.as_str())
                .data(json))),
            Err(err) => {
                tracing::warn!(%err, "failed to serialize event for SSE stream");
                None
            }
        },
        Err(BroadcastStreamRecvError::Lagged(skipped)) => {
            tracing::warn!(skipped, "SSE subscriber lagged, some events were dropped");
            None
        }
    });

    Sse::new(event_stream).keep_alive(KeepAlive::default())
}
