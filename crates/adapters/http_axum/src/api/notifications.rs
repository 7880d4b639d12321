//! JSON REST handlers for the notification center.

use std::str::FromStr;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use clinicflow_app::ports::{EventStore, NotificationRepository};
use clinicflow_domain::id::NotificationId;
use clinicflow_domain::notification::Notification;

use crate::error::ApiError;
use crate::state::AppState;

/// Body returned by `GET /api/notifications/unread-count`.
#[derive(Debug, Serialize)]
pub struct UnreadCount {
    pub count: usize,
}

/// Body returned by bulk mutations.
#[derive(Debug, Serialize)]
pub struct Affected {
    pub affected: usize,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<Notification>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from single-notification endpoints.
pub enum GetResponse {
    Ok(Json<Notification>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the delete endpoint.
pub enum DeleteResponse {
    NoContent,
}

impl IntoResponse for DeleteResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

fn parse_id(raw: &str) -> Result<NotificationId, ApiError> {
    NotificationId::from_str(raw).map_err(|_| ApiError::invalid_id(raw))
}

/// `GET /api/notifications` — list notifications, newest first.
pub async fn list<ES, NR>(
    State(state): State<AppState<ES, NR>>,
) -> Result<ListResponse, ApiError>
where
    ES: EventStore + Send + Sync + 'static,
    NR: NotificationRepository + Send + Sync + 'static,
{
    let notifications = state.notification_service.list_notifications().await?;
    Ok(ListResponse::Ok(Json(notifications)))
}

/// `GET /api/notifications/{id}` — get one notification.
pub async fn get<ES, NR>(
    State(state): State<AppState<ES, NR>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    ES: EventStore + Send + Sync + 'static,
    NR: NotificationRepository + Send + Sync + 'static,
{
    let notification = state
        .notification_service
        .get_notification(parse_id(&id)?)
        .await?;
    Ok(GetResponse::Ok(Json(notification)))
}

/// `GET /api/notifications/unread-count` — number of unread notifications.
pub async fn unread_count<ES, NR>(
    State(state): State<AppState<ES, NR>>,
) -> Result<Json<UnreadCount>, ApiError>
where
    ES: EventStore + Send + Sync + 'static,
    NR: NotificationRepository + Send + Sync + 'static,
{
    let count = state.notification_service.unread_count().await?;
    Ok(Json(UnreadCount { count }))
}

/// `PUT /api/notifications/{id}/read` — mark one notification read.
pub async fn mark_read<ES, NR>(
    State(state): State<AppState<ES, NR>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    ES: EventStore + Send + Sync + 'static,
    NR: NotificationRepository + Send + Sync + 'static,
{
    let notification = state.notification_service.mark_read(parse_id(&id)?).await?;
    Ok(GetResponse::Ok(Json(notification)))
}

/// `POST /api/notifications/read-all` — mark every notification read.
pub async fn mark_all_read<ES, NR>(
    State(state): State<AppState<ES, NR>>,
) -> Result<Json<Affected>, ApiError>
where
    ES: EventStore + Send + Sync + 'static,
    NR: NotificationRepository + Send + Sync + 'static,
{
    let affected = state.notification_service.mark_all_read().await?;
    Ok(Json(Affected { affected }))
}

/// `DELETE /api/notifications/{id}` — delete one notification.
pub async fn delete<ES, NR>(
    State(state): State<AppState<ES, NR>>,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError>
where
    ES: EventStore + Send + Sync + 'static,
    NR: NotificationRepository + Send + Sync + 'static,
{
    state
        .notification_service
        .delete_notification(parse_id(&id)?)
        .await?;
    Ok(DeleteResponse::NoContent)
}

/// `DELETE /api/notifications` — delete every notification.
pub async fn clear<ES, NR>(
    State(state): State<AppState<ES, NR>>,
) -> Result<Json<Affected>, ApiError>
where
    ES: EventStore + Send + Sync + 'static,
    NR: NotificationRepository + Send + Sync + 'static,
{
    let affected = state.notification_service.clear().await?;
    Ok(Json(Affected { affected }))
}
