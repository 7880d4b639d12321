//! JSON REST handlers for the event log.

use std::str::FromStr;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use clinicflow_app::ports::{EventStore, NotificationRepository};
use clinicflow_domain::event::{Event, EventType};
use clinicflow_domain::id::EventId;
use clinicflow_domain::value::Payload;

use crate::error::ApiError;
use crate::state::AppState;

const DEFAULT_LIMIT: usize = 100;

/// Query parameters accepted by the list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<usize>,
}

impl ListQuery {
    fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }
}

/// Request body for appending an event.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub workspace_id: String,
    #[serde(default)]
    pub patient_id: Option<String>,
    #[serde(default)]
    pub payload: Payload,
}

impl From<CreateEventRequest> for Event {
    fn from(req: CreateEventRequest) -> Self {
        let event = Event::new(req.event_type, req.workspace_id, req.payload);
        match req.patient_id {
            Some(patient_id) => event.with_patient(patient_id),
            None => event,
        }
    }
}

/// Possible responses from the list endpoints.
pub enum ListResponse {
    Ok(Json<Vec<Event>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get endpoint.
pub enum GetResponse {
    Ok(Json<Event>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<Event>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// `GET /api/events` — list recent events, newest first.
pub async fn list<ES, NR>(
    State(state): State<AppState<ES, NR>>,
    Query(query): Query<ListQuery>,
) -> Result<ListResponse, ApiError>
where
    ES: EventStore + Send + Sync + 'static,
    NR: NotificationRepository + Send + Sync + 'static,
{
    let events = state.event_service.list_recent(query.limit()).await?;
    Ok(ListResponse::Ok(Json(events)))
}

/// `POST /api/events` — append an event to the log.
pub async fn create<ES, NR>(
    State(state): State<AppState<ES, NR>>,
    Json(req): Json<CreateEventRequest>,
) -> Result<CreateResponse, ApiError>
where
    ES: EventStore + Send + Sync + 'static,
    NR: NotificationRepository + Send + Sync + 'static,
{
    let event = state.event_service.record(Event::from(req)).await?;
    Ok(CreateResponse::Created(Json(event)))
}

/// `GET /api/events/{id}` — get event by ID.
pub async fn get<ES, NR>(
    State(state): State<AppState<ES, NR>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    ES: EventStore + Send + Sync + 'static,
    NR: NotificationRepository + Send + Sync + 'static,
{
    let event_id = EventId::from_str(&id).map_err(|_| ApiError::invalid_id(&id))?;
    let event = state.event_service.get_event(event_id).await?;
    Ok(GetResponse::Ok(Json(event)))
}

/// `GET /api/patients/{patient_id}/events` — a patient's recent events.
pub async fn list_for_patient<ES, NR>(
    State(state): State<AppState<ES, NR>>,
    Path(patient_id): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<ListResponse, ApiError>
where
    ES: EventStore + Send + Sync + 'static,
    NR: NotificationRepository + Send + Sync + 'static,
{
    let events = state
        .event_service
        .list_for_patient(&patient_id, query.limit())
        .await?;
    Ok(ListResponse::Ok(Json(events)))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;
    use tower::ServiceExt;

    use crate::router::build;
    use crate::test_support::{body_json, json_request, request, test_state};

    #[tokio::test]
    async fn should_create_event_and_return_201() {
        let (state, _bus) = test_state();
        let app = build(state);

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/events",
                &json!({
                    "type": "PATIENT_MOVED",
                    "workspaceId": "ws-1",
                    "patientId": "p-1",
                    "payload": { "toStepId": "step-done" }
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["type"], "PATIENT_MOVED");
        assert_eq!(body["patientId"], "p-1");
        assert_eq!(body["payload"]["toStepId"], "step-done");
    }

    #[tokio::test]
    async fn should_broadcast_created_event_on_bus() {
        let (state, bus) = test_state();
        let mut rx = bus.subscribe();
        let app = build(state);

        app.oneshot(json_request(
            "POST",
            "/api/events",
            &json!({ "type": "BED_ASSIGNED", "workspaceId": "ws-1" }),
        ))
        .await
        .unwrap();

        let received = rx.recv().await.unwrap();
        assert_eq!(received.workspace_id, "ws-1");
    }

    #[tokio::test]
    async fn should_reject_blank_workspace_with_400() {
        let (state, _bus) = test_state();
        let app = build(state);

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/events",
                &json!({ "type": "BED_ASSIGNED", "workspaceId": " " }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "workspace id must not be empty");
    }

    #[tokio::test]
    async fn should_reject_unknown_event_type() {
        let (state, _bus) = test_state();
        let app = build(state);

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/events",
                &json!({ "type": "PATIENT_TELEPORTED", "workspaceId": "ws-1" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn should_list_events_with_limit() {
        let (state, _bus) = test_state();
        let app = build(state);
        for _ in 0..3 {
            app.clone()
                .oneshot(json_request(
                    "POST",
                    "/api/events",
                    &json!({ "type": "BED_ASSIGNED", "workspaceId": "ws-1" }),
                ))
                .await
                .unwrap();
        }

        let response = app.oneshot(request("GET", "/api/events?limit=2")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn should_get_event_by_id_and_404_when_missing() {
        let (state, _bus) = test_state();
        let app = build(state);
        let created = body_json(
            app.clone()
                .oneshot(json_request(
                    "POST",
                    "/api/events",
                    &json!({ "type": "PATIENT_ADMITTED", "workspaceId": "ws-1" }),
                ))
                .await
                .unwrap(),
        )
        .await;
        let id = created["id"].as_str().unwrap();

        let found = app
            .clone()
            .oneshot(request("GET", &format!("/api/events/{id}")))
            .await
            .unwrap();
        assert_eq!(found.status(), StatusCode::OK);

        let missing = app
            .oneshot(request(
                "GET",
                "/api/events/00000000-0000-4000-8000-000000000000",
            ))
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn should_return_400_for_malformed_event_id() {
        let (state, _bus) = test_state();
        let response = build(state)
            .oneshot(request("GET", "/api/events/not-a-uuid"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn should_list_events_for_one_patient() {
        let (state, _bus) = test_state();
        let app = build(state);
        for patient in ["p-1", "p-2", "p-1"] {
            app.clone()
                .oneshot(json_request(
                    "POST",
                    "/api/events",
                    &json!({
                        "type": "PATIENT_MOVED",
                        "workspaceId": "ws-1",
                        "patientId": patient,
                        "payload": { "toStepId": "step-triage" }
                    }),
                ))
                .await
                .unwrap();
        }

        let response = app
            .oneshot(request("GET", "/api/patients/p-1/events"))
            .await
            .unwrap();

        let body = body_json(response).await;
        let events = body.as_array().unwrap();
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e["patientId"] == "p-1"));
    }
}
