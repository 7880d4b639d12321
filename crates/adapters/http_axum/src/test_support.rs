//! In-memory ports and request helpers shared by handler tests.

use std::future::Future;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Request, Response};
use http_body_util::BodyExt;

use clinicflow_app::event_bus::InProcessEventBus;
use clinicflow_app::ports::{EventStore, NotificationRepository};
use clinicflow_app::services::event_service::EventService;
use clinicflow_app::services::notification_service::NotificationService;
use clinicflow_domain::error::ClinicFlowError;
use clinicflow_domain::event::Event;
use clinicflow_domain::id::{EventId, NotificationId};
use clinicflow_domain::notification::Notification;
use clinicflow_domain::rule::catalog;

use crate::state::AppState;

#[derive(Default)]
pub struct MemEventStore {
    log: Mutex<Vec<Event>>,
}

impl EventStore for MemEventStore {
    fn store(&self, event: Event) -> impl Future<Output = Result<Event, ClinicFlowError>> + Send {
        self.log.lock().unwrap().push(event.clone());
        async { Ok(event) }
    }

    fn get_by_id(
        &self,
        id: EventId,
    ) -> impl Future<Output = Result<Option<Event>, ClinicFlowError>> + Send {
        let found = self.log.lock().unwrap().iter().find(|e| e.id == id).cloned();
        async { Ok(found) }
    }

    fn get_recent(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Event>, ClinicFlowError>> + Send {
        let recent: Vec<_> = self.log.lock().unwrap().iter().rev().take(limit).cloned().collect();
        async { Ok(recent) }
    }

    fn find_by_patient(
        &self,
        patient_id: &str,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Event>, ClinicFlowError>> + Send {
        let found: Vec<_> = self
            .log
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|e| e.patient_id.as_deref() == Some(patient_id))
            .take(limit)
            .cloned()
            .collect();
        async { Ok(found) }
    }

    fn prune(&self, keep: usize) -> impl Future<Output = Result<usize, ClinicFlowError>> + Send {
        let mut log = self.log.lock().unwrap();
        let excess = log.len().saturating_sub(keep);
        log.drain(..excess);
        async move { Ok(excess) }
    }
}

#[derive(Default)]
pub struct MemNotificationRepo {
    store: Mutex<Vec<Notification>>,
}

impl NotificationRepository for MemNotificationRepo {
    fn create(
        &self,
        notification: Notification,
    ) -> impl Future<Output = Result<Notification, ClinicFlowError>> + Send {
        self.store.lock().unwrap().push(notification.clone());
        async { Ok(notification) }
    }

    fn get_by_id(
        &self,
        id: NotificationId,
    ) -> impl Future<Output = Result<Option<Notification>, ClinicFlowError>> + Send {
        let found = self.store.lock().unwrap().iter().find(|n| n.id == id).cloned();
        async { Ok(found) }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Notification>, ClinicFlowError>> + Send {
        let all: Vec<_> = self.store.lock().unwrap().iter().rev().cloned().collect();
        async { Ok(all) }
    }

    fn count_unread(&self) -> impl Future<Output = Result<usize, ClinicFlowError>> + Send {
        let count = self.store.lock().unwrap().iter().filter(|n| !n.read).count();
        async move { Ok(count) }
    }

    fn update(
        &self,
        notification: Notification,
    ) -> impl Future<Output = Result<Notification, ClinicFlowError>> + Send {
        let mut store = self.store.lock().unwrap();
        if let Some(slot) = store.iter_mut().find(|n| n.id == notification.id) {
            *slot = notification.clone();
        }
        async { Ok(notification) }
    }

    fn mark_all_read(&self) -> impl Future<Output = Result<usize, ClinicFlowError>> + Send {
        let mut changed = 0;
        for n in self.store.lock().unwrap().iter_mut() {
            if n.mark_read() {
                changed += 1;
            }
        }
        async move { Ok(changed) }
    }

    fn delete(&self, id: NotificationId) -> impl Future<Output = Result<(), ClinicFlowError>> + Send {
        self.store.lock().unwrap().retain(|n| n.id != id);
        async { Ok(()) }
    }

    fn delete_all(&self) -> impl Future<Output = Result<usize, ClinicFlowError>> + Send {
        let removed = std::mem::take(&mut *self.store.lock().unwrap()).len();
        async move { Ok(removed) }
    }

    fn prune(&self, keep: usize) -> impl Future<Output = Result<usize, ClinicFlowError>> + Send {
        let mut store = self.store.lock().unwrap();
        let excess = store.len().saturating_sub(keep);
        store.drain(..excess);
        async move { Ok(excess) }
    }
}

pub type TestState = AppState<MemEventStore, MemNotificationRepo>;

pub fn test_state() -> (TestState, Arc<InProcessEventBus>) {
    let event_bus = Arc::new(InProcessEventBus::new(16));
    let state = AppState::new(
        EventService::new(MemEventStore::default(), Arc::clone(&event_bus), 100),
        NotificationService::new(MemNotificationRepo::default(), Arc::clone(&event_bus), 100),
        catalog::builtin(),
        Arc::clone(&event_bus),
    );
    (state, event_bus)
}

pub fn request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn json_request(method: &str, uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
