//! Shared application state for axum handlers.

use std::sync::Arc;

use clinicflow_app::event_bus::InProcessEventBus;
use clinicflow_app::ports::{EventStore, NotificationRepository};
use clinicflow_app::services::event_service::EventService;
use clinicflow_app::services::notification_service::NotificationService;
use clinicflow_domain::rule::Rule;

/// Event service publishing on the in-process bus.
pub type BusEventService<ES> = EventService<ES, Arc<InProcessEventBus>>;
/// Notification service publishing on the in-process bus.
pub type BusNotificationService<NR> = NotificationService<NR, Arc<InProcessEventBus>>;

/// Application state shared across all axum handlers.
///
/// Generic over the event store and notification repository to avoid
/// dynamic dispatch. `Clone` is implemented manually so the underlying
/// types themselves do not need to be `Clone`; only the `Arc` wrappers are
/// cloned.
pub struct AppState<ES, NR> {
    /// Event log service.
    pub event_service: Arc<BusEventService<ES>>,
    /// Notification center service.
    pub notification_service: Arc<BusNotificationService<NR>>,
    /// Rules evaluated by the engine, exposed read-only.
    pub rules: Arc<[Rule]>,
    /// Bus backing the live event stream.
    pub event_bus: Arc<InProcessEventBus>,
}

impl<ES, NR> Clone for AppState<ES, NR> {
    fn clone(&self) -> Self {
        Self {
            event_service: Arc::clone(&self.event_service),
            notification_service: Arc::clone(&self.notification_service),
            rules: Arc::clone(&self.rules),
            event_bus: Arc::clone(&self.event_bus),
        }
    }
}

impl<ES, NR> AppState<ES, NR>
where
    ES: EventStore + Send + Sync + 'static,
    NR: NotificationRepository + Send + Sync + 'static,
{
    /// Create a new application state from service instances.
    pub fn new(
        event_service: BusEventService<ES>,
        notification_service: BusNotificationService<NR>,
        rules: Vec<Rule>,
        event_bus: Arc<InProcessEventBus>,
    ) -> Self {
        Self::from_arcs(
            Arc::new(event_service),
            Arc::new(notification_service),
            rules.into(),
            event_bus,
        )
    }

    /// Create a new application state from pre-wrapped `Arc` services.
    ///
    /// Use this when services need to be shared with background tasks
    /// (the rule engine notifies through the same notification service)
    /// before constructing the HTTP state.
    pub fn from_arcs(
        event_service: Arc<BusEventService<ES>>,
        notification_service: Arc<BusNotificationService<NR>>,
        rules: Arc<[Rule]>,
        event_bus: Arc<InProcessEventBus>,
    ) -> Self {
        Self {
            event_service,
            notification_service,
            rules,
            event_bus,
        }
    }
}
