//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod action_sink;
pub mod event_bus;
pub mod event_store;
pub mod notification_repo;
pub mod notifier;

pub use action_sink::{ActionOrigin, ActionSink, TaskRequest, TeamAlert};
pub use event_bus::EventPublisher;
pub use event_store::EventStore;
pub use notification_repo::NotificationRepository;
pub use notifier::Notifier;
