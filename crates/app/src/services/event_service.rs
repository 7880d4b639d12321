//! Event service — owns appends to and reads from the event log.

use clinicflow_domain::error::{ClinicFlowError, NotFoundError};
use clinicflow_domain::event::Event;
use clinicflow_domain::id::EventId;

use crate::ports::{EventPublisher, EventStore};

/// Application service for the event log.
///
/// Recording an event appends it, enforces the retention window, and
/// broadcasts it so the rule engine and live subscribers see it.
pub struct EventService<S, P> {
    store: S,
    publisher: P,
    retention: usize,
}

impl<S, P> EventService<S, P>
where
    S: EventStore,
    P: EventPublisher,
{
    /// Create a new service keeping at most `retention` events.
    pub fn new(store: S, publisher: P, retention: usize) -> Self {
        Self {
            store,
            publisher,
            retention,
        }
    }

    /// Append an event to the log and broadcast it.
    ///
    /// A failure to enforce the retention window is logged and does not
    /// fail the call.
    ///
    /// # Errors
    ///
    /// Returns [`ClinicFlowError::Validation`] if invariants fail, or a
    /// storage error propagated from the store.
    #[tracing::instrument(skip(self, event), fields(event_id = %event.id, event_type = %event.event_type))]
    pub async fn record(&self, event: Event) -> Result<Event, ClinicFlowError> {
        event.validate()?;
        let stored = self.store.store(event).await?;
        self.publisher.publish(stored.clone()).await?;

        // the event is durable at this point, trimming is best-effort
        match self.store.prune(self.retention).await {
            Ok(0) => {}
            Ok(pruned) => {
                tracing::debug!(pruned, retention = self.retention, "event log trimmed");
            }
            Err(err) => tracing::warn!(error = %err, "failed to trim event log"),
        }

        Ok(stored)
    }

    /// Look up an event by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`ClinicFlowError::NotFound`] when no event with `id` exists,
    /// or a storage error from the store.
    pub async fn get_event(&self, id: EventId) -> Result<Event, ClinicFlowError> {
        self.store.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Event",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// List the most recent events, newest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the store.
    pub async fn list_recent(&self, limit: usize) -> Result<Vec<Event>, ClinicFlowError> {
        self.store.get_recent(limit).await
    }

    /// List the most recent events about one patient, newest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the store.
    pub async fn list_for_patient(
        &self,
        patient_id: &str,
        limit: usize,
    ) -> Result<Vec<Event>, ClinicFlowError> {
        self.store.find_by_patient(patient_id, limit).await
    }

    /// The last event appended to the log, if any.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the store.
    pub async fn latest(&self) -> Result<Option<Event>, ClinicFlowError> {
        Ok(self.store.get_recent(1).await?.into_iter().next())
    }
}
