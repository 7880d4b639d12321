//! Event store port — the append-only event log.

use std::future::Future;

use clinicflow_domain::error::ClinicFlowError;
use clinicflow_domain::event::Event;
use clinicflow_domain::id::EventId;

/// Repository for appending and querying [`Event`]s.
///
/// Events are never updated. The only removal is [`prune`](Self::prune),
/// which enforces the retention window.
pub trait EventStore {
    /// Append a new event.
    fn store(&self, event: Event) -> impl Future<Output = Result<Event, ClinicFlowError>> + Send;

    /// Get an event by its unique identifier.
    fn get_by_id(
        &self,
        id: EventId,
    ) -> impl Future<Output = Result<Option<Event>, ClinicFlowError>> + Send;

    /// Get the most recent events, newest first, in append order.
    fn get_recent(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Event>, ClinicFlowError>> + Send;

    /// Find events about a specific patient, newest first.
    fn find_by_patient(
        &self,
        patient_id: &str,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Event>, ClinicFlowError>> + Send;

    /// Delete everything but the `keep` most recently appended events.
    ///
    /// Returns the number of events removed.
    fn prune(&self, keep: usize) -> impl Future<Output = Result<usize, ClinicFlowError>> + Send;
}
