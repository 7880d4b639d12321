//! Notification repository port — persistence for the notification center.

use std::future::Future;

use clinicflow_domain::error::ClinicFlowError;
use clinicflow_domain::id::NotificationId;
use clinicflow_domain::notification::Notification;

/// Repository for persisting and querying [`Notification`]s.
pub trait NotificationRepository {
    /// Create a new notification in storage.
    fn create(
        &self,
        notification: Notification,
    ) -> impl Future<Output = Result<Notification, ClinicFlowError>> + Send;

    /// Get a notification by its unique identifier.
    fn get_by_id(
        &self,
        id: NotificationId,
    ) -> impl Future<Output = Result<Option<Notification>, ClinicFlowError>> + Send;

    /// Get all notifications, newest first.
    fn get_all(&self) -> impl Future<Output = Result<Vec<Notification>, ClinicFlowError>> + Send;

    /// Count notifications not yet read.
    fn count_unread(&self) -> impl Future<Output = Result<usize, ClinicFlowError>> + Send;

    /// Update an existing notification.
    fn update(
        &self,
        notification: Notification,
    ) -> impl Future<Output = Result<Notification, ClinicFlowError>> + Send;

    /// Flag every notification as read. Returns how many changed.
    fn mark_all_read(&self) -> impl Future<Output = Result<usize, ClinicFlowError>> + Send;

    /// Delete a notification by its unique identifier.
    fn delete(&self, id: NotificationId)
    -> impl Future<Output = Result<(), ClinicFlowError>> + Send;

    /// Delete every notification. Returns how many were removed.
    fn delete_all(&self) -> impl Future<Output = Result<usize, ClinicFlowError>> + Send;

    /// Delete everything but the `keep` most recently created notifications.
    fn prune(&self, keep: usize) -> impl Future<Output = Result<usize, ClinicFlowError>> + Send;
}
