//! Notification service — the notification center's mutation API.

use std::future::Future;

use clinicflow_domain::error::{ClinicFlowError, NotFoundError};
use clinicflow_domain::event::{Event, EventType, SYSTEM_WORKSPACE};
use clinicflow_domain::id::NotificationId;
use clinicflow_domain::notification::Notification;
use clinicflow_domain::payload;

use crate::ports::{EventPublisher, NotificationRepository, Notifier};

/// Application service owning notification creation, read state, and deletion.
pub struct NotificationService<R, P> {
    repo: R,
    publisher: P,
    capacity: usize,
}

impl<R, P> NotificationService<R, P>
where
    R: NotificationRepository,
    P: EventPublisher,
{
    /// Create a new service keeping at most `capacity` notifications.
    pub fn new(repo: R, publisher: P, capacity: usize) -> Self {
        Self {
            repo,
            publisher,
            capacity,
        }
    }

    /// Store a notification, trim the oldest beyond capacity, and announce
    /// it on the bus with a `NOTIFICATION_CREATED` event.
    ///
    /// # Errors
    ///
    /// Returns [`ClinicFlowError::Validation`] if invariants fail, or a
    /// storage error propagated from the repository.
    #[tracing::instrument(skip(self, notification), fields(title = %notification.title, kind = %notification.kind))]
    pub async fn create_notification(
        &self,
        notification: Notification,
    ) -> Result<Notification, ClinicFlowError> {
        notification.validate()?;
        let created = self.repo.create(notification).await?;

        match self.repo.prune(self.capacity).await {
            Ok(0) => {}
            Ok(pruned) => {
                tracing::debug!(pruned, capacity = self.capacity, "notifications trimmed");
            }
            Err(err) => tracing::warn!(error = %err, "failed to trim notifications"),
        }

        let announcement = Event::new(
            EventType::NotificationCreated,
            SYSTEM_WORKSPACE,
            payload! {
                "notificationId" => created.id.to_string(),
                "type" => created.kind.as_str(),
                "priority" => created.priority.as_str(),
                "title" => created.title.as_str(),
            },
        );
        // announcement is best-effort; the notification is already stored
        let _ = self.publisher.publish(announcement).await;

        Ok(created)
    }

    /// Look up a notification by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`ClinicFlowError::NotFound`] when no notification with `id`
    /// exists, or a storage error from the repository.
    pub async fn get_notification(
        &self,
        id: NotificationId,
    ) -> Result<Notification, ClinicFlowError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Notification",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// List all notifications, newest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_notifications(&self) -> Result<Vec<Notification>, ClinicFlowError> {
        self.repo.get_all().await
    }

    /// Number of unread notifications.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn unread_count(&self) -> Result<usize, ClinicFlowError> {
        self.repo.count_unread().await
    }

    /// Mark one notification as read. Marking an already-read notification
    /// is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`ClinicFlowError::NotFound`] if the notification does not
    /// exist, or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn mark_read(&self, id: NotificationId) -> Result<Notification, ClinicFlowError> {
        let mut notification = self.get_notification(id).await?;
        if notification.mark_read() {
            return self.repo.update(notification).await;
        }
        Ok(notification)
    }

    /// Mark every notification as read. Returns how many changed.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn mark_all_read(&self) -> Result<usize, ClinicFlowError> {
        self.repo.mark_all_read().await
    }

    /// Delete one notification.
    ///
    /// # Errors
    ///
    /// Returns [`ClinicFlowError::NotFound`] if the notification does not
    /// exist, or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn delete_notification(&self, id: NotificationId) -> Result<(), ClinicFlowError> {
        self.get_notification(id).await?;
        self.repo.delete(id).await
    }

    /// Delete every notification. Returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn clear(&self) -> Result<usize, ClinicFlowError> {
        self.repo.delete_all().await
    }
}

impl<R, P> Notifier for NotificationService<R, P>
where
    R: NotificationRepository + Send + Sync,
    P: EventPublisher + Send + Sync,
{
    fn notify(
        &self,
        notification: Notification,
    ) -> impl Future<Output = Result<Notification, ClinicFlowError>> + Send {
        self.create_notification(notification)
    }
}
