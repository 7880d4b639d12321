//! Notifier port — raising user-facing notifications.

use std::future::Future;

use clinicflow_domain::error::ClinicFlowError;
use clinicflow_domain::notification::Notification;

/// Raises a notification in the notification center.
///
/// Implemented by
/// [`NotificationService`](crate::services::notification_service::NotificationService);
/// the rule engine only depends on this trait.
pub trait Notifier {
    /// Store and announce a notification, returning it as stored.
    fn notify(
        &self,
        notification: Notification,
    ) -> impl Future<Output = Result<Notification, ClinicFlowError>> + Send;
}

impl<T: Notifier + Send + Sync> Notifier for std::sync::Arc<T> {
    fn notify(
        &self,
        notification: Notification,
    ) -> impl Future<Output = Result<Notification, ClinicFlowError>> + Send {
        (**self).notify(notification)
    }
}
