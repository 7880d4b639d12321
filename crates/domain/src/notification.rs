//! Notification — a user-facing message surfaced in the notification center.

use serde::{Deserialize, Serialize};

use crate::error::{ClinicFlowError, ValidationError};
use crate::id::NotificationId;
use crate::time::Timestamp;

/// Category of a notification, used for display and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    #[default]
    Info,
    Success,
    Warning,
    Error,
    /// A patient file is ready to be invoiced.
    Billing,
    /// A patient was sent to the emergency step.
    Emergency,
}

impl NotificationKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Billing => "billing",
            Self::Emergency => "emergency",
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NotificationKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(Self::Info),
            "success" => Ok(Self::Success),
            "warning" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            "billing" => Ok(Self::Billing),
            "emergency" => Ok(Self::Emergency),
            other => Err(ValidationError::UnknownValue(other.to_string())),
        }
    }
}

/// Urgency of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl Priority {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            other => Err(ValidationError::UnknownValue(other.to_string())),
        }
    }
}

/// A message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub timestamp: Timestamp,
    pub read: bool,
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl Notification {
    /// Create a builder for constructing a [`Notification`].
    #[must_use]
    pub fn builder() -> NotificationBuilder {
        NotificationBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ClinicFlowError::Validation`] when `title` is empty.
    pub fn validate(&self) -> Result<(), ClinicFlowError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle.into());
        }
        Ok(())
    }

    /// Flag the notification as read. Returns `true` if it was unread.
    pub fn mark_read(&mut self) -> bool {
        !std::mem::replace(&mut self.read, true)
    }
}

/// Step-by-step builder for [`Notification`].
#[derive(Debug, Default)]
pub struct NotificationBuilder {
    id: Option<NotificationId>,
    kind: NotificationKind,
    title: Option<String>,
    message: Option<String>,
    timestamp: Option<Timestamp>,
    read: bool,
    priority: Priority,
    link: Option<String>,
}

impl NotificationBuilder {
    #[must_use]
    pub fn id(mut self, id: NotificationId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn kind(mut self, kind: NotificationKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    #[must_use]
    pub fn timestamp(mut self, ts: Timestamp) -> Self {
        self.timestamp = Some(ts);
        self
    }

    #[must_use]
    pub fn read(mut self, read: bool) -> Self {
        self.read = read;
        self
    }

    #[must_use]
    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// Consume the builder, validate, and return a [`Notification`].
    ///
    /// # Errors
    ///
    /// Returns [`ClinicFlowError::Validation`] if the title is missing or empty.
    pub fn build(self) -> Result<Notification, ClinicFlowError> {
        let notification = Notification {
            id: self.id.unwrap_or_default(),
            kind: self.kind,
            title: self.title.unwrap_or_default(),
            message: self.message.unwrap_or_default(),
            timestamp: self.timestamp.unwrap_or_else(crate::time::now),
            read: self.read,
            priority: self.priority,
            link: self.link,
        };
        notification.validate()?;
        Ok(notification)
    }
}
