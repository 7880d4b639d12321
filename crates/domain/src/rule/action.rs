//! Action — the effect performed when a rule fires.

use serde::{Deserialize, Serialize};

use crate::notification::{NotificationKind, Priority};

/// An operation to execute when a rule's event type matches and all
/// conditions are satisfied. Actions run in list order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    /// Alert a care team.
    #[serde(rename_all = "camelCase")]
    NotifyTeam {
        team_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    /// Open a follow-up task.
    #[serde(rename_all = "camelCase")]
    CreateTask {
        title: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        assignee: Option<String>,
    },
    /// Raise a user-facing notification.
    Notify {
        kind: NotificationKind,
        title: String,
        message: String,
        #[serde(default)]
        priority: Priority,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        link: Option<String>,
    },
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotifyTeam { team_id, .. } => write!(f, "NOTIFY_TEAM({team_id})"),
            Self::CreateTask { title, .. } => write!(f, "CREATE_TASK({title})"),
            Self::Notify { kind, title, .. } => write!(f, "NOTIFY({kind}, {title})"),
        }
    }
}
