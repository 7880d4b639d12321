//! Action sink port — downstream of the `NOTIFY_TEAM` and `CREATE_TASK` actions.
//!
//! No team-messaging or task store is defined by the core. Adapters decide
//! what an alert or a task request turns into; the in-process default just
//! logs them (see [`crate::action_log`]).

use std::future::Future;

use clinicflow_domain::error::ClinicFlowError;
use clinicflow_domain::event::Event;
use clinicflow_domain::id::{EventId, RuleId};
use clinicflow_domain::rule::Rule;

/// A care team must be alerted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamAlert {
    pub team_id: String,
    pub message: Option<String>,
    pub origin: ActionOrigin,
}

/// A follow-up task must be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRequest {
    pub title: String,
    pub assignee: Option<String>,
    pub origin: ActionOrigin,
}

/// The rule and event an action was dispatched for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOrigin {
    pub rule_id: RuleId,
    pub rule_name: String,
    pub event_id: EventId,
    pub workspace_id: String,
    pub patient_id: Option<String>,
}

impl ActionOrigin {
    #[must_use]
    pub fn new(rule: &Rule, event: &Event) -> Self {
        Self {
            rule_id: rule.id,
            rule_name: rule.name.clone(),
            event_id: event.id,
            workspace_id: event.workspace_id.clone(),
            patient_id: event.patient_id.clone(),
        }
    }
}

/// Receives the side effects of rule actions that leave the core.
pub trait ActionSink {
    /// Alert a care team.
    fn notify_team(
        &self,
        alert: TeamAlert,
    ) -> impl Future<Output = Result<(), ClinicFlowError>> + Send;

    /// Request creation of a follow-up task.
    fn create_task(
        &self,
        task: TaskRequest,
    ) -> impl Future<Output = Result<(), ClinicFlowError>> + Send;
}

impl<T: ActionSink + Send + Sync> ActionSink for std::sync::Arc<T> {
    fn notify_team(
        &self,
        alert: TeamAlert,
    ) -> impl Future<Output = Result<(), ClinicFlowError>> + Send {
        (**self).notify_team(alert)
    }

    fn create_task(
        &self,
        task: TaskRequest,
    ) -> impl Future<Output = Result<(), ClinicFlowError>> + Send {
        (**self).create_task(task)
    }
}
