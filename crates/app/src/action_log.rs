//! Action sink that records team alerts and task requests in the log.

use std::future::Future;

use clinicflow_domain::error::ClinicFlowError;

use crate::ports::{ActionSink, TaskRequest, TeamAlert};

/// [`ActionSink`] that emits a `tracing` record per action and does
/// nothing else.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingActionSink;

impl ActionSink for TracingActionSink {
    fn notify_team(
        &self,
        alert: TeamAlert,
    ) -> impl Future<Output = Result<(), ClinicFlowError>> + Send {
        tracing::info!(
            team_id = %alert.team_id,
            message = alert.message.as_deref().unwrap_or_default(),
            rule = %alert.origin.rule_name,
            event_id = %alert.origin.event_id,
            patient_id = alert.origin.patient_id.as_deref().unwrap_or_default(),
            "team notified"
        );
        async { Ok(()) }
    }

    fn create_task(
        &self,
        task: TaskRequest,
    ) -> impl Future<Output = Result<(), ClinicFlowError>> + Send {
        tracing::info!(
            title = %task.title,
            assignee = task.assignee.as_deref().unwrap_or_default(),
            rule = %task.origin.rule_name,
            event_id = %task.origin.event_id,
            patient_id = task.origin.patient_id.as_deref().unwrap_or_default(),
            "task created"
        );
        async { Ok(()) }
    }
}
