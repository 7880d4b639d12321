//! Event — an immutable record of something that happened in a workspace.
//!
//! Events are produced by user actions (a patient moved on the workflow
//! board, vitals recorded, …) and by the automation pipeline itself
//! (rule triggered, notification created). They are appended to the event
//! log and broadcast on the event bus.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ClinicFlowError, ValidationError};
use crate::id::EventId;
use crate::time::Timestamp;
use crate::value::{Payload, PayloadValue};

/// Workspace used for events the system emits on its own behalf.
pub const SYSTEM_WORKSPACE: &str = "system";

/// Closed set of event kinds understood by the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    /// A patient card moved between workflow steps.
    #[serde(rename = "PATIENT_MOVED")]
    PatientMoved,
    /// A set of vital signs was recorded for a patient.
    #[serde(rename = "VitalsRecorded")]
    VitalsRecorded,
    #[serde(rename = "PATIENT_ADMITTED")]
    PatientAdmitted,
    #[serde(rename = "PATIENT_DISCHARGED")]
    PatientDischarged,
    #[serde(rename = "BED_ASSIGNED")]
    BedAssigned,
    /// Emitted on the bus when a notification is stored.
    #[serde(rename = "NOTIFICATION_CREATED")]
    NotificationCreated,
    /// Emitted on the bus after a rule ran its actions.
    #[serde(rename = "RULE_TRIGGERED")]
    RuleTriggered,
}

impl EventType {
    /// Wire name of the event type.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PatientMoved => "PATIENT_MOVED",
            Self::VitalsRecorded => "VitalsRecorded",
            Self::PatientAdmitted => "PATIENT_ADMITTED",
            Self::PatientDischarged => "PATIENT_DISCHARGED",
            Self::BedAssigned => "BED_ASSIGNED",
            Self::NotificationCreated => "NOTIFICATION_CREATED",
            Self::RuleTriggered => "RULE_TRIGGERED",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing an unknown event type name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown event type {0:?}")]
pub struct UnknownEventType(pub String);

impl FromStr for EventType {
    type Err = UnknownEventType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PATIENT_MOVED" => Ok(Self::PatientMoved),
            "VitalsRecorded" => Ok(Self::VitalsRecorded),
            "PATIENT_ADMITTED" => Ok(Self::PatientAdmitted),
            "PATIENT_DISCHARGED" => Ok(Self::PatientDischarged),
            "BED_ASSIGNED" => Ok(Self::BedAssigned),
            "NOTIFICATION_CREATED" => Ok(Self::NotificationCreated),
            "RULE_TRIGGERED" => Ok(Self::RuleTriggered),
            other => Err(UnknownEventType(other.to_string())),
        }
    }
}

/// A domain event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub workspace_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
    #[serde(default)]
    pub payload: Payload,
    pub created_at: Timestamp,
}

impl Event {
    /// Create a new event stamped with a fresh id and the current time.
    #[must_use]
    pub fn new(event_type: EventType, workspace_id: impl Into<String>, payload: Payload) -> Self {
        Self {
            id: EventId::new(),
            event_type,
            workspace_id: workspace_id.into(),
            patient_id: None,
            payload,
            created_at: crate::time::now(),
        }
    }

    /// Attach the patient this event is about.
    #[must_use]
    pub fn with_patient(mut self, patient_id: impl Into<String>) -> Self {
        self.patient_id = Some(patient_id.into());
        self
    }

    /// Look up a payload field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&PayloadValue> {
        self.payload.get(name)
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ClinicFlowError::Validation`] when `workspace_id` is empty.
    pub fn validate(&self) -> Result<(), ClinicFlowError> {
        if self.workspace_id.trim().is_empty() {
            return Err(ValidationError::EmptyWorkspace.into());
        }
        Ok(())
    }
}

/// Build a [`Payload`] from `key => value` pairs.
///
/// ```
/// use clinicflow_domain::payload;
///
/// let p = payload! { "critical" => true, "heartRate" => 180_i64 };
/// assert_eq!(p.len(), 2);
/// ```
#[macro_export]
macro_rules! payload {
    () => { $crate::value::Payload::new() };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::value::Payload::new();
        $(map.insert(String::from($key), $crate::value::PayloadValue::from($value));)+
        map
    }};
}
