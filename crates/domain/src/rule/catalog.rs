//! Built-in rules shipped with every deployment.
//!
//! These cover the clinical workflow transitions that raise notifications
//! and the critical-vitals escalation. Ids are fixed so that clients can
//! refer to them across restarts.

use crate::event::EventType;
use crate::id::RuleId;
use crate::notification::{NotificationKind, Priority};

use super::{Action, Condition, Rule};

pub const CRITICAL_VITALS: RuleId = RuleId::from_u128(0x5c1f_0a6e_0000_4000_8000_0000_0000_0001);
pub const BILLING_READY: RuleId = RuleId::from_u128(0x5c1f_0a6e_0000_4000_8000_0000_0000_0002);
pub const EMERGENCY_ALERT: RuleId = RuleId::from_u128(0x5c1f_0a6e_0000_4000_8000_0000_0000_0003);

/// Workflow step a patient reaches once care is complete.
pub const STEP_DONE: &str = "step-done";
/// Workflow step used for emergency escalation.
pub const STEP_EMERGENCY: &str = "step-emergency";

/// The default rule set, in evaluation order.
#[must_use]
pub fn builtin() -> Vec<Rule> {
    vec![critical_vitals(), billing_ready(), emergency_alert()]
}

/// `VitalsRecorded` with `critical == true` escalates to the emergency team.
#[must_use]
pub fn critical_vitals() -> Rule {
    Rule {
        id: CRITICAL_VITALS,
        name: "critical-vitals".to_string(),
        enabled: true,
        event_type: EventType::VitalsRecorded,
        conditions: vec![Condition::equals("critical", true)],
        actions: vec![
            Action::NotifyTeam {
                team_id: "urgence".to_string(),
                message: None,
            },
            Action::CreateTask {
                title: "Prise en charge patient critique".to_string(),
                assignee: None,
            },
        ],
    }
}

/// A patient moved to the done step is ready for invoicing.
#[must_use]
pub fn billing_ready() -> Rule {
    Rule {
        id: BILLING_READY,
        name: "billing-ready".to_string(),
        enabled: true,
        event_type: EventType::PatientMoved,
        conditions: vec![Condition::equals("toStepId", STEP_DONE)],
        actions: vec![Action::Notify {
            kind: NotificationKind::Billing,
            title: "Dossier prêt pour facturation".to_string(),
            message: "Le parcours du patient est terminé, la facture peut être émise.".to_string(),
            priority: Priority::Medium,
            link: Some("/billing".to_string()),
        }],
    }
}

/// A patient moved to the emergency step raises an urgent alert.
#[must_use]
pub fn emergency_alert() -> Rule {
    Rule {
        id: EMERGENCY_ALERT,
        name: "emergency-alert".to_string(),
        enabled: true,
        event_type: EventType::PatientMoved,
        conditions: vec![Condition::equals("toStepId", STEP_EMERGENCY)],
        actions: vec![Action::Notify {
            kind: NotificationKind::Emergency,
            title: "Alerte urgence".to_string(),
            message: "Un patient a été transféré vers l'étape urgence.".to_string(),
            priority: Priority::Urgent,
            link: Some("/workflow".to_string()),
        }],
    }
}
