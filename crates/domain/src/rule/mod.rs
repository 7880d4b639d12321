//! Rule — event type → condition → action pipelines.
//!
//! A rule listens for one [`EventType`]. When an event of that type arrives,
//! every [`Condition`] is evaluated against the event payload and, if all
//! hold, the [`Action`]s run in order.

mod action;
pub mod catalog;
mod condition;

pub use action::Action;
pub use condition::{Condition, Operator};

use serde::{Deserialize, Serialize};

use crate::error::{ClinicFlowError, ValidationError};
use crate::event::{Event, EventType};
use crate::id::RuleId;

/// A declarative automation rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub id: RuleId,
    pub name: String,
    pub enabled: bool,
    pub event_type: EventType,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    pub actions: Vec<Action>,
}

impl Rule {
    /// Create a builder for constructing a [`Rule`].
    #[must_use]
    pub fn builder() -> RuleBuilder {
        RuleBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ClinicFlowError::Validation`] when:
    /// - `name` is empty ([`ValidationError::EmptyName`])
    /// - `actions` is empty ([`ValidationError::NoActions`])
    /// - a condition has an empty field ([`ValidationError::EmptyConditionField`])
    pub fn validate(&self) -> Result<(), ClinicFlowError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        if self.actions.is_empty() {
            return Err(ValidationError::NoActions.into());
        }
        if self.conditions.iter().any(|c| c.field.is_empty()) {
            return Err(ValidationError::EmptyConditionField.into());
        }
        Ok(())
    }

    /// Whether this rule listens for the event's type.
    #[must_use]
    pub fn listens_to(&self, event: &Event) -> bool {
        self.enabled && self.event_type == event.event_type
    }

    /// Whether this rule fires for `event`: matching type and every
    /// condition true (an empty condition list always holds).
    #[must_use]
    pub fn matches(&self, event: &Event) -> bool {
        self.listens_to(event) && self.conditions.iter().all(|c| c.evaluate(&event.payload))
    }
}

/// Step-by-step builder for [`Rule`].
#[derive(Debug, Default)]
pub struct RuleBuilder {
    id: Option<RuleId>,
    name: Option<String>,
    enabled: Option<bool>,
    event_type: Option<EventType>,
    conditions: Vec<Condition>,
    actions: Vec<Action>,
}

impl RuleBuilder {
    #[must_use]
    pub fn id(mut self, id: RuleId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    #[must_use]
    pub fn event_type(mut self, event_type: EventType) -> Self {
        self.event_type = Some(event_type);
        self
    }

    #[must_use]
    pub fn condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    #[must_use]
    pub fn action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    /// Consume the builder, validate, and return a [`Rule`].
    ///
    /// # Errors
    ///
    /// Returns [`ClinicFlowError::Validation`] if required fields are missing or empty.
    pub fn build(self) -> Result<Rule, ClinicFlowError> {
        let event_type = self.event_type.ok_or(ValidationError::MissingEventType)?;
        let rule = Rule {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            enabled: self.enabled.unwrap_or(true),
            event_type,
            conditions: self.conditions,
            actions: self.actions,
        };
        rule.validate()?;
        Ok(rule)
    }
}
