//! Rule engine — reacts to events by evaluating rules and dispatching actions.
//!
//! The engine subscribes to the event bus and, for each incoming event,
//! checks every enabled rule listening to that event type. When all
//! conditions hold, the rule's actions run in order; the first failing
//! action aborts the rest of the event's processing.
//!
//! Each event is processed at most once: ids already handled are
//! remembered in a bounded window, so a redelivered event never raises
//! a second notification.

use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;

use clinicflow_domain::error::ClinicFlowError;
use clinicflow_domain::event::{Event, EventType};
use clinicflow_domain::id::{EventId, RuleId};
use clinicflow_domain::notification::Notification;
use clinicflow_domain::payload;
use clinicflow_domain::rule::{Action, Rule};
use tokio::sync::broadcast;

use crate::ports::{ActionOrigin, ActionSink, EventPublisher, Notifier, TaskRequest, TeamAlert};

/// Number of processed event ids remembered by default.
pub const DEFAULT_DEDUP_WINDOW: usize = 1024;

/// Reactive rule engine that subscribes to domain events.
pub struct RuleEngine<S, N, P> {
    rules: Vec<Rule>,
    sink: S,
    notifier: N,
    publisher: P,
    seen: Mutex<SeenEvents>,
}

impl<S, N, P> RuleEngine<S, N, P>
where
    S: ActionSink,
    N: Notifier,
    P: EventPublisher,
{
    /// Create a new engine over a fixed rule set, evaluated in order.
    pub fn new(rules: Vec<Rule>, sink: S, notifier: N, publisher: P) -> Self {
        Self::with_dedup_window(rules, sink, notifier, publisher, DEFAULT_DEDUP_WINDOW)
    }

    /// Create a new engine remembering the last `window` processed event ids.
    pub fn with_dedup_window(
        rules: Vec<Rule>,
        sink: S,
        notifier: N,
        publisher: P,
        window: usize,
    ) -> Self {
        Self {
            rules,
            sink,
            notifier,
            publisher,
            seen: Mutex::new(SeenEvents::new(window)),
        }
    }

    /// Process a single event against all enabled rules.
    ///
    /// Returns the ids of the rules whose actions ran. An event already
    /// processed returns an empty list without side effects.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by an action; remaining actions and
    /// rules for this event are skipped.
    #[tracing::instrument(skip(self, event), fields(event_id = %event.id, event_type = %event.event_type))]
    pub async fn process_event(&self, event: &Event) -> Result<Vec<RuleId>, ClinicFlowError> {
        if !self.first_sighting(event.id) {
            tracing::debug!("event already processed, skipping");
            return Ok(Vec::new());
        }

        let mut triggered = Vec::new();

        for rule in &self.rules {
            if !rule.matches(event) {
                continue;
            }

            tracing::info!(rule = %rule.name, "rule matched");
            self.execute_actions(rule, event).await?;

            // fire-and-forget
            let trigger_event = Event::new(
                EventType::RuleTriggered,
                event.workspace_id.clone(),
                payload! {
                    "ruleId" => rule.id.to_string(),
                    "ruleName" => rule.name.as_str(),
                    "eventId" => event.id.to_string(),
                },
            );
            let _ = self.publisher.publish(trigger_event).await;

            triggered.push(rule.id);
        }

        Ok(triggered)
    }

    /// Consume events from a bus subscription until the bus closes.
    ///
    /// Processing errors are logged and do not stop the loop.
    pub async fn run(&self, mut rx: broadcast::Receiver<Event>) {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    if let Err(err) = self.process_event(&event).await {
                        tracing::error!(event_id = %event.id, error = %err, "rule processing failed");
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "rule engine lagged behind the event bus");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("event bus closed, rule engine stopping");
                    break;
                }
            }
        }
    }

    fn first_sighting(&self, id: EventId) -> bool {
        match self.seen.lock() {
            Ok(mut seen) => seen.insert(id),
            Err(poisoned) => poisoned.into_inner().insert(id),
        }
    }

    /// Execute a rule's actions in order.
    async fn execute_actions(&self, rule: &Rule, event: &Event) -> Result<(), ClinicFlowError> {
        for action in &rule.actions {
            tracing::debug!(rule = %rule.name, %action, "executing action");
            self.execute_action(rule, event, action).await?;
        }
        Ok(())
    }

    async fn execute_action(
        &self,
        rule: &Rule,
        event: &Event,
        action: &Action,
    ) -> Result<(), ClinicFlowError> {
        match action {
            Action::NotifyTeam { team_id, message } => {
                self.sink
                    .notify_team(TeamAlert {
                        team_id: team_id.clone(),
                        message: message.clone(),
                        origin: ActionOrigin::new(rule, event),
                    })
                    .await
            }
            Action::CreateTask { title, assignee } => {
                self.sink
                    .create_task(TaskRequest {
                        title: title.clone(),
                        assignee: assignee.clone(),
                        origin: ActionOrigin::new(rule, event),
                    })
                    .await
            }
            Action::Notify {
                kind,
                title,
                message,
                priority,
                link,
            } => {
                let mut builder = Notification::builder()
                    .kind(*kind)
                    .title(title.as_str())
                    .message(message.as_str())
                    .priority(*priority);
                if let Some(link) = link {
                    builder = builder.link(link.as_str());
                }
                self.notifier.notify(builder.build()?).await?;
                Ok(())
            }
        }
    }
}

/// Bounded set of recently processed event ids, oldest evicted first.
struct SeenEvents {
    order: VecDeque<EventId>,
    ids: HashSet<EventId>,
    capacity: usize,
}

impl SeenEvents {
    fn new(capacity: usize) -> Self {
        Self {
            order: VecDeque::new(),
            ids: HashSet::new(),
            capacity: capacity.max(1),
        }
    }

    /// Returns `false` if `id` was already present.
    fn insert(&mut self, id: EventId) -> bool {
        if !self.ids.insert(id) {
            return false;
        }
        self.order.push_back(id);
        while self.order.len() > self.capacity {
            if let Some(evicted) = self.order.pop_front() {
                self.ids.remove(&evicted);
            }
        }
        true
    }
}
