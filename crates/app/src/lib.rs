//! # clinicflow-app
//!
//! Application layer — use-cases, the rule engine, and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `EventStore` — append, query, and prune the event log
//!   - `NotificationRepository` — CRUD for notifications
//!   - `EventPublisher` — broadcast events to subscribers
//!   - `ActionSink` — receive team alerts and task requests raised by rules
//!   - `Notifier` — raise user-facing notifications
//! - Define **driving/inbound ports** as use-case structs:
//!   - `EventService` — record and read events
//!   - `NotificationService` — notification center mutations
//!   - `RuleEngine` — match rules and dispatch actions
//! - Provide **in-process infrastructure** (event bus, tracing action sink)
//!
//! ## Dependency rule
//! Depends on `clinicflow-domain` only (plus `tokio::sync` for channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod action_log;
pub mod event_bus;
pub mod ports;
pub mod rule_engine;
pub mod services;
