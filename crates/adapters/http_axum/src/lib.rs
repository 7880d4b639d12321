//! # clinicflow-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a **JSON API** over the event log, the rule catalog, and the
//!   notification center (`/api/events`, `/api/rules`, `/api/notifications`, …)
//! - Stream live bus traffic to clients as **Server-Sent Events**
//!   (`/api/events/stream`)
//! - Map HTTP requests into application service calls (driving adapter)
//! - Map application results and errors into HTTP responses
//!
//! ## Dependency rule
//! Depends on `clinicflow-app` (for port traits and services) and
//! `clinicflow-domain` (for domain types used in request/response mapping).
//! Never leaks axum types into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;
