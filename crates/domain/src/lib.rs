//! # clinicflow-domain
//!
//! Pure domain model for the clinicflow automation core.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Events** (immutable records of what happened in a workspace)
//! - Define **Payload values** (typed key/value data carried by events)
//! - Define **Rules** (event type → condition → action pipelines)
//! - Define **Notifications** (user-facing messages raised by rules)
//! - Contain all invariant enforcement and condition evaluation
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod event;
pub mod notification;
pub mod rule;
pub mod value;
