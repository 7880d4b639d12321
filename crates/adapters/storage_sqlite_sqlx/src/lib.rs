//! # clinicflow-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the `EventStore` and `NotificationRepository` ports defined in
//!   `clinicflow-app::ports`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows
//!
//! ## Dependency rule
//! Depends on `clinicflow-app` (for port traits) and `clinicflow-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod error;
mod event_store;
mod notification_repo;
mod pool;

pub use error::StorageError;
pub use event_store::SqliteEventStore;
pub use notification_repo::SqliteNotificationRepository;
pub use pool::{Config, Database};
