//! `SQLite` implementation of [`EventStore`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use clinicflow_app::ports::EventStore;
use clinicflow_domain::error::ClinicFlowError;
use clinicflow_domain::event::{Event, EventType};
use clinicflow_domain::id::EventId;
use clinicflow_domain::value::Payload;

use crate::error::{StorageError, decode_err, to_count, to_sql_limit};

struct Wrapper(Event);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Event> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: uuid::Uuid = row.try_get("id")?;
        let event_type: String = row.try_get("event_type")?;
        let workspace_id: String = row.try_get("workspace_id")?;
        let patient_id: Option<String> = row.try_get("patient_id")?;
        let payload_json: String = row.try_get("payload")?;
        let created_at: String = row.try_get("created_at")?;

        let event_type: EventType = event_type.parse().map_err(decode_err)?;
        let payload: Payload = serde_json::from_str(&payload_json).map_err(decode_err)?;
        let created_at = chrono::DateTime::parse_from_rfc3339(&created_at)
            .map_err(decode_err)?
            .to_utc();

        Ok(Self(Event {
            id: EventId::from_uuid(id),
            event_type,
            workspace_id,
            patient_id,
            payload,
            created_at,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO events (id, event_type, workspace_id, patient_id, payload, created_at)
    VALUES (?, ?, ?, ?, ?, ?)
";

const SELECT_BY_ID: &str = "SELECT * FROM events WHERE id = ?";
const SELECT_RECENT: &str = "SELECT * FROM events ORDER BY seq DESC LIMIT ?";
const SELECT_BY_PATIENT: &str =
    "SELECT * FROM events WHERE patient_id = ? ORDER BY seq DESC LIMIT ?";
const PRUNE: &str = r"
    DELETE FROM events
    WHERE seq NOT IN (SELECT seq FROM events ORDER BY seq DESC LIMIT ?)
";

/// `SQLite`-backed event log.
///
/// Rows carry an autoincrement sequence so that append order survives
/// events sharing the same timestamp.
pub struct SqliteEventStore {
    pool: SqlitePool,
}

impl SqliteEventStore {
    /// Create a new event store using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl EventStore for SqliteEventStore {
    async fn store(&self, event: Event) -> Result<Event, ClinicFlowError> {
        let payload_json = serde_json::to_string(&event.payload).map_err(StorageError::from)?;

        sqlx::query(INSERT)
            .bind(event.id.as_uuid())
            .bind(event.event_type.as_str())
            .bind(&event.workspace_id)
            .bind(event.patient_id.as_deref())
            .bind(&payload_json)
            .bind(event.created_at.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(event)
    }

    async fn get_by_id(&self, id: EventId) -> Result<Option<Event>, ClinicFlowError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn get_recent(&self, limit: usize) -> Result<Vec<Event>, ClinicFlowError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_RECENT)
            .bind(to_sql_limit(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn find_by_patient(
        &self,
        patient_id: &str,
        limit: usize,
    ) -> Result<Vec<Event>, ClinicFlowError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_PATIENT)
            .bind(patient_id)
            .bind(to_sql_limit(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn prune(&self, keep: usize) -> Result<usize, ClinicFlowError> {
        let result = sqlx::query(PRUNE)
            .bind(to_sql_limit(keep))
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(to_count(result.rows_affected()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Config;
    use clinicflow_domain::payload;
    use clinicflow_domain::value::PayloadValue;

    async fn setup() -> SqliteEventStore {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap();
        SqliteEventStore::new(db.pool().clone())
    }

    fn moved(patient: &str, to: &str) -> Event {
        Event::new(EventType::PatientMoved, "ws-1", payload! { "toStepId" => to }).with_patient(patient)
    }

    #[tokio::test]
    async fn should_store_and_retrieve_event_by_id() {
        let store = setup().await;
        let event = moved("p-1", "step-done");
        let id = event.id;

        store.store(event.clone()).await.unwrap();

        let fetched = store.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(fetched.id, id);
        assert_eq!(fetched.event_type, EventType::PatientMoved);
        assert_eq!(fetched.workspace_id, "ws-1");
        assert_eq!(fetched.patient_id.as_deref(), Some("p-1"));
        assert_eq!(fetched.payload, event.payload);
    }

    #[tokio::test]
    async fn should_return_none_when_event_not_found() {
        let store = setup().await;
        let result = store.get_by_id(EventId::new()).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn should_store_event_without_patient() {
        let store = setup().await;
        let event = Event::new(EventType::BedAssigned, "ws-1", payload! { "bed" => "B12" });
        let id = event.id;

        store.store(event).await.unwrap();

        let fetched = store.get_by_id(id).await.unwrap().unwrap();
        assert!(fetched.patient_id.is_none());
    }

    #[tokio::test]
    async fn should_get_recent_events_ordered_newest_first() {
        let store = setup().await;
        let first = store.store(moved("p-1", "step-triage")).await.unwrap();
        let second = store.store(moved("p-2", "step-triage")).await.unwrap();
        let third = store.store(moved("p-3", "step-triage")).await.unwrap();

        let recent = store.get_recent(2).await.unwrap();

        let ids: Vec<_> = recent.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![third.id, second.id]);
        assert_ne!(ids[1], first.id);
    }

    #[tokio::test]
    async fn should_find_events_by_patient() {
        let store = setup().await;
        store.store(moved("p-1", "step-triage")).await.unwrap();
        store.store(moved("p-2", "step-triage")).await.unwrap();
        store.store(moved("p-1", "step-done")).await.unwrap();

        let events = store.find_by_patient("p-1", 10).await.unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(
            events[0].field("toStepId").and_then(PayloadValue::as_str),
            Some("step-done")
        );
        assert!(store.find_by_patient("p-9", 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_prune_oldest_events_beyond_keep() {
        let store = setup().await;
        let mut ids = Vec::new();
        for _ in 0..5 {
            ids.push(store.store(moved("p-1", "step-triage")).await.unwrap().id);
        }

        let removed = store.prune(2).await.unwrap();

        assert_eq!(removed, 3);
        let remaining: Vec<_> = store.get_recent(10).await.unwrap().iter().map(|e| e.id).collect();
        assert_eq!(remaining, vec![ids[4], ids[3]]);
        assert_eq!(store.prune(2).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn should_preserve_typed_payload_through_storage() {
        let store = setup().await;
        let event = Event::new(
            EventType::VitalsRecorded,
            "ws-1",
            payload! {
                "critical" => true,
                "heartRate" => 180_i64,
                "temperature" => 39.5,
                "flags" => vec!["fever", "tachycardia"],
            },
        );
        let id = event.id;

        store.store(event).await.unwrap();

        let fetched = store.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(fetched.field("critical"), Some(&PayloadValue::Bool(true)));
        assert_eq!(fetched.field("heartRate"), Some(&PayloadValue::Int(180)));
        assert_eq!(fetched.field("temperature"), Some(&PayloadValue::Float(39.5)));
        assert!(
            fetched
                .field("flags")
                .is_some_and(|flags| flags.list_contains(&PayloadValue::from("fever")))
        );
    }
}
