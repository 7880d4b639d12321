//! `SQLite` implementation of [`NotificationRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use clinicflow_app::ports::NotificationRepository;
use clinicflow_domain::error::ClinicFlowError;
use clinicflow_domain::id::NotificationId;
use clinicflow_domain::notification::{Notification, NotificationKind, Priority};

use crate::error::{StorageError, decode_err, to_count, to_sql_limit};

struct Wrapper(Notification);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: uuid::Uuid = row.try_get("id")?;
        let kind: String = row.try_get("kind")?;
        let title: String = row.try_get("title")?;
        let message: String = row.try_get("message")?;
        let timestamp: String = row.try_get("timestamp")?;
        let read: bool = row.try_get("read")?;
        let priority: String = row.try_get("priority")?;
        let link: Option<String> = row.try_get("link")?;

        let kind: NotificationKind = kind.parse().map_err(decode_err)?;
        let priority: Priority = priority.parse().map_err(decode_err)?;
        let timestamp = chrono::DateTime::parse_from_rfc3339(&timestamp)
            .map_err(decode_err)?
            .to_utc();

        Ok(Self(Notification {
            id: NotificationId::from_uuid(id),
            kind,
            title,
            message,
            timestamp,
            read,
            priority,
            link,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO notifications (id, kind, title, message, timestamp, read, priority, link)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?)
";

const UPDATE: &str = r"
    UPDATE notifications
    SET kind = ?, title = ?, message = ?, timestamp = ?, read = ?, priority = ?, link = ?
    WHERE id = ?
";

const SELECT_BY_ID: &str = "SELECT * FROM notifications WHERE id = ?";
const SELECT_ALL: &str = "SELECT * FROM notifications ORDER BY seq DESC";
const COUNT_UNREAD: &str = "SELECT COUNT(*) FROM notifications WHERE read = 0";
const MARK_ALL_READ: &str = "UPDATE notifications SET read = 1 WHERE read = 0";
const DELETE_BY_ID: &str = "DELETE FROM notifications WHERE id = ?";
const DELETE_ALL: &str = "DELETE FROM notifications";
const PRUNE: &str = r"
    DELETE FROM notifications
    WHERE seq NOT IN (SELECT seq FROM notifications ORDER BY seq DESC LIMIT ?)
";

/// `SQLite`-backed notification center storage.
pub struct SqliteNotificationRepository {
    pool: SqlitePool,
}

impl SqliteNotificationRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl NotificationRepository for SqliteNotificationRepository {
    async fn create(&self, notification: Notification) -> Result<Notification, ClinicFlowError> {
        sqlx::query(INSERT)
            .bind(notification.id.as_uuid())
            .bind(notification.kind.as_str())
            .bind(&notification.title)
            .bind(&notification.message)
            .bind(notification.timestamp.to_rfc3339())
            .bind(notification.read)
            .bind(notification.priority.as_str())
            .bind(notification.link.as_deref())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(notification)
    }

    async fn get_by_id(&self, id: NotificationId) -> Result<Option<Notification>, ClinicFlowError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row.map(|w| w.0))
    }

    async fn get_all(&self) -> Result<Vec<Notification>, ClinicFlowError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn count_unread(&self) -> Result<usize, ClinicFlowError> {
        let (count,): (i64,) = sqlx::query_as(COUNT_UNREAD)
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(usize::try_from(count).unwrap_or_default())
    }

    async fn update(&self, notification: Notification) -> Result<Notification, ClinicFlowError> {
        let result = sqlx::query(UPDATE)
            .bind(notification.kind.as_str())
            .bind(&notification.title)
            .bind(&notification.message)
            .bind(notification.timestamp.to_rfc3339())
            .bind(notification.read)
            .bind(notification.priority.as_str())
            .bind(notification.link.as_deref())
            .bind(notification.id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        if result.rows_affected() == 0 {
            return Err(clinicflow_domain::error::NotFoundError {
                entity: "Notification",
                id: notification.id.to_string(),
            }
            .into());
        }

        Ok(notification)
    }

    async fn mark_all_read(&self) -> Result<usize, ClinicFlowError> {
        let result = sqlx::query(MARK_ALL_READ)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(to_count(result.rows_affected()))
    }

    async fn delete(&self, id: NotificationId) -> Result<(), ClinicFlowError> {
        let result = sqlx::query(DELETE_BY_ID)
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        if result.rows_affected() == 0 {
            return Err(clinicflow_domain::error::NotFoundError {
                entity: "Notification",
                id: id.to_string(),
            }
            .into());
        }

        Ok(())
    }

    async fn delete_all(&self) -> Result<usize, ClinicFlowError> {
        let result = sqlx::query(DELETE_ALL)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(to_count(result.rows_affected()))
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
