use std::path::Path;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row, ToSql};
use thiserror::Error;
use tokio::task;
use tracing::info;
use uuid::Uuid;

use backend_domain::ports::{
    CasOutcome, EventRepository, ScooterRepository, TelemetryRepository, UserRepository,
};
use backend_domain::{
    BoundingBox, DbConfig, Event, EventId, EventType, NewEvent, Scooter, ScooterId,
    ScooterStatus, ScooterTelemetry, User, UserId, Version,
};

use crate::config::IN_MEMORY_DATABASE;
use crate::utils::{millis_to_utc, utc_to_millis};

const CREATE_USERS: &str = "
CREATE TABLE IF NOT EXISTS users (
    id          TEXT PRIMARY KEY,
    created_ms  INTEGER NOT NULL
)";

// user_id is NULL exactly when status is 'free'.
const CREATE_SCOOTERS: &str = "
CREATE TABLE IF NOT EXISTS scooters (
    id          TEXT PRIMARY KEY,
    status      TEXT NOT NULL CHECK (status IN ('free', 'occupied')),
    user_id     TEXT,
    version     TEXT NOT NULL,
    created_ms  INTEGER NOT NULL,
    updated_ms  INTEGER NOT NULL
)";

// AUTOINCREMENT keeps ids from being reused after deletes.
const CREATE_EVENTS: &str = "
CREATE TABLE IF NOT EXISTS events (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    scooter_id  TEXT NOT NULL REFERENCES scooters(id) ON DELETE CASCADE,
    user_id     TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    event_type  TEXT NOT NULL,
    latitude    REAL NOT NULL,
    longitude   REAL NOT NULL,
    created_ms  INTEGER NOT NULL
)";

const CREATE_INDEXES: &str = "
CREATE INDEX IF NOT EXISTS idx_scooters_status ON scooters(status);
CREATE INDEX IF NOT EXISTS idx_scooters_user ON scooters(user_id);
CREATE INDEX IF NOT EXISTS idx_events_scooter_latest ON events(scooter_id, id);
CREATE INDEX IF NOT EXISTS idx_events_user ON events(user_id);
CREATE INDEX IF NOT EXISTS idx_events_position ON events(latitude, longitude);
CREATE INDEX IF NOT EXISTS idx_events_created ON events(created_ms ASC);
";

const SCOOTER_COLUMNS: &str = "id, status, user_id, version, created_ms, updated_ms";
const EVENT_COLUMNS: &str =
    "id, scooter_id, user_id, event_type, latitude, longitude, created_ms";

/// SQLite-backed implementation of every storage port.
///
/// One connection behind a mutex; statements run on the blocking pool.
/// Version checks are a single `UPDATE ... WHERE id = ? AND version = ?`
/// so the compare and the swap cannot interleave with another writer.
#[derive(Clone)]
pub struct SqliteRepo {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteRepo {
    pub fn open(config: &DbConfig) -> Result<Self> {
        if config.database_path == IN_MEMORY_DATABASE {
            return Self::in_memory();
        }
        if let Some(parent) = Path::new(&config.database_path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(&config.database_path)?;
        conn.execute_batch("PRAGMA journal_mode = WAL")?;
        conn.execute_batch("PRAGMA synchronous = NORMAL")?;
        let repo = Self::from_connection(conn)?;
        info!("sqlite store opened at {}", config.database_path);
        Ok(repo)
    }

    pub fn in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON")?;
        ensure_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    async fn run<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> rusqlite::Result<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        task::spawn_blocking(move || {
            let mut guard = conn
                .lock()
                .map_err(|_| anyhow!("sqlite connection mutex poisoned"))?;
            op(&mut guard).map_err(anyhow::Error::from)
        })
        .await
        .map_err(|err| anyhow!("sqlite task failed: {}", err))?
    }
}

fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(CREATE_USERS, [])?;
    conn.execute(CREATE_SCOOTERS, [])?;
    conn.execute(CREATE_EVENTS, [])?;
    conn.execute_batch(CREATE_INDEXES)
}

fn conversion_error<E>(idx: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

fn uuid_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Uuid> {
    let raw: String = row.get(idx)?;
    Uuid::parse_str(&raw).map_err(|err| conversion_error(idx, err))
}

#[derive(Debug, Error)]
#[error("stored timestamp {0}ms is out of range")]
struct TimestampOutOfRange(i64);

fn utc_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let ms: i64 = row.get(idx)?;
    millis_to_utc(ms).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Integer,
            Box::new(TimestampOutOfRange(ms)),
        )
    })
}

// Column order follows SCOOTER_COLUMNS, starting at `base`.
fn scooter_at(row: &Row<'_>, base: usize) -> rusqlite::Result<Scooter> {
    let status: String = row.get(base + 1)?;
    let status =
        ScooterStatus::from_str(&status).map_err(|err| conversion_error(base + 1, err))?;
    let user_id = match row.get::<_, Option<String>>(base + 2)? {
        Some(raw) => Some(UserId(
            Uuid::parse_str(&raw).map_err(|err| conversion_error(base + 2, err))?,
        )),
        None => None,
    };
    Ok(Scooter {
        id: ScooterId(uuid_at(row, base)?),
        status,
        user_id,
        version: Version(uuid_at(row, base + 3)?),
        created_at: utc_at(row, base + 4)?,
        updated_at: utc_at(row, base + 5)?,
    })
}

// Column order follows EVENT_COLUMNS, starting at `base`.
fn event_at(row: &Row<'_>, base: usize) -> rusqlite::Result<Event> {
    let event_type: String = row.get(base + 3)?;
    let event_type =
        EventType::from_str(&event_type).map_err(|err| conversion_error(base + 3, err))?;
    Ok(Event {
        id: EventId(row.get(base)?),
        scooter_id: ScooterId(uuid_at(row, base + 1)?),
        user_id: UserId(uuid_at(row, base + 2)?),
        event_type,
        latitude: row.get(base + 4)?,
        longitude: row.get(base + 5)?,
        created_at: utc_at(row, base + 6)?,
    })
}

fn delete_keys<K: ToSql>(
    conn: &mut Connection,
    table: &str,
    keys: Vec<K>,
) -> rusqlite::Result<u64> {
    let tx = conn.transaction()?;
    let mut removed = 0u64;
    {
        let sql = format!("DELETE FROM {} WHERE id = ?1", table);
        let mut stmt = tx.prepare(&sql)?;
        for key in &keys {
            removed += stmt.execute(params![key])? as u64;
        }
    }
    tx.commit()?;
    Ok(removed)
}

#[async_trait]
impl ScooterRepository for SqliteRepo {
    async fn create(&self, scooter: &Scooter) -> Result<()> {
        let scooter = scooter.clone();
        self.run(move |conn| {
            conn.execute(
                "INSERT INTO scooters (id, status, user_id, version, created_ms, updated_ms)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    scooter.id.to_string(),
                    scooter.status.as_str(),
                    scooter.user_id.map(|id| id.to_string()),
                    scooter.version.to_string(),
                    utc_to_millis(&scooter.created_at),
                    utc_to_millis(&scooter.updated_at),
                ],
            )
            .map(|_| ())
        })
        .await
    }

    async fn find_by_id(&self, id: &ScooterId) -> Result<Option<Scooter>> {
        let key = id.to_string();
        self.run(move |conn| {
            conn.query_row(
                &format!("SELECT {} FROM scooters WHERE id = ?1", SCOOTER_COLUMNS),
                params![key],
                |row| scooter_at(row, 0),
            )
            .optional()
        })
        .await
    }

    async fn find_all(&self) -> Result<Vec<Scooter>> {
        self.run(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM scooters ORDER BY created_ms, id",
                SCOOTER_COLUMNS
            ))?;
            let rows = stmt.query_map([], |row| scooter_at(row, 0))?;
            rows.collect()
        })
        .await
    }

    async fn find_by_status(&self, status: ScooterStatus) -> Result<Vec<Scooter>> {
        self.run(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM scooters WHERE status = ?1 ORDER BY created_ms, id",
                SCOOTER_COLUMNS
            ))?;
            let rows = stmt.query_map(params![status.as_str()], |row| scooter_at(row, 0))?;
            rows.collect()
        })
        .await
    }

    async fn update_with_version(
        &self,
        scooter: &Scooter,
        expected: &Version,
    ) -> Result<CasOutcome> {
        let scooter = scooter.clone();
        let expected = expected.to_string();
        self.run(move |conn| {
            let changed = conn.execute(
                "UPDATE scooters
                 SET status = ?3, user_id = ?4, version = ?5, updated_ms = ?6
                 WHERE id = ?1 AND version = ?2",
                params![
                    scooter.id.to_string(),
                    expected,
                    scooter.status.as_str(),
                    scooter.user_id.map(|id| id.to_string()),
                    scooter.version.to_string(),
                    utc_to_millis(&scooter.updated_at),
                ],
            )?;
            Ok(if changed == 1 {
                CasOutcome::Applied
            } else {
                CasOutcome::Stale
            })
        })
        .await
    }

    async fn delete_by_ids(&self, ids: &[ScooterId]) -> Result<u64> {
        let keys: Vec<String> = ids.iter().map(ToString::to_string).collect();
        self.run(move |conn| delete_keys(conn, "scooters", keys)).await
    }

    async fn ping(&self) -> Result<()> {
        self.run(|conn| conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0)))
            .await
            .map(|_| ())
    }
}

#[async_trait]
impl EventRepository for SqliteRepo {
    async fn append(&self, event: &NewEvent) -> Result<Event> {
        let event = event.clone();
        self.run(move |conn| {
            conn.execute(
                "INSERT INTO events (scooter_id, user_id, event_type, latitude, longitude, created_ms)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    event.scooter_id.to_string(),
                    event.user_id.to_string(),
                    event.event_type.as_str(),
                    event.latitude,
                    event.longitude,
                    utc_to_millis(&event.created_at),
                ],
            )?;
            let id = EventId(conn.last_insert_rowid());
            Ok(event.into_event(id))
        })
        .await
    }

    async fn find_all(&self) -> Result<Vec<Event>> {
        self.run(|conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {} FROM events ORDER BY id", EVENT_COLUMNS))?;
            let rows = stmt.query_map([], |row| event_at(row, 0))?;
            rows.collect()
        })
        .await
    }

    async fn latest_for(&self, scooter_id: &ScooterId) -> Result<Option<Event>> {
        let key = scooter_id.to_string();
        self.run(move |conn| {
            conn.query_row(
                &format!(
                    "SELECT {} FROM events WHERE scooter_id = ?1 ORDER BY id DESC LIMIT 1",
                    EVENT_COLUMNS
                ),
                params![key],
                |row| event_at(row, 0),
            )
            .optional()
        })
        .await
    }

    async fn delete_by_ids(&self, ids: &[EventId]) -> Result<u64> {
        let keys: Vec<i64> = ids.iter().map(|id| id.0).collect();
        self.run(move |conn| delete_keys(conn, "events", keys)).await
    }
}

#[async_trait]
impl TelemetryRepository for SqliteRepo {
    async fn latest_by_status_within(
        &self,
        status: ScooterStatus,
        bbox: &BoundingBox,
    ) -> Result<Vec<ScooterTelemetry>> {
        let bbox = *bbox;
        self.run(move |conn| {
            let sql = format!(
                "SELECT s.{scooter}, e.{event}
                 FROM scooters s
                 JOIN events e
                   ON e.id = (SELECT MAX(latest.id) FROM events latest WHERE latest.scooter_id = s.id)
                 WHERE s.status = ?1
                   AND e.latitude BETWEEN ?2 AND ?3
                   AND e.longitude BETWEEN ?4 AND ?5
                 ORDER BY e.id ASC",
                scooter = SCOOTER_COLUMNS.replace(", ", ", s."),
                event = EVENT_COLUMNS.replace(", ", ", e."),
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(
                params![
                    status.as_str(),
                    bbox.min_latitude,
                    bbox.max_latitude,
                    bbox.min_longitude,
                    bbox.max_longitude,
                ],
                |row| {
                    Ok(ScooterTelemetry {
                        scooter: scooter_at(row, 0)?,
                        latest_event: event_at(row, 6)?,
                    })
                },
            )?;
            rows.collect()
        })
        .await
    }
}

#[async_trait]
impl UserRepository for SqliteRepo {
    async fn create(&self, user: &User) -> Result<()> {
        let user = user.clone();
        self.run(move |conn| {
            conn.execute(
                "INSERT INTO users (id, created_ms) VALUES (?1, ?2)",
                params![user.id.to_string(), utc_to_millis(&user.created_at)],
            )
            .map(|_| ())
        })
        .await
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>> {
        let key = id.to_string();
        self.run(move |conn| {
            conn.query_row(
                "SELECT id, created_ms FROM users WHERE id = ?1",
                params![key],
                |row| {
                    Ok(User {
                        id: UserId(uuid_at(row, 0)?),
                        created_at: utc_at(row, 1)?,
                    })
                },
            )
            .optional()
        })
        .await
    }

    async fn delete_by_ids(&self, ids: &[UserId]) -> Result<u64> {
        let keys: Vec<String> = ids.iter().map(ToString::to_string).collect();
        self.run(move |conn| delete_keys(conn, "users", keys)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Seeded {
        repo: SqliteRepo,
        user: User,
    }

    async fn seeded() -> Seeded {
        let repo = SqliteRepo::in_memory().expect("open sqlite");
        let user = User::new(Utc::now());
        UserRepository::create(&repo, &user).await.expect("user");
        Seeded { repo, user }
    }

    async fn occupied_scooter(seed: &Seeded) -> Scooter {
        let free = Scooter::new_free(Utc::now());
        ScooterRepository::create(&seed.repo, &free).await.expect("scooter");
        let occupied = free.occupied_by(seed.user.id, Utc::now());
        let outcome = seed
            .repo
            .update_with_version(&occupied, &free.version)
            .await
            .expect("cas");
        assert_eq!(outcome, CasOutcome::Applied);
        occupied
    }

    async fn append_at(seed: &Seeded, scooter: &Scooter, latitude: f64, longitude: f64) -> Event {
        seed.repo
            .append(&NewEvent {
                scooter_id: scooter.id,
                user_id: seed.user.id,
                event_type: EventType::LocationUpdate,
                latitude,
                longitude,
                created_at: Utc::now(),
            })
            .await
            .expect("append")
    }

    #[tokio::test]
    async fn scooter_round_trips_through_storage() {
        let seed = seeded().await;
        let scooter = occupied_scooter(&seed).await;
        let stored = ScooterRepository::find_by_id(&seed.repo, &scooter.id)
            .await
            .expect("load")
            .expect("exists");
        assert_eq!(stored, scooter);

        let user = UserRepository::find_by_id(&seed.repo, &seed.user.id)
            .await
            .expect("load user")
            .expect("user exists");
        assert_eq!(user, seed.user);
    }

    #[tokio::test]
    async fn listed_event_equals_appended_event() {
        let seed = seeded().await;
        let scooter = occupied_scooter(&seed).await;
        let appended = append_at(&seed, &scooter, 48.8566, 2.3522).await;
        let listed = EventRepository::find_all(&seed.repo).await.expect("events");
        assert_eq!(listed, vec![appended]);
    }

    #[tokio::test]
    async fn unrepresentable_stored_timestamp_is_a_read_error() {
        let seed = seeded().await;
        let key = seed.user.id.to_string();
        seed.repo
            .run(move |conn| {
                conn.execute(
                    "UPDATE users SET created_ms = ?2 WHERE id = ?1",
                    params![key, i64::MAX],
                )
            })
            .await
            .expect("corrupt row");

        let err = UserRepository::find_by_id(&seed.repo, &seed.user.id)
            .await
            .expect_err("out of range");
        assert!(err.to_string().contains("out of range"), "{err}");
    }

    #[tokio::test]
    async fn stale_version_does_not_write() {
        let seed = seeded().await;
        let free = Scooter::new_free(Utc::now());
        ScooterRepository::create(&seed.repo, &free).await.expect("scooter");

        let outcome = seed
            .repo
            .update_with_version(&free.occupied_by(seed.user.id, Utc::now()), &Version::fresh())
            .await
            .expect("cas");
        assert_eq!(outcome, CasOutcome::Stale);

        let stored = ScooterRepository::find_by_id(&seed.repo, &free.id)
            .await
            .expect("load")
            .expect("exists");
        assert_eq!(stored.status, ScooterStatus::Free);
        assert_eq!(stored.user_id, None);
        assert_eq!(stored.version, free.version);
    }

    #[tokio::test]
    async fn update_of_missing_scooter_is_stale() {
        let seed = seeded().await;
        let ghost = Scooter::new_free(Utc::now());
        let outcome = seed
            .repo
            .update_with_version(&ghost, &ghost.version)
            .await
            .expect("cas");
        assert_eq!(outcome, CasOutcome::Stale);
    }

    #[tokio::test]
    async fn find_by_status_filters() {
        let seed = seeded().await;
        let occupied = occupied_scooter(&seed).await;
        let free = Scooter::new_free(Utc::now());
        ScooterRepository::create(&seed.repo, &free).await.expect("scooter");

        let free_ids: Vec<_> = seed
            .repo
            .find_by_status(ScooterStatus::Free)
            .await
            .expect("free")
            .into_iter()
            .map(|scooter| scooter.id)
            .collect();
        assert_eq!(free_ids, vec![free.id]);

        let occupied_ids: Vec<_> = seed
            .repo
            .find_by_status(ScooterStatus::Occupied)
            .await
            .expect("occupied")
            .into_iter()
            .map(|scooter| scooter.id)
            .collect();
        assert_eq!(occupied_ids, vec![occupied.id]);
    }

    #[tokio::test]
    async fn append_assigns_increasing_ids_and_latest_picks_highest() {
        let seed = seeded().await;
        let scooter = occupied_scooter(&seed).await;
        let first = append_at(&seed, &scooter, 1.0, 1.0).await;
        let second = append_at(&seed, &scooter, 2.0, 2.0).await;
        assert!(first.id < second.id);

        let latest = seed
            .repo
            .latest_for(&scooter.id)
            .await
            .expect("latest")
            .expect("exists");
        assert_eq!(latest, second);
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let seed = seeded().await;
        let scooter = occupied_scooter(&seed).await;
        let first = append_at(&seed, &scooter, 1.0, 1.0).await;
        let removed = EventRepository::delete_by_ids(&seed.repo, &[first.id])
            .await
            .expect("delete");
        assert_eq!(removed, 1);
        let next = append_at(&seed, &scooter, 1.0, 1.0).await;
        assert!(next.id > first.id);
    }

    #[tokio::test]
    async fn telemetry_uses_latest_event_only() {
        let seed = seeded().await;
        let scooter = occupied_scooter(&seed).await;
        append_at(&seed, &scooter, 10.0, 10.0).await;
        append_at(&seed, &scooter, 50.0, 50.0).await;

        let old_area = BoundingBox::new(9.0, 9.0, 11.0, 11.0);
        let found = seed
            .repo
            .latest_by_status_within(ScooterStatus::Occupied, &old_area)
            .await
            .expect("query");
        assert!(found.is_empty());

        let new_area = BoundingBox::new(49.0, 49.0, 51.0, 51.0);
        let found = seed
            .repo
            .latest_by_status_within(ScooterStatus::Occupied, &new_area)
            .await
            .expect("query");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].scooter.id, scooter.id);
        assert_eq!(found[0].latest_event.latitude, 50.0);
    }

    #[tokio::test]
    async fn telemetry_bounds_are_inclusive_and_sorted_by_event() {
        let seed = seeded().await;
        let first = occupied_scooter(&seed).await;
        let second = occupied_scooter(&seed).await;
        let silent = occupied_scooter(&seed).await;
        append_at(&seed, &second, 0.0, 0.0).await;
        append_at(&seed, &first, 1.0, 1.0).await;

        let bbox = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
        let found = seed
            .repo
            .latest_by_status_within(ScooterStatus::Occupied, &bbox)
            .await
            .expect("query");
        let ids: Vec<_> = found.iter().map(|row| row.scooter.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
        assert!(!ids.contains(&silent.id));

        let none = seed
            .repo
            .latest_by_status_within(ScooterStatus::Free, &bbox)
            .await
            .expect("query");
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn deleting_scooter_cascades_to_its_events() {
        let seed = seeded().await;
        let scooter = occupied_scooter(&seed).await;
        append_at(&seed, &scooter, 1.0, 1.0).await;

        let removed = ScooterRepository::delete_by_ids(&seed.repo, &[scooter.id, ScooterId::new()])
            .await
            .expect("delete");
        assert_eq!(removed, 1);
        assert!(EventRepository::find_all(&seed.repo)
            .await
            .expect("events")
            .is_empty());
    }

    #[tokio::test]
    async fn ping_answers() {
        let seed = seeded().await;
        seed.repo.ping().await.expect("ping");
        let found = UserRepository::find_by_id(&seed.repo, &seed.user.id)
            .await
            .expect("load");
        assert_eq!(found.map(|user| user.id), Some(seed.user.id));
    }
}
