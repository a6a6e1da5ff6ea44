//! Client repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Point lookup, lane listing and lane counting over `clients`.
//! - Batched compensating shifts and single-row placement writes.
//! - Scope a group of writes to one immediate transaction.
//!
//! # Invariants
//! - Read paths reject unknown lane text instead of masking it.
//! - `shift_lane` touches only rows of one lane at or below a priority.
//! - `with_write_tx` must not be nested.

use crate::db::DbError;
use crate::model::client::{Client, ClientId, Lane, NewClient};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

const CLIENT_SELECT_SQL: &str = "SELECT
    id,
    name,
    description,
    status,
    priority
FROM clients";

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors from client persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(ClientId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "client not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted client data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Record store operations used by validation, reordering and read-back.
pub trait ClientRepository {
    /// Loads one client by id.
    fn get_client(&self, id: ClientId) -> RepoResult<Option<Client>>;
    /// Lists clients, optionally restricted to one lane, in rank order.
    fn list_clients(&self, lane: Option<Lane>) -> RepoResult<Vec<Client>>;
    /// Number of clients currently in `lane`.
    fn count_in_lane(&self, lane: Lane) -> RepoResult<i64>;
    /// Inserts a client at the bottom of its lane.
    fn create_client(&self, client: &NewClient) -> RepoResult<Client>;
    /// Adds `delta` to the priority of every client in `lane` with
    /// `priority >= from_priority`, except `exclude`. Returns rows changed.
    fn shift_lane(
        &self,
        lane: Lane,
        from_priority: i64,
        delta: i64,
        exclude: ClientId,
    ) -> RepoResult<usize>;
    /// Writes the lane and priority of one client.
    fn set_placement(&self, id: ClientId, lane: Lane, priority: i64) -> RepoResult<()>;
    /// Runs `f` as one atomic write unit: commit on `Ok`, rollback on `Err`.
    fn with_write_tx<T, F>(&self, f: F) -> RepoResult<T>
    where
        F: FnOnce(&Self) -> RepoResult<T>;
}

/// SQLite-backed client repository.
pub struct SqliteClientRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteClientRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ClientRepository for SqliteClientRepository<'_> {
    fn get_client(&self, id: ClientId) -> RepoResult<Option<Client>> {
        let mut stmt = self
            .conn
            .prepare_cached(&format!("{CLIENT_SELECT_SQL} WHERE id = ?1 LIMIT 1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_client_row(row)?));
        }
        Ok(None)
    }

    fn list_clients(&self, lane: Option<Lane>) -> RepoResult<Vec<Client>> {
        let mut stmt = self.conn.prepare_cached(&format!(
            "{CLIENT_SELECT_SQL}
             WHERE (?1 IS NULL OR status = ?1)
             ORDER BY status ASC, priority ASC, id ASC;"
        ))?;
        let mut rows = stmt.query([lane.map(Lane::as_str)])?;
        let mut clients = Vec::new();
        while let Some(row) = rows.next()? {
            clients.push(parse_client_row(row)?);
        }
        Ok(clients)
    }

    fn count_in_lane(&self, lane: Lane) -> RepoResult<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(id) FROM clients WHERE status = ?1;",
            [lane.as_str()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn create_client(&self, client: &NewClient) -> RepoResult<Client> {
        self.conn.execute(
            "INSERT INTO clients (name, description, status, priority)
             VALUES (
                ?1,
                ?2,
                ?3,
                (SELECT COUNT(id) + 1 FROM clients WHERE status = ?3)
             );",
            params![
                client.name.as_str(),
                client.description.as_deref(),
                client.lane.as_str(),
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        self.get_client(id)?.ok_or(RepoError::NotFound(id))
    }

    fn shift_lane(
        &self,
        lane: Lane,
        from_priority: i64,
        delta: i64,
        exclude: ClientId,
    ) -> RepoResult<usize> {
        let changed = self.conn.execute(
            "UPDATE clients
             SET priority = priority + ?3
             WHERE status = ?1
               AND priority >= ?2
               AND id != ?4;",
            params![lane.as_str(), from_priority, delta, exclude],
        )?;
        Ok(changed)
    }

    fn set_placement(&self, id: ClientId, lane: Lane, priority: i64) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE clients SET status = ?2, priority = ?3 WHERE id = ?1;",
            params![id, lane.as_str(), priority],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn with_write_tx<T, F>(&self, f: F) -> RepoResult<T>
    where
        F: FnOnce(&Self) -> RepoResult<T>,
    {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let value = f(self)?;
        tx.commit()?;
        Ok(value)
    }
}

fn parse_client_row(row: &Row<'_>) -> RepoResult<Client> {
    let status: String = row.get("status")?;
    let lane = status.parse::<Lane>().map_err(|_| {
        RepoError::InvalidData(format!("invalid lane `{status}` in clients.status"))
    })?;

    let priority: i64 = row.get("priority")?;
    if priority < 1 {
        return Err(RepoError::InvalidData(format!(
            "invalid priority `{priority}` in clients.priority"
        )));
    }

    Ok(Client {
        id: row.get("id")?,
        name: row.get("name")?,
        description: row.get("description")?,
        lane,
        priority,
    })
}
