//! Pooled connection provider for the repository layer.
//!
//! # Responsibility
//! - Hand out exclusively-owned, bootstrap-complete connections.
//! - Return connections to the pool on every exit path via an RAII guard.
//!
//! # Invariants
//! - Every pooled connection has migrations applied before first use.
//! - `acquire` never blocks: an empty pool is an error, not a wait.
//! - The provider is injected where needed, never a process singleton.

use super::open::{open_db, open_db_shared_memory};
use super::DbError;
use log::info;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::ops::{Deref, DerefMut};
use std::path::Path;
use std::sync::Mutex;
use uuid::Uuid;

/// Failure to obtain a usable connection.
///
/// Fatal to the calling operation; the provider performs no internal
/// retry.
#[derive(Debug)]
pub enum ConnectionError {
    /// All pooled connections are currently checked out.
    Exhausted { capacity: usize },
    /// Opening or migrating a connection failed at provider startup.
    Bootstrap(DbError),
    /// The pool mutex was poisoned by a panicking holder.
    PoolPoisoned,
}

impl Display for ConnectionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exhausted { capacity } => {
                write!(f, "connection pool exhausted (capacity {capacity})")
            }
            Self::Bootstrap(err) => write!(f, "failed to bootstrap pooled connection: {err}"),
            Self::PoolPoisoned => write!(f, "connection pool poisoned by a panicking holder"),
        }
    }
}

impl Error for ConnectionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Bootstrap(err) => Some(err),
            Self::Exhausted { .. } | Self::PoolPoisoned => None,
        }
    }
}

impl From<DbError> for ConnectionError {
    fn from(value: DbError) -> Self {
        Self::Bootstrap(value)
    }
}

/// Fixed-capacity pool of pre-opened SQLite connections.
///
/// Connections are opened and migrated once at construction; `acquire`
/// hands out exclusive ownership for the duration of one operation.
/// Dropping the provider closes every idle connection, which for the
/// shared-memory flavor also destroys the store.
#[derive(Debug)]
pub struct ConnectionProvider {
    idle: Mutex<Vec<Connection>>,
    capacity: usize,
}

impl ConnectionProvider {
    /// Opens a file-backed provider with `capacity` pooled connections.
    ///
    /// `capacity` is clamped to at least 1.
    pub fn open(path: impl AsRef<Path>, capacity: usize) -> Result<Self, ConnectionError> {
        let capacity = capacity.max(1);
        let mut idle = Vec::with_capacity(capacity);
        for _ in 0..capacity {
            idle.push(open_db(path.as_ref())?);
        }
        info!(
            "event=pool_open module=pool status=ok mode=file capacity={}",
            capacity
        );
        Ok(Self {
            idle: Mutex::new(idle),
            capacity,
        })
    }

    /// Opens an in-memory provider with `capacity` pooled connections.
    ///
    /// The pool uses one shared-cache store with a unique name, so every
    /// pooled connection sees the same data. The store lives as long as
    /// the provider does.
    pub fn open_in_memory(capacity: usize) -> Result<Self, ConnectionError> {
        let capacity = capacity.max(1);
        let name = format!("userstore-{}", Uuid::new_v4());
        let mut idle = Vec::with_capacity(capacity);
        for _ in 0..capacity {
            idle.push(open_db_shared_memory(&name)?);
        }
        info!(
            "event=pool_open module=pool status=ok mode=shared_memory capacity={}",
            capacity
        );
        Ok(Self {
            idle: Mutex::new(idle),
            capacity,
        })
    }

    /// Checks one connection out of the pool.
    ///
    /// The returned guard gives exclusive access and returns the
    /// connection to the pool when dropped, on every exit path.
    ///
    /// # Errors
    /// - `ConnectionError::Exhausted` when every connection is checked
    ///   out.
    pub fn acquire(&self) -> Result<PooledConnection<'_>, ConnectionError> {
        let mut idle = self.idle.lock().map_err(|_| ConnectionError::PoolPoisoned)?;
        let conn = idle.pop().ok_or(ConnectionError::Exhausted {
            capacity: self.capacity,
        })?;
        Ok(PooledConnection {
            provider: self,
            conn: Some(conn),
        })
    }

    /// Returns the fixed number of connections this provider owns.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns how many connections are currently checked in.
    pub fn idle_count(&self) -> usize {
        self.idle.lock().map(|idle| idle.len()).unwrap_or(0)
    }

    fn release(&self, conn: Connection) {
        if let Ok(mut idle) = self.idle.lock() {
            idle.push(conn);
        }
        // A poisoned pool drops the connection instead of re-pooling it.
    }
}

/// RAII guard granting exclusive use of one pooled connection.
#[derive(Debug)]
pub struct PooledConnection<'provider> {
    provider: &'provider ConnectionProvider,
    conn: Option<Connection>,
}

impl Deref for PooledConnection<'_> {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        self.conn
            .as_ref()
            .unwrap_or_else(|| unreachable!("pooled connection taken before drop"))
    }
}

impl DerefMut for PooledConnection<'_> {
    fn deref_mut(&mut self) -> &mut Connection {
        self.conn
            .as_mut()
            .unwrap_or_else(|| unreachable!("pooled connection taken before drop"))
    }
}

impl Drop for PooledConnection<'_> {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            self.provider.release(conn);
        }
    }
}
