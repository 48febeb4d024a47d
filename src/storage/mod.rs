//! Record store boundary.
//!
//! The store is read through short-lived sessions: [`VesselStore::open`]
//! acquires a connection, and dropping the returned [`StoreSession`]
//! releases it. Callers hold a session for exactly one request.

pub mod sqlite;

use thiserror::Error;

use crate::query::filter::VesselFilter;
use crate::vessel::VesselRecord;

pub use sqlite::SqliteVesselStore;

/// Errors raised by the record store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be opened.
    #[error("Database connection error: {0}")]
    Connection(String),

    /// A query failed.
    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),
}

/// A source of read sessions over vessel records.
pub trait VesselStore: Send + Sync {
    /// Acquire a session. The connection is released when it is dropped.
    fn open(&self) -> Result<Box<dyn StoreSession + '_>, StoreError>;
}

/// An open connection to the store.
pub trait StoreSession {
    /// All records matching `filter`, in storage order.
    fn fetch(&self, filter: &VesselFilter) -> Result<Vec<VesselRecord>, StoreError>;
}
