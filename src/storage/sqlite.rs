//! SQLite-backed vessel store.

use std::path::{Path, PathBuf};

use rusqlite::functions::FunctionFlags;
use rusqlite::{params, params_from_iter, Connection, OpenFlags};

use super::{StoreError, StoreSession, VesselStore};
use crate::query::filter::VesselFilter;
use crate::vessel::{decode_optional_position, decode_ports, encode_ports, encode_position, VesselRecord};

const CREATE_VESSELS_TABLE: &str = "CREATE TABLE IF NOT EXISTS vessels (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    vessel_name TEXT,
    vessel_type TEXT,
    owner TEXT,
    flag TEXT,
    speed_knots REAL,
    dimensions TEXT,
    visited_ports TEXT,
    last_known_position TEXT,
    status TEXT,
    mmsi INTEGER
)";

/// Unicode lowercase SQL function referenced by `VesselFilter::to_sql`.
/// SQLite's `LOWER()` folds ASCII only.
const FOLD_CASE_FN: &str = "fold_case";

const SELECT_COLUMNS: &str = "SELECT vessel_name, vessel_type, owner, flag, speed_knots, dimensions,
        visited_ports, last_known_position, status, mmsi
     FROM vessels";

/// Vessel store over a SQLite file.
///
/// Holds only the path; every [`VesselStore::open`] opens a fresh read-only
/// connection.
#[derive(Debug, Clone)]
pub struct SqliteVesselStore {
    /// Path to the SQLite database file.
    pub db_path: PathBuf,
}

impl SqliteVesselStore {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    /// Create the database file and the `vessels` table if missing.
    pub fn initialize(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| StoreError::Connection(e.to_string()))?;
            }
        }
        let conn = self.open_writable()?;
        conn.execute(CREATE_VESSELS_TABLE, [])?;
        Ok(())
    }

    /// Insert `records` in a single transaction. Returns the number inserted.
    pub fn insert(&self, records: &[VesselRecord]) -> Result<usize, StoreError> {
        let mut conn = self.open_writable()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO vessels (
                    vessel_name, vessel_type, owner, flag, speed_knots,
                    dimensions, visited_ports, last_known_position, status, mmsi
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            )?;
            for record in records {
                stmt.execute(params![
                    record.name,
                    record.vessel_type,
                    record.owner,
                    record.flag,
                    record.speed_knots,
                    record.dimensions,
                    encode_ports(&record.visited_ports),
                    encode_position(record.last_known_position),
                    record.status,
                    record.mmsi,
                ])?;
            }
        }
        tx.commit()?;
        log::debug!(
            "inserted {} vessel records into {}",
            records.len(),
            self.db_path.display()
        );
        Ok(records.len())
    }

    fn open_writable(&self) -> Result<Connection, StoreError> {
        Connection::open(&self.db_path).map_err(|e| {
            log::error!(
                "failed to open vessel store {}: {}",
                self.db_path.display(),
                e
            );
            StoreError::Connection(e.to_string())
        })
    }
}

impl VesselStore for SqliteVesselStore {
    fn open(&self) -> Result<Box<dyn StoreSession + '_>, StoreError> {
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(&self.db_path, flags).map_err(|e| {
            log::error!(
                "failed to open vessel store {}: {}",
                self.db_path.display(),
                e
            );
            StoreError::Connection(e.to_string())
        })?;
        register_fold_case(&conn)?;
        log::debug!("opened vessel store connection to {}", self.db_path.display());
        Ok(Box::new(SqliteSession {
            conn,
            db_path: &self.db_path,
        }))
    }
}

fn register_fold_case(conn: &Connection) -> Result<(), StoreError> {
    conn.create_scalar_function(
        FOLD_CASE_FN,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| Ok(ctx.get::<Option<String>>(0)?.map(|text| text.to_lowercase())),
    )?;
    Ok(())
}

struct SqliteSession<'a> {
    conn: Connection,
    db_path: &'a Path,
}

type RawRow = (
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<f64>,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<i64>,
);

impl StoreSession for SqliteSession<'_> {
    fn fetch(&self, filter: &VesselFilter) -> Result<Vec<VesselRecord>, StoreError> {
        let (clause, values) = filter.to_sql();
        let mut stmt = self
            .conn
            .prepare(&format!("{} WHERE {} ORDER BY id", SELECT_COLUMNS, clause))?;

        let rows = stmt.query_map(params_from_iter(values), |row| {
            Ok::<RawRow, rusqlite::Error>((
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
                row.get(5)?,
                row.get(6)?,
                row.get(7)?,
                row.get(8)?,
                row.get(9)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (name, vessel_type, owner, flag, speed, dimensions, ports, position, status, mmsi) =
                row?;
            let name = name.unwrap_or_default();
            let last_known_position =
                decode_optional_position(position.as_deref().unwrap_or_default()).unwrap_or_else(|e| {
                    log::warn!("vessel '{}': {}", name, e);
                    None
                });
            records.push(VesselRecord {
                mmsi: mmsi.unwrap_or_default(),
                name,
                vessel_type: vessel_type.unwrap_or_default(),
                owner: owner.unwrap_or_default(),
                flag: flag.unwrap_or_default(),
                speed_knots: speed.unwrap_or_default(),
                dimensions: dimensions.unwrap_or_default(),
                visited_ports: decode_ports(ports.as_deref().unwrap_or_default()),
                last_known_position,
                status: status.unwrap_or_default(),
            });
        }
        Ok(records)
    }
}

impl Drop for SqliteSession<'_> {
    fn drop(&mut self) {
        log::debug!("closing vessel store connection to {}", self.db_path.display());
    }
}
