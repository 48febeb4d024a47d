//! CSV loader populating the vessel store.
//!
//! Expected columns: `Vessel_Name, Vessel_Type, Owner, Flag, Speed_knots,
//! Dimensions_m, Visited_Ports, Last_Known_Position, Status, MMSI`.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::storage::{SqliteVesselStore, StoreError};
use crate::vessel::{decode_optional_position, decode_ports, DecodeError, VesselRecord};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read CSV {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Deserialize)]
struct CsvVesselRow {
    #[serde(rename = "Vessel_Name")]
    name: String,
    #[serde(rename = "Vessel_Type")]
    vessel_type: String,
    #[serde(rename = "Owner")]
    owner: String,
    #[serde(rename = "Flag")]
    flag: String,
    #[serde(rename = "Speed_knots")]
    speed_knots: f64,
    #[serde(rename = "Dimensions_m")]
    dimensions: String,
    #[serde(rename = "Visited_Ports")]
    visited_ports: String,
    #[serde(rename = "Last_Known_Position")]
    last_known_position: String,
    #[serde(rename = "Status")]
    status: String,
    #[serde(rename = "MMSI")]
    mmsi: i64,
}

impl CsvVesselRow {
    fn into_record(self) -> Result<VesselRecord, DecodeError> {
        Ok(VesselRecord {
            mmsi: self.mmsi,
            name: self.name.trim().to_string(),
            vessel_type: self.vessel_type,
            owner: self.owner,
            flag: self.flag,
            speed_knots: self.speed_knots,
            dimensions: self.dimensions,
            visited_ports: decode_ports(&self.visited_ports),
            last_known_position: decode_optional_position(&self.last_known_position)?,
            status: self.status,
        })
    }
}

/// Parse vessel rows from CSV. Rows that fail to parse are logged and skipped.
pub fn read_records<R: Read>(input: R) -> Result<Vec<VesselRecord>, LoadError> {
    let mut reader = csv::Reader::from_reader(input);
    let mut records = Vec::new();

    for (idx, result) in reader.deserialize::<CsvVesselRow>().enumerate() {
        let row = match result {
            Ok(row) => row,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                log::warn!("Skipping row {}: {}", idx + 1, e);
                continue;
            }
        };
        match row.into_record() {
            Ok(record) => records.push(record),
            Err(e) => log::warn!("Skipping row {}: {}", idx + 1, e),
        }
    }

    Ok(records)
}

/// Load `csv_path` into `store`, creating the schema if needed.
///
/// Returns the number of inserted rows.
pub fn load_csv(store: &SqliteVesselStore, csv_path: &Path) -> Result<usize, LoadError> {
    let file = std::fs::File::open(csv_path).map_err(|e| LoadError::Open {
        path: csv_path.display().to_string(),
        source: e.into(),
    })?;
    let records = read_records(file)?;

    store.initialize()?;
    let inserted = store.insert(&records)?;
    log::info!(
        "loaded {} vessel records from {} into {}",
        inserted,
        csv_path.display(),
        store.db_path.display()
    );
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::filter::VesselFilter;
    use crate::storage::VesselStore;

    const SAMPLE: &str = "\
Vessel_Name,Vessel_Type,Owner,Flag,Speed_knots,Dimensions_m,Visited_Ports,Last_Known_Position,Status,MMSI
Sea Queen,Cargo,Acme Shipping,Germany,12.5,200x32,\"['Hamburg', 'Rotterdam']\",\"(53.5486, 9.9822)\",In Transit,211331640
Ocean Explorer,Tanker,Blue Line,Liberia,fast,250x40,[],\"(29.9511, -90.0715)\",Docked,636091308
Atlantic Star,Fishing,Acme Shipping,Bahamas,8.7,60x12,\"['Nassau']\",nowhere,Active,311000072
";

    #[test]
    fn test_read_records_skips_bad_rows() {
        let records = read_records(SAMPLE.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Sea Queen");
        assert_eq!(records[0].visited_ports, vec!["Hamburg", "Rotterdam"]);
        assert_eq!(records[0].mmsi, 211331640);
    }

    #[test]
    fn test_empty_position_is_kept_as_unknown() {
        let csv = "\
Vessel_Name,Vessel_Type,Owner,Flag,Speed_knots,Dimensions_m,Visited_Ports,Last_Known_Position,Status,MMSI
Drifter,Cargo,Acme Shipping,Malta,4.0,90x14,[],,Docked,215000001
";
        let records = read_records(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].last_known_position, None);
    }

    #[test]
    fn test_load_csv_into_store() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("Maritime_Example_Dataset.csv");
        std::fs::write(&csv_path, SAMPLE).unwrap();

        let store = SqliteVesselStore::new(dir.path().join("data").join("maritime_data.db"));
        assert_eq!(load_csv(&store, &csv_path).unwrap(), 1);

        let session = store.open().unwrap();
        let rows = session
            .fetch(&VesselFilter::NameIs {
                name: "sea queen".to_string(),
            })
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].flag, "Germany");
    }

    #[test]
    fn test_load_missing_csv() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteVesselStore::new(dir.path().join("maritime_data.db"));
        let err = load_csv(&store, &dir.path().join("missing.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Open { .. }));
    }
}
