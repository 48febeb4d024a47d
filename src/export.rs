//! CSV export of a filter's result set.

use std::io::Write;

use thiserror::Error;

use crate::query::filter::VesselFilter;
use crate::storage::{StoreError, VesselStore};
use crate::vessel::{encode_ports, encode_position, format_number, VesselRecord};

/// Column order of exported files.
pub const CSV_HEADER: [&str; 10] = [
    "mmsi",
    "vessel_name",
    "vessel_type",
    "owner",
    "flag",
    "speed_knots",
    "dimensions",
    "visited_ports",
    "last_known_position",
    "status",
];

/// Suggested file name for downloads.
pub const EXPORT_FILENAME: &str = "requested_data.csv";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Write `rows` as CSV. The header is always written, even for zero rows.
pub fn write_csv<W: Write>(rows: &[VesselRecord], out: W) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(CSV_HEADER)?;
    for row in rows {
        writer.write_record([
            row.mmsi.to_string(),
            row.name.clone(),
            row.vessel_type.clone(),
            row.owner.clone(),
            row.flag.clone(),
            format_number(row.speed_knots),
            row.dimensions.clone(),
            encode_ports(&row.visited_ports),
            encode_position(row.last_known_position),
            row.status.clone(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Run `filter` against `store` and return the result set as CSV bytes.
pub fn export_csv(store: &dyn VesselStore, filter: &VesselFilter) -> Result<Vec<u8>, ExportError> {
    let session = store.open()?;
    let rows = session.fetch(filter)?;
    drop(session);
    log::debug!("exporting {} vessel records", rows.len());

    let mut buf = Vec::new();
    write_csv(&rows, &mut buf)?;
    Ok(buf)
}
