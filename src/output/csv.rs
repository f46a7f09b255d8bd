//! CSV file of launched containers

use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::fleet::ManagedContainer;

pub const HEADER: [&str; 3] = ["Container Name", "Password", "Access URL"];

/// Write the header and one row per record to any writer.
///
/// Fields containing commas or quotes are quoted, so punctuation in
/// passwords round-trips.
pub fn write_to<W: Write>(writer: W, records: &[&ManagedContainer]) -> Result<()> {
    let mut csv = ::csv::Writer::from_writer(writer);
    csv.write_record(HEADER)?;
    for record in records {
        csv.write_record([
            record.name.as_str(),
            record.password.as_str(),
            record.url.as_str(),
        ])?;
    }
    csv.flush()?;
    Ok(())
}

/// Overwrite `path` with the given records.
pub fn write_records(path: &Path, records: &[&ManagedContainer]) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_to(file, records)
}
