//! Export codec: the filtered dataset as a zip of four CSV files.
//!
//! Each file is named after its table (`tracking_data.csv`, `payouts.csv`,
//! `influencers.csv`, `posts.csv`) and always starts with a header row in
//! record field order, so an empty table still exports as a valid,
//! header-only file. `read_archive` is the inverse and reproduces the
//! exported rows exactly.

use crate::{
    error::{DashError, DashResult},
    model::{Influencer, PayoutEntry, Post, Record, TrackingEntry},
};
use serde::Serialize;
use std::{
    fs::File,
    io::{Read, Seek, Write},
    path::Path,
};
use zip::{result::ZipError, write::SimpleFileOptions, CompressionMethod, ZipArchive, ZipWriter};

/// Default file name offered for the download.
pub const ARCHIVE_NAME: &str = "influencer_data.zip";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExportTables {
    pub tracking: Vec<TrackingEntry>,
    pub payouts: Vec<PayoutEntry>,
    pub influencers: Vec<Influencer>,
    pub posts: Vec<Post>,
}

/// Write all four tables into a fresh archive on `writer`.
pub fn write_archive<W: Write + Seek>(writer: W, tables: &ExportTables) -> DashResult<W> {
    let mut zip = ZipWriter::new(writer);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    add_table(&mut zip, options, &tables.tracking)?;
    add_table(&mut zip, options, &tables.payouts)?;
    add_table(&mut zip, options, &tables.influencers)?;
    add_table(&mut zip, options, &tables.posts)?;

    Ok(zip.finish()?)
}

/// Write the archive to `path`. Returns the archive size in bytes.
pub fn export_to_path(path: &Path, tables: &ExportTables) -> DashResult<u64> {
    let file = File::create(path)?;
    let file = write_archive(file, tables)?;
    let bytes = file.metadata()?.len();
    log::info!("exported {} ({bytes} bytes)", path.display());
    Ok(bytes)
}

/// Parse an archive produced by `write_archive`.
pub fn read_archive<R: Read + Seek>(reader: R) -> DashResult<ExportTables> {
    let mut archive = ZipArchive::new(reader)?;
    Ok(ExportTables {
        tracking: read_table(&mut archive)?,
        payouts: read_table(&mut archive)?,
        influencers: read_table(&mut archive)?,
        posts: read_table(&mut archive)?,
    })
}

pub fn file_name<R: Record>() -> String {
    format!("{}.csv", R::TABLE)
}

/// Serialize one table as CSV: header row, then one line per record.
pub fn table_csv<R: Record>(rows: &[R]) -> DashResult<Vec<u8>> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    wtr.write_record(R::COLUMNS)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.into_inner().map_err(|e| DashError::Io(e.into_error()))
}

/// Parse one CSV table, checking the header before any row.
pub fn parse_table_csv<R: Record, S: Read>(source: S) -> DashResult<Vec<R>> {
    let mut rdr = csv::Reader::from_reader(source);
    let headers = rdr.headers()?.clone();
    for column in R::COLUMNS {
        if !headers.iter().any(|h| h == *column) {
            return Err(DashError::malformed(
                R::TABLE,
                format!("missing column '{column}'"),
            ));
        }
    }
    let rows = rdr.deserialize().collect::<Result<Vec<R>, _>>()?;
    Ok(rows)
}

fn add_table<W: Write + Seek, R: Record>(
    zip: &mut ZipWriter<W>,
    options: SimpleFileOptions,
    rows: &[R],
) -> DashResult<()> {
    let bytes = table_csv(rows)?;
    zip.start_file(file_name::<R>(), options)?;
    zip.write_all(&bytes)?;
    log::debug!("archived {} ({} rows)", file_name::<R>(), rows.len());
    Ok(())
}

fn read_table<R: Record, S: Read + Seek>(archive: &mut ZipArchive<S>) -> DashResult<Vec<R>> {
    let name = file_name::<R>();
    match archive.by_name(&name) {
        Ok(file) => parse_table_csv(file),
        Err(ZipError::FileNotFound) => Err(DashError::malformed(
            R::TABLE,
            format!("{name} missing from archive"),
        )),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_table_is_header_only() {
        let bytes = table_csv::<PayoutEntry>(&[]).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "influencer_id,basis,rate,orders,total_payout\n"
        );
    }

    #[test]
    fn header_matches_serialized_field_order() {
        let row = PayoutEntry::new(
            "inf-1".into(),
            crate::model::PayoutBasis::PerOrder,
            2.0,
            10,
        );
        let text = String::from_utf8(table_csv(&[row]).unwrap()).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("influencer_id,basis,rate,orders,total_payout"));
        assert_eq!(lines.next(), Some("inf-1,order,2.0,10,20.0"));
    }

    #[test]
    fn missing_column_is_malformed_input() {
        let csv = "influencer_id,basis,rate,orders\ninf-1,post,10.0,3\n";
        let err = parse_table_csv::<PayoutEntry, _>(csv.as_bytes()).unwrap_err();
        match err {
            DashError::MalformedInput { table, detail } => {
                assert_eq!(table, "payouts");
                assert!(detail.contains("total_payout"), "{detail}");
            }
            other => panic!("expected MalformedInput, got {other:?}"),
        }
    }
}
