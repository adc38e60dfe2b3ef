//! CSV output: one file per run, named by a load-time timestamp, written to a
//! hidden temp file and promoted only once complete.

use crate::date::file_stamp;
use crate::error::{BoxError, EtlError};
use crate::models::CleanedRecord;
use crate::util::{create_new, promote_file, remove_if_exists};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use time::OffsetDateTime;

pub const COLUMNS: [&str; 7] = [
    "video_title",
    "video_id",
    "video_date",
    "text",
    "comment_date",
    "cleaned_text",
    "cleaned_text_sentiment",
];

const WRITE_BUFFER_BYTES: usize = 256 * 1024;

/// Claim `extracted_data_YYYYMMDD_HHMMSS.csv` (or the first free `_N` variant)
/// by creating it empty. A name that already exists is never reused.
pub fn reserve_output_path(dir: &Path, now: OffsetDateTime) -> io::Result<PathBuf> {
    let stamp = file_stamp(now);
    let mut n = 0u32;
    loop {
        let name = match n {
            0 => format!("extracted_data_{}.csv", stamp),
            _ => format!("extracted_data_{}_{}.csv", stamp, n),
        };
        let path = dir.join(name);
        match create_new(&path) {
            Ok(_) => return Ok(path),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => n += 1,
            Err(e) => return Err(e),
        }
    }
}

fn write_rows(tmp: &Path, rows: &[CleanedRecord]) -> Result<(), BoxError> {
    let file = File::create(tmp)?;
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(BufWriter::with_capacity(WRITE_BUFFER_BYTES, file));
    wtr.write_record(COLUMNS)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    let mut inner = wtr.into_inner().map_err(|e| e.into_error())?;
    inner.flush()?;
    Ok(())
}

/// Write all rows (header first) and return the final path.
/// On failure nothing is left behind at either the temp or the final path.
pub fn write_csv(dir: &Path, rows: &[CleanedRecord], now: OffsetDateTime) -> Result<PathBuf, EtlError> {
    let dest = reserve_output_path(dir, now)
        .map_err(|e| EtlError::Load { path: dir.to_path_buf(), source: e.into() })?;
    let file_name = dest.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    let tmp = dir.join(format!(".{}.tmp", file_name));

    // the temp file replaces our own empty reservation
    let result = write_rows(&tmp, rows).and_then(|()| promote_file(&tmp, &dest).map_err(BoxError::from));
    if let Err(source) = result {
        for leftover in [&tmp, &dest] {
            if let Err(e) = remove_if_exists(leftover) {
                tracing::warn!(error = %e, "could not remove partial output");
            }
        }
        return Err(EtlError::Load { path: dest, source });
    }

    tracing::info!(path = %dest.display(), rows = rows.len(), "output written");
    Ok(dest)
}
