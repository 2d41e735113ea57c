//! Zip archive export of processed images.
//!
//! Collects every record with a processed variant into a single downloadable
//! bundle. Entry payloads are decoded from their data references in parallel;
//! the archive itself is written and finalized only after every decode
//! succeeds, so a failed decode aborts the export with no partial archive.
//!
//! Compression is delegated to the `zip` crate (deflate); this module only
//! creates the archive, adds named entries, and finishes it.

use crate::collection::{ImageRecord, epoch_millis};
use crate::source::SourceError;
use rayon::prelude::*;
use std::io::{Cursor, Write};
use thiserror::Error;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::result::ZipError;
use zip::write::FileOptions;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("could not decode processed image {name}: {source}")]
    Source { name: String, source: SourceError },
    #[error("archive write failed: {0}")]
    Zip(#[from] ZipError),
    #[error("archive write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// A finished archive ready to hand to the download boundary.
#[derive(Debug)]
pub struct ExportBundle {
    /// `processed-images-<epoch-ms>.zip`
    pub filename: String,
    pub bytes: Vec<u8>,
    entries: usize,
}

impl ExportBundle {
    pub fn entry_count(&self) -> usize {
        self.entries
    }
}

/// Build a zip archive from every processed record.
///
/// Entries are named `processed-<originalName>.jpg`. Duplicate original names
/// produce duplicate entries (readers take the last one); nothing is
/// deduplicated. Callers skip the export entirely when no record has a
/// processed variant.
pub fn build_archive(records: &[ImageRecord]) -> Result<ExportBundle, ExportError> {
    let entries: Vec<(String, Vec<u8>)> = records
        .par_iter()
        .filter_map(|record| {
            record.processed.as_ref().map(|processed| {
                processed
                    .to_bytes()
                    .map(|bytes| (format!("processed-{}.jpg", record.name), bytes))
                    .map_err(|source| ExportError::Source {
                        name: record.name.clone(),
                        source,
                    })
            })
        })
        .collect::<Result<_, _>>()?;

    log::debug!("archiving {} processed images", entries.len());

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    let count = entries.len();

    for (name, bytes) in entries {
        writer.start_file(name, options)?;
        writer.write_all(&bytes)?;
    }

    let cursor = writer.finish()?;
    let filename = format!("processed-images-{}.zip", epoch_millis());
    log::info!("built archive {filename} ({count} entries)");

    Ok(ExportBundle {
        filename,
        bytes: cursor.into_inner(),
        entries: count,
    })
}
