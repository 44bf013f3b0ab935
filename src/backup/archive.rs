// psqlsync/src/backup/archive.rs
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::errors::{Result, SyncError};

/// Gzips `source_file` into `<source_file>.gz`.
///
/// The source file is left in place.
///
/// # Returns
/// Path to the compressed file.
pub fn compress_file(source_file: &Path) -> Result<PathBuf> {
    let mut compressed = source_file.as_os_str().to_owned();
    compressed.push(".gz");
    let compressed = PathBuf::from(compressed);

    let mut reader = BufReader::new(File::open(source_file)?);
    let mut encoder = GzEncoder::new(BufWriter::new(File::create(&compressed)?), Compression::default());
    let bytes = io::copy(&mut reader, &mut encoder)?;
    encoder.finish()?.flush()?;

    debug!(bytes, from = %source_file.display(), to = %compressed.display(), "compressed file");
    Ok(compressed)
}

/// Decompresses a `.gz` file next to itself, dropping the extension.
///
/// # Returns
/// Path to the extracted file.
pub fn extract_file(source_file: &Path) -> Result<PathBuf> {
    let is_gz = source_file
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"));
    if !is_gz {
        return Err(SyncError::Config(format!(
            "Archive for extraction must have a .gz extension: {}",
            source_file.display()
        )));
    }
    let extracted = source_file.with_extension("");

    let mut decoder = GzDecoder::new(BufReader::new(File::open(source_file)?));
    let mut writer = BufWriter::new(File::create(&extracted)?);
    let bytes = io::copy(&mut decoder, &mut writer)?;
    writer.flush()?;

    debug!(bytes, from = %source_file.display(), to = %extracted.display(), "extracted file");
    Ok(extracted)
}
