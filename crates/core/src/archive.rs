//! Zip packaging for response bundles
//!
//! Archives are built entirely in memory so the same bytes can be written to
//! disk by the CLI or streamed back as an HTTP download.

use crate::bundle::{is_safe_relative_path, FileBlock, ResponseBundle};
use std::io::{Cursor, Read, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Error type for archive operations
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("Nothing to package: the response contains no file markers")]
    EmptyBundle,

    #[error("Unsafe file path in response: {0}")]
    UnsafePath(String),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Package a bundle into a deflated zip archive.
///
/// Each distinct path becomes one entry, placed where the path first appeared
/// and holding the content of its last appearance. An empty bundle is refused
/// with [`ArchiveError::EmptyBundle`]; nothing is written when any path would
/// escape the archive root.
pub fn pack(bundle: &ResponseBundle) -> Result<Vec<u8>, ArchiveError> {
    if bundle.is_empty() {
        return Err(ArchiveError::EmptyBundle);
    }

    let entries = bundle.unique_entries();

    if let Some((path, _)) = entries.iter().find(|(path, _)| !is_safe_relative_path(path)) {
        return Err(ArchiveError::UnsafePath(path.to_string()));
    }

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644);

    for (path, content) in entries {
        writer.start_file(path, options)?;
        writer.write_all(content.as_bytes())?;
    }

    Ok(writer.finish()?.into_inner())
}

/// Read every entry of a zip archive back as a bundle, in archive order.
///
/// Directory entries are skipped.
pub fn unpack(bytes: &[u8]) -> Result<ResponseBundle, ArchiveError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut blocks = Vec::with_capacity(archive.len());

    for index in 0..archive.len() {
        let mut file = archive.by_index(index)?;
        if file.is_dir() {
            continue;
        }

        let path = file.name().to_string();
        let mut content = String::new();
        file.read_to_string(&mut content)?;

        blocks.push(FileBlock { path, content });
    }

    Ok(blocks.into())
}
