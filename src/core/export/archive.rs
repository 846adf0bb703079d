//! `.reqifz` bundling
//!
//! The archive is flat: the ReqIF file and every auxiliary file sit at the
//! root, under their file names.

use crate::core::export::naming::archive_name;
use crate::domain::{ReqportError, Result};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Writes `{reqif}z` next to the ReqIF file
///
/// # Errors
///
/// Returns [`ReqportError::Packaging`] if the archive cannot be created or a
/// member cannot be read. A partial archive is removed.
pub fn package_archive<'a>(
    reqif_path: &Path,
    auxiliary_files: impl IntoIterator<Item = &'a PathBuf>,
) -> Result<PathBuf> {
    let file_name = member_name(reqif_path)?;
    let archive_path = reqif_path.with_file_name(archive_name(&file_name));

    let mut members = vec![reqif_path.to_path_buf()];
    let mut seen = BTreeSet::from([file_name]);
    for path in auxiliary_files {
        let name = member_name(path)?;
        if seen.insert(name) {
            members.push(path.clone());
        } else {
            tracing::warn!(path = %path.display(), "Duplicate archive member skipped");
        }
    }

    if let Err(err) = write_archive(&archive_path, &members) {
        let _ = std::fs::remove_file(&archive_path);
        return Err(err);
    }

    tracing::info!(
        path = %archive_path.display(),
        members = members.len(),
        "Archive written"
    );
    Ok(archive_path)
}

fn member_name(path: &Path) -> Result<String> {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| ReqportError::Packaging(format!("No file name in {}", path.display())))
}

fn write_archive(archive_path: &Path, members: &[PathBuf]) -> Result<()> {
    let file = File::create(archive_path).map_err(|e| {
        ReqportError::Packaging(format!("Cannot create {}: {e}", archive_path.display()))
    })?;
    let mut zip = ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for path in members {
        let name = member_name(path)?;
        let mut source = File::open(path).map_err(|e| {
            ReqportError::Packaging(format!("Cannot read {}: {e}", path.display()))
        })?;
        zip.start_file(name.as_str(), options)?;
        std::io::copy(&mut source, &mut zip).map_err(|e| {
            ReqportError::Packaging(format!("Cannot add {}: {e}", path.display()))
        })?;
        tracing::trace!(member = %name, "Archive member added");
    }

    zip.finish()?;
    Ok(())
}
