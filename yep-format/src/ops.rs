use std::path::Path;

use crate::{
    error::PackError,
    file::writer::{ArchiveSummary, ArchiveWriter, PackProgress},
    pack::{PackList, PackOptions},
    stale::is_stale,
};

/// Packs `dir` into `output`, replacing any existing archive.
pub fn force_pack_directory<D, O, F>(
    dir: D,
    output: O,
    options: &PackOptions,
    progress: F,
) -> Result<ArchiveSummary, PackError>
where
    D: AsRef<Path>,
    O: AsRef<Path>,
    F: FnMut(PackProgress<'_>),
{
    let dir = dir.as_ref();
    let output = output.as_ref();
    tracing::debug!(dir = %dir.display(), output = %output.display(), "packing directory");

    let list = PackList::build(dir, options)?;
    tracing::debug!(entries = list.len(), "built pack list");

    let summary = ArchiveWriter::create(output, options.clone())?.write(list, progress)?;

    tracing::info!(
        entries = summary.entries,
        compressed = summary.compressed_entries,
        stored_bytes = summary.stored_bytes,
        uncompressed_bytes = summary.uncompressed_bytes,
        output = %output.display(),
        "packed archive"
    );

    Ok(summary)
}

/// Packs `dir` into `output` unless the archive is already newer than the
/// directory. Returns `None` when the pack was skipped.
pub fn pack_directory<D, O, F>(
    dir: D,
    output: O,
    options: &PackOptions,
    progress: F,
) -> Result<Option<ArchiveSummary>, PackError>
where
    D: AsRef<Path>,
    O: AsRef<Path>,
    F: FnMut(PackProgress<'_>),
{
    let dir = dir.as_ref();
    let output = output.as_ref();

    if output.exists() && !is_stale(dir, output) {
        tracing::info!(dir = %dir.display(), "directory is up to date, skipping");
        return Ok(None);
    }

    tracing::debug!(dir = %dir.display(), "directory is out of date, packing");
    force_pack_directory(dir, output, options, progress).map(Some)
}
