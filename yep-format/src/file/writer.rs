use std::io::{prelude::*, BufWriter, SeekFrom};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::{
    compression::Compression,
    error::{CodecError, PackError},
    header::ArchiveHeader,
    pack::{PackList, PackOptions},
    path::{EntryName, NAME_FIELD_LEN},
    record::{DataKind, EntryRecord},
    ser::{write_placement, Serialize},
};

/// Reported after each entry is written.
#[derive(Debug, Clone, Copy)]
pub struct PackProgress<'a> {
    pub current: usize,
    pub total: usize,
    pub name: &'a EntryName,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArchiveSummary {
    pub entries: usize,
    pub compressed_entries: usize,
    pub stored_bytes: u64,
    pub uncompressed_bytes: u64,
}

/// Writes a complete archive from a `PackList`.
///
/// Everything goes to a temporary file next to the destination, which
/// replaces the destination only once every entry has been written. A failed
/// pack leaves no partial archive behind and any previous archive untouched.
#[derive(Debug)]
pub struct ArchiveWriter {
    pub(crate) file: BufWriter<NamedTempFile>,
    pub(crate) path: PathBuf,
    pub(crate) options: PackOptions,
}

#[inline(always)]
fn write_failed(path: &Path) -> impl FnOnce(std::io::Error) -> PackError + '_ {
    move |source| PackError::WriteArchive {
        path: path.to_path_buf(),
        source,
    }
}

impl ArchiveWriter {
    pub fn create<P: AsRef<Path>>(path: P, options: PackOptions) -> Result<ArchiveWriter, PackError> {
        let path = path.as_ref().to_path_buf();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let file = tempfile::Builder::new()
            .prefix(".yep")
            .suffix(".partial")
            .tempfile_in(&dir)
            .map_err(|source| PackError::CreateArchive {
                path: path.clone(),
                source,
            })?;

        tracing::debug!(path = %path.display(), temp = %file.path().display(), "created archive");

        Ok(ArchiveWriter {
            file: BufWriter::new(file),
            path,
            options,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the header, the entry table and every payload of `list`, then
    /// moves the archive into place. `progress` is called after each entry.
    pub fn write<F>(mut self, list: PackList, mut progress: F) -> Result<ArchiveSummary, PackError>
    where
        F: FnMut(PackProgress<'_>),
    {
        let path = self.path.clone();
        let total = list.len();
        let header = ArchiveHeader::new(list.entry_count()?);

        self.file.seek(SeekFrom::Start(0)).map_err(write_failed(&path))?;
        header.write(&mut self.file).map_err(write_failed(&path))?;

        tracing::debug!(entries = total, "writing entry table");
        for node in list.iter() {
            EntryRecord::placeholder(node.name.clone())
                .write(&mut self.file)
                .map_err(write_failed(&path))?;
        }

        tracing::debug!(data_start = header.data_start(), "writing payloads");
        let mut cursor = header.data_start();
        let mut summary = ArchiveSummary::default();

        for (index, node) in list.iter().enumerate() {
            let raw = std::fs::read(&node.source).map_err(|source| PackError::ReadSource {
                path: node.source.clone(),
                source,
            })?;

            let uncompressed_size = raw.len();
            let (compression, payload) =
                self.encode(raw).map_err(|source| PackError::Codec {
                    path: node.source.clone(),
                    source,
                })?;

            let too_large = || PackError::ArchiveTooLarge { path: path.clone() };
            let record = EntryRecord {
                name: node.name.clone(),
                offset: u32::try_from(cursor).map_err(|_| too_large())?,
                stored_size: u32::try_from(payload.len()).map_err(|_| too_large())?,
                compression,
                uncompressed_size: u32::try_from(uncompressed_size).map_err(|_| too_large())?,
                data_kind: DataKind::Misc,
            };

            self.write_entry(index, &record, &payload)
                .map_err(write_failed(&path))?;

            tracing::debug!(
                name = %record.name,
                offset = format_args!("{:#x}", record.offset),
                stored = record.stored_size,
                size = record.uncompressed_size,
                ?compression,
                "packed entry"
            );

            cursor += payload.len() as u64;
            summary.entries += 1;
            summary.stored_bytes += record.stored_size as u64;
            summary.uncompressed_bytes += record.uncompressed_size as u64;
            if record.is_compressed() {
                summary.compressed_entries += 1;
            }

            progress(PackProgress {
                current: index + 1,
                total,
                name: &node.name,
            });
        }

        self.finish()?;
        Ok(summary)
    }

    /// Picks the compression for a payload and applies it. Payloads that do
    /// not shrink are stored verbatim.
    fn encode(&self, raw: Vec<u8>) -> Result<(Compression, Vec<u8>), CodecError> {
        match Compression::for_size(raw.len(), self.options.compression_threshold) {
            Compression::Stored => Ok((Compression::Stored, raw)),
            compression => {
                let packed = compression.compress(&raw)?;
                if packed.len() < raw.len() {
                    Ok((compression, packed))
                } else {
                    Ok((Compression::Stored, raw))
                }
            }
        }
    }

    /// Writes the payload at the record's offset, then backfills the
    /// record's placement fields in the table.
    #[inline(always)]
    fn write_entry(&mut self, index: usize, record: &EntryRecord, payload: &[u8]) -> std::io::Result<()> {
        self.file.seek(SeekFrom::Start(record.offset as u64))?;
        self.file.write_all(payload)?;

        let field_end = ArchiveHeader::record_offset(index) + NAME_FIELD_LEN as u64;
        self.file.seek(SeekFrom::Start(field_end))?;
        write_placement(record, &mut self.file)
    }

    fn finish(self) -> Result<(), PackError> {
        let ArchiveWriter { file, path, .. } = self;

        let file = file
            .into_inner()
            .map_err(|e| write_failed(&path)(e.into_error()))?;
        file.as_file().sync_all().map_err(write_failed(&path))?;

        if let Some(permissions) = crate::fs::archive_permissions(&path) {
            file.as_file()
                .set_permissions(permissions)
                .map_err(write_failed(&path))?;
        }

        file.persist(&path).map_err(|e| write_failed(&path)(e.error))?;
        tracing::debug!(path = %path.display(), "archive moved into place");
        Ok(())
    }
}
