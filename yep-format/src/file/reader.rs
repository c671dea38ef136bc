use std::fs::{File, OpenOptions};
use std::io::{prelude::*, BufReader, SeekFrom};
use std::path::{Path, PathBuf};

use super::read_header;
use crate::{
    de::{read_after_name, DeserializeOwned},
    error::{ExtractError, OpenError},
    header::{ArchiveHeader, HEADER_LEN},
    path::{field_bytes, EntryName, NAME_FIELD_LEN},
    record::{EntryRecord, RECORD_LEN},
};

/// An open archive. The handle owns its file; dropping it closes the file.
#[derive(Debug)]
pub struct ArchiveReader {
    pub(crate) file: BufReader<File>,
    pub(crate) path: PathBuf,
    pub(crate) header: ArchiveHeader,
    pub(crate) len: u64,
}

impl ArchiveReader {
    /// Opens an existing archive and validates its header and the extent of
    /// its entry table.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<ArchiveReader, OpenError> {
        let path = path.as_ref();
        let io_error = |source: std::io::Error| OpenError::Io {
            path: path.to_path_buf(),
            source,
        };

        let file = OpenOptions::new().read(true).open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                OpenError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                io_error(e)
            }
        })?;

        let len = file.metadata().map_err(io_error)?.len();
        let mut file = BufReader::new(file);

        let header = read_header(&mut file).map_err(|e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                OpenError::Corrupt {
                    reason: format!("file is {} bytes, shorter than the header", len),
                }
            } else {
                io_error(e)
            }
        })?;

        if !header.is_supported() {
            tracing::error!(
                found = header.version,
                supported = ArchiveHeader::CURRENT_VERSION,
                path = %path.display(),
                "archive version does not match"
            );
            return Err(OpenError::UnsupportedVersion {
                found: header.version,
                supported: ArchiveHeader::CURRENT_VERSION,
            });
        }

        if len < header.data_start() {
            return Err(OpenError::Corrupt {
                reason: format!(
                    "entry table of {} records needs {} bytes, file is {} bytes",
                    header.entry_count,
                    header.data_start(),
                    len
                ),
            });
        }

        tracing::debug!(
            path = %path.display(),
            entries = header.entry_count,
            len,
            "opened archive"
        );

        Ok(ArchiveReader {
            file,
            path: path.to_path_buf(),
            header,
            len,
        })
    }

    #[inline(always)]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline(always)]
    pub fn version(&self) -> u8 {
        self.header.version
    }

    #[inline(always)]
    pub fn header(&self) -> ArchiveHeader {
        self.header
    }

    /// Number of entries in the table.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.header.entry_count as usize
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.header.entry_count == 0
    }

    /// Finds the record named `name` by scanning the whole entry table from
    /// the start. The first record whose name matches byte for byte wins.
    pub fn lookup(&mut self, name: &str) -> Result<Option<EntryRecord>, ExtractError> {
        // A name that cannot be stored can never be found.
        if EntryName::new(name).is_err() {
            return Ok(None);
        }
        let query = name.as_bytes();

        self.file.seek(SeekFrom::Start(HEADER_LEN))?;

        let mut field = [0u8; NAME_FIELD_LEN];
        for _ in 0..self.header.entry_count {
            self.file.read_exact(&mut field)?;

            if field_bytes(&field) == query {
                return Ok(Some(read_after_name(&field, &mut self.file)?));
            }

            self.file
                .seek_relative(RECORD_LEN as i64 - NAME_FIELD_LEN as i64)?;
        }

        Ok(None)
    }

    #[inline(always)]
    pub fn exists(&mut self, name: &str) -> Result<bool, ExtractError> {
        self.lookup(name).map(|record| record.is_some())
    }

    /// Reads the entry named `name`, decompressing it if needed.
    pub fn extract(&mut self, name: &str) -> Result<Vec<u8>, ExtractError> {
        match self.lookup(name)? {
            Some(record) => self.extract_record(&record),
            None => {
                tracing::warn!(name, path = %self.path.display(), "entry does not exist in archive");
                Err(ExtractError::NotFound(name.to_string()))
            }
        }
    }

    /// Reads the payload described by `record`, decompressing it if needed.
    pub fn extract_record(&mut self, record: &EntryRecord) -> Result<Vec<u8>, ExtractError> {
        let range = record.payload_range();
        if range.end > self.len {
            return Err(ExtractError::Truncated {
                name: record.name.to_string(),
                end: range.end,
                len: self.len,
            });
        }

        self.file.seek(SeekFrom::Start(range.start))?;
        let mut data = vec![0u8; record.stored_size as usize];
        self.file.read_exact(&mut data)?;

        let data = record
            .compression
            .decompress(&data, record.uncompressed_size as usize)
            .map_err(|source| ExtractError::Codec {
                name: record.name.to_string(),
                source,
            })?;

        tracing::debug!(
            name = %record.name,
            stored = record.stored_size,
            size = data.len(),
            compression = ?record.compression,
            "extracted entry"
        );

        Ok(data)
    }

    /// Every record in table order.
    pub fn entries(&mut self) -> Result<Vec<EntryRecord>, ExtractError> {
        self.file.seek(SeekFrom::Start(HEADER_LEN))?;

        let mut records = Vec::with_capacity(self.len());
        for _ in 0..self.header.entry_count {
            records.push(EntryRecord::deserialize_owned(&mut self.file)?);
        }
        Ok(records)
    }
}

/// Keeps the most recently used archive open, so repeated extractions from
/// the same path skip reopening and revalidating it. Asking for a different
/// path closes the cached archive before the next one is opened.
#[derive(Debug, Default)]
pub struct ArchiveCache {
    current: Option<ArchiveReader>,
}

impl ArchiveCache {
    pub fn new() -> ArchiveCache {
        ArchiveCache::default()
    }

    pub fn get<P: AsRef<Path>>(&mut self, path: P) -> Result<&mut ArchiveReader, OpenError> {
        let path = path.as_ref();

        match self.current.take() {
            Some(reader) if reader.path() == path => Ok(self.current.insert(reader)),
            previous => {
                if let Some(previous) = previous {
                    tracing::debug!(path = %previous.path().display(), "closing cached archive");
                    drop(previous);
                }
                let reader = ArchiveReader::open(path)?;
                Ok(self.current.insert(reader))
            }
        }
    }

    pub fn extract<P: AsRef<Path>>(&mut self, path: P, name: &str) -> Result<Vec<u8>, ExtractError> {
        self.get(path)?.extract(name)
    }

    pub fn exists<P: AsRef<Path>>(&mut self, path: P, name: &str) -> Result<bool, ExtractError> {
        self.get(path)?.exists(name)
    }

    /// Path of the archive currently held open, if any.
    pub fn current_path(&self) -> Option<&Path> {
        self.current.as_ref().map(|reader| reader.path())
    }

    pub fn close(&mut self) {
        self.current = None;
    }
}
