use std::path::PathBuf;

use crate::path::IntoEntryNameError;

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("Cannot compress data")]
    Compress(#[source] std::io::Error),

    #[error("Cannot decompress data")]
    Decompress(#[source] std::io::Error),

    #[error("Decompressed size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("Cannot handle compression with id {0:#x}")]
    Unsupported(u8),
}

#[derive(Debug, thiserror::Error)]
pub enum OpenError {
    #[error("Archive not found: `{}`", .path.display())]
    NotFound { path: PathBuf },

    #[error("Unsupported archive version {found} (this build reads version {supported})")]
    UnsupportedVersion { found: u8, supported: u8 },

    #[error("Archive is corrupt: {reason}")]
    Corrupt { reason: String },

    #[error("Cannot read archive `{}`", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl OpenError {
    /// True for errors about the archive's contents rather than the filesystem.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            OpenError::UnsupportedVersion { .. } | OpenError::Corrupt { .. }
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("Entry `{0}` not found in archive")]
    NotFound(String),

    #[error("Payload of `{name}` runs past the end of the archive ({end} > {len} bytes)")]
    Truncated { name: String, end: u64, len: u64 },

    #[error("Cannot decode payload of `{name}`")]
    Codec {
        name: String,
        #[source]
        source: CodecError,
    },

    #[error(transparent)]
    Open(#[from] OpenError),

    #[error("Cannot read archive")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum PackError {
    #[error("Not a directory: `{}`", .path.display())]
    NotADirectory { path: PathBuf },

    #[error("Cannot pack `{}` under a valid entry name", .path.display())]
    InvalidName {
        path: PathBuf,
        #[source]
        source: IntoEntryNameError,
    },

    #[error("Too many entries for one archive: {count} (maximum {})", u16::MAX)]
    TooManyEntries { count: usize },

    #[error("Cannot create archive `{}`", .path.display())]
    CreateArchive {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot read source file `{}`", .path.display())]
    ReadSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot compress source file `{}`", .path.display())]
    Codec {
        path: PathBuf,
        #[source]
        source: CodecError,
    },

    #[error("Cannot write archive `{}`", .path.display())]
    WriteArchive {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Archive `{}` would exceed the 4 GiB addressable by the format", .path.display())]
    ArchiveTooLarge { path: PathBuf },
}
