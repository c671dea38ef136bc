use std::fmt;
use std::ops::Range;

use crate::{compression::Compression, path::EntryName};

/// Size of one entry record on disk.
pub const RECORD_LEN: u64 = 78;

pub mod constants {
    pub const DATA_KIND_MISC: u8 = 0x00;
    pub const DATA_KIND_IMAGE: u8 = 0x01;
    pub const DATA_KIND_PCM: u8 = 0x02;
    pub const DATA_KIND_LUA_BYTECODE: u8 = 0x03;
}

use self::constants::*;

/// What a payload holds. Only `Misc` is written today; the other values are
/// reserved for typed decoding by content loaders.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum DataKind {
    Misc,
    Image,
    Pcm,
    LuaBytecode,
    Unknown(u8),
}

impl Default for DataKind {
    fn default() -> Self {
        Self::Misc
    }
}

impl DataKind {
    pub const fn id(self) -> u8 {
        use DataKind::*;

        match self {
            Misc => DATA_KIND_MISC,
            Image => DATA_KIND_IMAGE,
            Pcm => DATA_KIND_PCM,
            LuaBytecode => DATA_KIND_LUA_BYTECODE,
            Unknown(id) => id,
        }
    }

    pub const fn from_id(id: u8) -> DataKind {
        match id {
            DATA_KIND_MISC => DataKind::Misc,
            DATA_KIND_IMAGE => DataKind::Image,
            DATA_KIND_PCM => DataKind::Pcm,
            DATA_KIND_LUA_BYTECODE => DataKind::LuaBytecode,
            id => DataKind::Unknown(id),
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use DataKind::*;

        match self {
            Misc => f.write_str("misc"),
            Image => f.write_str("image"),
            Pcm => f.write_str("pcm"),
            LuaBytecode => f.write_str("lua"),
            Unknown(id) => write!(f, "Unknown(id: {:x})", id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRecord {
    /// Relative, `/`-separated name; at most 63 bytes so the field keeps its terminator.
    pub name: EntryName,

    /// Absolute position of the payload in the archive.
    pub offset: u32,

    /// Bytes the payload occupies on disk, after compression.
    pub stored_size: u32,

    pub compression: Compression,

    /// Length of the content once decompressed. Equal to `stored_size` for stored entries.
    pub uncompressed_size: u32,

    pub data_kind: DataKind,
}

impl EntryRecord {
    /// A record with only its name set, written before the payloads so the
    /// start of the data region is fixed.
    #[cfg(feature = "writer")]
    pub(crate) fn placeholder(name: EntryName) -> EntryRecord {
        EntryRecord {
            name,
            offset: 0,
            stored_size: 0,
            compression: Compression::Stored,
            uncompressed_size: 0,
            data_kind: DataKind::Misc,
        }
    }

    #[inline(always)]
    pub fn name(&self) -> &EntryName {
        &self.name
    }

    #[inline(always)]
    pub fn compression(&self) -> Compression {
        self.compression
    }

    #[inline(always)]
    pub fn is_compressed(&self) -> bool {
        self.compression != Compression::Stored
    }

    /// Byte range of the payload within the archive file.
    #[inline(always)]
    pub fn payload_range(&self) -> Range<u64> {
        let start = self.offset as u64;
        start..start + self.stored_size as u64
    }
}
