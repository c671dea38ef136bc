use crate::record::RECORD_LEN;

/// Size of the file header: version byte plus entry count.
pub const HEADER_LEN: u64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveHeader {
    pub version: u8,
    pub entry_count: u16,
}

impl ArchiveHeader {
    /// The only version this build reads or writes. There is no migration
    /// between versions.
    pub const CURRENT_VERSION: u8 = 1;

    pub fn new(entry_count: u16) -> ArchiveHeader {
        ArchiveHeader {
            version: Self::CURRENT_VERSION,
            entry_count,
        }
    }

    #[inline(always)]
    pub fn is_supported(&self) -> bool {
        self.version == Self::CURRENT_VERSION
    }

    /// Absolute position of the record at `index` in the entry table.
    #[inline(always)]
    pub fn record_offset(index: usize) -> u64 {
        HEADER_LEN + index as u64 * RECORD_LEN
    }

    /// Where the first payload starts, right after the entry table.
    #[inline(always)]
    pub fn data_start(&self) -> u64 {
        Self::record_offset(self.entry_count as usize)
    }
}

impl Default for ArchiveHeader {
    fn default() -> Self {
        ArchiveHeader::new(0)
    }
}
