mod compression;
#[cfg(feature = "reader")]
mod de;
mod error;
mod file;
pub mod fs;
mod header;
#[cfg(feature = "writer")]
mod ops;
#[cfg(feature = "writer")]
pub mod pack;
pub mod path;
mod record;
#[cfg(feature = "writer")]
mod ser;
pub mod stale;

pub use compression::{Compression, DEFAULT_COMPRESSION_THRESHOLD};
pub use error::{CodecError, ExtractError, OpenError, PackError};
#[cfg(feature = "reader")]
pub use file::reader::{ArchiveCache, ArchiveReader};
#[cfg(feature = "writer")]
pub use file::writer::{ArchiveSummary, ArchiveWriter, PackProgress};
pub use header::{ArchiveHeader, HEADER_LEN};
#[cfg(feature = "writer")]
pub use ops::{force_pack_directory, pack_directory};
#[cfg(feature = "writer")]
pub use pack::{NamePolicy, PackList, PackListNode, PackOptions};
pub use path::EntryName;
pub use record::{DataKind, EntryRecord, RECORD_LEN};
pub use stale::is_stale;
