#[cfg(feature = "reader")]
use std::io::{Read, Seek, SeekFrom};

#[cfg(feature = "reader")]
use crate::{de::DeserializeOwned, header::ArchiveHeader};

#[cfg(feature = "reader")]
pub mod reader;
#[cfg(feature = "writer")]
pub mod writer;

#[cfg(feature = "reader")]
#[inline(always)]
pub(crate) fn read_header<R: Read + Seek>(file: &mut R) -> std::io::Result<ArchiveHeader> {
    file.seek(SeekFrom::Start(0))?;
    ArchiveHeader::deserialize_owned(file)
}
