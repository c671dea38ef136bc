use std::io::Write;

use byteorder::{LittleEndian, WriteBytesExt};

use crate::{
    compression::Compression,
    header::ArchiveHeader,
    path::EntryName,
    record::{DataKind, EntryRecord},
};

pub(crate) trait Serialize {
    fn write<W: Write>(&self, writer: &mut W) -> std::io::Result<()>;
}

impl Serialize for ArchiveHeader {
    fn write<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_u8(self.version)?;
        writer.write_u16::<LittleEndian>(self.entry_count)
    }
}

impl Serialize for EntryName {
    fn write<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(&self.to_field())
    }
}

impl Serialize for Compression {
    fn write<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_u8(self.id())
    }
}

impl Serialize for DataKind {
    fn write<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_u8(self.id())
    }
}

impl Serialize for EntryRecord {
    fn write<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        self.name.write(writer)?;
        write_placement(self, writer)?;
        self.data_kind.write(writer)
    }
}

/// Writes the fields that are backfilled once the payload is on disk:
/// offset, stored size, compression and uncompressed size. The writer must
/// already be positioned just past the record's name field.
pub(crate) fn write_placement<W: Write>(record: &EntryRecord, writer: &mut W) -> std::io::Result<()> {
    writer.write_u32::<LittleEndian>(record.offset)?;
    writer.write_u32::<LittleEndian>(record.stored_size)?;
    record.compression.write(writer)?;
    writer.write_u32::<LittleEndian>(record.uncompressed_size)
}
