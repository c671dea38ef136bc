use std::io::Read;

use byteorder::{LittleEndian, ReadBytesExt};

use crate::{
    compression::Compression,
    header::ArchiveHeader,
    path::{EntryName, NAME_FIELD_LEN},
    record::{DataKind, EntryRecord},
};

pub(crate) trait DeserializeOwned {
    fn deserialize_owned<R: Read>(reader: &mut R) -> std::io::Result<Self>
    where
        Self: Sized;
}

impl DeserializeOwned for ArchiveHeader {
    fn deserialize_owned<R: Read>(reader: &mut R) -> std::io::Result<Self> {
        let version = reader.read_u8()?;
        let entry_count = reader.read_u16::<LittleEndian>()?;

        tracing::debug!(version, entry_count, "deserialized ArchiveHeader");

        Ok(ArchiveHeader {
            version,
            entry_count,
        })
    }
}

impl DeserializeOwned for Compression {
    fn deserialize_owned<R: Read>(reader: &mut R) -> std::io::Result<Self> {
        Ok(Compression::from_id(reader.read_u8()?))
    }
}

impl DeserializeOwned for DataKind {
    fn deserialize_owned<R: Read>(reader: &mut R) -> std::io::Result<Self> {
        Ok(DataKind::from_id(reader.read_u8()?))
    }
}

impl DeserializeOwned for EntryRecord {
    fn deserialize_owned<R: Read>(reader: &mut R) -> std::io::Result<Self> {
        let mut field = [0u8; NAME_FIELD_LEN];
        reader.read_exact(&mut field)?;
        read_after_name(&field, reader)
    }
}

/// Finishes reading a record whose name field has already been consumed.
/// Lookups compare the bare name field first and only decode the rest on a match.
pub(crate) fn read_after_name<R: Read>(
    field: &[u8; NAME_FIELD_LEN],
    reader: &mut R,
) -> std::io::Result<EntryRecord> {
    let name = EntryName::from_field(field);
    let offset = reader.read_u32::<LittleEndian>()?;
    let stored_size = reader.read_u32::<LittleEndian>()?;
    let compression = Compression::deserialize_owned(reader)?;
    let uncompressed_size = reader.read_u32::<LittleEndian>()?;
    let data_kind = DataKind::deserialize_owned(reader)?;

    tracing::debug!(
        %name,
        offset = format_args!("{:#x}", offset),
        stored_size,
        uncompressed_size,
        ?compression,
        "deserialized EntryRecord"
    );

    Ok(EntryRecord {
        name,
        offset,
        stored_size,
        compression,
        uncompressed_size,
        data_kind,
    })
}
