use yep_format::ArchiveReader;

use crate::cli::ListArgs;
use crate::error::{Error, Result};
use crate::util::{format_size, ratio};

pub fn run(args: ListArgs) -> Result<()> {
    let mut reader = ArchiveReader::open(&args.archive).map_err(|source| Error::OpenArchive {
        path: args.archive.clone(),
        source,
    })?;

    let records = reader.entries().map_err(|source| Error::List {
        path: args.archive.clone(),
        source,
    })?;

    println!(
        "{:8}  {:>12}  {:>12}  {:>6}  {:6}  Name",
        "Method", "Stored", "Size", "Ratio", "Kind"
    );
    println!("{}", "-".repeat(72));

    let mut total_stored = 0u64;
    let mut total_size = 0u64;

    for record in records.iter() {
        let stored = record.stored_size as u64;
        let size = record.uncompressed_size as u64;

        println!(
            "{:8}  {:>12}  {:>12}  {:>5.1}%  {:6}  {}",
            record.compression.to_string(),
            format_size(stored),
            format_size(size),
            ratio(stored, size),
            record.data_kind.to_string(),
            record.name,
        );

        total_stored += stored;
        total_size += size;
    }

    println!("{}", "-".repeat(72));
    println!(
        "{:8}  {:>12}  {:>12}  {:>5.1}%  {:6}  {} entries (version {})",
        "",
        format_size(total_stored),
        format_size(total_size),
        ratio(total_stored, total_size),
        "",
        records.len(),
        reader.version(),
    );

    Ok(())
}
