//! Packing real directory trees and reading them back.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tempfile::TempDir;
use yep_format::{
    force_pack_directory, is_stale, pack_directory, ArchiveHeader, ArchiveReader, ArchiveWriter,
    Compression, EntryName, ExtractError, NamePolicy, OpenError, PackError, PackList, PackOptions,
};

/// Writes `data` at `root/name`, creating parent directories.
fn touch(root: &Path, name: &str, data: &[u8]) -> PathBuf {
    let path = root.join(name);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, data).unwrap();
    path
}

fn source_tree() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let src = temp_dir.path().join("assets");
    fs::create_dir(&src).unwrap();
    (temp_dir, src)
}

fn pack(src: &Path, out: &Path) -> yep_format::ArchiveSummary {
    force_pack_directory(src, out, &PackOptions::default(), |_| {}).unwrap()
}

fn set_mtime(path: &Path, time: SystemTime) {
    fs::File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(time)
        .unwrap();
}

#[test]
fn end_to_end_scenario() {
    let (temp_dir, src) = source_tree();
    touch(&src, "a.txt", b"helloworld");
    touch(&src, "sub/b.bin", &[0xAA; 500]);
    let out = temp_dir.path().join("out.yep");

    let summary = pack(&src, &out);
    assert_eq!(summary.entries, 2);
    assert_eq!(summary.compressed_entries, 1);

    let raw = fs::read(&out).unwrap();
    assert_eq!(raw[0], ArchiveHeader::CURRENT_VERSION);
    assert_eq!(u16::from_le_bytes([raw[1], raw[2]]), 2);

    let mut reader = ArchiveReader::open(&out).unwrap();
    assert_eq!(reader.len(), 2);

    let a = reader.lookup("a.txt").unwrap().unwrap();
    assert_eq!(a.compression, Compression::Stored);
    assert_eq!(a.stored_size, 10);
    assert_eq!(a.uncompressed_size, 10);
    assert_eq!(reader.extract("a.txt").unwrap(), b"helloworld");

    let b = reader.lookup("sub/b.bin").unwrap().unwrap();
    assert_eq!(b.compression, Compression::Zlib);
    assert!(b.stored_size < 500);
    assert_eq!(b.uncompressed_size, 500);
    assert_eq!(reader.extract("sub/b.bin").unwrap(), vec![0xAA; 500]);

    // payload region starts right after the two records
    assert_eq!(a.offset as u64, 3 + 2 * 78);
    assert_eq!(raw.len() as u64, 3 + 2 * 78 + 10 + b.stored_size as u64);
}

#[test]
fn round_trip_every_file() {
    let (temp_dir, src) = source_tree();
    let files: Vec<(&str, Vec<u8>)> = vec![
        ("empty", vec![]),
        ("one", vec![1]),
        ("text/readme.md", b"# readme\n".to_vec()),
        ("text/lorem.txt", "lorem ipsum dolor sit amet ".repeat(40).into_bytes()),
        ("bin/noise.dat", (0..4096u32).map(|i| (i * 7919 % 251) as u8).collect()),
        ("deep/er/and/deeper/still.json", br#"{"key": "value"}"#.to_vec()),
        (".hidden", b"dotfiles are packed too".to_vec()),
    ];
    for (name, data) in &files {
        touch(&src, name, data);
    }
    let out = temp_dir.path().join("all.yep");

    pack(&src, &out);

    let mut reader = ArchiveReader::open(&out).unwrap();
    assert_eq!(reader.len(), files.len());
    for (name, data) in &files {
        assert_eq!(&reader.extract(name).unwrap(), data, "entry {}", name);
    }
}

#[test]
fn name_length_boundary() {
    let (temp_dir, src) = source_tree();
    let fits = format!("d/{}", "f".repeat(61));
    let too_long = format!("d/{}", "g".repeat(62));
    assert_eq!(fits.len(), 63);
    assert_eq!(too_long.len(), 64);

    touch(&src, &fits, b"fits");
    touch(&src, &too_long, b"too long");
    touch(&src, "z.txt", b"after");
    let out = temp_dir.path().join("names.yep");

    let summary = pack(&src, &out);
    assert_eq!(summary.entries, 2);

    let mut reader = ArchiveReader::open(&out).unwrap();
    assert_eq!(reader.extract(&fits).unwrap(), b"fits");
    assert!(!reader.exists(&too_long).unwrap());
    assert_eq!(reader.extract("z.txt").unwrap(), b"after");
}

#[test]
fn strict_names_abort() {
    let (temp_dir, src) = source_tree();
    touch(&src, &"n".repeat(64), b"too long");
    let out = temp_dir.path().join("strict.yep");

    let options = PackOptions {
        long_names: NamePolicy::Fail,
        ..PackOptions::default()
    };
    match force_pack_directory(&src, &out, &options, |_| {}) {
        Err(PackError::InvalidName { .. }) => {}
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(!out.exists());
}

#[test]
fn compression_threshold() {
    let (temp_dir, src) = source_tree();
    touch(&src, "at.bin", &[b'a'; 256]);
    touch(&src, "over.bin", &[b'a'; 257]);
    let out = temp_dir.path().join("threshold.yep");

    pack(&src, &out);

    let mut reader = ArchiveReader::open(&out).unwrap();
    let at = reader.lookup("at.bin").unwrap().unwrap();
    assert_eq!(at.compression, Compression::Stored);
    assert_eq!(at.stored_size, 256);

    let over = reader.lookup("over.bin").unwrap().unwrap();
    assert_eq!(over.compression, Compression::Zlib);
    assert!(over.stored_size < 257);
    assert_eq!(over.uncompressed_size, 257);

    let data = reader.extract("over.bin").unwrap();
    assert_eq!(data.len(), 257);
    assert!(data.iter().all(|b| *b == b'a'));
}

#[test]
fn incompressible_payload_is_stored() {
    let (temp_dir, src) = source_tree();
    // xorshift noise does not deflate
    let mut state = 0x2545_f491u32;
    let noise: Vec<u8> = (0..2048)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            state as u8
        })
        .collect();
    touch(&src, "noise.bin", &noise);
    let out = temp_dir.path().join("noise.yep");

    pack(&src, &out);

    let mut reader = ArchiveReader::open(&out).unwrap();
    let record = reader.lookup("noise.bin").unwrap().unwrap();
    assert!(record.stored_size <= record.uncompressed_size);
    assert_eq!(reader.extract("noise.bin").unwrap(), noise);
}

#[test]
fn version_gate() {
    let (temp_dir, src) = source_tree();
    touch(&src, "a.txt", b"helloworld");
    let out = temp_dir.path().join("future.yep");
    pack(&src, &out);

    let mut raw = fs::read(&out).unwrap();
    raw[0] = ArchiveHeader::CURRENT_VERSION + 1;
    fs::write(&out, raw).unwrap();

    match ArchiveReader::open(&out) {
        Err(e @ OpenError::UnsupportedVersion { .. }) => {
            assert!(e.is_format_error());
            if let OpenError::UnsupportedVersion { found, supported } = e {
                assert_eq!(found, 2);
                assert_eq!(supported, 1);
            }
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn truncated_archives_are_corrupt() {
    let temp_dir = TempDir::new().unwrap();

    let short_header = temp_dir.path().join("short.yep");
    fs::write(&short_header, [1u8, 0]).unwrap();
    match ArchiveReader::open(&short_header) {
        Err(OpenError::Corrupt { .. }) => {}
        other => panic!("unexpected result: {:?}", other),
    }

    let short_table = temp_dir.path().join("table.yep");
    fs::write(&short_table, [1u8, 5, 0, b'a', b'b']).unwrap();
    match ArchiveReader::open(&short_table) {
        Err(e @ OpenError::Corrupt { .. }) => assert!(e.is_format_error()),
        other => panic!("unexpected result: {:?}", other),
    }

    match ArchiveReader::open(temp_dir.path().join("missing.yep")) {
        Err(e @ OpenError::NotFound { .. }) => assert!(!e.is_format_error()),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn truncated_payload() {
    let (temp_dir, src) = source_tree();
    touch(&src, "a.txt", b"helloworld");
    let out = temp_dir.path().join("cut.yep");
    pack(&src, &out);

    let mut raw = fs::read(&out).unwrap();
    raw.truncate(raw.len() - 4);
    fs::write(&out, raw).unwrap();

    let mut reader = ArchiveReader::open(&out).unwrap();
    match reader.extract("a.txt") {
        Err(ExtractError::Truncated { end, len, .. }) => assert_eq!(end, len + 4),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn absent_names() {
    let (temp_dir, src) = source_tree();
    let empty = temp_dir.path().join("empty.yep");
    pack(&src, &empty);

    let mut reader = ArchiveReader::open(&empty).unwrap();
    assert!(reader.is_empty());
    assert!(reader.lookup("a.txt").unwrap().is_none());
    assert!(matches!(reader.extract("a.txt"), Err(ExtractError::NotFound(_))));

    touch(&src, "a.txt", b"helloworld");
    let full = temp_dir.path().join("full.yep");
    pack(&src, &full);

    let mut reader = ArchiveReader::open(&full).unwrap();
    assert!(!reader.exists("b.txt").unwrap());
    match reader.extract("b.txt") {
        Err(ExtractError::NotFound(name)) => assert_eq!(name, "b.txt"),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn repacking_is_idempotent() {
    let (temp_dir, src) = source_tree();
    touch(&src, "a.txt", b"helloworld");
    touch(&src, "sub/b.bin", &[0xAA; 500]);
    touch(&src, "sub/c.txt", "c".repeat(300).as_bytes());
    let out = temp_dir.path().join("twice.yep");

    pack(&src, &out);
    let mut first = ArchiveReader::open(&out).unwrap();
    let first_entries = first.entries().unwrap();
    let first_data: Vec<_> = first_entries
        .iter()
        .map(|r| first.extract_record(r).unwrap())
        .collect();
    drop(first);

    pack(&src, &out);
    let mut second = ArchiveReader::open(&out).unwrap();
    let second_entries = second.entries().unwrap();
    assert_eq!(first_entries.len(), second_entries.len());

    for (record, data) in first_entries.iter().zip(&first_data) {
        assert_eq!(&second.extract(record.name.as_str()).unwrap(), data);
    }
}

#[test]
fn failed_pack_keeps_previous_archive() {
    let (temp_dir, src) = source_tree();
    touch(&src, "a.txt", b"helloworld");
    let out = temp_dir.path().join("keep.yep");
    pack(&src, &out);
    let before = fs::read(&out).unwrap();

    let mut list = PackList::new();
    list.push(EntryName::new("a.txt").unwrap(), src.join("a.txt"));
    list.push(EntryName::new("gone.txt").unwrap(), src.join("gone.txt"));

    let result = ArchiveWriter::create(&out, PackOptions::default())
        .unwrap()
        .write(list, |_| {});
    match result {
        Err(PackError::ReadSource { path, .. }) => assert_eq!(path, src.join("gone.txt")),
        other => panic!("unexpected result: {:?}", other),
    }

    assert_eq!(fs::read(&out).unwrap(), before);

    // nothing but the sources and the previous archive is left behind
    let leftovers: Vec<_> = fs::read_dir(temp_dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(leftovers.len(), 2, "{:?}", leftovers);
}

#[test]
fn duplicate_names_resolve_to_first() {
    let (temp_dir, src) = source_tree();
    let first = touch(&src, "first.txt", b"first");
    let second = touch(&src, "second.txt", b"second");
    let out = temp_dir.path().join("dup.yep");

    let mut list = PackList::new();
    list.push(EntryName::new("dup").unwrap(), first);
    list.push(EntryName::new("dup").unwrap(), second);
    ArchiveWriter::create(&out, PackOptions::default())
        .unwrap()
        .write(list, |_| {})
        .unwrap();

    let mut reader = ArchiveReader::open(&out).unwrap();
    assert_eq!(reader.len(), 2);
    assert_eq!(reader.extract("dup").unwrap(), b"first");

    // the second record is still there, just never found by name
    let entries = reader.entries().unwrap();
    assert_eq!(reader.extract_record(&entries[1]).unwrap(), b"second");
}

#[test]
fn too_many_entries() {
    let (temp_dir, src) = source_tree();
    let source = touch(&src, "a.txt", b"a");
    let out = temp_dir.path().join("huge.yep");

    let mut list = PackList::new();
    let name = EntryName::new("a.txt").unwrap();
    for _ in 0..=u16::MAX as usize {
        list.push(name.clone(), source.clone());
    }
    assert_eq!(list.len(), 65536);

    match list.entry_count() {
        Err(PackError::TooManyEntries { count }) => assert_eq!(count, 65536),
        other => panic!("unexpected result: {:?}", other),
    }

    let result = ArchiveWriter::create(&out, PackOptions::default())
        .unwrap()
        .write(list, |_| {});
    assert!(matches!(result, Err(PackError::TooManyEntries { count: 65536 })));
    assert!(!out.exists());
}

#[test]
fn failed_pack_leaves_no_file() {
    let (temp_dir, src) = source_tree();
    let out = temp_dir.path().join("never.yep");

    let mut list = PackList::new();
    list.push(EntryName::new("gone.txt").unwrap(), src.join("gone.txt"));

    let result = ArchiveWriter::create(&out, PackOptions::default())
        .unwrap()
        .write(list, |_| {});
    assert!(matches!(result, Err(PackError::ReadSource { .. })));
    assert!(!out.exists());
}

#[test]
fn missing_output_directory() {
    let (temp_dir, src) = source_tree();
    let out = temp_dir.path().join("no").join("such").join("dir.yep");

    match force_pack_directory(&src, &out, &PackOptions::default(), |_| {}) {
        Err(PackError::CreateArchive { .. }) => {}
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn source_must_be_a_directory() {
    let (temp_dir, src) = source_tree();
    let file = touch(&src, "a.txt", b"helloworld");
    let out = temp_dir.path().join("out.yep");

    assert!(matches!(
        force_pack_directory(&file, &out, &PackOptions::default(), |_| {}),
        Err(PackError::NotADirectory { .. })
    ));
    assert!(matches!(
        force_pack_directory(temp_dir.path().join("nope"), &out, &PackOptions::default(), |_| {}),
        Err(PackError::NotADirectory { .. })
    ));
}

#[test]
fn progress_counts_every_entry() {
    let (temp_dir, src) = source_tree();
    touch(&src, "a.txt", b"a");
    touch(&src, "b.txt", b"b");
    touch(&src, "c/d.txt", b"d");
    let out = temp_dir.path().join("progress.yep");

    let mut seen = vec![];
    force_pack_directory(&src, &out, &PackOptions::default(), |p| {
        seen.push((p.current, p.total, p.name.to_string()))
    })
    .unwrap();

    assert_eq!(
        seen,
        vec![
            (1, 3, "a.txt".to_string()),
            (2, 3, "b.txt".to_string()),
            (3, 3, "c/d.txt".to_string()),
        ]
    );
}

#[test]
fn staleness_follows_mtimes() {
    let (temp_dir, src) = source_tree();
    touch(&src, "a.txt", b"helloworld");
    let out = temp_dir.path().join("stale.yep");
    pack(&src, &out);

    set_mtime(&out, SystemTime::now() - Duration::from_secs(3600));
    assert!(is_stale(&src, &out));

    set_mtime(&out, SystemTime::now() + Duration::from_secs(3600));
    assert!(!is_stale(&src, &out));

    // adding a file bumps the directory past an old archive
    set_mtime(&out, SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000));
    touch(&src, "new.txt", b"new");
    assert!(is_stale(&src, &out));
}

#[test]
fn staleness_fails_closed() {
    let (temp_dir, src) = source_tree();
    let file = touch(&src, "a.txt", b"helloworld");
    let out = temp_dir.path().join("stale.yep");

    assert!(!is_stale(&src, &out));
    assert!(!is_stale(temp_dir.path().join("nope"), &file));
    assert!(!is_stale(&file, &file));
    assert!(!is_stale(&src, &src));
}

#[test]
fn pack_directory_skips_fresh_archives() {
    let (temp_dir, src) = source_tree();
    touch(&src, "a.txt", b"helloworld");
    let out = temp_dir.path().join("lazy.yep");

    // no archive yet: always packs
    let summary = pack_directory(&src, &out, &PackOptions::default(), |_| {}).unwrap();
    assert_eq!(summary.map(|s| s.entries), Some(1));

    set_mtime(&out, SystemTime::now() + Duration::from_secs(3600));
    touch(&src, "b.txt", b"ignored until stale");
    let summary = pack_directory(&src, &out, &PackOptions::default(), |_| {}).unwrap();
    assert!(summary.is_none());
    assert_eq!(ArchiveReader::open(&out).unwrap().len(), 1);

    set_mtime(&out, SystemTime::now() - Duration::from_secs(3600));
    let summary = pack_directory(&src, &out, &PackOptions::default(), |_| {}).unwrap();
    assert_eq!(summary.map(|s| s.entries), Some(2));
}
