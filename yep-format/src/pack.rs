//! Building the list of files that go into an archive.

use std::path::{Path, PathBuf};

use jwalk::WalkDir;

use crate::{
    compression::DEFAULT_COMPRESSION_THRESHOLD,
    error::PackError,
    fs::{path_info, PathKind},
    path::EntryName,
};

/// What to do with a file whose relative name cannot be stored in the name field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamePolicy {
    /// Log it and pack everything else.
    Skip,
    /// Abort the whole pack.
    Fail,
}

impl Default for NamePolicy {
    fn default() -> Self {
        NamePolicy::Skip
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackOptions {
    pub long_names: NamePolicy,
    /// Payloads larger than this many bytes are compressed.
    pub compression_threshold: usize,
}

impl Default for PackOptions {
    fn default() -> Self {
        PackOptions {
            long_names: NamePolicy::default(),
            compression_threshold: DEFAULT_COMPRESSION_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackListNode {
    pub name: EntryName,
    pub source: PathBuf,
}

/// Files to pack, in the order their records and payloads are written.
#[derive(Debug, Default)]
pub struct PackList {
    nodes: Vec<PackListNode>,
}

impl PackList {
    pub fn new() -> PackList {
        PackList::default()
    }

    /// Lists every regular file below `root`, recursively. Directories are
    /// visited in file name order so the same tree always yields the same list.
    pub fn build<P: AsRef<Path>>(root: P, options: &PackOptions) -> Result<PackList, PackError> {
        let root = root.as_ref();

        match path_info(root) {
            Ok(info) if info.kind == PathKind::Directory => {}
            _ => {
                return Err(PackError::NotADirectory {
                    path: root.to_path_buf(),
                })
            }
        }

        let mut list = PackList::new();

        for entry in WalkDir::new(root).sort(true).skip_hidden(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::error!(error = %e, "cannot read directory entry, skipping");
                    continue;
                }
            };

            let path = entry.path();
            let file_type = entry.file_type();
            if !file_type.is_file() {
                if !file_type.is_dir() {
                    tracing::debug!(path = %path.display(), "skipping non-file path");
                }
                continue;
            }

            match EntryName::from_relative(root, &path) {
                Ok(name) => {
                    tracing::debug!(%name, path = %path.display(), "adding to pack list");
                    list.push(name, path);
                }
                Err(source) => match options.long_names {
                    NamePolicy::Skip => {
                        tracing::warn!(
                            path = %path.display(),
                            reason = %source,
                            "file cannot be packed under its relative name, skipping"
                        );
                    }
                    NamePolicy::Fail => return Err(PackError::InvalidName { path, source }),
                },
            }
        }

        list.entry_count()?;
        Ok(list)
    }

    pub fn push(&mut self, name: EntryName, source: PathBuf) {
        self.nodes.push(PackListNode { name, source });
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PackListNode> {
        self.nodes.iter()
    }

    /// The entry count as stored in the header.
    pub fn entry_count(&self) -> Result<u16, PackError> {
        u16::try_from(self.nodes.len()).map_err(|_| PackError::TooManyEntries {
            count: self.nodes.len(),
        })
    }
}

impl IntoIterator for PackList {
    type Item = PackListNode;
    type IntoIter = std::vec::IntoIter<PackListNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}

impl<'a> IntoIterator for &'a PackList {
    type Item = &'a PackListNode;
    type IntoIter = std::slice::Iter<'a, PackListNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}
