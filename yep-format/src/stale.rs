//! Deciding whether a source directory needs repacking.
//!
//! Only the directory's own modification time is compared. A file changed
//! deep in the tree is missed on filesystems where a directory's mtime does
//! not follow its descendants.

use std::path::Path;

use crate::fs::{path_info, PathKind};

/// True if `source_dir` was modified after `archive` was written.
///
/// Fails closed: a missing path or a path of the wrong kind is logged and
/// reported as not stale.
pub fn is_stale<D: AsRef<Path>, A: AsRef<Path>>(source_dir: D, archive: A) -> bool {
    let source_dir = source_dir.as_ref();
    let archive = archive.as_ref();

    let dir_info = match path_info(source_dir) {
        Ok(info) => info,
        Err(e) => {
            tracing::error!(path = %source_dir.display(), error = %e, "source directory does not exist");
            return false;
        }
    };
    if dir_info.kind != PathKind::Directory {
        tracing::error!(path = %source_dir.display(), "source is not a directory");
        return false;
    }

    let archive_info = match path_info(archive) {
        Ok(info) => info,
        Err(e) => {
            tracing::error!(path = %archive.display(), error = %e, "archive does not exist");
            return false;
        }
    };
    if archive_info.kind != PathKind::File {
        tracing::error!(path = %archive.display(), "archive is not a file");
        return false;
    }

    if dir_info.modified > archive_info.modified {
        tracing::debug!(
            dir = %source_dir.display(),
            archive = %archive.display(),
            "directory is newer than archive"
        );
        true
    } else {
        tracing::debug!(
            dir = %source_dir.display(),
            archive = %archive.display(),
            "directory is not newer than archive"
        );
        false
    }
}
