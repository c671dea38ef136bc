//! The few filesystem facts the format engine needs about a path.

use std::path::Path;
use std::time::SystemTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    File,
    Directory,
    Other,
}

#[derive(Debug, Clone, Copy)]
pub struct PathInfo {
    pub kind: PathKind,
    pub modified: SystemTime,
    pub len: u64,
}

/// Type, modification time and length of `path`. Symlinks are followed.
pub fn path_info<P: AsRef<Path>>(path: P) -> std::io::Result<PathInfo> {
    let meta = std::fs::metadata(path.as_ref())?;

    let kind = if meta.is_file() {
        PathKind::File
    } else if meta.is_dir() {
        PathKind::Directory
    } else {
        PathKind::Other
    };

    Ok(PathInfo {
        kind,
        modified: meta.modified()?,
        len: meta.len(),
    })
}

/// Permissions for a freshly packed archive. A repack keeps the permissions
/// of the archive it replaces.
#[cfg(all(unix, feature = "writer"))]
pub(crate) fn archive_permissions(existing: &Path) -> Option<std::fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;

    let permissions = std::fs::metadata(existing)
        .map(|meta| meta.permissions())
        .unwrap_or_else(|_| std::fs::Permissions::from_mode(0o644));
    Some(permissions)
}

#[cfg(all(not(unix), feature = "writer"))]
pub(crate) fn archive_permissions(existing: &Path) -> Option<std::fs::Permissions> {
    std::fs::metadata(existing).ok().map(|meta| meta.permissions())
}
