use std::{
    fmt,
    path::{Component, Path},
};

mod error;

pub use self::error::IntoEntryNameError;

/// Width of the name field in an entry record, terminator included.
pub const NAME_FIELD_LEN: usize = 64;

/// Longest name that still leaves room for the NUL terminator.
pub const MAX_NAME_LEN: usize = NAME_FIELD_LEN - 1;

/// The separator used between components of an `EntryName`, on every platform.
pub const ENTRY_SEP: char = '/';

/// The name of an entry: a relative, `/`-separated path that fits the
/// fixed 64 byte name field. Names are compared byte for byte, so they are
/// case-sensitive and never normalized after construction.
#[derive(Debug, Clone, PartialOrd, Ord, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct EntryName(pub(crate) String);

impl EntryName {
    pub fn new<S: Into<String>>(name: S) -> std::result::Result<EntryName, IntoEntryNameError> {
        let name = name.into();

        if name.is_empty() {
            return Err(IntoEntryNameError::EmptyName);
        }

        if name.as_bytes().contains(&0) {
            return Err(IntoEntryNameError::ContainsNul);
        }

        if name.len() > MAX_NAME_LEN {
            return Err(IntoEntryNameError::TooLong { len: name.len() });
        }

        Ok(EntryName(name))
    }

    /// Derives the name of `path` relative to `root`: the root prefix is
    /// stripped, separators become `/`, and leading separators are dropped.
    pub fn from_relative<R: AsRef<Path>, P: AsRef<Path>>(
        root: R,
        path: P,
    ) -> std::result::Result<EntryName, IntoEntryNameError> {
        let relative = path
            .as_ref()
            .strip_prefix(root.as_ref())
            .map_err(|_| IntoEntryNameError::OutsideRoot)?;

        let mut out = String::new();
        for component in relative.components() {
            match component {
                Component::Normal(os_str) => {
                    let part = os_str
                        .to_str()
                        .ok_or(IntoEntryNameError::UnrepresentableStr)?;
                    if !out.is_empty() {
                        out.push(ENTRY_SEP);
                    }
                    out.push_str(part);
                }
                Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
                Component::ParentDir => return Err(IntoEntryNameError::OutsideRoot),
            }
        }

        // A backslash inside a Unix file name still ends up as a separator.
        let out = out.replace('\\', "/");
        EntryName::new(out.trim_start_matches(ENTRY_SEP))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The name as stored on disk: NUL padded to the full field width.
    #[cfg(feature = "writer")]
    pub(crate) fn to_field(&self) -> [u8; NAME_FIELD_LEN] {
        let mut field = [0u8; NAME_FIELD_LEN];
        field[..self.0.len()].copy_from_slice(self.0.as_bytes());
        field
    }

    /// Reads a name back out of a name field. Archives are not required to
    /// hold UTF-8 names, so invalid sequences are replaced for display.
    #[cfg(feature = "reader")]
    pub(crate) fn from_field(field: &[u8; NAME_FIELD_LEN]) -> EntryName {
        EntryName(String::from_utf8_lossy(field_bytes(field)).into_owned())
    }
}

/// The bytes of a name field up to, not including, the first NUL.
#[cfg(feature = "reader")]
#[inline(always)]
pub(crate) fn field_bytes(field: &[u8; NAME_FIELD_LEN]) -> &[u8] {
    let end = field.iter().position(|b| *b == 0).unwrap_or(NAME_FIELD_LEN);
    &field[..end]
}

impl AsRef<str> for EntryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for EntryName {
    type Err = IntoEntryNameError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        EntryName::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[cfg(feature = "writer")]
    #[test]
    fn longest_name_fits() {
        let name = "x".repeat(63);
        let entry = EntryName::new(name.clone()).unwrap();
        assert_eq!(entry.as_str(), name);

        let field = entry.to_field();
        assert_eq!(field[62], b'x');
        assert_eq!(field[63], 0);
    }

    #[test]
    fn name_needs_room_for_terminator() {
        let name = "x".repeat(64);
        assert_eq!(
            EntryName::new(name),
            Err(IntoEntryNameError::TooLong { len: 64 })
        );
    }

    #[test]
    fn empty_and_nul() {
        assert_eq!(EntryName::new(""), Err(IntoEntryNameError::EmptyName));
        assert_eq!(EntryName::new("a\0b"), Err(IntoEntryNameError::ContainsNul));
    }

    #[test]
    fn relative_to_root() {
        let root = PathBuf::from("/srv/assets");
        let name = EntryName::from_relative(&root, root.join("sub").join("b.bin")).unwrap();
        assert_eq!(name.as_str(), "sub/b.bin");

        let name = EntryName::from_relative(&root, root.join("a.txt")).unwrap();
        assert_eq!(name.as_str(), "a.txt");
    }

    #[test]
    fn relative_root_with_trailing_separator() {
        let name = EntryName::from_relative("assets/", "assets/fonts/mono.ttf").unwrap();
        assert_eq!(name.as_str(), "fonts/mono.ttf");
    }

    #[cfg(not(windows))]
    #[test]
    fn backslashes_become_separators() {
        let name = EntryName::from_relative("assets", "assets/odd\\name.txt").unwrap();
        assert_eq!(name.as_str(), "odd/name.txt");
    }

    #[test]
    fn outside_root() {
        assert_eq!(
            EntryName::from_relative("assets", "elsewhere/a.txt"),
            Err(IntoEntryNameError::OutsideRoot)
        );
    }

    #[test]
    fn root_itself_has_no_name() {
        assert_eq!(
            EntryName::from_relative("assets", "assets"),
            Err(IntoEntryNameError::EmptyName)
        );
    }

    #[cfg(feature = "writer")]
    #[test]
    fn field_round_trip() {
        let name = EntryName::new("sprites/player.png").unwrap();
        let field = name.to_field();
        assert_eq!(field_bytes(&field), b"sprites/player.png");
        assert_eq!(EntryName::from_field(&field), name);
    }

    #[cfg(feature = "reader")]
    #[test]
    fn field_without_terminator() {
        let field = [b'z'; NAME_FIELD_LEN];
        assert_eq!(field_bytes(&field).len(), NAME_FIELD_LEN);
    }
}
