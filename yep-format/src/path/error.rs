use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntoEntryNameError {
    UnrepresentableStr,
    OutsideRoot,
    EmptyName,
    ContainsNul,
    TooLong { len: usize },
}

impl std::error::Error for IntoEntryNameError {}

impl fmt::Display for IntoEntryNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntoEntryNameError::TooLong { len } => write!(
                f,
                "name is {} bytes, the name field holds at most {}",
                len,
                super::MAX_NAME_LEN
            ),
            other => f.write_str(other.as_str()),
        }
    }
}

impl IntoEntryNameError {
    pub fn as_str(&self) -> &str {
        match self {
            IntoEntryNameError::UnrepresentableStr => "unrepresentable string found in path",
            IntoEntryNameError::OutsideRoot => "path is not inside the packed directory",
            IntoEntryNameError::EmptyName => "no name provided",
            IntoEntryNameError::ContainsNul => "name contains a NUL byte",
            IntoEntryNameError::TooLong { .. } => "name too long",
        }
    }
}
