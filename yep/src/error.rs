use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Cannot pack `{}` into `{}`", .input.display(), .output.display())]
    Pack {
        input: PathBuf,
        output: PathBuf,
        #[source]
        source: yep_format::PackError,
    },

    #[error("Cannot open archive `{}`", .path.display())]
    OpenArchive {
        path: PathBuf,
        #[source]
        source: yep_format::OpenError,
    },

    #[error("Cannot list archive `{}`", .path.display())]
    List {
        path: PathBuf,
        #[source]
        source: yep_format::ExtractError,
    },

    #[error("Cannot extract `{name}` from `{}`", .path.display())]
    Extract {
        path: PathBuf,
        name: String,
        #[source]
        source: yep_format::ExtractError,
    },

    #[error("Cannot write `{}`", .path.display())]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot write to stdout")]
    Stdout(#[source] std::io::Error),
}
