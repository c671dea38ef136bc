use std::io::Write;
use std::path::{Path, PathBuf};

use yep_format::{ArchiveCache, ExtractError};

use crate::cli::ExtractArgs;
use crate::error::{Error, Result};

/// Where an extracted entry is written.
fn destination(output: Option<&Path>, name: &str, several: bool) -> Option<PathBuf> {
    match output {
        None => None,
        Some(dir) if several => Some(name.split('/').fold(dir.to_path_buf(), |p, c| p.join(c))),
        Some(file) => Some(file.to_path_buf()),
    }
}

fn write_file(path: &Path, data: &[u8]) -> Result<()> {
    let write_error = |source| Error::WriteOutput {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_error)?;
    }
    std::fs::write(path, data).map_err(write_error)
}

pub fn run(args: ExtractArgs) -> Result<()> {
    let mut cache = ArchiveCache::new();
    let several = args.names.len() > 1;

    for name in args.names.iter() {
        let data = cache.extract(&args.archive, name).map_err(|source| match source {
            ExtractError::Open(source) => Error::OpenArchive {
                path: args.archive.clone(),
                source,
            },
            source => Error::Extract {
                path: args.archive.clone(),
                name: name.clone(),
                source,
            },
        })?;

        match destination(args.output.as_deref(), name, several) {
            Some(path) => {
                write_file(&path, &data)?;
                tracing::info!(%name, path = %path.display(), bytes = data.len(), "extracted");
            }
            None => {
                let stdout = std::io::stdout();
                let mut stdout = stdout.lock();
                stdout.write_all(&data).map_err(Error::Stdout)?;
                stdout.flush().map_err(Error::Stdout)?;
            }
        }
    }

    cache.close();
    Ok(())
}
