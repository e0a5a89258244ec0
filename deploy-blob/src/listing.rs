use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{DeployError, DeployResult, FileSpec};

/// List the immediate entries of a directory as [`FileSpec`]s.
///
/// Relative paths are resolved against the current working directory. The
/// listing does not recurse and does not filter: subdirectories come back
/// like any other entry and fail later when their bytes are read. Entries
/// are returned in the order the filesystem yields them. A name that is not
/// valid UTF-8 cannot become an object key and fails the whole listing.
pub async fn list_directory<P: AsRef<Path>>(directory: P) -> DeployResult<Vec<FileSpec>> {
    let directory = resolve(directory.as_ref())?;

    let mut entries = tokio::fs::read_dir(&directory)
        .await
        .map_err(|e| map_open_error(&directory, e))?;

    let mut specs = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let file_name = entry.file_name().into_string().map_err(|raw| {
            DeployError::invalid(format!(
                "file name {:?} in {} is not valid UTF-8",
                raw,
                directory.display()
            ))
        })?;
        specs.push(FileSpec::new(file_name, entry.path()));
    }

    debug!("Listed {} entries in {}", specs.len(), directory.display());
    Ok(specs)
}

fn resolve(directory: &Path) -> DeployResult<PathBuf> {
    if directory.is_absolute() {
        Ok(directory.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(directory))
    }
}

fn map_open_error(directory: &Path, error: std::io::Error) -> DeployError {
    match error.kind() {
        ErrorKind::NotFound => DeployError::DirectoryNotFound {
            path: directory.to_path_buf(),
        },
        ErrorKind::PermissionDenied => DeployError::PermissionDenied {
            path: directory.to_path_buf(),
        },
        _ => DeployError::from(error),
    }
}
