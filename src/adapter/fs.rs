use std::{fs::File, path::Path};

use crate::error::TransferError;

/// Opens a local upload source. Only regular files qualify.
pub fn open_source_file(path: &Path) -> Result<File, TransferError> {
    let file = File::open(path).map_err(|source| TransferError::LocalOpen {
        path: path.to_path_buf(),
        source,
    })?;

    let metadata = file.metadata().map_err(|source| TransferError::LocalOpen {
        path: path.to_path_buf(),
        source,
    })?;
    if !metadata.is_file() {
        return Err(TransferError::NotAFile {
            path: path.to_path_buf(),
        });
    }

    Ok(file)
}
