use std::path::Path;

use log::{Level, Log};

use crate::{error::SyncError, remote::TransferChannel, report};

/// Uploads each pair in order and stops at the first failure.
///
/// Files uploaded before the failure stay on the remote side.
pub fn send_files<'p>(
    channel: &mut impl TransferChannel,
    pairs: impl IntoIterator<Item = (&'p Path, &'p Path)>,
    logger: &dyn Log,
) -> Result<usize, SyncError> {
    let mut uploaded = 0;

    for (local_source, remote_dest) in pairs {
        report!(
            logger,
            Level::Info,
            "Uploading '{}' to remote location '{}'...",
            local_source.display(),
            remote_dest.display()
        );

        let bytes = channel
            .put(local_source, remote_dest)
            .map_err(|source| SyncError::Transfer {
                local: local_source.to_path_buf(),
                remote: remote_dest.to_path_buf(),
                source,
            })?;

        report!(logger, Level::Debug, "Wrote {bytes} bytes to {}", remote_dest.display());
        uploaded += 1;
    }

    Ok(uploaded)
}
