use std::{io, path::Path};

use ssh2::Sftp;

use crate::{adapter::fs::open_source_file, error::TransferError, remote::TransferChannel};

use super::SSHSession;

/// SFTP channel that keeps its session alive. Field order makes the channel
/// close before the session disconnects.
pub struct SftpChannel {
    sftp: Sftp,
    _session: SSHSession,
}

impl SftpChannel {
    pub(super) fn new(sftp: Sftp, session: SSHSession) -> Self {
        Self {
            sftp,
            _session: session,
        }
    }
}

impl TransferChannel for SftpChannel {
    fn put(&mut self, local_source: &Path, remote_dest: &Path) -> Result<u64, TransferError> {
        let mut local = open_source_file(local_source)?;
        let mut dest = self
            .sftp
            .create(remote_dest)
            .map_err(|source| TransferError::RemoteOpen {
                path: remote_dest.to_path_buf(),
                source,
            })?;

        let written = io::copy(&mut local, &mut dest).map_err(TransferError::Copy)?;
        // Closes the remote handle before its size is read back.
        drop(dest);

        let stat = self
            .sftp
            .stat(remote_dest)
            .map_err(|source| TransferError::RemoteStat {
                path: remote_dest.to_path_buf(),
                source,
            })?;

        confirm_size(remote_dest, written, stat.size)
    }
}

/// The remote file must end up exactly as long as what was sent.
fn confirm_size(remote_dest: &Path, written: u64, remote_size: Option<u64>) -> Result<u64, TransferError> {
    if remote_size == Some(written) {
        Ok(written)
    } else {
        Err(TransferError::SizeMismatch {
            path: remote_dest.to_path_buf(),
            expected: written,
            actual: remote_size,
        })
    }
}
