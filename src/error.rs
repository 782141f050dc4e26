use std::{io, path::PathBuf};

use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("could not resolve {host}: {source}")]
    Resolve { host: String, source: io::Error },

    #[error("could not connect to {host}: {source}")]
    Unreachable { host: String, source: io::Error },

    #[error("could not create session: {0}")]
    Session(#[source] ssh2::Error),

    #[error("handshake with {host} failed: {source}")]
    Handshake { host: String, source: ssh2::Error },

    #[error("{host} did not present a host key")]
    NoHostKey { host: String },

    #[error("could not check host key of {host}: {source}")]
    KnownHosts { host: String, source: ssh2::Error },

    #[error("host {host} is not in {}", known_hosts.display())]
    UnknownHost { host: String, known_hosts: PathBuf },

    #[error("host key of {host} does not match {} (fingerprint {fingerprint})", known_hosts.display())]
    HostKeyMismatch {
        host: String,
        known_hosts: PathBuf,
        fingerprint: String,
    },

    #[error("authentication as {user} failed: {source}")]
    Auth { user: String, source: ssh2::Error },

    #[error("authentication as {user} was not accepted")]
    NotAuthenticated { user: String },

    #[error("could not open SFTP channel: {0}")]
    Channel(#[source] ssh2::Error),
}

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("could not open local file {}: {source}", path.display())]
    LocalOpen { path: PathBuf, source: io::Error },

    #[error("{} is not a regular file", path.display())]
    NotAFile { path: PathBuf },

    #[error("could not create remote file {}: {source}", path.display())]
    RemoteOpen { path: PathBuf, source: ssh2::Error },

    #[error("could not copy contents: {0}")]
    Copy(#[source] io::Error),

    #[error("could not check remote file {}: {source}", path.display())]
    RemoteStat { path: PathBuf, source: ssh2::Error },

    #[error("remote file {} has {} bytes, expected {expected}", path.display(), actual.map_or_else(|| "an unknown number of".to_string(), |size| size.to_string()))]
    SizeMismatch {
        path: PathBuf,
        expected: u64,
        actual: Option<u64>,
    },
}

/// Everything that ends a run. Each variant renders as the final log line.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Could not load configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Could not read password: {0}")]
    Credentials(#[source] io::Error),

    #[error("SSH connection failed: {0}")]
    Connect(#[from] ConnectError),

    #[error("SFTP upload failed: '{}' -> '{}': {source}", local.display(), remote.display())]
    Transfer {
        local: PathBuf,
        remote: PathBuf,
        source: TransferError,
    },
}
