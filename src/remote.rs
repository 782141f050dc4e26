use std::path::Path;

use crate::{
    config::Connection,
    error::{ConnectError, TransferError},
};

pub mod transfer;

/// Opens one authenticated session and hands back its transfer channel.
pub trait Connector {
    type Channel: TransferChannel;

    fn connect(&self, connection: &Connection, password: &str)
        -> Result<Self::Channel, ConnectError>;
}

pub trait TransferChannel {
    /// Copies `local_source` to `remote_dest`, replacing any existing file.
    /// Returns the number of bytes written.
    fn put(&mut self, local_source: &Path, remote_dest: &Path) -> Result<u64, TransferError>;
}
