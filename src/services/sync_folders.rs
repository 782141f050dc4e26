use std::path::Path;

use log::{Level, Log};

use crate::{
    config::read_config,
    credentials::{resolve_password, PasswordPrompt},
    error::SyncError,
    remote::{transfer::send_files, Connector},
    report,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    pub uploaded: usize,
    /// Trailing entries of the longer path list that had no partner.
    pub unpaired: usize,
}

/// Load, resolve the password, connect once, then upload every pair in order.
///
/// Any error ends the run; nothing uploaded before it is rolled back.
pub fn sync_folders<C: Connector>(
    config_file: &Path,
    prompt: &impl PasswordPrompt,
    connector: &C,
    logger: &dyn Log,
) -> Result<SyncReport, SyncError> {
    let mut config_ctx = read_config(config_file)?;
    report!(
        logger,
        Level::Debug,
        "Loaded configuration from {}",
        config_ctx.config_file.display()
    );
    let config = &mut config_ctx.config;

    let password = resolve_password(&mut config.connection, prompt)
        .map_err(SyncError::Credentials)?
        .to_string();

    let mut channel = connector.connect(&config.connection, &password)?;
    let uploaded = send_files(&mut channel, config.pairs(), logger)?;
    let unpaired = config.unpaired();

    Ok(SyncReport { uploaded, unpaired })
}
