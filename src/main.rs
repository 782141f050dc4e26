mod adapter;
mod cli;
mod config;
mod credentials;
mod error;
mod logging;
mod remote;
mod services;
#[cfg(test)]
mod test_support;
mod util;

use std::process::ExitCode;

use clap::Parser;
use log::Level;

use crate::{
    adapter::ssh::SshConnector, cli::Cli, credentials::TerminalPrompt, logging::build_logger,
    services::sync_folders::sync_folders,
};

fn main() -> ExitCode {
    let cli = Cli::parse();
    let logger = build_logger();

    let result = sync_folders(
        &cli.config_file_name,
        &TerminalPrompt,
        &SshConnector::new(&logger),
        &logger,
    );

    match result {
        Ok(summary) => {
            if summary.unpaired > 0 {
                report!(
                    &logger,
                    Level::Debug,
                    "Ignored {} path(s) without a counterpart",
                    summary.unpaired
                );
            }
            report!(&logger, Level::Info, "Uploaded {} file(s)", summary.uploaded);
            ExitCode::SUCCESS
        }
        Err(err) => {
            report!(&logger, Level::Error, "{err}");
            ExitCode::FAILURE
        }
    }
}
