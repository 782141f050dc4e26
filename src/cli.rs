use std::path::PathBuf;

use clap::Parser;

/// Upload local files to their remote counterparts over SFTP.
#[derive(Debug, Parser)]
#[command(version)]
pub struct Cli {
    /// YAML file with the connection and the paths to upload
    #[arg(value_name = "CONFIG_FILE")]
    pub config_file_name: PathBuf,
}
