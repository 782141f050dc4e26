use std::{
    fs::File,
    io::{self, BufReader},
    path::Path,
};

use anyhow::{Context, Result};
use log::{Level, Log};
use ssh2_config::{HostParams, ParseRule, SshConfig};

use crate::report;

pub const DEFAULT_PORT: u16 = 22;

/// Connection parameters for one host, merged from `~/.ssh/config`.
pub struct SSHConfig {
    hostname: String,
    config: HostParams,
}

impl SSHConfig {
    pub fn new(hostname: &str, logger: &dyn Log) -> Self {
        let config = match dirs::home_dir().map(|home| home.join(".ssh").join("config")) {
            Some(path) => load_client_config(&path).unwrap_or_else(|err| {
                report!(logger, Level::Warn, "Ignoring SSH client configuration: {err:#}");
                SshConfig::default()
            }),
            None => SshConfig::default(),
        };

        Self::with_params(hostname, config.query(hostname))
    }

    pub fn with_params(hostname: &str, config: HostParams) -> Self {
        Self {
            hostname: hostname.to_string(),
            config,
        }
    }

    /// Host name the TCP connection goes to, after `HostName` aliasing.
    pub fn host(&self) -> &str {
        self.config.host_name.as_deref().unwrap_or(&self.hostname)
    }

    /// An explicit port wins over the `Port` entry.
    pub fn port(&self, explicit: Option<u16>) -> u16 {
        explicit.or(self.config.port).unwrap_or(DEFAULT_PORT)
    }

    pub fn params(&self) -> &HostParams {
        &self.config
    }
}

fn load_client_config(path: &Path) -> Result<SshConfig> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(SshConfig::default()),
        Err(err) => return Err(err).with_context(|| format!("could not open {}", path.display())),
    };
    let mut reader = BufReader::new(file);

    SshConfig::default()
        .parse(&mut reader, ParseRule::ALLOW_UNKNOWN_FIELDS)
        .with_context(|| format!("could not parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use rstest::rstest;
    use tempfile::NamedTempFile;

    use super::*;

    fn parsed(contents: &str, host: &str) -> SSHConfig {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();

        SSHConfig::with_params(host, load_client_config(file.path()).unwrap().query(host))
    }

    #[test]
    fn alias_resolves_to_host_name_and_port() {
        let config = parsed("Host box\n    HostName 10.0.0.5\n    Port 2200\n", "box");

        assert_eq!(config.host(), "10.0.0.5");
        assert_eq!(config.port(None), 2200);
    }

    #[rstest]
    #[case::explicit_wins(Some(2022), 2022)]
    #[case::fallback(None, DEFAULT_PORT)]
    fn port_without_client_entry(#[case] explicit: Option<u16>, #[case] expected: u16) {
        let config = parsed("Host other\n    Port 2200\n", "plain.example.org");

        assert_eq!(config.host(), "plain.example.org");
        assert_eq!(config.port(explicit), expected);
    }

    #[test]
    fn missing_client_config_means_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_client_config(&dir.path().join("config")).unwrap();

        assert_eq!(config.query("anything").port, None);
    }
}
