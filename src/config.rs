use std::{
    fmt,
    fs::File,
    io::{self, BufReader},
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;

pub mod ssh;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not open {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("could not parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

pub fn read_config(path: &Path) -> Result<ConfigContext, ConfigError> {
    let file = File::open(path).map_err(|source| ConfigError::Read {
        path: path.to_owned(),
        source,
    })?;
    let reader = BufReader::new(file);

    Ok(ConfigContext {
        config: serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })?,
        config_file: path.to_owned(),
    })
}

pub struct ConfigContext {
    pub config_file: PathBuf,
    pub config: Configuration,
}

#[derive(Debug, Deserialize)]
pub struct Configuration {
    pub connection: Connection,
    pub folders_to_sync: Vec<PathBuf>,
    pub target_folders: Vec<String>,
}

impl Configuration {
    /// Local/remote pairs in list order. Stops at the end of the shorter list.
    pub fn pairs(&self) -> impl Iterator<Item = (&Path, &Path)> {
        self.folders_to_sync
            .iter()
            .map(PathBuf::as_path)
            .zip(self.target_folders.iter().map(Path::new))
    }

    /// Entries of the longer list that have no partner and are never uploaded.
    pub fn unpaired(&self) -> usize {
        self.folders_to_sync.len().abs_diff(self.target_folders.len())
    }
}

#[derive(Deserialize)]
pub struct Connection {
    pub host: String,
    pub username: String,
    pub psw: Option<String>,
    pub port: Option<u16>,

    #[serde(default)]
    pub host_key: HostKeyPolicy,
    pub known_hosts: Option<PathBuf>,
}

impl Connection {
    /// `known_hosts` with a leading `~/` expanded, or `~/.ssh/known_hosts`.
    pub fn known_hosts_file(&self) -> PathBuf {
        match &self.known_hosts {
            Some(path) => expand_home(path, dirs::home_dir().as_deref()),
            None => dirs::home_dir()
                .map(|home| home.join(".ssh").join("known_hosts"))
                .unwrap_or_else(|| PathBuf::from(".ssh/known_hosts")),
        }
    }
}

fn expand_home(path: &Path, home: Option<&Path>) -> PathBuf {
    match (path.strip_prefix("~"), home) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("psw", &self.psw.as_ref().map(|_| "<redacted>"))
            .field("port", &self.port)
            .field("host_key", &self.host_key)
            .field("known_hosts", &self.known_hosts)
            .finish()
    }
}

/// How the server's host key is checked during the handshake.
///
/// `AcceptAny` takes whatever key the server presents and never consults a
/// known-hosts file, which leaves the connection open to a man-in-the-middle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostKeyPolicy {
    #[default]
    AcceptAny,
    TrustOnFirstUse,
    Strict,
}
