use std::{
    fs::{self, OpenOptions},
    io::{self, Write},
    path::Path,
};

use base64::{
    engine::general_purpose::{STANDARD, STANDARD_NO_PAD},
    Engine,
};
use log::{Level, Log};
use ssh2::{CheckResult, HashType, HostKeyType, KnownHostFileKind, KnownHosts, Session};

use crate::{
    config::{ssh::DEFAULT_PORT, HostKeyPolicy},
    error::ConnectError,
    report,
};

/// Name under which `host` is stored in a known-hosts file.
pub fn known_hosts_entry(host: &str, port: u16) -> String {
    if port == DEFAULT_PORT {
        host.to_string()
    } else {
        format!("[{host}]:{port}")
    }
}

/// OpenSSH style `SHA256:<base64>` fingerprint.
pub fn fingerprint(hash: &[u8]) -> String {
    format!("SHA256:{}", STANDARD_NO_PAD.encode(hash))
}

fn key_type_name(key_type: HostKeyType) -> Option<&'static str> {
    match key_type {
        HostKeyType::Rsa => Some("ssh-rsa"),
        HostKeyType::Dss => Some("ssh-dss"),
        HostKeyType::Ecdsa256 => Some("ecdsa-sha2-nistp256"),
        HostKeyType::Ecdsa384 => Some("ecdsa-sha2-nistp384"),
        HostKeyType::Ecdsa521 => Some("ecdsa-sha2-nistp521"),
        HostKeyType::Ed25519 => Some("ssh-ed25519"),
        _ => None,
    }
}

/// The key a server presented during the handshake.
pub struct PresentedKey<'k> {
    pub key: &'k [u8],
    pub key_type: HostKeyType,
    pub fingerprint: String,
}

pub(super) fn verify_host_key(
    session: &Session,
    host: &str,
    port: u16,
    policy: HostKeyPolicy,
    known_hosts_file: &Path,
    logger: &dyn Log,
) -> Result<(), ConnectError> {
    let (key, key_type) = session.host_key().ok_or_else(|| ConnectError::NoHostKey {
        host: host.to_string(),
    })?;
    let presented = PresentedKey {
        key,
        key_type,
        fingerprint: session
            .host_key_hash(HashType::Sha256)
            .map(fingerprint)
            .unwrap_or_else(|| "unknown".to_string()),
    };

    if policy == HostKeyPolicy::AcceptAny {
        report!(
            logger,
            Level::Warn,
            "Accepting host key {} of {host} without verification",
            presented.fingerprint
        );
        return Ok(());
    }

    let mut known_hosts = session
        .known_hosts()
        .map_err(|source| ConnectError::KnownHosts {
            host: host.to_string(),
            source,
        })?;

    check_known_host(
        &mut known_hosts,
        host,
        port,
        &presented,
        policy,
        known_hosts_file,
        logger,
    )
}

/// Looks `host` up in `known_hosts_file` and applies `policy` to the result.
///
/// A missing file counts as empty. A host accepted on first use is appended
/// as one new line; the rest of the file is left untouched.
pub(super) fn check_known_host(
    known_hosts: &mut KnownHosts,
    host: &str,
    port: u16,
    presented: &PresentedKey<'_>,
    policy: HostKeyPolicy,
    known_hosts_file: &Path,
    logger: &dyn Log,
) -> Result<(), ConnectError> {
    let known_hosts_error = |source: ssh2::Error| ConnectError::KnownHosts {
        host: host.to_string(),
        source,
    };

    if known_hosts_file.exists() {
        known_hosts
            .read_file(known_hosts_file, KnownHostFileKind::OpenSSH)
            .map_err(known_hosts_error)?;
    }

    match known_hosts.check_port(host, port, presented.key) {
        CheckResult::Match => Ok(()),
        CheckResult::Mismatch => Err(ConnectError::HostKeyMismatch {
            host: host.to_string(),
            known_hosts: known_hosts_file.to_path_buf(),
            fingerprint: presented.fingerprint.clone(),
        }),
        CheckResult::NotFound if policy == HostKeyPolicy::TrustOnFirstUse => {
            report!(
                logger,
                Level::Info,
                "Trusting new host key {} of {host}",
                presented.fingerprint
            );

            if let Err(err) = append_known_host(known_hosts_file, host, port, presented) {
                report!(
                    logger,
                    Level::Warn,
                    "Could not record host key in {}: {err}",
                    known_hosts_file.display()
                );
            }

            Ok(())
        }
        CheckResult::NotFound => Err(ConnectError::UnknownHost {
            host: host.to_string(),
            known_hosts: known_hosts_file.to_path_buf(),
        }),
        CheckResult::Failure => Err(known_hosts_error(ssh2::Error::new(
            ssh2::ErrorCode::Session(-1),
            "known hosts check failed",
        ))),
    }
}

fn append_known_host(
    known_hosts_file: &Path,
    host: &str,
    port: u16,
    presented: &PresentedKey<'_>,
) -> io::Result<()> {
    let key_name = key_type_name(presented.key_type).ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidData, "unsupported host key type")
    })?;

    // An existing last line without a newline must not be joined with ours.
    let separator = match fs::read(known_hosts_file) {
        Ok(contents) if !contents.is_empty() && !contents.ends_with(b"\n") => "\n",
        _ => "",
    };

    if let Some(dir) = known_hosts_file.parent() {
        fs::create_dir_all(dir)?;
    }
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(known_hosts_file)?;

    writeln!(
        file,
        "{separator}{} {key_name} {}",
        known_hosts_entry(host, port),
        STANDARD.encode(presented.key)
    )
}
