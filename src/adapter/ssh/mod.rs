use log::{Level, Log};
use ssh2::Session;

use crate::{
    config::{ssh::SSHConfig, Connection},
    error::ConnectError,
    remote::Connector,
    report,
};

use self::{
    connect::{authenticate, configure_session, try_connection},
    host_key::verify_host_key,
    transfer::SftpChannel,
};

mod connect;
pub mod host_key;
pub mod transfer;

/// An authenticated session. Disconnects when dropped.
pub struct SSHSession(Session);

impl SSHSession {
    pub fn open(
        ssh_config: &SSHConfig,
        connection: &Connection,
        password: &str,
        logger: &dyn Log,
    ) -> Result<Self, ConnectError> {
        let host = ssh_config.host();
        let port = ssh_config.port(connection.port);

        report!(
            logger,
            Level::Info,
            "Connecting to {} as {}...",
            connection.host,
            connection.username
        );

        let stream = try_connection(host, port)?;
        if let Ok(addr) = stream.peer_addr() {
            report!(logger, Level::Debug, "Connected to {addr}");
        }

        let mut session = Session::new().map_err(ConnectError::Session)?;
        configure_session(&mut session, ssh_config.params(), logger);
        session.set_tcp_stream(stream);
        session
            .handshake()
            .map_err(|source| ConnectError::Handshake {
                host: host.to_string(),
                source,
            })?;

        // From here on the session is owned, so it is disconnected on every early return.
        let session = Self(session);

        verify_host_key(
            &session.0,
            host,
            port,
            connection.host_key,
            &connection.known_hosts_file(),
            logger,
        )?;
        authenticate(&session.0, &connection.username, password)?;

        if let Some(banner) = session.0.banner() {
            report!(logger, Level::Debug, "Server banner: {}", banner.trim_end());
        }

        Ok(session)
    }

    pub fn sftp(self) -> Result<SftpChannel, ConnectError> {
        let sftp = self.0.sftp().map_err(ConnectError::Channel)?;

        Ok(SftpChannel::new(sftp, self))
    }
}

impl Drop for SSHSession {
    fn drop(&mut self) {
        let _ = self.0.disconnect(None, "done", None);
    }
}

/// Connects over SSH and opens an SFTP channel.
pub struct SshConnector<'l> {
    logger: &'l dyn Log,
}

impl<'l> SshConnector<'l> {
    pub fn new(logger: &'l dyn Log) -> Self {
        Self { logger }
    }
}

impl Connector for SshConnector<'_> {
    type Channel = SftpChannel;

    fn connect(&self, connection: &Connection, password: &str) -> Result<SftpChannel, ConnectError> {
        let ssh_config = SSHConfig::new(&connection.host, self.logger);

        SSHSession::open(&ssh_config, connection, password, self.logger)?.sftp()
    }
}
