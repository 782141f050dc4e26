use std::{
    io,
    net::{TcpStream, ToSocketAddrs},
    time::Duration,
};

use log::{Level, Log};
use ssh2::{MethodType, Session};
use ssh2_config::HostParams;

use crate::{error::ConnectError, report};

pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

pub(super) fn try_connection(host: &str, port: u16) -> Result<TcpStream, ConnectError> {
    let addrs = (host, port)
        .to_socket_addrs()
        .map_err(|source| ConnectError::Resolve {
            host: host.to_string(),
            source,
        })?;

    let mut last_error = None;
    for addr in addrs {
        match TcpStream::connect_timeout(&addr, CONNECT_TIMEOUT) {
            Ok(stream) => return Ok(stream),
            Err(err) => last_error = Some(err),
        }
    }

    Err(ConnectError::Unreachable {
        host: format!("{host}:{port}"),
        source: last_error.unwrap_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "no addresses resolved")
        }),
    })
}

pub(super) fn authenticate(
    session: &Session,
    user: &str,
    password: &str,
) -> Result<(), ConnectError> {
    session
        .userauth_password(user, password)
        .map_err(|source| ConnectError::Auth {
            user: user.to_string(),
            source,
        })?;

    if !session.authenticated() {
        return Err(ConnectError::NotAuthenticated {
            user: user.to_string(),
        });
    }

    Ok(())
}

// Used mostly the same logic to https://github.com/veeso/ssh2-config/blob/main/examples/client.rs
pub(super) fn configure_session(session: &mut Session, params: &HostParams, logger: &dyn Log) {
    if let Some(compress) = params.compression {
        session.set_compress(compress);
    }
    if params.tcp_keep_alive.unwrap_or(false) {
        if let Some(interval) = params.server_alive_interval {
            session.set_keepalive(true, interval.as_secs() as u32);
        }
    }

    macro_rules! report_if_fail {
        ($op: expr, $err: expr) => {{
            if let Err(err) = $op {
                report!(logger, Level::Warn, "{}: {}", $err, err);
            }
        }};
    }

    // algos
    if let Some(algos) = params.kex_algorithms.as_deref() {
        report_if_fail!(
            session.method_pref(MethodType::Kex, algos.join(",").as_str()),
            "Could not set KEX algorithms"
        );
    }
    if let Some(algos) = params.host_key_algorithms.as_deref() {
        report_if_fail!(
            session.method_pref(MethodType::HostKey, algos.join(",").as_str()),
            "Could not set host key algorithms"
        );
    }
    if let Some(algos) = params.ciphers.as_deref() {
        report_if_fail!(
            session.method_pref(MethodType::CryptCs, algos.join(",").as_str()),
            "Could not set crypt algorithms (client-server)"
        );
        report_if_fail!(
            session.method_pref(MethodType::CryptSc, algos.join(",").as_str()),
            "Could not set crypt algorithms (server-client)"
        );
    }
    if let Some(algos) = params.mac.as_deref() {
        report_if_fail!(
            session.method_pref(MethodType::MacCs, algos.join(",").as_str()),
            "Could not set MAC algorithms (client-server)"
        );
        report_if_fail!(
            session.method_pref(MethodType::MacSc, algos.join(",").as_str()),
            "Could not set MAC algorithms (server-client)"
        );
    }
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use super::*;

    #[test]
    fn connects_to_a_listening_port() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let stream = try_connection("127.0.0.1", port).unwrap();
        assert_eq!(stream.peer_addr().unwrap().port(), port);
    }

    #[test]
    fn closed_port_is_unreachable() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        assert!(matches!(
            try_connection("127.0.0.1", port),
            Err(ConnectError::Unreachable { .. })
        ));
    }

    #[test]
    fn unresolvable_host() {
        assert!(matches!(
            try_connection("host.invalid", 22),
            Err(ConnectError::Resolve { .. })
        ));
    }
}
