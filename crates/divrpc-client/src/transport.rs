//! Connection establishment for the RPC client.

use std::io;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use divrpc_config::Endpoint;

use crate::ClientError;

pub(crate) const CONNECTION_TIMEOUT: Duration = Duration::from_secs(5);

pub(crate) fn connect(endpoint: &Endpoint) -> Result<TcpStream, ClientError> {
    let address =
        resolve_tcp_address(endpoint.host(), endpoint.port()).map_err(|source| {
            ClientError::Resolve {
                endpoint: endpoint.to_string(),
                source,
            }
        })?;
    TcpStream::connect_timeout(&address, CONNECTION_TIMEOUT).map_err(|source| {
        ClientError::Connect {
            endpoint: endpoint.to_string(),
            source,
        }
    })
}

fn resolve_tcp_address(host: &str, port: u16) -> io::Result<SocketAddr> {
    let mut addrs = (host, port).to_socket_addrs()?;
    addrs
        .next()
        .ok_or_else(|| io::Error::new(io::ErrorKind::AddrNotAvailable, "no resolved addresses"))
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use super::*;

    #[test]
    fn connects_to_listening_endpoint() {
        let listener = TcpListener::bind(("127.0.0.1", 0)).expect("bind");
        let port = listener.local_addr().expect("addr").port();
        let stream = connect(&Endpoint::tcp("127.0.0.1", port)).expect("connect");
        assert_eq!(stream.peer_addr().expect("peer").port(), port);
    }

    #[test]
    fn refused_connection_is_reported() {
        let port = {
            let listener = TcpListener::bind(("127.0.0.1", 0)).expect("bind");
            listener.local_addr().expect("addr").port()
        };
        let error = connect(&Endpoint::tcp("127.0.0.1", port)).expect_err("nothing listening");
        assert!(matches!(error, ClientError::Connect { .. }));
    }

    #[test]
    fn unresolvable_host_is_reported() {
        let error = connect(&Endpoint::tcp("host.invalid", 8859)).expect_err("no such host");
        assert!(matches!(error, ClientError::Resolve { .. }));
    }
}
