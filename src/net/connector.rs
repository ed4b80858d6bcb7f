//! Bounded-timeout TCP connection establishment.
//!
//! # Responsibilities
//! - Resolve every address a backend host maps to
//! - Attempt each candidate with its own connect timeout
//! - Fail only once every candidate has been tried

use std::io;
use std::time::Duration;

use tokio::net::{lookup_host, TcpStream};
use tokio::time;

/// Port assumed when a backend address carries none.
pub const DEFAULT_PORT: u16 = 80;

/// Split a `host[:port]` address into name and port.
pub fn split_host_port(host: &str) -> (&str, u16) {
    match host.rsplit_once(':') {
        Some((name, port)) => match port.parse() {
            Ok(port) => (name, port),
            Err(_) => (host, DEFAULT_PORT),
        },
        None => (host, DEFAULT_PORT),
    }
}

/// Open a TCP connection to `host[:port]`, trying every resolved address in
/// order until one connects within `timeout`.
///
/// DNS may return several, partially unreachable addresses; bounding each
/// attempt keeps worst-case latency per backend predictable. The error from
/// the last failed candidate is the one surfaced.
pub async fn connect_with_timeout(host: &str, timeout: Duration) -> io::Result<TcpStream> {
    let (name, port) = split_host_port(host);
    let addrs: Vec<_> = lookup_host((name, port)).await?.collect();

    let mut last_err = io::Error::new(
        io::ErrorKind::NotFound,
        format!("no addresses resolved for {host}"),
    );
    for addr in addrs {
        match time::timeout(timeout, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => return Ok(stream),
            Ok(Err(err)) => last_err = err,
            Err(_) => {
                last_err = io::Error::new(
                    io::ErrorKind::TimedOut,
                    format!("connect to {addr} timed out"),
                )
            }
        }
    }
    Err(last_err)
}
