// src/server/listener.rs
//! Shared-port listener for worker processes
//!
//! Every worker binds the configured port itself with `SO_REUSEPORT`, so
//! no listener handoff from the coordinator is needed. Distributing
//! incoming connections across the workers bound to the port is the
//! kernel's contract, not something this module implements.

use crate::utils::errors::{Result, StrutError};
use nix::sys::socket::{
    bind, listen, setsockopt, socket, sockopt, AddressFamily, SockFlag, SockType, SockaddrIn,
};
use std::net::{Ipv4Addr, SocketAddrV4};
use std::os::fd::AsRawFd;
use tokio::net::TcpListener;

/// Accept backlog for each worker's listener
const BACKLOG: usize = 1024;

/// Bind `host:port` with `SO_REUSEPORT` and return a tokio listener
pub fn bind_reuseport(host: &str, port: u16) -> Result<TcpListener> {
    let ip: Ipv4Addr = host
        .parse()
        .map_err(|_| StrutError::Configuration(format!("invalid bind host '{}'", host)))?;
    let addr = SockaddrIn::from(SocketAddrV4::new(ip, port));

    let fd = socket(
        AddressFamily::Inet,
        SockType::Stream,
        SockFlag::SOCK_NONBLOCK | SockFlag::SOCK_CLOEXEC,
        None,
    )
    .map_err(|e| StrutError::Server(format!("failed to create socket: {}", e)))?;

    setsockopt(&fd, sockopt::ReuseAddr, &true)
        .map_err(|e| StrutError::Server(format!("failed to set SO_REUSEADDR: {}", e)))?;
    setsockopt(&fd, sockopt::ReusePort, &true)
        .map_err(|e| StrutError::Server(format!("failed to set SO_REUSEPORT: {}", e)))?;

    bind(fd.as_raw_fd(), &addr)
        .map_err(|e| StrutError::Server(format!("failed to bind port {}: {}", port, e)))?;
    listen(&fd, BACKLOG)
        .map_err(|e| StrutError::Server(format!("failed to listen on port {}: {}", port, e)))?;

    let std_listener = std::net::TcpListener::from(fd);
    TcpListener::from_std(std_listener)
        .map_err(|e| StrutError::Server(format!("failed to register listener: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bind_on_ephemeral_port() {
        let listener = bind_reuseport("127.0.0.1", 0).unwrap();
        let addr = listener.local_addr().unwrap();
        assert!(addr.port() > 0);
    }

    #[tokio::test]
    async fn test_two_listeners_share_one_port() {
        let first = bind_reuseport("127.0.0.1", 0).unwrap();
        let port = first.local_addr().unwrap().port();

        // The whole point of SO_REUSEPORT: a second bind succeeds
        let second = bind_reuseport("127.0.0.1", port).unwrap();
        assert_eq!(second.local_addr().unwrap().port(), port);
    }

    #[tokio::test]
    async fn test_invalid_host_is_a_configuration_error() {
        let err = bind_reuseport("not-a-host", 0).unwrap_err();
        assert!(matches!(err, StrutError::Configuration(_)));
    }
}
