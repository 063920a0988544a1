// Copyright (c) 2026 Roman Barinov <rbarinov@gmail.com>
// Licensed under the FSL-1.1-NC.

use crate::transport::{connect_in_progress, Open, Transport};
use relay_core::{Endpoint, Error, EventSink, Result, SocketFd, TransportOptions};
use socket2::{Domain, Protocol, SockRef, Socket, TcpKeepalive, Type};
use std::os::fd::{AsRawFd, IntoRawFd, RawFd};

/// Benign connect failures for a byte-stream socket. EINVAL shows up
/// when the peer closed its end between our SYN and the completion
/// check on some stacks, so it counts as a network condition here.
const RECOVERABLE: &[i32] = &[
    libc::ECONNREFUSED,
    libc::ECONNRESET,
    libc::ETIMEDOUT,
    libc::EHOSTUNREACH,
    libc::ENETUNREACH,
    libc::ENETDOWN,
    libc::EINVAL,
];

/// Reliable byte-stream transport over TCP.
pub struct TcpTransport {
    sock: Option<Socket>,
}

impl TcpTransport {
    pub fn new() -> Self {
        Self { sock: None }
    }
}

impl Default for TcpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for TcpTransport {
    fn open(&mut self, endpoint: &Endpoint, options: &TransportOptions) -> Result<Open> {
        assert!(self.sock.is_none(), "previous descriptor never retired");
        let addr = match endpoint {
            Endpoint::Stream(ep) => ep.addr,
            other => return Err(Error::EndpointMismatch(other.to_string())),
        };

        let sock = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))?;
        // Held from here on so a failed step below still gets closed
        // (and reported) by the caller.
        let sock = self.sock.insert(sock);

        // IPv4 mapping on IPv6 sockets is off by default on some
        // systems.
        if addr.is_ipv6() && options.ipv4_mapping {
            sock.set_only_v6(false)?;
        }
        if let Some(tos) = options.type_of_service {
            sock.set_tos(tos)?;
        }

        sock.set_nonblocking(true)?;

        if let Some(size) = options.send_buffer {
            sock.set_send_buffer_size(size)?;
        }
        if let Some(size) = options.recv_buffer {
            sock.set_recv_buffer_size(size)?;
        }

        match sock.connect(&addr.into()) {
            Ok(()) => Ok(Open::Connected),
            Err(err) if connect_in_progress(&err) => Ok(Open::InProgress(err.into())),
            Err(err) => Err(err.into()),
        }
    }

    fn poll_completion(&mut self) -> Result<SocketFd> {
        let sock = self.sock.take().expect("no connect in flight");
        let pending = match sock.take_error() {
            Ok(Some(err)) => Some(err),
            Ok(None) => None,
            Err(err) => Some(err),
        };
        if let Some(err) = pending {
            // Still ours; the caller decides when to close it.
            self.sock = Some(sock);
            return Err(err.into());
        }
        Ok(SocketFd::from_raw(sock.into_raw_fd()))
    }

    fn close(&mut self, endpoint: &Endpoint, events: &mut dyn EventSink) {
        let sock = self.sock.take().expect("close without an open descriptor");
        let fd = sock.as_raw_fd();
        drop(sock);
        events.closed(endpoint, fd);
    }

    fn tune(&self, fd: &SocketFd, options: &TransportOptions) -> Result<()> {
        let sock = SockRef::from(fd);
        sock.set_nodelay(true)?;
        if let Some(ka) = options.keepalive {
            let params = TcpKeepalive::new()
                .with_time(ka.idle)
                .with_interval(ka.interval)
                .with_retries(ka.retries);
            sock.set_tcp_keepalive(&params)?;
        }
        Ok(())
    }

    fn recoverable(&self, err: &Error) -> bool {
        matches!(err.raw_os_error(), Some(code) if RECOVERABLE.contains(&code))
    }

    fn is_open(&self) -> bool {
        self.sock.is_some()
    }

    fn raw_fd(&self) -> RawFd {
        self.sock
            .as_ref()
            .expect("no descriptor to register")
            .as_raw_fd()
    }
}
