// Copyright (c) 2026 Roman Barinov <rbarinov@gmail.com>
// Licensed under the FSL-1.1-NC.

//! Cluster-interconnect transport over TIPC service addressing. Linux
//! only. A much simpler family than TCP: no buffer or TOS tuning, and
//! nothing to apply after connect.

use crate::transport::{connect_in_progress, Open, Transport};
use relay_core::{ClusterEndpoint, Endpoint, Error, EventSink, Result, SocketFd, TransportOptions};
use socket2::{Domain, SockAddr, Socket, Type};
use std::mem;
use std::os::fd::{AsRawFd, IntoRawFd, RawFd};

const RECOVERABLE: &[i32] = &[
    libc::ECONNREFUSED,
    libc::ECONNRESET,
    libc::ETIMEDOUT,
    libc::EHOSTUNREACH,
    libc::ENETUNREACH,
    libc::ENETDOWN,
];

const TIPC_ADDR_SERVICE: u8 = 2;
const TIPC_CLUSTER_SCOPE: i8 = 2;

/// Service-address form of `sockaddr_tipc`: the common header followed
/// by the name/domain arm of the address union.
#[repr(C)]
struct SockAddrTipc {
    family: libc::sa_family_t,
    addrtype: u8,
    scope: i8,
    service_type: u32,
    instance: u32,
    domain: u32,
}

fn service_addr(ep: &ClusterEndpoint) -> SockAddr {
    let tipc = SockAddrTipc {
        family: libc::AF_TIPC as libc::sa_family_t,
        addrtype: TIPC_ADDR_SERVICE,
        scope: TIPC_CLUSTER_SCOPE,
        service_type: ep.service_type,
        instance: ep.instance,
        domain: ep.domain,
    };
    let mut storage: libc::sockaddr_storage = unsafe { mem::zeroed() };
    unsafe {
        std::ptr::copy_nonoverlapping(
            (&tipc as *const SockAddrTipc).cast::<u8>(),
            (&mut storage as *mut libc::sockaddr_storage).cast::<u8>(),
            mem::size_of::<SockAddrTipc>(),
        );
        SockAddr::new(storage, mem::size_of::<SockAddrTipc>() as libc::socklen_t)
    }
}

pub struct ClusterTransport {
    sock: Option<Socket>,
}

impl ClusterTransport {
    pub fn new() -> Self {
        Self { sock: None }
    }
}

impl Default for ClusterTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for ClusterTransport {
    fn open(&mut self, endpoint: &Endpoint, _options: &TransportOptions) -> Result<Open> {
        assert!(self.sock.is_none(), "previous descriptor never retired");
        let ep = match endpoint {
            Endpoint::Cluster(ep) => ep,
            other => return Err(Error::EndpointMismatch(other.to_string())),
        };

        let sock = Socket::new(Domain::from(libc::AF_TIPC), Type::STREAM, None)?;
        let sock = self.sock.insert(sock);
        sock.set_nonblocking(true)?;

        match sock.connect(&service_addr(ep)) {
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

    fn tune(&self, _fd: &SocketFd, _options: &TransportOptions) -> Result<()> {
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn service_addr_layout() {
        assert_eq!(mem::size_of::<SockAddrTipc>(), 16);
        assert_eq!(mem::offset_of!(SockAddrTipc, addrtype), 2);
        assert_eq!(mem::offset_of!(SockAddrTipc, scope), 3);
        assert_eq!(mem::offset_of!(SockAddrTipc, service_type), 4);
        assert_eq!(mem::offset_of!(SockAddrTipc, instance), 8);
        assert_eq!(mem::offset_of!(SockAddrTipc, domain), 12);

        let ep = ClusterEndpoint {
            service_type: 5000,
            instance: 17,
            domain: 0,
        };
        let addr = service_addr(&ep);
        assert_eq!(addr.len() as usize, mem::size_of::<SockAddrTipc>());
        assert_eq!(addr.family(), libc::AF_TIPC as libc::sa_family_t);
    }

    #[test]
    fn invalid_argument_is_not_recoverable_here() {
        // Unlike the stream transport, a just-closed peer never shows
        // up as EINVAL on this family.
        let transport = ClusterTransport::new();
        let err = Error::Io(io::Error::from_raw_os_error(libc::EINVAL));
        assert!(!transport.recoverable(&err));
        let err = Error::Io(io::Error::from_raw_os_error(libc::ECONNREFUSED));
        assert!(transport.recoverable(&err));
    }
}
