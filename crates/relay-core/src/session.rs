// Copyright (c) 2026 Roman Barinov <rbarinov@gmail.com>
// Licensed under the FSL-1.1-NC.

use crate::endpoint::Endpoint;
use crate::fd::SocketFd;
use crate::options::TransportOptions;
use std::os::fd::RawFd;

/// A live, connected, tuned descriptor bundled with everything the
/// protocol layer needs to start speaking over it. Produced by a
/// connector exactly once, on success, and owned by the session from
/// then on.
#[derive(Debug)]
pub struct Engine {
    fd: SocketFd,
    endpoint: Endpoint,
    options: TransportOptions,
}

impl Engine {
    pub fn new(fd: SocketFd, endpoint: Endpoint, options: TransportOptions) -> Self {
        Self {
            fd,
            endpoint,
            options,
        }
    }

    pub fn fd(&self) -> RawFd {
        self.fd.as_raw()
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn options(&self) -> &TransportOptions {
        &self.options
    }

    pub fn into_parts(self) -> (SocketFd, Endpoint, TransportOptions) {
        (self.fd, self.endpoint, self.options)
    }
}

/// The object that takes over a finished connection. The owning tree
/// guarantees the session outlives any connector working for it.
pub trait Session {
    fn attach(&mut self, engine: Engine);
}
