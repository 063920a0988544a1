// Copyright (c) 2026 Roman Barinov <rbarinov@gmail.com>
// Licensed under the FSL-1.1-NC.

use std::fmt;
use std::io;
use std::os::fd::{AsFd, AsRawFd, BorrowedFd, RawFd};

/// Single-owner handle for a connected descriptor.
///
/// There is deliberately no `Clone`, no `Copy`, and no `Drop`: the
/// holder must consume the handle exactly once, either by closing it or
/// by passing it on (`into_raw`). Double-close and use-after-close are
/// therefore unrepresentable rather than runtime-checked.
pub struct SocketFd(RawFd);

impl SocketFd {
    pub fn from_raw(fd: RawFd) -> Self {
        SocketFd(fd)
    }

    pub fn as_raw(&self) -> RawFd {
        self.0
    }

    /// Surrender ownership of the descriptor without closing it.
    pub fn into_raw(self) -> RawFd {
        self.0
    }

    /// Close the descriptor, consuming the handle.
    pub fn close(self) -> io::Result<()> {
        let rc = unsafe { libc::close(self.0) };
        if rc == 0 {
            Ok(())
        } else {
            Err(io::Error::last_os_error())
        }
    }
}

impl AsFd for SocketFd {
    fn as_fd(&self) -> BorrowedFd<'_> {
        unsafe { BorrowedFd::borrow_raw(self.0) }
    }
}

impl AsRawFd for SocketFd {
    fn as_raw_fd(&self) -> RawFd {
        self.0
    }
}

impl fmt::Debug for SocketFd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SocketFd({})", self.0)
    }
}
