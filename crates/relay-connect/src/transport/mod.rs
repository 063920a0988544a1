// Copyright (c) 2026 Roman Barinov <rbarinov@gmail.com>
// Licensed under the FSL-1.1-NC.

//! Per-transport descriptor primitives. The state machine drives every
//! variant through [`Transport`] and never looks at a transport tag;
//! adding a variant means implementing this trait, nothing else.

#[cfg(target_os = "linux")]
pub mod cluster;
pub mod tcp;

use relay_core::{Endpoint, Error, EventSink, Result, SocketFd, TransportOptions};
use std::io;
use std::os::fd::RawFd;

/// Outcome of [`Transport::open`].
pub enum Open {
    /// The connect call completed synchronously.
    Connected,
    /// An asynchronous connect is in flight; poll the descriptor for
    /// writability. Carries the error the platform used to signal the
    /// pending attempt, for event reporting.
    InProgress(Error),
}

/// The four primitives a transport variant supplies, plus the
/// bookkeeping the state machine needs around them.
pub trait Transport {
    /// Create the socket for the endpoint's address family, apply
    /// pre-connect options, switch to non-blocking mode and issue the
    /// connect. Platform-specific "in progress" codes are translated to
    /// a uniform [`Open::InProgress`] here; any error leaves the
    /// descriptor (if one was created) held for a later `close`.
    fn open(&mut self, endpoint: &Endpoint, options: &TransportOptions) -> Result<Open>;

    /// Query the pending error state of the in-flight descriptor. On
    /// success, ownership of the now-connected descriptor moves out of
    /// the variant; the variant keeps nothing it could double-close.
    fn poll_completion(&mut self) -> Result<SocketFd>;

    /// Close the held descriptor and notify the event sink. The
    /// descriptor must be open.
    fn close(&mut self, endpoint: &Endpoint, events: &mut dyn EventSink);

    /// Apply post-connect, connection-level options. A no-op for
    /// transports without any.
    fn tune(&self, fd: &SocketFd, options: &TransportOptions) -> Result<()>;

    /// Whether `err` is a benign network-level failure for this
    /// transport. Anything else on the completion path is a defect and
    /// goes down the fatal route.
    fn recoverable(&self, err: &Error) -> bool;

    /// Whether a descriptor is currently held.
    fn is_open(&self) -> bool;

    /// Raw descriptor for reactor registration. The descriptor must be
    /// open.
    fn raw_fd(&self) -> RawFd;
}

/// Uniform translation of the platform codes that mean "async connect
/// launched": EINPROGRESS itself, EINTR (the original call was
/// interrupted but the attempt proceeds), and would-block.
pub(crate) fn connect_in_progress(err: &io::Error) -> bool {
    matches!(
        err.raw_os_error(),
        Some(libc::EINPROGRESS) | Some(libc::EINTR)
    ) || err.kind() == io::ErrorKind::WouldBlock
}
