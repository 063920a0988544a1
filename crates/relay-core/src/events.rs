// Copyright (c) 2026 Roman Barinov <rbarinov@gmail.com>
// Licensed under the FSL-1.1-NC.

use crate::endpoint::Endpoint;
use crate::error::Error;
use std::os::fd::RawFd;
use std::time::Duration;

/// Observational sink for connection lifecycle notifications.
///
/// Every method is a no-op by default so embedders override only what
/// they monitor. Nothing here feeds back into the connection core.
pub trait EventSink {
    /// A connection was established and handed off.
    fn connected(&mut self, _endpoint: &Endpoint, _fd: RawFd) {}

    /// An asynchronous connect was launched; carries the error the
    /// platform used to signal the pending attempt.
    fn connect_delayed(&mut self, _endpoint: &Endpoint, _err: &Error) {}

    /// A failed attempt was rescheduled after the given delay.
    fn connect_retried(&mut self, _endpoint: &Endpoint, _delay: Duration) {}

    /// A descriptor was closed.
    fn closed(&mut self, _endpoint: &Endpoint, _fd: RawFd) {}
}

/// Sink that drops every notification.
pub struct NullEvents;

impl EventSink for NullEvents {}
