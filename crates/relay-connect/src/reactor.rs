// Copyright (c) 2026 Roman Barinov <rbarinov@gmail.com>
// Licensed under the FSL-1.1-NC.

//! Contracts for the collaborators that drive a connector: the I/O
//! reactor, the timer service, and the ownership tree that sequences
//! shutdown. The connector stores none of them; the reactor thread
//! lends them to every event callback through [`Ctx`].

use crate::fault::FaultHandler;
use relay_core::{EventSink, Session};
use std::os::fd::RawFd;
use std::time::Duration;

/// Handle for a descriptor registered with the reactor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegistrationId(pub u64);

/// Identifies a pending timer to its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub u32);

/// Descriptor readiness notification service. Registration hands back a
/// handle; readiness is delivered through the owning state machine's
/// `on_readable`/`on_writable` callbacks.
pub trait Reactor {
    fn register(&mut self, fd: RawFd) -> RegistrationId;
    fn deregister(&mut self, id: RegistrationId);
    fn request_writable(&mut self, id: RegistrationId);
}

/// One-shot timer service; expiry is delivered through the owning state
/// machine's `on_timer` callback.
pub trait Timers {
    fn arm(&mut self, delay: Duration, id: TimerId);
    fn cancel(&mut self, id: TimerId);
}

/// The ownership tree's side of the two-phase shutdown contract.
pub trait ShutdownCoordinator {
    /// A child asks the tree to begin its shutdown (after a successful
    /// hand-off the connector has nothing left to do).
    fn request_terminate(&mut self);

    /// The child finished releasing its local resources; the tree takes
    /// over, honoring `linger` before discarding remaining state.
    fn local_cleanup_done(&mut self, linger: Option<Duration>);
}

/// Borrowed collaborator bundle passed into every connector callback.
/// Lifetimes are guaranteed by the ownership tree; the connector never
/// extends them.
pub struct Ctx<'a> {
    pub reactor: &'a mut dyn Reactor,
    pub timers: &'a mut dyn Timers,
    pub session: &'a mut dyn Session,
    pub events: &'a mut dyn EventSink,
    pub shutdown: &'a mut dyn ShutdownCoordinator,
    pub faults: &'a dyn FaultHandler,
}
