// Copyright (c) 2026 Roman Barinov <rbarinov@gmail.com>
// Licensed under the FSL-1.1-NC.

//! Shared harness for the live-socket scenarios: single-slot
//! collaborator implementations driven by the test itself, plus a
//! poll(2) wrapper standing in for the reactor's wait.

use relay_connect::{
    Ctx, FaultHandler, Reactor, RegistrationId, ShutdownCoordinator, TimerId, Timers,
};
use relay_core::{Endpoint, Engine, Error, EventSink, Session};
use std::os::fd::RawFd;
use std::time::Duration;

pub struct TestReactor {
    pub fd: Option<RawFd>,
    pub writable_wanted: bool,
    next: u64,
}

impl Reactor for TestReactor {
    fn register(&mut self, fd: RawFd) -> RegistrationId {
        assert!(self.fd.is_none(), "second registration");
        self.fd = Some(fd);
        self.next += 1;
        RegistrationId(self.next)
    }

    fn deregister(&mut self, _id: RegistrationId) {
        assert!(self.fd.take().is_some(), "deregister without registration");
        self.writable_wanted = false;
    }

    fn request_writable(&mut self, _id: RegistrationId) {
        self.writable_wanted = true;
    }
}

pub struct TestTimers {
    pub pending: Option<(Duration, TimerId)>,
}

impl Timers for TestTimers {
    fn arm(&mut self, delay: Duration, id: TimerId) {
        assert!(self.pending.is_none(), "second timer armed");
        self.pending = Some((delay, id));
    }

    fn cancel(&mut self, id: TimerId) {
        let (_, pending) = self.pending.take().expect("cancel without a timer");
        assert_eq!(pending, id);
    }
}

#[derive(Default)]
pub struct TestSession {
    pub engine: Option<Engine>,
}

impl Session for TestSession {
    fn attach(&mut self, engine: Engine) {
        assert!(self.engine.is_none(), "second hand-off");
        self.engine = Some(engine);
    }
}

#[derive(Default)]
pub struct TestEvents {
    pub log: Vec<String>,
}

impl EventSink for TestEvents {
    fn connected(&mut self, endpoint: &Endpoint, fd: RawFd) {
        self.log.push(format!("connected {endpoint} fd={fd}"));
    }

    fn connect_delayed(&mut self, endpoint: &Endpoint, _err: &Error) {
        self.log.push(format!("delayed {endpoint}"));
    }

    fn connect_retried(&mut self, endpoint: &Endpoint, delay: Duration) {
        self.log.push(format!("retried {endpoint} after {delay:?}"));
    }

    fn closed(&mut self, endpoint: &Endpoint, fd: RawFd) {
        self.log.push(format!("closed {endpoint} fd={fd}"));
    }
}

#[derive(Default)]
pub struct TestShutdown {
    pub terminate_requested: bool,
    pub cleanups: Vec<Option<Duration>>,
}

impl ShutdownCoordinator for TestShutdown {
    fn request_terminate(&mut self) {
        self.terminate_requested = true;
    }

    fn local_cleanup_done(&mut self, linger: Option<Duration>) {
        self.cleanups.push(linger);
    }
}

/// Panic instead of aborting so a broken classification fails the test
/// with a readable message.
pub struct PanicFaults;

impl FaultHandler for PanicFaults {
    fn fatal(&self, context: &str, err: &Error) -> ! {
        panic!("fatal connecter error in {context}: {err}");
    }
}

pub struct Harness {
    pub reactor: TestReactor,
    pub timers: TestTimers,
    pub session: TestSession,
    pub events: TestEvents,
    pub shutdown: TestShutdown,
    pub faults: PanicFaults,
}

impl Harness {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            reactor: TestReactor {
                fd: None,
                writable_wanted: false,
                next: 0,
            },
            timers: TestTimers { pending: None },
            session: TestSession::default(),
            events: TestEvents::default(),
            shutdown: TestShutdown::default(),
            faults: PanicFaults,
        }
    }

    pub fn ctx(&mut self) -> Ctx<'_> {
        Ctx {
            reactor: &mut self.reactor,
            timers: &mut self.timers,
            session: &mut self.session,
            events: &mut self.events,
            shutdown: &mut self.shutdown,
            faults: &self.faults,
        }
    }
}

/// Block until the descriptor reports writability (or an error edge),
/// the way the reactor would before delivering `on_writable`.
pub fn wait_writable(fd: RawFd, timeout_ms: i32) -> bool {
    let mut pfd = libc::pollfd {
        fd,
        events: libc::POLLOUT | libc::POLLIN,
        revents: 0,
    };
    let rc = unsafe { libc::poll(&mut pfd, 1, timeout_ms) };
    rc > 0
}

pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "relay_connect=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
