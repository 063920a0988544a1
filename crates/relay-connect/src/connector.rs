// Copyright (c) 2026 Roman Barinov <rbarinov@gmail.com>
// Licensed under the FSL-1.1-NC.

//! Transport-agnostic driver for one outbound connection attempt
//! sequence: open, poll the non-blocking connect to completion, retry
//! on failure with jittered exponential backoff, hand off on success.

use crate::backoff::{Backoff, Jitter};
use crate::reactor::{Ctx, RegistrationId, TimerId};
use crate::transport::{Open, Transport};
use relay_core::{Endpoint, Engine, TransportOptions};
use std::time::Duration;
use tracing::{debug, info};

/// The single timer a connector ever arms.
pub const RECONNECT_TIMER: TimerId = TimerId(1);

/// Where the connector is in its lifecycle. Exposed for observation;
/// transitions are driven only by reactor and timer callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Connecting,
    AwaitingWritable,
    RetryWait,
    HandedOff,
    Terminating,
    Terminated,
}

/// Connection state machine, generic over the transport variant doing
/// the descriptor work. One instance serves one endpoint for the whole
/// retry sequence and is torn down after hand-off or termination.
///
/// Single-threaded: every method must be called from the reactor thread
/// that owns the instance.
pub struct Connector<T: Transport> {
    transport: T,
    endpoint: Endpoint,
    options: TransportOptions,
    jitter: Box<dyn Jitter>,
    /// Wait one backoff interval before the first attempt. Only honored
    /// when a nonzero base reconnect interval is configured.
    delayed_start: bool,
    phase: Phase,
    registration: Option<RegistrationId>,
    timer_armed: bool,
    backoff: Backoff,
}

impl<T: Transport> Connector<T> {
    pub fn new(
        transport: T,
        endpoint: Endpoint,
        options: TransportOptions,
        jitter: Box<dyn Jitter>,
        delayed_start: bool,
    ) -> Self {
        Self {
            transport,
            endpoint,
            options,
            jitter,
            delayed_start,
            phase: Phase::Idle,
            registration: None,
            timer_armed: false,
            backoff: Backoff::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Start command from the owning tree.
    pub fn plug(&mut self, ctx: &mut Ctx<'_>) {
        assert_eq!(self.phase, Phase::Idle, "plug on a running connector");
        if self.delayed_start && !self.options.reconnect_ivl.is_zero() {
            self.add_reconnect_timer(ctx);
        } else {
            self.start_connecting(ctx);
        }
    }

    /// Writable readiness on the in-flight descriptor: the async
    /// connect finished, one way or the other.
    pub fn on_writable(&mut self, ctx: &mut Ctx<'_>) {
        assert_eq!(
            self.phase,
            Phase::AwaitingWritable,
            "readiness event outside a connect wait"
        );
        let reg = self
            .registration
            .take()
            .expect("awaiting writability with no registration");
        ctx.reactor.deregister(reg);
        self.evaluate(ctx);
    }

    /// We never poll a connecting descriptor for input, so a readable
    /// event can only mean an error. Some platforms report connect
    /// failure on either edge; both feed the same completion check.
    pub fn on_readable(&mut self, ctx: &mut Ctx<'_>) {
        self.on_writable(ctx);
    }

    /// Retry timer expiry.
    pub fn on_timer(&mut self, id: TimerId, ctx: &mut Ctx<'_>) {
        assert_eq!(id, RECONNECT_TIMER, "unknown timer fired");
        assert!(self.timer_armed, "timer fired while not armed");
        self.timer_armed = false;
        self.start_connecting(ctx);
    }

    /// Termination command from the owning tree. Safe to request from
    /// any phase, any number of times; an in-flight connect is simply
    /// abandoned by closing its descriptor.
    pub fn terminate(&mut self, linger: Option<Duration>, ctx: &mut Ctx<'_>) {
        if matches!(self.phase, Phase::Terminating | Phase::Terminated) {
            return;
        }
        if self.timer_armed {
            ctx.timers.cancel(RECONNECT_TIMER);
            self.timer_armed = false;
        }
        if let Some(reg) = self.registration.take() {
            ctx.reactor.deregister(reg);
        }
        if self.transport.is_open() {
            self.transport.close(&self.endpoint, ctx.events);
        }
        self.phase = Phase::Terminating;
        debug!(endpoint = %self.endpoint, "connector terminating");
        ctx.shutdown.local_cleanup_done(linger);
    }

    /// The owning tree finished its shutdown sequencing.
    pub fn on_shutdown_complete(&mut self) {
        assert_eq!(
            self.phase,
            Phase::Terminating,
            "shutdown completion outside termination"
        );
        self.phase = Phase::Terminated;
    }

    fn start_connecting(&mut self, ctx: &mut Ctx<'_>) {
        self.phase = Phase::Connecting;
        match self.transport.open(&self.endpoint, &self.options) {
            Ok(Open::Connected) => {
                debug!(endpoint = %self.endpoint, "connect completed synchronously");
                self.evaluate(ctx);
            }
            Ok(Open::InProgress(err)) => {
                let reg = ctx.reactor.register(self.transport.raw_fd());
                ctx.reactor.request_writable(reg);
                self.registration = Some(reg);
                self.phase = Phase::AwaitingWritable;
                ctx.events.connect_delayed(&self.endpoint, &err);
                debug!(endpoint = %self.endpoint, "connect in progress");
            }
            Err(err) => {
                // Covers descriptor exhaustion and synchronous connect
                // refusal alike; open-time failures are always retried.
                debug!(endpoint = %self.endpoint, error = %err, "connect attempt failed");
                if self.transport.is_open() {
                    self.transport.close(&self.endpoint, ctx.events);
                }
                self.add_reconnect_timer(ctx);
            }
        }
    }

    /// The async connect finished (or completed synchronously): ask the
    /// transport how it went and either hand off or schedule a retry.
    fn evaluate(&mut self, ctx: &mut Ctx<'_>) {
        match self.transport.poll_completion() {
            Err(err) => {
                if !self.transport.recoverable(&err) {
                    ctx.faults.fatal("connect completion", &err);
                }
                debug!(endpoint = %self.endpoint, error = %err, "connect failed");
                self.transport.close(&self.endpoint, ctx.events);
                self.add_reconnect_timer(ctx);
            }
            Ok(fd) => {
                if let Err(err) = self.transport.tune(&fd, &self.options) {
                    info!(endpoint = %self.endpoint, error = %err, "tuning failed, retrying");
                    let raw = fd.as_raw();
                    if let Err(err) = fd.close() {
                        debug!(error = %err, "close after failed tune");
                    }
                    ctx.events.closed(&self.endpoint, raw);
                    self.add_reconnect_timer(ctx);
                    return;
                }

                let raw = fd.as_raw();
                ctx.session
                    .attach(Engine::new(fd, self.endpoint.clone(), self.options.clone()));
                self.phase = Phase::HandedOff;
                // Nothing left to own; ask the tree to shut us down.
                ctx.shutdown.request_terminate();
                ctx.events.connected(&self.endpoint, raw);
                info!(endpoint = %self.endpoint, "connection established");
            }
        }
    }

    fn add_reconnect_timer(&mut self, ctx: &mut Ctx<'_>) {
        assert!(!self.timer_armed, "reconnect timer already armed");
        let delay = self.backoff.next(
            self.options.reconnect_ivl,
            self.options.reconnect_ivl_max,
            self.jitter.as_mut(),
        );
        ctx.timers.arm(delay, RECONNECT_TIMER);
        self.timer_armed = true;
        self.phase = Phase::RetryWait;
        ctx.events.connect_retried(&self.endpoint, delay);
        info!(endpoint = %self.endpoint, ?delay, "reconnect scheduled");
    }
}

impl<T: Transport> Drop for Connector<T> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            return;
        }
        debug_assert!(!self.timer_armed, "connector dropped with a pending timer");
        debug_assert!(
            self.registration.is_none(),
            "connector dropped while registered with the reactor"
        );
        debug_assert!(
            !self.transport.is_open(),
            "connector dropped with an open descriptor"
        );
    }
}
