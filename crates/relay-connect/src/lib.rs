// Copyright (c) 2026 Roman Barinov <rbarinov@gmail.com>
// Licensed under the FSL-1.1-NC.

pub mod backoff;
pub mod connector;
pub mod fault;
pub mod reactor;
pub mod transport;

pub use backoff::{next_interval, Backoff, Jitter, NoJitter, SeededJitter};
pub use connector::{Connector, Phase, RECONNECT_TIMER};
pub use fault::{AbortFaults, FaultHandler};
pub use reactor::{Ctx, Reactor, RegistrationId, ShutdownCoordinator, TimerId, Timers};
#[cfg(target_os = "linux")]
pub use transport::cluster::ClusterTransport;
pub use transport::tcp::TcpTransport;
pub use transport::{Open, Transport};
