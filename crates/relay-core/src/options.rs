// Copyright (c) 2026 Roman Barinov <rbarinov@gmail.com>
// Licensed under the FSL-1.1-NC.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Immutable tuning snapshot handed to a connector at construction.
///
/// The embedding application owns whatever config layer produces this;
/// the connection core only ever reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportOptions {
    /// Send buffer size applied before connect, if set.
    #[serde(default)]
    pub send_buffer: Option<usize>,
    /// Receive buffer size applied before connect, if set.
    #[serde(default)]
    pub recv_buffer: Option<usize>,
    /// IP type-of-service value applied before connect, if set.
    #[serde(default)]
    pub type_of_service: Option<u32>,
    /// TCP keepalive parameters applied after connect, if set.
    #[serde(default)]
    pub keepalive: Option<KeepaliveOptions>,
    /// Base reconnect interval. Zero disables backoff growth and makes
    /// every retry immediate.
    #[serde(default = "default_reconnect_ivl")]
    pub reconnect_ivl: Duration,
    /// Cap for the doubling reconnect interval. Zero means the interval
    /// never grows beyond the base.
    #[serde(default)]
    pub reconnect_ivl_max: Duration,
    /// Allow IPv4-mapped addresses on IPv6 sockets.
    #[serde(default = "default_ipv4_mapping")]
    pub ipv4_mapping: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct KeepaliveOptions {
    /// Idle time before the first keepalive probe.
    pub idle: Duration,
    /// Interval between probes.
    pub interval: Duration,
    /// Probes sent before the peer is declared dead.
    pub retries: u32,
}

fn default_reconnect_ivl() -> Duration {
    Duration::from_millis(100)
}

fn default_ipv4_mapping() -> bool {
    true
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            send_buffer: None,
            recv_buffer: None,
            type_of_service: None,
            keepalive: None,
            reconnect_ivl: default_reconnect_ivl(),
            reconnect_ivl_max: Duration::ZERO,
            ipv4_mapping: default_ipv4_mapping(),
        }
    }
}
