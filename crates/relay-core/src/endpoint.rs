// Copyright (c) 2026 Roman Barinov <rbarinov@gmail.com>
// Licensed under the FSL-1.1-NC.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::SocketAddr;

/// A resolved target for an outbound connection. Address resolution
/// happens upstream; by the time a connector sees an endpoint it is an
/// immutable, transport-tagged address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Endpoint {
    Stream(StreamEndpoint),
    Cluster(ClusterEndpoint),
}

/// Byte-stream target: a resolved IPv4 or IPv6 socket address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamEndpoint {
    pub addr: SocketAddr,
}

/// Cluster-interconnect target, addressed by service rather than by
/// host: a service type, an instance within it, and a lookup domain
/// (0 for cluster-wide lookup).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterEndpoint {
    pub service_type: u32,
    pub instance: u32,
    pub domain: u32,
}

impl Endpoint {
    pub fn stream(addr: SocketAddr) -> Self {
        Endpoint::Stream(StreamEndpoint { addr })
    }

    pub fn cluster(service_type: u32, instance: u32) -> Self {
        Endpoint::Cluster(ClusterEndpoint {
            service_type,
            instance,
            domain: 0,
        })
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Stream(ep) => write!(f, "tcp://{}", ep.addr),
            Endpoint::Cluster(ep) => {
                write!(f, "cluster://{}.{}@{}", ep.service_type, ep.instance, ep.domain)
            }
        }
    }
}
