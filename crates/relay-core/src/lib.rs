// Copyright (c) 2026 Roman Barinov <rbarinov@gmail.com>
// Licensed under the FSL-1.1-NC.

pub mod endpoint;
pub mod error;
pub mod events;
pub mod fd;
pub mod options;
pub mod session;

pub use endpoint::{ClusterEndpoint, Endpoint, StreamEndpoint};
pub use error::{Error, Result};
pub use events::{EventSink, NullEvents};
pub use fd::SocketFd;
pub use options::{KeepaliveOptions, TransportOptions};
pub use session::{Engine, Session};
