// Copyright (c) 2026 Roman Barinov <rbarinov@gmail.com>
// Licensed under the FSL-1.1-NC.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("endpoint not supported by this transport: {0}")]
    EndpointMismatch(String),
}

impl Error {
    /// OS-level error code, when the error carries one. Transport
    /// classification tables key off this.
    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            Error::Io(err) => err.raw_os_error(),
            Error::EndpointMismatch(_) => None,
        }
    }
}
