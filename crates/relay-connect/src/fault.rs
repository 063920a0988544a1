// Copyright (c) 2026 Roman Barinov <rbarinov@gmail.com>
// Licensed under the FSL-1.1-NC.

use relay_core::Error;

/// Last-resort handler for errors that indicate a defect rather than a
/// network condition. Injected so tests can observe the fatal path
/// without taking the process down.
pub trait FaultHandler {
    fn fatal(&self, context: &str, err: &Error) -> !;
}

/// Production handler: an unrecognized error on the connect path means
/// the state machine or a collaborator is broken, and the process must
/// not limp on.
pub struct AbortFaults;

impl FaultHandler for AbortFaults {
    fn fatal(&self, context: &str, err: &Error) -> ! {
        tracing::error!(context, error = %err, "unrecoverable connecter error");
        std::process::abort();
    }
}
