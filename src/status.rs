//! Exit status codes for the CLI
//!
//! bbgurl follows standard Unix exit code conventions:
//! - 0: Success
//! - 1: Any error (bad arguments, network failure, unwritable output, etc.)
//! - 130: User interrupted (Ctrl+C, standard SIGINT exit code)
//!
//! An interrupted transfer is not treated as an error: the partial output it
//! leaves behind is expected, and the distinct code lets scripts tell the two
//! apart.

use std::process::{ExitCode, Termination};

use crate::transfer::TransferOutcome;

/// Exit status codes following standard Unix conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitStatus {
    /// Successful execution
    Success = 0,
    /// Any error
    Error = 1,
    /// User interrupted (Ctrl+C) - standard SIGINT code
    Interrupted = 130,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status as u8)
    }
}

impl Termination for ExitStatus {
    fn report(self) -> ExitCode {
        ExitCode::from(self as u8)
    }
}

impl From<TransferOutcome> for ExitStatus {
    fn from(outcome: TransferOutcome) -> Self {
        match outcome {
            TransferOutcome::Completed { .. } => ExitStatus::Success,
            TransferOutcome::Interrupted { .. } => ExitStatus::Interrupted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_outcome() {
        assert_eq!(ExitStatus::from(TransferOutcome::Completed { bytes: 10 }), ExitStatus::Success);
        assert_eq!(ExitStatus::from(TransferOutcome::Interrupted { bytes: 3 }), ExitStatus::Interrupted);
    }
}
