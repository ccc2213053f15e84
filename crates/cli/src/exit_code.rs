//! Process exit codes

use slc_core::Error;

/// Exit codes reported to the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    UsageError = 2,
    ConfigError = 3,
    NetworkError = 4,
    NotFound = 5,
}

impl From<&Error> for ExitCode {
    fn from(error: &Error) -> Self {
        match error {
            Error::Config(_) => ExitCode::ConfigError,
            Error::Connection(_) | Error::Transport(_) => ExitCode::NetworkError,
            Error::NotFound(_) => ExitCode::NotFound,
            Error::Service { .. } | Error::Io(_) => ExitCode::GeneralError,
        }
    }
}
