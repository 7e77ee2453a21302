/// Core types shared by the launcher pipeline
use nix::errno::Errno;
use std::fmt;
use thiserror::Error;

/// Reserved id value meaning "do not change this identity".
///
/// A real id equal to this value cannot be requested; it is indistinguishable
/// from "unset" and is treated that way.
pub const UNSET_ID: u32 = u32::MAX;

/// Exit code for `--help`
pub const EXIT_OK: i32 = 0;
/// Exit code for a malformed invocation
pub const EXIT_USAGE: i32 = 1;
/// Exit code for resolution and credential-change failures
pub const EXIT_IDENTITY: i32 = 2;
/// Exit code for a failed process replacement
pub const EXIT_EXEC: i32 = 3;

/// Which identity database a token is resolved against
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum IdKind {
    User,
    Group,
}

impl IdKind {
    /// Name of the lookup primitive, used as the diagnostic prefix
    pub fn lookup_name(self) -> &'static str {
        match self {
            Self::User => "getpwnam_r",
            Self::Group => "getgrnam_r",
        }
    }

    /// Label used in `kind=name` diagnostics
    pub fn label(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Group => "group",
        }
    }
}

/// Credential-change primitive that failed
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TransitionOp {
    SetGid,
    SetUid,
}

impl fmt::Display for TransitionOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SetGid => f.write_str("setgid"),
            Self::SetUid => f.write_str("setuid"),
        }
    }
}

/// Why a token did not resolve to an id
#[derive(Error, Debug, Clone, Copy, Eq, PartialEq)]
pub enum ResolutionFailure {
    #[error("not found")]
    NotFound,

    /// Directory service reported an error; carries the system description
    #[error("{}", .0.desc())]
    Directory(Errno),

    /// All-digit token that does not fit the native id width
    #[error("numeric id out of range")]
    OutOfRange,
}

/// Terminal launcher errors. Each variant maps to exactly one exit code.
#[derive(Error, Debug)]
pub enum LaunchError {
    /// Malformed invocation, with an optional message printed under the usage line
    #[error("usage error")]
    Usage(Option<String>),

    #[error("*** {}: {}={name}, {source}", .kind.lookup_name(), .kind.label())]
    Resolution {
        kind: IdKind,
        name: String,
        source: ResolutionFailure,
    },

    #[error("*** Failed to {op}(): {}", .source.desc())]
    Transition { op: TransitionOp, source: Errno },

    #[error("*** {} change not applied: expected {expected}, effective is {actual}", .kind.label())]
    Verification {
        kind: IdKind,
        expected: u32,
        actual: u32,
    },

    #[error("*** Failed to execvp(): {}", .source.desc())]
    Exec { program: String, source: Errno },
}

impl LaunchError {
    /// Exit code the process terminates with for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(_) => EXIT_USAGE,
            Self::Resolution { .. } | Self::Transition { .. } | Self::Verification { .. } => {
                EXIT_IDENTITY
            }
            Self::Exec { .. } => EXIT_EXEC,
        }
    }
}

pub type Result<T> = std::result::Result<T, LaunchError>;
