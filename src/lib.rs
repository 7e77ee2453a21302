//! runas: switch to a user/group identity and exec a command
//!
//! Meant to run as a setuid-root helper or privileged wrapper that launches an
//! unprivileged command under a specific identity without a shell.
//!
//! # Architecture
//!
//! A single linear pass; every stage either hands off or ends the process with
//! a documented exit code.
//!
//! ## Configuration ([`config`])
//! - [`config::invocation`]: leader-option scanning into an [`config::invocation::Invocation`]
//! - [`config::types`]: error taxonomy, exit codes, id sentinel
//!
//! ## Kernel Primitives ([`kernel`])
//! - [`kernel::identity`]: name-or-number resolution against passwd/group
//! - [`kernel::credentials`]: setgid then setuid, with read-back verification
//!
//! ## Execution Control ([`exec`])
//! - [`exec::preexec`]: type-state enforced group -> user -> exec ordering
//! - [`exec::replace`]: `execvp` process replacement
//!
//! # Exit codes
//!
//! | Code | Meaning |
//! |---|---|
//! | 0 | `--help` |
//! | 1 | usage error |
//! | 2 | identity resolution or credential change failed |
//! | 3 | exec failed |

// Configuration & shared types
pub mod config;

// Kernel Primitives
pub mod kernel;

// Execution Control
pub mod exec;

// CLI entrypoint wiring for the runas binary.
pub mod cli;

pub use config::types::*;
