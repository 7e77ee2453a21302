//! Group and user identity changes for the current process.
//!
//! CRITICAL: setgid MUST be called BEFORE setuid.

mod transition;

pub use transition::{set_group, set_user, CredentialOps, SystemCredentials};

#[cfg(test)]
pub(crate) use transition::testing;
