//! Thin wrappers around identity databases and credential primitives.
//!
//! Dependency direction: identity -> credentials

pub mod credentials;
pub mod identity;
