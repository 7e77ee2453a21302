//! Invocation and shared types
//!
//! The argument vector is the only configuration input.

pub mod invocation;
pub mod types;
