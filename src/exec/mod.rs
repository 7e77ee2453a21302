//! Execution control
//!
//! Credential transition and process replacement with type-state ordering.

pub mod preexec;
pub mod replace;
