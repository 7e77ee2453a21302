//! Name-or-number identity resolution against the user and group databases.

mod directory;
mod resolve;

pub use directory::SystemDirectory;
pub use resolve::{is_numeric, resolve_id};

use std::ffi::OsStr;

/// Exact-name lookups in the system identity databases.
///
/// `Ok(None)` means the database answered and has no such entry; `Err` means
/// the lookup itself failed.
pub trait IdentityDirectory {
    fn user_id(&self, name: &OsStr) -> nix::Result<Option<u32>>;
    fn group_id(&self, name: &OsStr) -> nix::Result<Option<u32>>;
}
