use super::IdentityDirectory;
use crate::config::types::{IdKind, LaunchError, ResolutionFailure, Result};
use std::ffi::OsStr;
use std::os::unix::ffi::OsStrExt;

/// True when `token` is non-empty and made only of ASCII decimal digits.
pub fn is_numeric(token: &[u8]) -> bool {
    !token.is_empty() && token.iter().all(u8::is_ascii_digit)
}

/// Resolve `token` to a numeric id of the given kind.
///
/// All-digit tokens are parsed directly and never reach the directory. Every
/// other token (including the empty one) costs exactly one lookup.
pub fn resolve_id(token: &OsStr, kind: IdKind, directory: &dyn IdentityDirectory) -> Result<u32> {
    let bytes = token.as_bytes();
    let name = token.to_string_lossy().into_owned();
    let fail = |source| LaunchError::Resolution {
        kind,
        name: name.clone(),
        source,
    };

    if is_numeric(bytes) {
        // Digits only, so the sole possible parse failure is overflow.
        let id = name
            .parse::<u32>()
            .map_err(|_| fail(ResolutionFailure::OutOfRange))?;
        log::debug!("Numeric {} id {}", kind.label(), id);
        return Ok(id);
    }

    let found = match kind {
        IdKind::User => directory.user_id(token),
        IdKind::Group => directory.group_id(token),
    };

    match found {
        Ok(Some(id)) => {
            log::debug!("Resolved {} {:?} to {}", kind.label(), token, id);
            Ok(id)
        }
        Ok(None) => Err(fail(ResolutionFailure::NotFound)),
        Err(errno) => Err(fail(ResolutionFailure::Directory(errno))),
    }
}
