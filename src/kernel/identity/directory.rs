//! System user/group database access.

use super::IdentityDirectory;
use nix::errno::Errno;
use std::ffi::{CString, OsStr};
use std::mem::MaybeUninit;
use std::os::unix::ffi::OsStrExt;
use std::ptr;

/// Scratch size used when sysconf reports no maximum
const FALLBACK_BUFFER_SIZE: usize = 1024;

/// Upper bound for the scratch buffer while retrying on ERANGE
const MAX_BUFFER_SIZE: usize = 1 << 20;

/// Directory backed by the reentrant `getpwnam_r`/`getgrnam_r` lookups.
///
/// Names are passed as raw bytes, so any token the kernel handed us in argv
/// can be looked up.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemDirectory;

impl IdentityDirectory for SystemDirectory {
    fn user_id(&self, name: &OsStr) -> nix::Result<Option<u32>> {
        let Some(name) = c_name(name) else {
            return Ok(None);
        };
        lookup_r(libc::_SC_GETPW_R_SIZE_MAX, |buf| {
            let mut pwd = MaybeUninit::<libc::passwd>::uninit();
            let mut result: *mut libc::passwd = ptr::null_mut();
            // SAFETY: name is NUL-terminated; pwd and buf outlive the call and
            // buf.len() is the true buffer length. result is either null or
            // points at pwd, which getpwnam_r initialized.
            let rc = unsafe {
                libc::getpwnam_r(
                    name.as_ptr(),
                    pwd.as_mut_ptr(),
                    buf.as_mut_ptr().cast(),
                    buf.len(),
                    &mut result,
                )
            };
            (rc, (!result.is_null()).then(|| unsafe { (*result).pw_uid }))
        })
    }

    fn group_id(&self, name: &OsStr) -> nix::Result<Option<u32>> {
        let Some(name) = c_name(name) else {
            return Ok(None);
        };
        lookup_r(libc::_SC_GETGR_R_SIZE_MAX, |buf| {
            let mut grp = MaybeUninit::<libc::group>::uninit();
            let mut result: *mut libc::group = ptr::null_mut();
            // SAFETY: same contract as getpwnam_r above.
            let rc = unsafe {
                libc::getgrnam_r(
                    name.as_ptr(),
                    grp.as_mut_ptr(),
                    buf.as_mut_ptr().cast(),
                    buf.len(),
                    &mut result,
                )
            };
            (rc, (!result.is_null()).then(|| unsafe { (*result).gr_gid }))
        })
    }
}

/// Interior NUL cannot occur in argv; such a name matches no entry.
fn c_name(name: &OsStr) -> Option<CString> {
    CString::new(name.as_bytes()).ok()
}

/// Drive a `*nam_r` call, growing the scratch buffer on ERANGE.
///
/// `call` returns the C return code and the id if a record was found.
fn lookup_r<F>(size_hint: libc::c_int, mut call: F) -> nix::Result<Option<u32>>
where
    F: FnMut(&mut [u8]) -> (libc::c_int, Option<u32>),
{
    let mut buf = vec![0u8; initial_buffer_size(size_hint)];
    loop {
        match call(buf.as_mut_slice()) {
            (0, id) => return Ok(id),
            (libc::ERANGE, _) if buf.len() < MAX_BUFFER_SIZE => {
                let grown = buf.len() * 2;
                log::debug!("Lookup buffer too small; growing to {} bytes", grown);
                buf.resize(grown, 0);
            }
            (rc, _) => return Err(Errno::from_raw(rc)),
        }
    }
}

fn initial_buffer_size(name: libc::c_int) -> usize {
    // SAFETY: sysconf has no memory-safety preconditions.
    let size = unsafe { libc::sysconf(name) };
    if size > 0 {
        (size as usize).min(MAX_BUFFER_SIZE)
    } else {
        FALLBACK_BUFFER_SIZE
    }
}
