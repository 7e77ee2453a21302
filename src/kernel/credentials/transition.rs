//! Group-then-user credential transition.
//!
//! CRITICAL: the group change happens while the process still holds the
//! user privilege needed to make it; the user change always comes last.

use crate::config::types::{IdKind, LaunchError, Result, TransitionOp};
use nix::unistd::{getegid, geteuid, setgid, setuid, Gid, Uid};

/// Process credential primitives.
pub trait CredentialOps {
    fn set_gid(&mut self, gid: u32) -> nix::Result<()>;
    fn set_uid(&mut self, uid: u32) -> nix::Result<()>;
    fn effective_gid(&self) -> u32;
    fn effective_uid(&self) -> u32;
}

/// The calling process's real credentials (`setgid(2)`/`setuid(2)`).
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemCredentials;

impl CredentialOps for SystemCredentials {
    fn set_gid(&mut self, gid: u32) -> nix::Result<()> {
        setgid(Gid::from_raw(gid))
    }

    fn set_uid(&mut self, uid: u32) -> nix::Result<()> {
        setuid(Uid::from_raw(uid))
    }

    fn effective_gid(&self) -> u32 {
        getegid().as_raw()
    }

    fn effective_uid(&self) -> u32 {
        geteuid().as_raw()
    }
}

/// MUST be called BEFORE set_user.
pub fn set_group(ops: &mut dyn CredentialOps, gid: u32) -> Result<()> {
    ops.set_gid(gid).map_err(|source| LaunchError::Transition {
        op: TransitionOp::SetGid,
        source,
    })?;
    verify(IdKind::Group, gid, ops.effective_gid())?;
    log::info!("Set GID to {}", gid);
    Ok(())
}

/// MUST be called AFTER set_group.
pub fn set_user(ops: &mut dyn CredentialOps, uid: u32) -> Result<()> {
    ops.set_uid(uid).map_err(|source| LaunchError::Transition {
        op: TransitionOp::SetUid,
        source,
    })?;
    verify(IdKind::User, uid, ops.effective_uid())?;
    log::info!("Set UID to {}", uid);
    Ok(())
}

fn verify(kind: IdKind, expected: u32, actual: u32) -> Result<()> {
    if expected != actual {
        return Err(LaunchError::Verification {
            kind,
            expected,
            actual,
        });
    }
    Ok(())
}
