use crate::config::invocation::Invocation;
use crate::config::types::{LaunchError, Result};
use crate::exec::replace::{replace_process, ProcessImage};
/// Pre-Exec Ordering Enforcement
///
/// The launch sequence is FIXED:
/// 1. identities resolved (scanner output)
/// 2. setgid, if a group was requested
/// 3. setuid, if a user was requested
/// 4. execvp
use crate::kernel::credentials::{set_group, set_user, CredentialOps};
use std::marker::PhantomData;

// ============================================================================
// Type-State Launch Chain
// ============================================================================
//
// Resolved -> GroupApplied -> UserApplied
//
// Each step consumes the prior state. Only Launch<UserApplied> can exec, and
// the user change is only reachable from the group-applied state, so dropping
// the user before the group cannot compile.

/// Type-state marker: identities resolved, credentials untouched
pub struct Resolved;

/// Type-state marker: group identity applied (or none requested)
pub struct GroupApplied;

/// Type-state marker: user identity applied (or none requested)
pub struct UserApplied;

/// A pending launch with type-state tracking
pub struct Launch<S> {
    invocation: Invocation,
    _state: PhantomData<S>,
}

impl<S> Launch<S> {
    pub fn invocation(&self) -> &Invocation {
        &self.invocation
    }

    fn advance<T>(self) -> Launch<T> {
        Launch {
            invocation: self.invocation,
            _state: PhantomData,
        }
    }
}

impl Launch<Resolved> {
    pub fn new(invocation: Invocation) -> Self {
        Self {
            invocation,
            _state: PhantomData,
        }
    }

    /// Apply the requested gid. A missing gid is a no-op.
    pub fn apply_group(self, ops: &mut dyn CredentialOps) -> Result<Launch<GroupApplied>> {
        match self.invocation.gid {
            Some(gid) => set_group(ops, gid)?,
            None => log::debug!("No group requested; keeping GID {}", ops.effective_gid()),
        }
        Ok(self.advance())
    }
}

impl Launch<GroupApplied> {
    /// Apply the requested uid. A missing uid is a no-op.
    pub fn apply_user(self, ops: &mut dyn CredentialOps) -> Result<Launch<UserApplied>> {
        match self.invocation.uid {
            Some(uid) => set_user(ops, uid)?,
            None => log::debug!("No user requested; keeping UID {}", ops.effective_uid()),
        }
        Ok(self.advance())
    }
}

impl Launch<UserApplied> {
    /// Replace the process image. Only ever returns the failure.
    pub fn exec(self, image: &mut dyn ProcessImage) -> LaunchError {
        replace_process(self.invocation(), image)
    }
}

/// Run the whole chain: group, user, exec.
pub fn launch(
    invocation: Invocation,
    ops: &mut dyn CredentialOps,
    image: &mut dyn ProcessImage,
) -> LaunchError {
    let ready = match Launch::new(invocation)
        .apply_group(ops)
        .and_then(|launch| launch.apply_user(ops))
    {
        Ok(ready) => ready,
        Err(e) => return e,
    };
    log::debug!("Credentials applied; replacing image with {:?}", ready.invocation().program());
    ready.exec(image)
}
