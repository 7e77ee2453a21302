//! Process image replacement via `execvp(3)`.

use crate::config::invocation::Invocation;
use crate::config::types::LaunchError;
use nix::errno::Errno;
use nix::unistd::execvp;
use std::ffi::{CStr, CString};
use std::os::unix::ffi::OsStrExt;

/// Replaces the running program. Returns only on failure.
pub trait ProcessImage {
    fn replace(&mut self, program: &CStr, argv: &[CString]) -> Errno;
}

/// `execvp` with PATH search and the inherited environment.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemImage;

impl ProcessImage for SystemImage {
    fn replace(&mut self, program: &CStr, argv: &[CString]) -> Errno {
        match execvp(program, argv) {
            Ok(never) => match never {},
            Err(errno) => errno,
        }
    }
}

/// Exec the invocation's command. The program token is also argv[0].
pub fn replace_process(invocation: &Invocation, image: &mut dyn ProcessImage) -> LaunchError {
    let program = invocation.program().to_string_lossy().into_owned();

    let mut cargv = Vec::with_capacity(invocation.command().len());
    for arg in invocation.command() {
        match CString::new(arg.as_bytes()) {
            Ok(c) => cargv.push(c),
            Err(_) => {
                return LaunchError::Exec {
                    program,
                    source: Errno::EINVAL,
                }
            }
        }
    }

    log::debug!("Executing via execvp: {:?}", invocation.command());
    let source = image.replace(&cargv[0], &cargv);
    LaunchError::Exec { program, source }
}
