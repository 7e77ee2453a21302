use crate::config::invocation::{scan, Scan};
use crate::config::types::{LaunchError, EXIT_OK};
use crate::exec::preexec::launch;
use crate::exec::replace::{ProcessImage, SystemImage};
use crate::kernel::credentials::{CredentialOps, SystemCredentials};
use crate::kernel::identity::{IdentityDirectory, SystemDirectory};
use std::ffi::OsString;
use std::io::Write;

const DEFAULT_PROGRAM_NAME: &str = "runas";

fn usage(out: &mut dyn Write, argv0: &str, message: Option<&str>) {
    let _ = writeln!(
        out,
        "usage: {} [--setuid uid] [--setgid gid] /path/to/command [argv...]",
        argv0
    );
    if let Some(message) = message {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", message);
    }
}

/// Report `err` the way its family is reported and return its exit code.
fn report(out: &mut dyn Write, argv0: &str, err: &LaunchError) -> i32 {
    match err {
        LaunchError::Usage(message) => usage(out, argv0, message.as_deref()),
        _ => {
            let _ = writeln!(out, "{}", err);
        }
    }
    err.exit_code()
}

/// Full pipeline over injectable platform services.
///
/// Returns the exit code. On a successful exec this never returns.
pub fn run_with(
    argv0: &str,
    args: &[OsString],
    directory: &dyn IdentityDirectory,
    ops: &mut dyn CredentialOps,
    image: &mut dyn ProcessImage,
    diagnostics: &mut dyn Write,
) -> i32 {
    let invocation = match scan(args, directory) {
        // Help goes to the diagnostic stream like every other usage text.
        Ok(Scan::Help) => {
            usage(diagnostics, argv0, None);
            return EXIT_OK;
        }
        Ok(Scan::Launch(invocation)) => invocation,
        Err(e) => return report(diagnostics, argv0, &e),
    };

    log::debug!(
        "Launching {:?} with uid={:?} gid={:?}",
        invocation.program(),
        invocation.uid,
        invocation.gid
    );

    let err = launch(invocation, ops, image);
    report(diagnostics, argv0, &err)
}

/// Process entry point: parse `std::env::args_os`, drop identity, exec.
pub fn run() -> i32 {
    env_logger::init();

    let mut args = std::env::args_os();
    let argv0 = args
        .next()
        .map(|a| a.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_PROGRAM_NAME.to_string());
    let rest: Vec<OsString> = args.collect();

    run_with(
        &argv0,
        &rest,
        &SystemDirectory,
        &mut SystemCredentials,
        &mut SystemImage,
        &mut std::io::stderr(),
    )
}
