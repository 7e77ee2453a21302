//! Leader-option scanning.
//!
//! Options are only recognized before the command. Scanning stops at the
//! first token without the `--` leader; that token and everything after it
//! form the command vector. An unknown `--` option (including a bare `--`)
//! is a usage error.

use crate::config::types::{IdKind, LaunchError, Result, UNSET_ID};
use crate::kernel::identity::{resolve_id, IdentityDirectory};
use std::ffi::{OsStr, OsString};
use std::os::unix::ffi::OsStrExt;

const OPTION_LEADER: &[u8] = b"--";

/// Outcome of scanning the argument vector
#[derive(Debug, PartialEq, Eq)]
pub enum Scan {
    /// `--help` was seen before any command
    Help,
    Launch(Invocation),
}

/// A fully resolved launch request.
///
/// `command` is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub uid: Option<u32>,
    pub gid: Option<u32>,
    command: Vec<OsString>,
}

impl Invocation {
    /// Program token followed by its arguments; the program doubles as argv[0]
    pub fn command(&self) -> &[OsString] {
        &self.command
    }

    pub fn program(&self) -> &OsStr {
        &self.command[0]
    }
}

/// Scan `args` (program name excluded), resolving each `--setuid`/`--setgid`
/// value as soon as it is consumed.
///
/// Any other token starting with `--` is rejected before anything is resolved
/// further or executed.
pub fn scan(args: &[OsString], directory: &dyn IdentityDirectory) -> Result<Scan> {
    let mut uid = None;
    let mut gid = None;

    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_os_str();
        if !arg.as_bytes().starts_with(OPTION_LEADER) {
            return Ok(Scan::Launch(Invocation {
                uid,
                gid,
                command: args[i..].to_vec(),
            }));
        }

        let kind = match arg.as_bytes() {
            b"--setuid" => IdKind::User,
            b"--setgid" => IdKind::Group,
            b"--help" => return Ok(Scan::Help),
            _ => {
                log::debug!("Unrecognized option {:?}", arg);
                return Err(LaunchError::Usage(None));
            }
        };

        let value = args.get(i + 1).ok_or_else(|| missing_value(kind))?;
        let id = unset_if_sentinel(resolve_id(value, kind, directory)?, kind);
        match kind {
            IdKind::User => uid = id,
            IdKind::Group => gid = id,
        }
        i += 2;
    }

    Err(LaunchError::Usage(None))
}

fn missing_value(kind: IdKind) -> LaunchError {
    let message = match kind {
        IdKind::User => "*** --setuid requires uid",
        IdKind::Group => "*** --setgid requires gid",
    };
    LaunchError::Usage(Some(message.to_string()))
}

fn unset_if_sentinel(id: u32, kind: IdKind) -> Option<u32> {
    if id == UNSET_ID {
        log::warn!("{} id {} is reserved; leaving {} unchanged", kind.label(), id, kind.label());
        None
    } else {
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::ResolutionFailure;
    use crate::kernel::identity::testing::FakeDirectory;

    fn argv(tokens: &[&str]) -> Vec<OsString> {
        tokens.iter().map(OsString::from).collect()
    }

    fn launch(scan: Scan) -> Invocation {
        match scan {
            Scan::Launch(invocation) => invocation,
            Scan::Help => panic!("expected a launch, got help"),
        }
    }

    #[test]
    fn empty_arguments_are_a_usage_error() {
        let dir = FakeDirectory::default();
        let err = scan(&[], &dir).unwrap_err();
        assert!(matches!(err, LaunchError::Usage(None)));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn bare_command_keeps_identity_unset() {
        let dir = FakeDirectory::default();
        let inv = launch(scan(&argv(&["/bin/echo", "hello"]), &dir).unwrap());
        assert_eq!(inv.uid, None);
        assert_eq!(inv.gid, None);
        assert_eq!(inv.command(), argv(&["/bin/echo", "hello"]).as_slice());
        assert_eq!(inv.program(), OsStr::new("/bin/echo"));
    }

    #[test]
    fn both_flags_then_command() {
        let dir = FakeDirectory::default();
        let inv = launch(
            scan(
                &argv(&["--setuid", "1000", "--setgid", "1000", "/bin/echo", "hello"]),
                &dir,
            )
            .unwrap(),
        );
        assert_eq!(inv.uid, Some(1000));
        assert_eq!(inv.gid, Some(1000));
        assert_eq!(inv.command(), argv(&["/bin/echo", "hello"]).as_slice());
    }

    #[test]
    fn options_after_command_belong_to_command() {
        let dir = FakeDirectory::default();
        let inv = launch(scan(&argv(&["ls", "--setuid", "0"]), &dir).unwrap());
        assert_eq!(inv.uid, None);
        assert_eq!(inv.command(), argv(&["ls", "--setuid", "0"]).as_slice());
    }

    #[test]
    fn missing_setuid_value_is_usage_error() {
        let dir = FakeDirectory::default();
        match scan(&argv(&["--setuid"]), &dir).unwrap_err() {
            LaunchError::Usage(Some(msg)) => assert!(msg.contains("--setuid requires uid")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_setgid_value_is_usage_error() {
        let dir = FakeDirectory::default();
        match scan(&argv(&["--setuid", "5", "--setgid"]), &dir).unwrap_err() {
            LaunchError::Usage(Some(msg)) => assert!(msg.contains("--setgid requires gid")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn flags_without_command_is_usage_error() {
        let dir = FakeDirectory::default();
        let err = scan(&argv(&["--setuid", "1000"]), &dir).unwrap_err();
        assert!(matches!(err, LaunchError::Usage(None)));
    }

    #[test]
    fn help_wins_when_reached_before_command() {
        let dir = FakeDirectory::default();
        assert_eq!(scan(&argv(&["--help"]), &dir).unwrap(), Scan::Help);
        assert_eq!(
            scan(&argv(&["--setuid", "1", "--help", "true"]), &dir).unwrap(),
            Scan::Help
        );
    }

    #[test]
    fn help_after_command_is_passed_through() {
        let dir = FakeDirectory::default();
        let inv = launch(scan(&argv(&["true", "--help"]), &dir).unwrap());
        assert_eq!(inv.command(), argv(&["true", "--help"]).as_slice());
    }

    #[test]
    fn unknown_long_option_is_usage_error() {
        let dir = FakeDirectory::default();
        let err = scan(&argv(&["--setgid", "7", "--verbose", "x"]), &dir).unwrap_err();
        assert!(matches!(err, LaunchError::Usage(None)));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn misspelled_flag_is_not_executed() {
        let dir = FakeDirectory::default();
        let err = scan(&argv(&["--set-uid", "1000", "id"]), &dir).unwrap_err();
        assert!(matches!(err, LaunchError::Usage(None)));
        assert!(dir.lookups.borrow().is_empty());
    }

    #[test]
    fn last_repeated_flag_wins() {
        let dir = FakeDirectory::default();
        let inv = launch(
            scan(&argv(&["--setgid", "0", "--setgid", "1000", "true"]), &dir).unwrap(),
        );
        assert_eq!(inv.gid, Some(1000));
    }

    #[test]
    fn names_resolve_through_directory() {
        let dir = FakeDirectory::default()
            .with_user("alice", 1001)
            .with_group("staff", 50);
        let inv = launch(
            scan(&argv(&["--setuid", "alice", "--setgid", "staff", "id"]), &dir).unwrap(),
        );
        assert_eq!(inv.uid, Some(1001));
        assert_eq!(inv.gid, Some(50));
    }

    #[test]
    fn unresolvable_user_stops_scanning() {
        let dir = FakeDirectory::default();
        let err = scan(&argv(&["--setuid", "bogus-user-xyz", "/bin/true"]), &dir).unwrap_err();
        match err {
            LaunchError::Resolution { kind, name, source } => {
                assert_eq!(kind, IdKind::User);
                assert_eq!(name, "bogus-user-xyz");
                assert_eq!(source, ResolutionFailure::NotFound);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn earlier_bad_value_fails_even_if_overridden() {
        let dir = FakeDirectory::default();
        let err = scan(&argv(&["--setuid", "nope", "--setuid", "0", "true"]), &dir).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn flag_value_is_consumed_even_if_it_looks_like_a_flag() {
        let dir = FakeDirectory::default();
        let err = scan(&argv(&["--setuid", "--setgid", "true"]), &dir).unwrap_err();
        match err {
            LaunchError::Resolution { name, .. } => assert_eq!(name, "--setgid"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn sentinel_value_leaves_identity_unset() {
        let dir = FakeDirectory::default();
        let inv = launch(scan(&argv(&["--setuid", "4294967295", "true"]), &dir).unwrap());
        assert_eq!(inv.uid, None);
    }

    #[test]
    fn double_dash_alone_is_usage_error() {
        let dir = FakeDirectory::default();
        let err = scan(&argv(&["--", "true"]), &dir).unwrap_err();
        assert!(matches!(err, LaunchError::Usage(None)));
    }
}
