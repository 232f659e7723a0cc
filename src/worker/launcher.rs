use std::ffi::CString;
use std::ptr;

use log::debug;
use nix::errno::Errno;
use nix::unistd::{fork, write, ForkResult, Pid};

use crate::error::ShellError;
use crate::models::command::ParsedCommand;

use super::reaper::sigchld_mask;

/// Forks and execs `command`, returning the child's pid to the parent.
///
/// A program that cannot be executed is not an error here: the child prints
/// `exec failed: ...` and exits with status 1, which the reaper reports like
/// any other exit.
pub fn launch(command: &ParsedCommand) -> Result<Pid, ShellError> {
    // The child must not allocate, so argv is fully built here.
    let argv = command
        .argv()
        .map(CString::new)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| ShellError::InvalidArgument)?;
    let mut argv_ptrs: Vec<*const libc::c_char> = argv.iter().map(|arg| arg.as_ptr()).collect();
    argv_ptrs.push(ptr::null());

    match unsafe { fork() } {
        Ok(ForkResult::Parent { child }) => {
            debug!("Forked '{}' as pid {}.", command.text, child);
            Ok(child)
        }
        Ok(ForkResult::Child) => exec_child(&argv_ptrs),
        Err(errno) => Err(ShellError::Spawn(errno)),
    }
}

/// Runs in the freshly forked child. Only async-signal-safe calls from here on.
///
/// `argv` is null-terminated and points into strings the parent keeps alive.
fn exec_child(argv: &[*const libc::c_char]) -> ! {
    // The signal mask survives exec; give the new program a clean one.
    let _ = sigchld_mask().thread_unblock();

    unsafe { libc::execvp(argv[0], argv.as_ptr()) };
    report_exec_failure(Errno::last());
    unsafe { libc::_exit(1) }
}

fn report_exec_failure(errno: Errno) {
    let parts: [&[u8]; 3] = [b"exec failed: ", errno.desc().as_bytes(), b"\n"];
    for part in parts {
        let _ = write(libc::STDERR_FILENO, part);
    }
}
