use std::thread;

use crossbeam_channel::{SendError, Sender};
use log::{debug, error, info};
use nix::errno::Errno;
use nix::sys::signal::{SigSet, Signal};
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};

use crate::error::ShellError;
use crate::models::job::ExitStatus;
use crate::models::message::ChildExit;

/// Source of "has any child exited?" answers.
pub trait ChildWaiter {
    /// Returns the next exited child, or `None` once nothing else is ready.
    fn next_exit(&mut self) -> Option<ChildExit>;
}

/// Non-blocking `waitpid(-1)` over every child of this process.
pub struct WaitAny;

impl ChildWaiter for WaitAny {
    fn next_exit(&mut self) -> Option<ChildExit> {
        loop {
            match waitpid(None, Some(WaitPidFlag::WNOHANG)) {
                Ok(WaitStatus::Exited(pid, code)) => {
                    return Some(ChildExit {
                        pid,
                        status: ExitStatus::Exited(code),
                    })
                }
                Ok(WaitStatus::Signaled(pid, signal, _)) => {
                    return Some(ChildExit {
                        pid,
                        status: ExitStatus::Signaled(signal as i32),
                    })
                }
                Ok(WaitStatus::StillAlive) | Err(Errno::ECHILD) => return None,
                Err(Errno::EINTR) => continue,
                // Stop/continue reports are not tracked.
                Ok(status) => debug!("Ignoring child state change: {:?}", status),
                Err(e) => {
                    error!("waitpid failed: {}", e.desc());
                    return None;
                }
            }
        }
    }
}

/// Reclaims every child that is ready right now and forwards each one.
///
/// One SIGCHLD may stand for several exits, so this keeps asking until the
/// waiter reports nothing left. Fails only when the receiving side is gone.
pub fn drain<W: ChildWaiter>(
    waiter: &mut W,
    sender: &Sender<ChildExit>,
) -> Result<usize, SendError<ChildExit>> {
    let mut reaped = 0;
    while let Some(exit) = waiter.next_exit() {
        debug!("Reaped pid {} ({}).", exit.pid, exit.status);
        sender.send(exit)?;
        reaped += 1;
    }
    Ok(reaped)
}

/// Starts the reaper thread.
///
/// Must run before any other thread exists: SIGCHLD is blocked here and the
/// mask is inherited by every later thread, which leaves the reaper's
/// `sigwait` as the only consumer of the signal.
pub fn install(sender: Sender<ChildExit>) -> Result<thread::JoinHandle<()>, ShellError> {
    let mask = sigchld_mask();
    mask.thread_block()
        .map_err(|e| ShellError::Handler(e.into()))?;

    thread::Builder::new()
        .name("reaper".to_string())
        .spawn(move || run(mask, sender))
        .map_err(ShellError::Handler)
}

pub fn sigchld_mask() -> SigSet {
    let mut mask = SigSet::empty();
    mask.add(Signal::SIGCHLD);
    mask
}

fn run(mask: SigSet, sender: Sender<ChildExit>) {
    loop {
        if let Err(e) = mask.wait() {
            error!("sigwait failed: {}", e.desc());
            break;
        }
        if drain(&mut WaitAny, &sender).is_err() {
            info!("Job control has shut down, reaper exiting.");
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use crossbeam_channel::unbounded;
    use nix::unistd::Pid;

    use super::*;

    struct ScriptedWaiter(VecDeque<ChildExit>);

    impl ChildWaiter for ScriptedWaiter {
        fn next_exit(&mut self) -> Option<ChildExit> {
            self.0.pop_front()
        }
    }

    fn exit(pid: i32, status: ExitStatus) -> ChildExit {
        ChildExit {
            pid: Pid::from_raw(pid),
            status,
        }
    }

    #[test]
    fn one_wakeup_drains_every_ready_child() {
        let script = vec![
            exit(10, ExitStatus::Exited(0)),
            exit(11, ExitStatus::Signaled(9)),
            exit(12, ExitStatus::Exited(3)),
        ];
        let mut waiter = ScriptedWaiter(script.clone().into());
        let (tx, rx) = unbounded();

        assert_eq!(drain(&mut waiter, &tx).unwrap(), 3);
        assert_eq!(rx.try_iter().collect::<Vec<_>>(), script);

        // Nothing left: a second wake-up finds no work.
        assert_eq!(drain(&mut waiter, &tx).unwrap(), 0);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn drain_stops_when_receiver_is_gone() {
        let mut waiter = ScriptedWaiter(vec![exit(10, ExitStatus::Exited(0))].into());
        let (tx, rx) = unbounded();
        drop(rx);

        assert!(drain(&mut waiter, &tx).is_err());
    }
}
