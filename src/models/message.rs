use nix::unistd::Pid;

use super::job::ExitStatus;

/// Sent by the reaper thread for every child it reclaims.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildExit {
    pub pid: Pid,
    pub status: ExitStatus,
}
