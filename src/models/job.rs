use std::fmt;

use nix::unistd::Pid;

/// How a child process left the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// Normal exit with the given code.
    Exited(i32),
    /// Killed by the given signal number.
    Signaled(i32),
}

impl fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitStatus::Exited(code) => write!(f, "exit={}", code),
            ExitStatus::Signaled(signal) => write!(f, "signal={}", signal),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Running,
    Finished(ExitStatus),
}

/// A background process tracked by the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub id: u32,
    pub pid: Pid,
    pub command: String,
    pub state: JobState,
}

impl Job {
    pub fn new(id: u32, pid: Pid, command: String) -> Self {
        Self {
            id,
            pid,
            command,
            state: JobState::Running,
        }
    }

    pub fn finish(&mut self, status: ExitStatus) {
        self.state = JobState::Finished(status);
    }

    /// The `[id]+ Done cmd (exit=N)` line, or `None` while still running.
    pub fn completion_notice(&self) -> Option<String> {
        let JobState::Finished(status) = self.state else {
            return None;
        };
        let word = match status {
            ExitStatus::Exited(_) => "Done",
            ExitStatus::Signaled(_) => "Terminated",
        };
        Some(format!("[{}]+ {} {} ({})", self.id, word, self.command, status))
    }
}
