use std::collections::VecDeque;
use std::io::{self, Write};

use crossbeam_channel::{Receiver, TryRecvError};
use log::{debug, info};
use nix::unistd::Pid;

use crate::error::ShellError;
use crate::manager::job_registry::JobRegistry;
use crate::models::command::ParsedCommand;
use crate::models::job::{ExitStatus, Job};
use crate::models::message::ChildExit;
use crate::worker::launcher;

/// What became of a launched command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnOutcome {
    /// Foreground command ran to completion.
    Completed(ExitStatus),
    /// Background command is running and tracked.
    Background { job_id: u32, pid: Pid },
    /// Background command is running but the job table was full.
    Untracked { pid: Pid },
}

/// Sole owner of the job registry and the completion queue.
///
/// The reaper thread never touches either; it only sends `ChildExit`
/// messages, which are applied here on the main thread.
pub struct JobControl {
    registry: JobRegistry,
    completed: VecDeque<Job>,
    events: Receiver<ChildExit>,
}

impl JobControl {
    pub fn new(capacity: usize, events: Receiver<ChildExit>) -> Self {
        JobControl {
            registry: JobRegistry::new(capacity),
            completed: VecDeque::new(),
            events,
        }
    }

    /// Launches `command`, blocking until it exits unless it is a background job.
    pub fn run(&mut self, command: &ParsedCommand) -> Result<SpawnOutcome, ShellError> {
        let pid = launcher::launch(command)?;
        if !command.background {
            return self.wait_foreground(pid).map(SpawnOutcome::Completed);
        }
        Ok(self.track(pid, command.text.clone()))
    }

    /// Registers a running background process.
    ///
    /// Pending exits are filed first: a pid reclaimed by the reaper may
    /// already belong to this new child.
    pub fn track(&mut self, pid: Pid, command: String) -> SpawnOutcome {
        self.collect();
        match self.registry.register(pid, command) {
            Ok(job_id) => SpawnOutcome::Background { job_id, pid },
            Err(e) => {
                info!("Pid {} left untracked: {}", pid, e);
                SpawnOutcome::Untracked { pid }
            }
        }
    }

    /// Blocks until `pid` exits. Other exits that arrive in the meantime are
    /// filed as usual.
    pub fn wait_foreground(&mut self, pid: Pid) -> Result<ExitStatus, ShellError> {
        loop {
            let exit = self.events.recv().map_err(|_| ShellError::Wait)?;
            if exit.pid == pid {
                debug!("Foreground pid {} finished ({}).", pid, exit.status);
                return Ok(exit.status);
            }
            self.apply(exit);
        }
    }

    /// Applies every pending reaper message without blocking.
    pub fn collect(&mut self) {
        loop {
            match self.events.try_recv() {
                Ok(exit) => self.apply(exit),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    debug!("Reaper channel disconnected.");
                    break;
                }
            }
        }
    }

    fn apply(&mut self, exit: ChildExit) {
        match self.registry.remove_by_pid(exit.pid) {
            Some(mut job) => {
                job.finish(exit.status);
                info!("Job {} finished ({}).", job.id, exit.status);
                self.completed.push_back(job);
            }
            None => debug!("Ignoring exit of untracked pid {}.", exit.pid),
        }
    }

    /// Prints a notice for every finished job, oldest completion first, and
    /// forgets them. Returns how many were printed.
    pub fn report<W: Write>(&mut self, out: &mut W) -> io::Result<usize> {
        self.collect();
        let mut printed = 0;
        while let Some(job) = self.completed.pop_front() {
            if let Some(notice) = job.completion_notice() {
                writeln!(out, "{}", notice)?;
                printed += 1;
            }
        }
        out.flush()?;
        Ok(printed)
    }

    pub fn capacity(&self) -> usize {
        self.registry.capacity()
    }

    pub fn active_jobs(&self) -> usize {
        self.registry.len()
    }

    pub fn is_idle(&self) -> bool {
        self.registry.is_empty()
    }
}
