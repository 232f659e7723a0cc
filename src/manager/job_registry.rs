use log::debug;
use nix::unistd::Pid;

use crate::error::ShellError;
use crate::models::job::Job;

/// Bounded, creation-ordered set of active background jobs.
///
/// Job ids come from a counter that only ever moves forward, so an id is
/// never handed out twice even after its job has been removed. A linear
/// scan by pid is fine for the small capacities a shell session sees.
#[derive(Debug)]
pub struct JobRegistry {
    jobs: Vec<Job>,
    capacity: usize,
    next_id: u32,
}

impl JobRegistry {
    pub fn new(capacity: usize) -> Self {
        JobRegistry {
            jobs: Vec::new(),
            capacity,
            next_id: 1,
        }
    }

    /// Appends a running job and returns its id. At capacity the registry is
    /// left untouched and the counter does not advance.
    pub fn register(&mut self, pid: Pid, command: String) -> Result<u32, ShellError> {
        if self.jobs.len() >= self.capacity {
            return Err(ShellError::JobTableFull {
                capacity: self.capacity,
            });
        }
        debug_assert!(self.find(pid).is_none(), "pid {} already tracked", pid);

        let id = self.next_id;
        self.next_id += 1;
        self.jobs.push(Job::new(id, pid, command));
        debug!("Job {} registered for pid {}.", id, pid);
        Ok(id)
    }

    /// Removes the job owning `pid`, keeping the rest in order.
    pub fn remove_by_pid(&mut self, pid: Pid) -> Option<Job> {
        let index = self.jobs.iter().position(|job| job.pid == pid)?;
        Some(self.jobs.remove(index))
    }

    pub fn find(&self, pid: Pid) -> Option<&Job> {
        self.jobs.iter().find(|job| job.pid == pid)
    }

    #[cfg(test)]
    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job::JobState;

    fn pid(raw: i32) -> Pid {
        Pid::from_raw(raw)
    }

    fn ids(registry: &JobRegistry) -> Vec<u32> {
        registry.jobs().iter().map(|job| job.id).collect()
    }

    #[test]
    fn ids_are_strictly_increasing() {
        let mut registry = JobRegistry::new(5);
        for raw in 100..105 {
            registry.register(pid(raw), format!("job {}", raw)).unwrap();
        }
        assert_eq!(registry.len(), 5);
        assert_eq!(ids(&registry), vec![1, 2, 3, 4, 5]);
        assert!(registry
            .jobs()
            .iter()
            .all(|job| job.state == JobState::Running));
    }

    #[test]
    fn register_at_capacity_is_rejected_without_mutation() {
        let mut registry = JobRegistry::new(2);
        registry.register(pid(10), "a".to_string()).unwrap();
        registry.register(pid(11), "b".to_string()).unwrap();
        let before = registry.jobs().to_vec();

        let err = registry.register(pid(12), "c".to_string()).unwrap_err();
        assert!(matches!(err, ShellError::JobTableFull { capacity: 2 }));
        assert_eq!(registry.jobs(), before.as_slice());

        // A rejected insert does not burn an id.
        registry.remove_by_pid(pid(10)).unwrap();
        assert_eq!(registry.register(pid(12), "c".to_string()).unwrap(), 3);
    }

    #[test]
    fn remove_preserves_order_of_remaining_jobs() {
        let mut registry = JobRegistry::new(4);
        for raw in [10, 11, 12, 13] {
            registry.register(pid(raw), raw.to_string()).unwrap();
        }

        let removed = registry.remove_by_pid(pid(11)).unwrap();
        assert_eq!(removed.id, 2);
        assert_eq!(removed.command, "11");
        assert_eq!(ids(&registry), vec![1, 3, 4]);
    }

    #[test]
    fn remove_unknown_pid_is_not_found() {
        let mut registry = JobRegistry::new(4);
        registry.register(pid(10), "a".to_string()).unwrap();

        assert!(registry.remove_by_pid(pid(99)).is_none());
        assert_eq!(registry.len(), 1);

        registry.remove_by_pid(pid(10)).unwrap();
        assert!(registry.remove_by_pid(pid(10)).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn ids_are_never_reused() {
        let mut registry = JobRegistry::new(1);
        assert_eq!(registry.register(pid(10), "a".to_string()).unwrap(), 1);
        registry.remove_by_pid(pid(10));
        assert_eq!(registry.register(pid(10), "a".to_string()).unwrap(), 2);
    }

    #[test]
    fn huge_capacity_does_not_preallocate() {
        let mut registry = JobRegistry::new(usize::MAX);
        assert_eq!(registry.capacity(), usize::MAX);
        assert_eq!(registry.register(pid(10), "a".to_string()).unwrap(), 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn zero_capacity_rejects_everything() {
        let mut registry = JobRegistry::new(0);
        assert!(registry.register(pid(10), "a".to_string()).is_err());
        assert_eq!(registry.capacity(), 0);
    }
}
