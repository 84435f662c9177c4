use std::time::Duration;

use indexmap::IndexMap;

use crate::core::Ease;
use crate::render::NodeId;

/// Owner of a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskTarget {
    Node(NodeId),
    Graph,
}

/// Independent timeline per target. Scheduling on a busy channel replaces
/// the pending task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskChannel {
    Transition,
    Stroke,
    Tooltip,
    Resize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskKey {
    pub target: TaskTarget,
    pub channel: TaskChannel,
}

impl TaskKey {
    #[must_use]
    pub const fn node(node: NodeId, channel: TaskChannel) -> Self {
        Self {
            target: TaskTarget::Node(node),
            channel,
        }
    }

    #[must_use]
    pub const fn graph(channel: TaskChannel) -> Self {
        Self {
            target: TaskTarget::Graph,
            channel,
        }
    }
}

/// One timed unit of work: an eased transition or a plain timer when the
/// duration is zero.
#[derive(Debug, Clone)]
pub struct Task<P> {
    pub key: TaskKey,
    pub start: Duration,
    pub duration: Duration,
    pub ease: Ease,
    pub payload: P,
    seq: u64,
}

impl<P> Task<P> {
    #[must_use]
    pub fn end(&self) -> Duration {
        self.start.saturating_add(self.duration)
    }

    /// Eased progress at `now`, `None` while the task is still delayed.
    #[must_use]
    pub fn progress(&self, now: Duration) -> Option<f64> {
        if now < self.start {
            return None;
        }
        if self.duration.is_zero() {
            return Some(1.0);
        }
        let raw = (now - self.start).as_secs_f64() / self.duration.as_secs_f64();
        Some(self.ease.apply(raw))
    }
}

/// Single-threaded task scheduler over a virtual clock.
///
/// The host moves the clock forward; nothing fires on its own. Due tasks are
/// handed back to the caller in completion order so completions can schedule
/// follow-up work before the clock moves further.
#[derive(Debug)]
pub struct Scheduler<P> {
    now: Duration,
    next_seq: u64,
    tasks: IndexMap<TaskKey, Task<P>>,
}

impl<P> Default for Scheduler<P> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            next_seq: 0,
            tasks: IndexMap::new(),
        }
    }
}

impl<P> Scheduler<P> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    #[must_use]
    pub fn contains(&self, key: TaskKey) -> bool {
        self.tasks.contains_key(&key)
    }

    #[must_use]
    pub fn get(&self, key: TaskKey) -> Option<&Task<P>> {
        self.tasks.get(&key)
    }

    pub fn tasks(&self) -> impl Iterator<Item = &Task<P>> {
        self.tasks.values()
    }

    /// Schedules `payload` on `key`, replacing whatever was pending there.
    ///
    /// Returns the interrupted task, if any.
    pub fn schedule(
        &mut self,
        key: TaskKey,
        delay: Duration,
        duration: Duration,
        ease: Ease,
        payload: P,
    ) -> Option<Task<P>> {
        let replaced = self.tasks.shift_remove(&key);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.tasks.insert(
            key,
            Task {
                key,
                start: self.now.saturating_add(delay),
                duration,
                ease,
                payload,
                seq,
            },
        );
        replaced
    }

    pub fn cancel(&mut self, key: TaskKey) -> Option<Task<P>> {
        self.tasks.shift_remove(&key)
    }

    /// Cancels every channel of `target`. Returns the number of dropped tasks.
    pub fn cancel_target(&mut self, target: TaskTarget) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|key, _| key.target != target);
        before - self.tasks.len()
    }

    pub fn clear(&mut self) -> usize {
        let dropped = self.tasks.len();
        self.tasks.clear();
        dropped
    }

    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.tasks.values().map(Task::end).min()
    }

    /// Moves the clock to the earliest deadline not after `until` and removes
    /// the tasks due at that instant.
    ///
    /// When nothing is due the clock moves to `until` and the result is empty.
    pub fn pop_due(&mut self, until: Duration) -> Vec<Task<P>> {
        let Some(deadline) = self.next_deadline().filter(|deadline| *deadline <= until) else {
            self.now = self.now.max(until);
            return Vec::new();
        };
        self.now = self.now.max(deadline);

        let now = self.now;
        let due_keys: Vec<TaskKey> = self
            .tasks
            .values()
            .filter(|task| task.end() <= now)
            .map(|task| task.key)
            .collect();
        let mut due: Vec<Task<P>> = due_keys
            .iter()
            .filter_map(|key| self.tasks.shift_remove(key))
            .collect();
        due.sort_by_key(|task| (task.end(), task.seq));
        due
    }

    /// Started tasks with their eased progress at the current time.
    pub fn running(&self) -> impl Iterator<Item = (&Task<P>, f64)> {
        let now = self.now;
        self.tasks
            .values()
            .filter_map(move |task| task.progress(now).map(|progress| (task, progress)))
    }
}
