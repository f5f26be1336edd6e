//! Cooperative task queue
//!
//! Widgets never spawn threads. Work that must happen "after the current call
//! returns" is deferred onto this queue, and timed work is scheduled against
//! a virtual clock the host advances (typically once per frame).
//!
//! The queue only stores tasks; the owner pops and runs them so that tasks
//! can mutate the owner freely. Run order mirrors a browser event loop:
//! drain every deferred task, then run the earliest due timer, then drain
//! deferred tasks again.

use std::collections::VecDeque;
use std::time::Duration;

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle to a scheduled timer
    pub struct TimerId;
}

struct Timer<T> {
    due: Duration,
    /// Insertion order, breaks ties between timers due at the same time
    seq: u64,
    task: T,
}

/// Deferred tasks plus virtual-clock timers
pub struct TaskQueue<T> {
    now: Duration,
    deferred: VecDeque<T>,
    timers: SlotMap<TimerId, Timer<T>>,
    next_seq: u64,
}

impl<T> Default for TaskQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TaskQueue<T> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            deferred: VecDeque::new(),
            timers: SlotMap::with_key(),
            next_seq: 0,
        }
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Queue a task to run once the current call stack unwinds
    pub fn defer(&mut self, task: T) {
        self.deferred.push_back(task);
    }

    /// Schedule a task to run `delay` after the current virtual time
    pub fn schedule(&mut self, delay: Duration, task: T) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.insert(Timer {
            due: self.now + delay,
            seq,
            task,
        })
    }

    /// Cancel a pending timer, returning its task if it had not fired
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        self.timers.remove(id).map(|timer| timer.task)
    }

    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.timers.contains_key(id)
    }

    /// Take the oldest deferred task
    pub fn pop_deferred(&mut self) -> Option<T> {
        self.deferred.pop_front()
    }

    /// Take the earliest timer due at or before `until`
    ///
    /// The clock jumps to the timer's due time.
    pub fn pop_due(&mut self, until: Duration) -> Option<T> {
        let id = self
            .timers
            .iter()
            .filter(|(_, timer)| timer.due <= until)
            .min_by_key(|(_, timer)| (timer.due, timer.seq))
            .map(|(id, _)| id)?;

        let timer = self.timers.remove(id)?;
        self.now = self.now.max(timer.due);
        Some(timer.task)
    }

    /// Move the clock forward; never moves it backwards
    pub fn advance_to(&mut self, time: Duration) {
        self.now = self.now.max(time);
    }

    /// Due time of the earliest pending timer
    pub fn next_due(&self) -> Option<Duration> {
        self.timers.values().map(|timer| timer.due).min()
    }

    pub fn has_deferred(&self) -> bool {
        !self.deferred.is_empty()
    }

    pub fn timer_count(&self) -> usize {
        self.timers.len()
    }

    /// Drop every pending task and timer
    pub fn clear(&mut self) {
        self.deferred.clear();
        self.timers.clear();
    }
}
