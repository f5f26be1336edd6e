//! Autoplay timer state
//!
//! `Stopped <-> Running`. While running, exactly one timer is pending at a
//! time; each firing advances the carousel and re-arms once that advance
//! settles.

use std::time::Duration;

use invi_core::{TaskQueue, TimerId};

#[derive(Debug, Default)]
pub(crate) struct Autoplay {
    running: bool,
    timer: Option<TimerId>,
}

impl Autoplay {
    pub(crate) fn is_running(&self) -> bool {
        self.running
    }

    pub(crate) fn has_timer(&self) -> bool {
        self.timer.is_some()
    }

    /// Enter the running state; the caller arms the first timer
    pub(crate) fn run(&mut self) {
        self.running = true;
    }

    /// Schedule the next advance if running and nothing is pending
    pub(crate) fn arm<T>(&mut self, tasks: &mut TaskQueue<T>, delay: Duration, task: T) {
        if self.running && self.timer.is_none() {
            self.timer = Some(tasks.schedule(delay, task));
        }
    }

    /// The pending timer fired
    pub(crate) fn fired(&mut self) {
        self.timer = None;
    }

    pub(crate) fn stop<T>(&mut self, tasks: &mut TaskQueue<T>) {
        if let Some(timer) = self.timer.take() {
            tasks.cancel(timer);
        }
        self.running = false;
    }
}
