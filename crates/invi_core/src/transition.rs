//! Transition completion gate
//!
//! Animated state changes in Invi widgets all follow the same protocol:
//!
//! 1. [`begin`](TransitionGate::begin) marks the widget busy (or refuses if it
//!    already is)
//! 2. the widget mutates styles toward the visual end state
//! 3. either it finishes right away (animation disabled), or it parks the
//!    finalization payload with [`await_signal`](TransitionGate::await_signal)
//!    until the host reports that the transition ended
//! 4. [`signal`](TransitionGate::signal) hands the payload back exactly once
//! 5. [`finish`](TransitionGate::finish) clears the busy flag
//!
//! The gate holds no timers; a transition that never signals keeps the
//! widget busy.

/// Where the gate is in the protocol
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GatePhase {
    /// Not busy
    Idle,
    /// Busy, finalizing synchronously
    Running,
    /// Busy, waiting for the host's transition-end signal
    Awaiting,
}

/// Busy flag plus one-shot completion slot
#[derive(Debug)]
pub struct TransitionGate<P> {
    busy: bool,
    pending: Option<P>,
}

impl<P> Default for TransitionGate<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> TransitionGate<P> {
    pub fn new() -> Self {
        Self {
            busy: false,
            pending: None,
        }
    }

    /// Enter the busy state; `false` if a transition is already in flight
    pub fn begin(&mut self) -> bool {
        if self.busy {
            return false;
        }
        self.busy = true;
        true
    }

    /// Park the finalization payload until [`signal`](Self::signal)
    pub fn await_signal(&mut self, payload: P) {
        debug_assert!(self.busy, "await_signal outside of a transition");
        self.pending = Some(payload);
    }

    /// Take the parked payload
    ///
    /// Returns `None` when nothing is waiting, so a stray or repeated
    /// transition-end signal is harmless.
    pub fn signal(&mut self) -> Option<P> {
        self.pending.take()
    }

    /// Leave the busy state
    pub fn finish(&mut self) {
        self.busy = false;
        self.pending = None;
    }

    /// Abort the transition, returning whatever was parked
    pub fn cancel(&mut self) -> Option<P> {
        self.busy = false;
        self.pending.take()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn phase(&self) -> GatePhase {
        match (self.busy, self.pending.is_some()) {
            (false, _) => GatePhase::Idle,
            (true, false) => GatePhase::Running,
            (true, true) => GatePhase::Awaiting,
        }
    }
}
