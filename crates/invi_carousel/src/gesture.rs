//! Drag gesture tracking
//!
//! `Idle -> Tracking -> Idle`. Pointer-down starts tracking, moves report a
//! damped horizontal offset (vertical-dominant moves are left to the page),
//! and release yields the total delta, which [`decide`] turns into a commit
//! or a snap back.

/// Tracker state
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureState {
    Idle,
    Tracking {
        start_x: f32,
        start_y: f32,
        delta_x: f32,
        delta_y: f32,
        /// Autoplay was running when the gesture began and has been paused
        paused_autoplay: bool,
    },
}

/// Horizontal drag progress
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragUpdate {
    pub delta_x: f32,
    pub delta_y: f32,
}

/// A finished gesture
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Release {
    pub delta_x: f32,
    pub paused_autoplay: bool,
}

/// Which neighbour a committed drag moves to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Prev,
    Next,
}

/// What a released drag does
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReleaseAction {
    /// Slide to the neighbour
    Commit(Direction),
    /// Return to the current slide over `speed_ms`
    SnapBack { speed_ms: u32 },
}

/// Pointer gesture state machine
#[derive(Debug)]
pub struct GestureTracker {
    state: GestureState,
}

impl Default for GestureTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureTracker {
    pub fn new() -> Self {
        Self {
            state: GestureState::Idle,
        }
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn is_tracking(&self) -> bool {
        matches!(self.state, GestureState::Tracking { .. })
    }

    /// Start tracking from a pointer-down position
    pub fn begin(&mut self, x: f32, y: f32, paused_autoplay: bool) {
        // A second down while tracking keeps the original pause
        let paused_autoplay = paused_autoplay
            || matches!(
                self.state,
                GestureState::Tracking {
                    paused_autoplay: true,
                    ..
                }
            );
        self.state = GestureState::Tracking {
            start_x: x,
            start_y: y,
            delta_x: 0.0,
            delta_y: 0.0,
            paused_autoplay,
        };
    }

    /// Record a pointer move
    ///
    /// Returns `None` when idle or when the move is mostly vertical.
    pub fn update(&mut self, x: f32, y: f32) -> Option<DragUpdate> {
        let GestureState::Tracking {
            start_x,
            start_y,
            delta_x,
            delta_y,
            ..
        } = &mut self.state
        else {
            return None;
        };

        *delta_x = x - *start_x;
        *delta_y = y - *start_y;

        if delta_x.abs() < delta_y.abs() {
            return None;
        }
        Some(DragUpdate {
            delta_x: *delta_x,
            delta_y: *delta_y,
        })
    }

    /// End tracking, returning the final delta
    pub fn finish(&mut self) -> Option<Release> {
        match std::mem::replace(&mut self.state, GestureState::Idle) {
            GestureState::Idle => None,
            GestureState::Tracking {
                delta_x,
                paused_autoplay,
                ..
            } => Some(Release {
                delta_x,
                paused_autoplay,
            }),
        }
    }

    /// Drop any gesture in progress
    pub fn reset(&mut self) {
        self.state = GestureState::Idle;
    }
}

/// Damped translate offset for a drag delta
///
/// Clamped one pixel short of a full step so the container never lands
/// exactly on a slide boundary, where the host may not report a transition
/// end.
pub fn drag_offset(delta_x: f32, resistance_factor: f32, step: f32) -> f32 {
    let limit = (step - 1.0).max(0.0);
    (delta_x * resistance_factor).clamp(-limit, limit)
}

/// Decide what a released drag does
///
/// A drag commits only when it crosses the threshold strictly and the
/// neighbour in that direction exists.
pub fn decide(
    delta_x: f32,
    step: f32,
    threshold_ratio: f32,
    speed_ms: u32,
    can_prev: bool,
    can_next: bool,
) -> ReleaseAction {
    let threshold = step * threshold_ratio;
    let snap_back = ReleaseAction::SnapBack {
        speed_ms: snap_back_speed(delta_x, step, speed_ms),
    };

    if delta_x > threshold {
        if can_prev {
            ReleaseAction::Commit(Direction::Prev)
        } else {
            snap_back
        }
    } else if delta_x < -threshold {
        if can_next {
            ReleaseAction::Commit(Direction::Next)
        } else {
            snap_back
        }
    } else {
        snap_back
    }
}

/// Duration proportional to the distance dragged
fn snap_back_speed(delta_x: f32, step: f32, speed_ms: u32) -> u32 {
    if step <= 0.0 {
        return 0;
    }
    (speed_ms as f32 * delta_x.abs() / step).ceil() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracking_lifecycle() {
        let mut tracker = GestureTracker::new();
        assert_eq!(tracker.update(10.0, 0.0), None);

        tracker.begin(100.0, 50.0, true);
        assert!(tracker.is_tracking());

        let update = tracker.update(40.0, 60.0).unwrap();
        assert_eq!(update.delta_x, -60.0);

        let release = tracker.finish().unwrap();
        assert_eq!(release.delta_x, -60.0);
        assert!(release.paused_autoplay);
        assert!(!tracker.is_tracking());
        assert_eq!(tracker.finish(), None);
    }

    #[test]
    fn test_vertical_moves_are_ignored() {
        let mut tracker = GestureTracker::new();
        tracker.begin(0.0, 0.0, false);
        assert_eq!(tracker.update(10.0, 30.0), None);
        // Equal magnitudes count as horizontal
        assert!(tracker.update(20.0, 20.0).is_some());
        // The delta is still recorded for the release decision
        tracker.update(5.0, 40.0);
        assert_eq!(tracker.finish().unwrap().delta_x, 5.0);
    }

    #[test]
    fn test_begin_resets_delta() {
        let mut tracker = GestureTracker::new();
        tracker.begin(0.0, 0.0, false);
        tracker.update(-200.0, 0.0);
        tracker.finish();

        tracker.begin(0.0, 0.0, false);
        assert_eq!(tracker.finish().unwrap().delta_x, 0.0);
    }

    #[test]
    fn test_drag_offset_applies_resistance_and_clamp() {
        // resistance 0.4 -> factor 0.6
        assert!((drag_offset(100.0, 0.6, 300.0) - 60.0).abs() < 1e-4);
        assert_eq!(drag_offset(1000.0, 0.6, 300.0), 299.0);
        assert_eq!(drag_offset(-1000.0, 0.6, 300.0), -299.0);
    }

    #[test]
    fn test_threshold_is_strict() {
        let at_threshold = decide(100.0, 200.0, 0.5, 500, true, true);
        assert_eq!(at_threshold, ReleaseAction::SnapBack { speed_ms: 250 });
        assert_eq!(
            decide(-100.0, 200.0, 0.5, 500, true, true),
            ReleaseAction::SnapBack { speed_ms: 250 }
        );

        assert_eq!(
            decide(101.0, 200.0, 0.5, 500, true, true),
            ReleaseAction::Commit(Direction::Prev)
        );
        assert_eq!(
            decide(-101.0, 200.0, 0.5, 500, true, true),
            ReleaseAction::Commit(Direction::Next)
        );
    }

    #[test]
    fn test_missing_neighbour_snaps_back() {
        assert_eq!(
            decide(150.0, 300.0, 0.4, 300, false, true),
            ReleaseAction::SnapBack { speed_ms: 150 }
        );
        assert_eq!(
            decide(-150.0, 300.0, 0.4, 300, true, false),
            ReleaseAction::SnapBack { speed_ms: 150 }
        );
    }
}
