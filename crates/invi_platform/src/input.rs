//! Pointer input events forwarded by the host

use crate::host::PointerListener;

/// Pointer device family
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum PointerKind {
    #[default]
    Mouse,
    Touch,
}

/// Pointer event phase
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerPhase {
    /// Button pressed / finger down
    Down,
    /// Pointer moved
    Move,
    /// Button released / finger lifted
    Up,
    /// Gesture cancelled by the system
    Cancel,
    /// Mouse left the element
    Leave,
}

/// A single pointer event in page coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub kind: PointerKind,
    /// X position in page coordinates
    pub x: f32,
    /// Y position in page coordinates
    pub y: f32,
    /// Simultaneous contact points (always 1 for a mouse)
    pub contacts: u32,
}

impl PointerEvent {
    pub fn mouse(phase: PointerPhase, x: f32, y: f32) -> Self {
        Self {
            phase,
            kind: PointerKind::Mouse,
            x,
            y,
            contacts: 1,
        }
    }

    pub fn touch(phase: PointerPhase, x: f32, y: f32, contacts: u32) -> Self {
        Self {
            phase,
            kind: PointerKind::Touch,
            x,
            y,
            contacts,
        }
    }

    /// More than one finger on the surface
    pub fn is_multi_touch(&self) -> bool {
        self.contacts > 1
    }

    /// The listener group this event is delivered through
    ///
    /// Returns `None` for a touch `Leave`, which touch surfaces never deliver
    /// as a gesture end.
    pub fn listener(&self) -> Option<PointerListener> {
        match (self.phase, self.kind) {
            (PointerPhase::Down, _) => Some(PointerListener::Start),
            (PointerPhase::Move, _) => Some(PointerListener::Move),
            (PointerPhase::Up | PointerPhase::Cancel, _) => Some(PointerListener::End),
            (PointerPhase::Leave, PointerKind::Mouse) => Some(PointerListener::End),
            (PointerPhase::Leave, PointerKind::Touch) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listener_groups() {
        let leave = PointerEvent::mouse(PointerPhase::Leave, 0.0, 0.0);
        assert_eq!(leave.listener(), Some(PointerListener::End));

        let touch_leave = PointerEvent::touch(PointerPhase::Leave, 0.0, 0.0, 1);
        assert_eq!(touch_leave.listener(), None);

        let cancel = PointerEvent::touch(PointerPhase::Cancel, 0.0, 0.0, 0);
        assert_eq!(cancel.listener(), Some(PointerListener::End));
    }

    #[test]
    fn test_multi_touch() {
        assert!(PointerEvent::touch(PointerPhase::Move, 1.0, 1.0, 2).is_multi_touch());
        assert!(!PointerEvent::mouse(PointerPhase::Move, 1.0, 1.0).is_multi_touch());
    }
}
