//! Carousel lifecycle events

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Event kinds a carousel emits
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CarouselEventKind {
    /// A move began
    Slide,
    /// A move settled
    SlideChange,
}

impl CarouselEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CarouselEventKind::Slide => "slide",
            CarouselEventKind::SlideChange => "slideChange",
        }
    }
}

impl fmt::Display for CarouselEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CarouselEventKind {
    type Err = UnknownEventKind;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "slide" => Ok(CarouselEventKind::Slide),
            "slideChange" => Ok(CarouselEventKind::SlideChange),
            _ => Err(UnknownEventKind(name.to_string())),
        }
    }
}

/// Returned when parsing an event name the carousel does not emit
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown carousel event `{0}`")]
pub struct UnknownEventKind(pub String);

/// Event payloads; indices are original (DOM discovery order) indices
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CarouselEvent {
    /// Emitted when a move begins
    Slide {
        /// Slide being left
        current: usize,
        /// Slide being moved to
        next: usize,
    },
    /// Emitted when a move settles
    SlideChange {
        /// Slide now shown
        current: usize,
        /// Slide shown before the move
        previous: usize,
    },
}

impl CarouselEvent {
    pub fn kind(&self) -> CarouselEventKind {
        match self {
            CarouselEvent::Slide { .. } => CarouselEventKind::Slide,
            CarouselEvent::SlideChange { .. } => CarouselEventKind::SlideChange,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_round_trip() {
        for kind in [CarouselEventKind::Slide, CarouselEventKind::SlideChange] {
            assert_eq!(kind.as_str().parse::<CarouselEventKind>(), Ok(kind));
        }
        assert!("*".parse::<CarouselEventKind>().is_err());
    }

    #[test]
    fn test_event_json_shape() {
        let event = CarouselEvent::SlideChange {
            current: 2,
            previous: 1,
        };
        assert_eq!(
            serde_json::to_value(event).unwrap(),
            serde_json::json!({ "type": "slideChange", "current": 2, "previous": 1 })
        );
    }
}
