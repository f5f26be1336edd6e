//! Invi Carousel
//!
//! A gesture-driven slide carousel on top of the Invi host abstraction.
//!
//! # Architecture
//!
//! 1. **Slide Engine**: the [`Carousel`] lays slides out side by side and
//!    moves between them through the transition-gate protocol, one move at a
//!    time. Every move returns a [`MoveOutcome`].
//!
//! 2. **Continuous Ring**: in loop mode the slide ring rotates by one
//!    position whenever a move lands on an edge slot, and the host's child
//!    order follows, so there is always a neighbour to slide toward.
//!
//! 3. **Gestures**: horizontal drags follow the pointer with resistance and
//!    commit to a neighbour once they cross the threshold; anything less snaps
//!    back.
//!
//! 4. **Autoplay**: a virtual-clock timer advances the carousel every
//!    `delay`, pausing while the user drags.
//!
//! `slide` and `slideChange` events are delivered through the
//! [`EventEmitter`](invi_core::EventEmitter) on the tick after the change.
//!
//! # Example
//!
//! ```rust
//! use invi_carousel::prelude::*;
//!
//! let mut doc = HeadlessDocument::new();
//! let body = doc.body();
//! let root = doc.append_new(body, "section").unwrap();
//! let list = doc.append_new(root, "ul").unwrap();
//! doc.set_width(list, 320.0).unwrap();
//! for _ in 0..3 {
//!     doc.append_new(list, "li").unwrap();
//! }
//!
//! let options = CarouselOptions::new().speed(0);
//! let mut carousel = Carousel::new(doc, root, &options).unwrap();
//! carousel.on(CarouselEventKind::SlideChange, |event| println!("{event:?}"));
//!
//! let mut outcome = carousel.next();
//! carousel.flush();
//! assert_eq!(outcome.try_outcome(), Some(true));
//! assert_eq!(carousel.current(), 1);
//! ```

mod autoplay;
pub mod carousel;
pub mod config;
pub mod error;
pub mod event;
pub mod gesture;
pub mod outcome;
pub mod ring;

pub use carousel::{Carousel, PointerDisposition};
pub use config::{
    CarouselConfig, CarouselOptions, CarouselSettings, ClassOptions, ClassSettings,
    SelectorOptions, SelectorSettings,
};
pub use error::{CarouselError, Result};
pub use event::{CarouselEvent, CarouselEventKind, UnknownEventKind};
pub use gesture::{Direction, GestureState, GestureTracker, ReleaseAction};
pub use outcome::MoveOutcome;
pub use ring::{Item, Ring, Rotation};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::carousel::{Carousel, PointerDisposition};
    pub use crate::config::{CarouselOptions, CarouselSettings};
    pub use crate::error::{CarouselError, Result};
    pub use crate::event::{CarouselEvent, CarouselEventKind};
    pub use crate::outcome::MoveOutcome;
    pub use invi_core::Topic;
    pub use invi_platform::prelude::*;
}
