//! Invi Core
//!
//! Host-independent primitives shared by every Invi widget:
//!
//! - **Event Emitter**: type-keyed publish/subscribe with wildcard listeners
//! - **Configuration**: type-checked recursive merging of partial settings onto
//!   per-widget-type defaults held in a [`ConfigRegistry`]
//! - **Task Queue**: cooperative "next tick" deferral and virtual-clock timers
//! - **Transition Gate**: the busy flag plus one-shot completion slot every
//!   animated state change goes through
//!
//! # Example
//!
//! ```rust
//! use invi_core::emitter::{EventEmitter, Topic};
//!
//! let mut emitter: EventEmitter<&'static str, u32> = EventEmitter::new();
//! let id = emitter.on("change", |value| println!("changed to {value}"));
//! emitter.on(Topic::Any, |_| println!("something happened"));
//!
//! assert_eq!(emitter.emit(&"change", &3), 2);
//! assert!(emitter.off("change", id));
//! ```

pub mod config;
pub mod emitter;
pub mod tasks;
pub mod transition;

pub use config::{
    decode_json, decode_toml, merge_defaults, ConfigError, ConfigRegistry, Configurable, JsonKind,
};
pub use emitter::{EventEmitter, ListenerId, Topic};
pub use tasks::{TaskQueue, TimerId};
pub use transition::{GatePhase, TransitionGate};
