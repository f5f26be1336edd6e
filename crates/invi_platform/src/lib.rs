//! Invi Platform Abstraction Layer
//!
//! Widgets never touch a concrete document. Everything they need from their
//! environment goes through the [`Host`] trait:
//!
//! - element queries by selector, parent/child traversal, width measurement
//! - inline style assignment ([`StyleProperty`]) and class membership
//! - child reordering (insert-before, append)
//! - arming a one-shot transition-end notification on an element
//! - binding pointer listeners, whose events the host forwards as
//!   [`PointerEvent`]s
//!
//! # Implementations
//!
//! - [`HeadlessDocument`] - in-memory document for tests, simulation and
//!   server-side use
//!
//! # Example
//!
//! ```rust
//! use invi_platform::{HeadlessDocument, Host};
//!
//! let mut doc = HeadlessDocument::new();
//! let list = doc.create_element("ul");
//! let body = doc.body();
//! doc.append_child(body, list).unwrap();
//!
//! assert_eq!(doc.query_selector(body, "ul"), Some(list));
//! ```

mod error;
mod headless;
mod host;
mod input;
mod selector;
mod style;

pub use error::{PlatformError, Result};
pub use headless::HeadlessDocument;
pub use host::{Capabilities, Host, NodeId, PointerListener};
pub use input::{PointerEvent, PointerKind, PointerPhase};
pub use selector::Selector;
pub use style::StyleProperty;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{PlatformError, Result};
    pub use crate::headless::HeadlessDocument;
    pub use crate::host::{Capabilities, Host, NodeId, PointerListener};
    pub use crate::input::{PointerEvent, PointerKind, PointerPhase};
    pub use crate::style::StyleProperty;
}
