//! Host trait - the environment a widget is embedded in

use slotmap::new_key_type;

use crate::error::Result;
use crate::style::StyleProperty;

new_key_type! {
    /// Handle to an element owned by a host
    ///
    /// Hosts backed by a real document map these handles to their own
    /// element references.
    pub struct NodeId;
}

/// Optional environment features
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capabilities {
    /// The host can report that a CSS transition finished on an element
    pub transition_end: bool,
    /// Pointer input arrives as touches rather than mouse events
    pub touch: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            transition_end: true,
            touch: false,
        }
    }
}

/// Groups of pointer events a widget can listen for on an element
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerListener {
    /// Pointer down / touch start
    Start,
    /// Pointer move / touch move
    Move,
    /// Pointer up, leave or cancel / touch end
    End,
}

impl PointerListener {
    pub const ALL: [PointerListener; 3] = [
        PointerListener::Start,
        PointerListener::Move,
        PointerListener::End,
    ];
}

/// Document operations a widget consumes
///
/// Queries are infallible and return nothing for unknown nodes; mutations
/// report unknown or misplaced nodes as errors.
pub trait Host {
    /// First descendant of `scope` matching `selector`, in document order
    fn query_selector(&self, scope: NodeId, selector: &str) -> Option<NodeId>;

    /// Every element in the document matching `selector`, in document order
    fn query_selector_all(&self, selector: &str) -> Vec<NodeId>;

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Element children of `node`, in order
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    /// Content-box width in pixels
    fn offset_width(&self, node: NodeId) -> f32;

    /// Assign an inline style property
    fn set_style(&mut self, node: NodeId, property: StyleProperty) -> Result<()>;

    fn add_class(&mut self, node: NodeId, class: &str) -> Result<()>;

    fn remove_class(&mut self, node: NodeId, class: &str) -> Result<()>;

    /// Move `node` under `parent`, directly before `reference`
    fn insert_before(&mut self, parent: NodeId, node: NodeId, reference: NodeId) -> Result<()>;

    /// Move `node` to the end of `parent`'s children
    fn append_child(&mut self, parent: NodeId, node: NodeId) -> Result<()>;

    fn capabilities(&self) -> Capabilities;

    /// Ask to be told once when the next transition on `node` ends
    ///
    /// The host delivers the notification by calling the widget's
    /// transition-end handler, at most once per arming.
    fn arm_transition_end(&mut self, node: NodeId) -> Result<()>;

    /// Withdraw a pending transition-end request
    fn disarm_transition_end(&mut self, node: NodeId);

    /// Start forwarding a group of pointer events on `node`
    fn listen(&mut self, node: NodeId, listener: PointerListener) -> Result<()>;

    /// Stop forwarding a group of pointer events on `node`
    fn unlisten(&mut self, node: NodeId, listener: PointerListener);
}
