//! Carousel engine
//!
//! A [`Carousel`] lays the slides found under a root element side by side in
//! their container and moves between them by translating the container. All
//! state changes follow the transition-gate protocol from `invi_core`: one
//! move at a time, finalized either immediately (speed 0) or when the host
//! reports that the container's transition ended.
//!
//! The carousel never runs on its own. The host drives it by forwarding
//! pointer events ([`handle_pointer`](Carousel::handle_pointer)),
//! transition-end notifications
//! ([`handle_transition_end`](Carousel::handle_transition_end)) and elapsed
//! time ([`tick`](Carousel::tick)). Event emission is deferred to the next
//! tick, so listeners always run after the call that caused them returned.
//!
//! # Example
//!
//! ```rust,ignore
//! use invi_carousel::prelude::*;
//!
//! let mut carousel = Carousel::new(document, root, &CarouselOptions::new().continuous(true))?;
//! carousel.on(CarouselEventKind::SlideChange, |event| println!("{event:?}"));
//!
//! let mut outcome = carousel.next();
//! // ... host finishes the transition ...
//! carousel.handle_transition_end();
//! carousel.flush();
//! assert_eq!(outcome.try_outcome(), Some(true));
//! ```

use std::time::Duration;

use invi_core::{
    ConfigError, ConfigRegistry, EventEmitter, ListenerId, TaskQueue, Topic, TransitionGate,
};
use invi_platform::{Host, NodeId, PointerEvent, PointerListener, StyleProperty};
use smallvec::SmallVec;
use tokio::sync::oneshot;
use tracing::{debug, trace, warn};

use crate::autoplay::Autoplay;
use crate::config::{CarouselConfig, CarouselOptions, CarouselSettings};
use crate::error::{CarouselError, Result};
use crate::event::{CarouselEvent, CarouselEventKind};
use crate::gesture::{decide, drag_offset, Direction, GestureTracker, ReleaseAction};
use crate::outcome::MoveOutcome;
use crate::ring::{Ring, Rotation};

/// Continuation run after a move settled and its `slideChange` went out
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AfterMove {
    /// A drag paused autoplay; start it again
    ResumeAutoplay,
    /// An autoplay advance finished; arm the next one
    AutoplayReschedule,
}

#[derive(Debug)]
enum Task {
    Emit(CarouselEvent),
    After(AfterMove),
    AutoplayAdvance,
}

/// Finalization payload parked in the gate while a transition runs
#[derive(Debug)]
struct Settle {
    /// Ring position that becomes current
    next: usize,
    rotation: Option<Rotation>,
    /// Original index of the slide the move started from
    previous: usize,
    sender: oneshot::Sender<bool>,
    after: Option<AfterMove>,
}

/// Whether a pointer event was consumed by the carousel
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerDisposition {
    /// Not for the carousel right now; the host keeps its default handling
    Ignored,
    /// Consumed; the host should suppress its default handling
    Handled,
}

impl PointerDisposition {
    pub fn is_handled(self) -> bool {
        self == PointerDisposition::Handled
    }
}

fn report(result: invi_platform::Result<()>, action: &str) {
    if let Err(err) = result {
        warn!("carousel could not {}: {}", action, err);
    }
}

/// Gesture-driven slide carousel over a [`Host`] document
pub struct Carousel<H: Host> {
    host: H,
    root: NodeId,
    config: CarouselConfig,
    /// Parent of the slides; set by [`setup`](Self::setup)
    container: Option<NodeId>,
    ring: Ring,
    indicators: Vec<NodeId>,
    /// Slide width in pixels
    step: f32,
    /// Ring position of the visible slide
    current: usize,
    gate: TransitionGate<Settle>,
    gesture: GestureTracker,
    autoplay: Autoplay,
    tasks: TaskQueue<Task>,
    events: EventEmitter<CarouselEventKind, CarouselEvent>,
}

impl<H: Host> Carousel<H> {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Build a carousel over the slides under `root`, resolving `options`
    /// against the process-wide defaults
    pub fn new(host: H, root: NodeId, options: &CarouselOptions) -> Result<Self> {
        let registry = ConfigRegistry::<CarouselSettings>::global();
        Self::with_registry(host, root, options, &registry)
    }

    /// Like [`new`](Self::new), resolving against a specific registry
    pub fn with_registry(
        host: H,
        root: NodeId,
        options: &CarouselOptions,
        registry: &ConfigRegistry<CarouselSettings>,
    ) -> Result<Self> {
        let settings = registry.resolve(&options.to_value())?;
        let config = CarouselConfig::from_settings(&settings, host.capabilities());
        Self::with_config(host, root, config)
    }

    /// Build from an already-normalized configuration
    pub fn with_config(host: H, root: NodeId, config: CarouselConfig) -> Result<Self> {
        let indicators = match &config.indicator_selector {
            Some(selector) => host.query_selector_all(selector),
            None => Vec::new(),
        };

        let mut carousel = Self {
            host,
            root,
            config,
            container: None,
            ring: Ring::default(),
            indicators,
            step: 0.0,
            current: 0,
            gate: TransitionGate::new(),
            gesture: GestureTracker::new(),
            autoplay: Autoplay::default(),
            tasks: TaskQueue::new(),
            events: EventEmitter::new(),
        };

        carousel.setup()?;
        if carousel.config.autoplay {
            carousel.start();
        }
        Ok(carousel)
    }

    /// Change the process-wide defaults used by later [`new`](Self::new) calls
    ///
    /// Returns the resulting defaults. Existing instances are unaffected.
    pub fn configure(options: &CarouselOptions) -> std::result::Result<CarouselSettings, ConfigError> {
        ConfigRegistry::<CarouselSettings>::global().configure(&options.to_value())
    }

    // =========================================================================
    // Layout
    // =========================================================================

    /// Measure, lay out slides, rebuild the ring and show the initial slide
    ///
    /// Any move or drag in progress is abandoned; its outcome resolves to
    /// `false`.
    pub fn setup(&mut self) -> Result<()> {
        let first = self
            .host
            .query_selector(self.root, &self.config.item_selector)
            .ok_or_else(|| CarouselError::NoItems {
                selector: self.config.item_selector.clone(),
            })?;
        let container = self.host.parent(first).ok_or(CarouselError::Detached)?;

        self.abandon_move();
        self.abandon_gesture();
        self.clear_highlight();

        let width = self.host.offset_width(container);
        let children = self.host.children(container);
        for &child in &children {
            self.host.set_style(child, StyleProperty::Width(width))?;
            self.host.set_style(child, StyleProperty::FloatLeft)?;
        }
        self.host
            .set_style(container, StyleProperty::OverflowHidden)?;
        self.host.set_style(
            container,
            StyleProperty::Width(width * children.len() as f32),
        )?;

        if self.container != Some(container) {
            if let Some(previous) = self.container.take() {
                self.unbind(previous);
            }
            self.host.listen(container, PointerListener::Start)?;
        }
        self.container = Some(container);

        debug!(
            "carousel setup: {} slides, {}px wide",
            children.len(),
            width
        );
        self.ring = Ring::new(children);
        self.step = width;
        self.current = 0;

        let _ = self.move_to(self.config.initial_index, 0, None);
        Ok(())
    }

    /// Re-measure after the host layout changed
    pub fn refresh(&mut self) -> Result<()> {
        self.setup()
    }

    fn abandon_move(&mut self) {
        if let Some(settle) = self.gate.cancel() {
            debug!("carousel abandoned a move toward slot {}", settle.next);
            if let Some(container) = self.container {
                self.host.disarm_transition_end(container);
            }
        }
    }

    fn abandon_gesture(&mut self) {
        if self.gesture.is_tracking() {
            self.gesture.reset();
            if let Some(container) = self.container {
                self.host.unlisten(container, PointerListener::Move);
                self.host.unlisten(container, PointerListener::End);
            }
        }
    }

    /// Drop the active classes from the slide and indicator currently shown
    fn clear_highlight(&mut self) {
        let previous = self.original_at(self.current);
        if let (Some(class), Some(item)) =
            (self.config.active_class.as_deref(), self.ring.get(self.current))
        {
            report(
                self.host.remove_class(item.element, class),
                "clear the active slide",
            );
        }
        if let (Some(class), Some(&indicator)) = (
            self.config.indicator_active_class.as_deref(),
            self.indicators.get(previous),
        ) {
            report(
                self.host.remove_class(indicator, class),
                "clear the active indicator",
            );
        }
    }

    fn unbind(&mut self, container: NodeId) {
        for listener in PointerListener::ALL {
            self.host.unlisten(container, listener);
        }
        self.host.disarm_transition_end(container);
    }

    fn is_continuous(&self) -> bool {
        self.config.continuous && self.ring.len() > 2
    }

    fn original_at(&self, position: usize) -> usize {
        self.ring
            .get(position)
            .map_or(0, |item| item.original_index)
    }

    /// Move the container so the slot at `distance` pixels is in view
    fn translate(&mut self, distance: f32, speed_ms: u32) {
        let Some(container) = self.container else {
            return;
        };
        report(
            self.host
                .set_style(container, StyleProperty::TranslateX((-distance) as i32)),
            "translate the container",
        );
        report(
            self.host
                .set_style(container, StyleProperty::TransitionDuration(speed_ms)),
            "set the transition duration",
        );
    }

    fn update_indicators(&mut self, previous: usize, upcoming: usize) {
        let Some(class) = self.config.indicator_active_class.as_deref() else {
            return;
        };
        if let Some(&indicator) = self.indicators.get(previous) {
            report(
                self.host.remove_class(indicator, class),
                "clear the active indicator",
            );
        }
        if let Some(&indicator) = self.indicators.get(upcoming) {
            report(
                self.host.add_class(indicator, class),
                "mark the active indicator",
            );
        }
    }

    /// Bring the container's children in line with the ring order
    fn sync_order(&mut self) {
        let Some(container) = self.container else {
            return;
        };
        let dom = self.host.children(container);
        let ring: SmallVec<[NodeId; 8]> = self.ring.elements().collect();
        if dom.as_slice() == ring.as_slice() {
            return;
        }

        let n = dom.len();
        let same_len = n == ring.len() && n > 1;
        let result = if same_len && dom[n - 1] == ring[0] && dom[..n - 1] == ring[1..] {
            // Last slide moved to the front
            self.host.insert_before(container, dom[n - 1], dom[0])
        } else if same_len && dom[0] == ring[n - 1] && dom[1..] == ring[..n - 1] {
            // First slide moved to the back
            self.host.append_child(container, dom[0])
        } else {
            ring.iter()
                .try_for_each(|&element| self.host.append_child(container, element))
        };
        report(result, "reorder slides");
    }

    // =========================================================================
    // Moves
    // =========================================================================

    fn reject(&mut self, after: Option<AfterMove>) -> MoveOutcome {
        if let Some(after) = after {
            self.tasks.defer(Task::After(after));
        }
        MoveOutcome::rejected()
    }

    /// Move to ring position `to`
    fn move_to(&mut self, to: usize, speed_ms: u32, after: Option<AfterMove>) -> MoveOutcome {
        let size = self.ring.len();
        let Some(container) = self.container else {
            return self.reject(after);
        };
        if to >= size || !self.gate.begin() {
            return self.reject(after);
        }

        let previous = self.original_at(self.current);
        if let (Some(class), Some(item)) =
            (self.config.active_class.as_deref(), self.ring.get(self.current))
        {
            report(
                self.host.remove_class(item.element, class),
                "clear the active slide",
            );
        }

        let (next, rotation) = if self.is_continuous() && to == 0 {
            self.ring.rotate(Rotation::Backward);
            (1, Some(Rotation::Backward))
        } else if self.is_continuous() && to == size - 1 {
            self.ring.rotate(Rotation::Forward);
            (size - 2, Some(Rotation::Forward))
        } else {
            (to, None)
        };

        let upcoming = self.original_at(next);
        debug!(
            "carousel move {} -> {} (slot {}, {}ms)",
            previous, upcoming, to, speed_ms
        );
        self.update_indicators(previous, upcoming);
        self.tasks.defer(Task::Emit(CarouselEvent::Slide {
            current: previous,
            next: upcoming,
        }));
        self.translate(to as f32 * self.step, speed_ms);

        let (outcome, sender) = MoveOutcome::pending();
        let settle = Settle {
            next,
            rotation,
            previous,
            sender,
            after,
        };
        if speed_ms == 0 {
            self.settle(settle);
            return outcome;
        }
        match self.host.arm_transition_end(container) {
            Ok(()) => self.gate.await_signal(settle),
            Err(err) => {
                warn!("carousel finishing without a transition: {}", err);
                self.settle(settle);
            }
        }
        outcome
    }

    fn settle(&mut self, settle: Settle) {
        let Settle {
            next,
            rotation,
            previous,
            sender,
            after,
        } = settle;

        if let (Some(class), Some(item)) =
            (self.config.active_class.as_deref(), self.ring.get(next))
        {
            report(
                self.host.add_class(item.element, class),
                "mark the active slide",
            );
        }
        if let Some(rotation) = rotation {
            trace!("carousel rotated {:?}", rotation);
            self.sync_order();
            self.translate(next as f32 * self.step, 0);
        }

        self.current = next;
        self.gate.finish();
        let _ = sender.send(true);

        let current = self.original_at(next);
        debug!("carousel settled on slide {}", current);
        self.tasks
            .defer(Task::Emit(CarouselEvent::SlideChange { current, previous }));
        if let Some(after) = after {
            self.tasks.defer(Task::After(after));
        }
    }

    /// The host reports that the container's transition ended
    ///
    /// Returns `false` when no move was waiting for it.
    pub fn handle_transition_end(&mut self) -> bool {
        let Some(settle) = self.gate.signal() else {
            return false;
        };
        if let Some(container) = self.container {
            self.host.disarm_transition_end(container);
        }
        self.settle(settle);
        true
    }

    /// Move to the slide with the given original index
    pub fn slide(&mut self, index: usize) -> MoveOutcome {
        if self.gate.is_busy() {
            return MoveOutcome::rejected();
        }
        match self.ring.position_of(index) {
            Some(position) => self.move_to(position, self.config.speed_ms, None),
            None => MoveOutcome::rejected(),
        }
    }

    /// Move to the next slide
    pub fn next(&mut self) -> MoveOutcome {
        self.advance(Direction::Next, None)
    }

    /// Move to the previous slide
    pub fn prev(&mut self) -> MoveOutcome {
        self.advance(Direction::Prev, None)
    }

    fn advance(&mut self, direction: Direction, after: Option<AfterMove>) -> MoveOutcome {
        let size = self.ring.len();
        if size == 0 {
            return self.reject(after);
        }
        // Rings too small to rotate wrap around instead
        let target = match direction {
            Direction::Next if size < 3 && self.current == size - 1 => Some(0),
            Direction::Next => Some(self.current + 1),
            Direction::Prev if size < 3 && self.current == 0 => Some(size - 1),
            Direction::Prev => self.current.checked_sub(1),
        };
        match target {
            Some(to) => self.move_to(to, self.config.speed_ms, after),
            None => self.reject(after),
        }
    }

    // =========================================================================
    // Autoplay
    // =========================================================================

    /// Start advancing every `delay`
    ///
    /// Does nothing if already running or with fewer than three slides.
    pub fn start(&mut self) {
        if self.autoplay.is_running() || self.ring.len() < 3 {
            return;
        }
        self.stop();
        self.autoplay.run();
        self.arm_autoplay();
        debug!("carousel autoplay started ({:?})", self.config.delay);
    }

    /// Stop autoplay, cancelling the pending advance
    pub fn stop(&mut self) {
        if self.autoplay.is_running() {
            debug!("carousel autoplay stopped");
        }
        self.autoplay.stop(&mut self.tasks);
    }

    fn arm_autoplay(&mut self) {
        self.autoplay
            .arm(&mut self.tasks, self.config.delay, Task::AutoplayAdvance);
    }

    // =========================================================================
    // Pointer input
    // =========================================================================

    /// Forward a pointer event from the container
    ///
    /// Events for listener groups the carousel has not bound, and every event
    /// while a move is in flight, are ignored.
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> PointerDisposition {
        if self.gate.is_busy() {
            return PointerDisposition::Ignored;
        }
        let Some(listener) = event.listener() else {
            return PointerDisposition::Ignored;
        };
        match listener {
            PointerListener::Start => self.pointer_down(event),
            PointerListener::Move if self.gesture.is_tracking() => self.pointer_move(event),
            PointerListener::End if self.gesture.is_tracking() => self.pointer_up(event),
            PointerListener::Move | PointerListener::End => PointerDisposition::Ignored,
        }
    }

    fn pointer_down(&mut self, event: &PointerEvent) -> PointerDisposition {
        let Some(container) = self.container else {
            return PointerDisposition::Ignored;
        };
        if event.is_multi_touch() {
            return PointerDisposition::Ignored;
        }

        let paused = self.autoplay.is_running();
        if paused {
            self.stop();
        }
        self.gesture.begin(event.x, event.y, paused);
        report(
            self.host.listen(container, PointerListener::Move),
            "listen for pointer moves",
        );
        report(
            self.host.listen(container, PointerListener::End),
            "listen for pointer release",
        );
        PointerDisposition::Handled
    }

    fn pointer_move(&mut self, event: &PointerEvent) -> PointerDisposition {
        if event.is_multi_touch() {
            return PointerDisposition::Ignored;
        }
        let Some(update) = self.gesture.update(event.x, event.y) else {
            return PointerDisposition::Ignored;
        };

        let offset = drag_offset(update.delta_x, self.config.resistance_factor, self.step);
        trace!("carousel drag {} (offset {})", update.delta_x, offset);
        self.translate(self.current as f32 * self.step - offset, 0);
        PointerDisposition::Handled
    }

    fn pointer_up(&mut self, event: &PointerEvent) -> PointerDisposition {
        let Some(release) = self.gesture.finish() else {
            return PointerDisposition::Ignored;
        };
        if let Some(container) = self.container {
            self.host.unlisten(container, PointerListener::Move);
            self.host.unlisten(container, PointerListener::End);
        }

        let continuous = self.is_continuous();
        let can_prev = continuous || self.current > 0;
        let can_next = continuous || self.current + 1 < self.ring.len();
        let action = decide(
            release.delta_x,
            self.step,
            self.config.threshold_ratio,
            self.config.speed_ms,
            can_prev,
            can_next,
        );
        debug!(
            "carousel release ({:?}) after {}px: {:?}",
            event.phase, release.delta_x, action
        );

        let after = release
            .paused_autoplay
            .then_some(AfterMove::ResumeAutoplay);
        match action {
            ReleaseAction::Commit(direction) => {
                let _ = self.advance(direction, after);
            }
            ReleaseAction::SnapBack { speed_ms } => {
                self.translate(self.current as f32 * self.step, speed_ms);
                if release.paused_autoplay {
                    self.start();
                }
            }
        }
        PointerDisposition::Handled
    }

    // =========================================================================
    // Time
    // =========================================================================

    /// Advance the virtual clock by `elapsed`, running deferred work and
    /// every timer that falls due on the way
    pub fn tick(&mut self, elapsed: Duration) {
        let until = self.tasks.now() + elapsed;
        loop {
            while let Some(task) = self.tasks.pop_deferred() {
                self.run(task);
            }
            match self.tasks.pop_due(until) {
                Some(task) => self.run(task),
                None => break,
            }
        }
        self.tasks.advance_to(until);
    }

    /// Run deferred work without advancing the clock
    pub fn flush(&mut self) {
        self.tick(Duration::ZERO);
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.tasks.now()
    }

    /// Due time of the next autoplay advance
    pub fn next_timer(&self) -> Option<Duration> {
        self.tasks.next_due()
    }

    fn run(&mut self, task: Task) {
        match task {
            Task::Emit(event) => {
                self.events.emit(&event.kind(), &event);
            }
            Task::After(AfterMove::ResumeAutoplay) => self.start(),
            Task::After(AfterMove::AutoplayReschedule) => self.arm_autoplay(),
            Task::AutoplayAdvance => {
                self.autoplay.fired();
                trace!("carousel autoplay tick at {:?}", self.tasks.now());
                let _ = self.advance(Direction::Next, Some(AfterMove::AutoplayReschedule));
            }
        }
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Register a listener for one event kind, or [`Topic::Any`]
    pub fn on<F>(&mut self, topic: impl Into<Topic<CarouselEventKind>>, handler: F) -> ListenerId
    where
        F: FnMut(&CarouselEvent) + Send + 'static,
    {
        self.events.on(topic, handler)
    }

    /// Remove a listener; `false` if it was not registered under `topic`
    pub fn off(&mut self, topic: impl Into<Topic<CarouselEventKind>>, id: ListenerId) -> bool {
        self.events.off(topic, id)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Original index of the visible slide
    pub fn current(&self) -> usize {
        self.original_at(self.current)
    }

    /// Ring position of the visible slide
    pub fn current_position(&self) -> usize {
        self.current
    }

    /// Number of slides
    pub fn size(&self) -> usize {
        self.ring.len()
    }

    /// Original indices in ring order
    pub fn order(&self) -> Vec<usize> {
        self.ring.original_order()
    }

    /// A move is in flight
    pub fn is_busy(&self) -> bool {
        self.gate.is_busy()
    }

    /// Autoplay is running
    pub fn is_running(&self) -> bool {
        self.autoplay.is_running()
    }

    /// A drag is being tracked
    pub fn is_dragging(&self) -> bool {
        self.gesture.is_tracking()
    }

    pub fn config(&self) -> &CarouselConfig {
        &self.config
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn container(&self) -> Option<NodeId> {
        self.container
    }

    pub fn indicators(&self) -> &[NodeId] {
        &self.indicators
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable host access for drivers; layout changes need a
    /// [`refresh`](Self::refresh) to take effect
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Tear down and hand the host back
    ///
    /// Unbinds every pointer listener, drops event listeners, stops autoplay
    /// and discards pending events. A move in flight resolves to `false`.
    /// Styles and classes applied so far stay in place.
    pub fn destroy(mut self) -> H {
        if let Some(container) = self.container.take() {
            self.unbind(container);
        }
        self.events.remove_all_listeners();
        self.stop();
        self.gate.cancel();
        self.gesture.reset();
        self.tasks.clear();
        debug!("carousel destroyed");
        self.host
    }
}

impl<H: Host> std::fmt::Debug for Carousel<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Carousel")
            .field("container", &self.container)
            .field("order", &self.ring.original_order())
            .field("current", &self.current)
            .field("phase", &self.gate.phase())
            .field("gesture", &self.gesture.state())
            .field("autoplay", &self.autoplay.is_running())
            .field("autoplay_armed", &self.autoplay.has_timer())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use invi_platform::{Capabilities, HeadlessDocument};
    use std::sync::{Arc, Mutex};

    fn document(count: usize) -> (HeadlessDocument, NodeId) {
        let mut doc = HeadlessDocument::new();
        let body = doc.body();
        let root = doc.append_new(body, "section").unwrap();
        let ul = doc.append_new(root, "ul").unwrap();
        doc.set_width(ul, 300.0).unwrap();
        for i in 0..count {
            let li = doc.append_new(ul, "li").unwrap();
            doc.set_text(li, &format!("slide {i}")).unwrap();
        }
        (doc, root)
    }

    fn carousel(count: usize, options: CarouselOptions) -> Carousel<HeadlessDocument> {
        let (doc, root) = document(count);
        let registry = ConfigRegistry::new();
        Carousel::with_registry(doc, root, &options, &registry).unwrap()
    }

    fn finish(carousel: &mut Carousel<HeadlessDocument>) -> bool {
        let Some(container) = carousel.container() else {
            return false;
        };
        carousel.host_mut().finish_transition(container) && carousel.handle_transition_end()
    }

    #[test]
    fn test_setup_lays_out_slides() {
        let carousel = carousel(3, CarouselOptions::new());
        let container = carousel.container().unwrap();
        let doc = carousel.host();

        assert_eq!(doc.style(container, "width"), Some("900px"));
        assert_eq!(doc.style(container, "overflow"), Some("hidden"));
        for child in doc.children(container) {
            assert_eq!(doc.style(child, "width"), Some("300px"));
            assert_eq!(doc.style(child, "float"), Some("left"));
        }
        assert_eq!(doc.style(container, "transform"), Some("translateX(0px)"));
        assert!(doc.is_listening(container, PointerListener::Start));
        assert!(!carousel.is_busy());
    }

    #[test]
    fn test_missing_items_is_an_error() {
        let mut doc = HeadlessDocument::new();
        let body = doc.body();
        let root = doc.append_new(body, "section").unwrap();
        let registry = ConfigRegistry::new();

        let result = Carousel::with_registry(doc, root, &CarouselOptions::new(), &registry);
        assert!(matches!(result, Err(CarouselError::NoItems { .. })));
    }

    #[test]
    fn test_move_waits_for_transition_end() {
        let mut carousel = carousel(3, CarouselOptions::new());
        let container = carousel.container().unwrap();

        let mut outcome = carousel.next();
        assert!(carousel.is_busy());
        assert_eq!(outcome.try_outcome(), None);
        assert_eq!(
            carousel.host().style(container, "transform"),
            Some("translateX(-300px)")
        );
        assert_eq!(
            carousel.host().style(container, "transition-duration"),
            Some("500ms")
        );

        assert!(finish(&mut carousel));
        assert_eq!(outcome.try_outcome(), Some(true));
        assert_eq!(carousel.current(), 1);
        assert!(!carousel.handle_transition_end());
    }

    #[test]
    fn test_busy_rejects_second_move() {
        let mut carousel = carousel(4, CarouselOptions::new());
        let _first = carousel.next();
        let mutations = carousel.host().mutation_count();

        let mut second = carousel.slide(3);
        assert_eq!(second.try_outcome(), Some(false));
        assert_eq!(carousel.host().mutation_count(), mutations);
    }

    #[test]
    fn test_events_are_deferred() {
        let mut carousel = carousel(3, CarouselOptions::new().speed(0));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        carousel.on(Topic::Any, move |event| sink.lock().unwrap().push(*event));

        let mut outcome = carousel.next();
        assert_eq!(outcome.try_outcome(), Some(true));
        assert!(seen.lock().unwrap().is_empty());

        carousel.flush();
        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                CarouselEvent::Slide {
                    current: 0,
                    next: 1
                },
                CarouselEvent::SlideChange {
                    current: 1,
                    previous: 0
                },
            ]
        );
    }

    #[test]
    fn test_without_transition_end_moves_are_synchronous() {
        let mut doc = HeadlessDocument::with_capabilities(Capabilities {
            transition_end: false,
            touch: true,
        });
        let body = doc.body();
        let root = doc.append_new(body, "div").unwrap();
        let ul = doc.append_new(root, "ul").unwrap();
        doc.set_width(ul, 100.0).unwrap();
        for _ in 0..3 {
            doc.append_new(ul, "li").unwrap();
        }
        let registry = ConfigRegistry::new();
        let mut carousel =
            Carousel::with_registry(doc, root, &CarouselOptions::new(), &registry).unwrap();

        assert_eq!(carousel.config().speed_ms, 0);
        let mut outcome = carousel.next();
        assert_eq!(outcome.try_outcome(), Some(true));
        assert!(!carousel.is_busy());
    }

    #[test]
    fn test_destroy_unbinds_and_resolves_pending_move() {
        let mut carousel = carousel(3, CarouselOptions::new().autoplay(true));
        let container = carousel.container().unwrap();
        let mut outcome = carousel.next();

        let doc = carousel.destroy();
        assert_eq!(doc.listener_count(), 0);
        assert!(!doc.is_armed(container));
        assert_eq!(outcome.try_outcome(), Some(false));
    }
}
