//! Shared fixture: a headless page with one carousel and a row of indicators
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use invi_carousel::prelude::*;
use invi_core::ConfigRegistry;

pub const WIDTH: f32 = 300.0;

pub type Log = Arc<Mutex<Vec<CarouselEvent>>>;

/// `<section><ul>` with `count` slides `<li>slide i</li>`, plus `count`
/// `<span class="dot">` indicators after the section
pub fn page(count: usize) -> (HeadlessDocument, NodeId) {
    let mut doc = HeadlessDocument::new();
    let body = doc.body();
    let root = doc.append_new(body, "section").unwrap();
    let list = doc.append_new(root, "ul").unwrap();
    doc.set_width(list, WIDTH).unwrap();
    for i in 0..count {
        let li = doc.append_new(list, "li").unwrap();
        doc.set_text(li, &format!("slide {i}")).unwrap();
    }
    let nav = doc.append_new(body, "nav").unwrap();
    for _ in 0..count {
        let dot = doc.append_new(nav, "span").unwrap();
        doc.add_class(dot, "dot").unwrap();
    }
    (doc, root)
}

/// Build a carousel against a private registry and drain the setup events
pub fn build(count: usize, options: CarouselOptions) -> Carousel<HeadlessDocument> {
    let (doc, root) = page(count);
    let registry = ConfigRegistry::new();
    let mut carousel = Carousel::with_registry(doc, root, &options, &registry).unwrap();
    carousel.flush();
    carousel
}

/// Collect every event the carousel emits from now on
pub fn record(carousel: &mut Carousel<HeadlessDocument>) -> Log {
    let log = Log::default();
    let sink = log.clone();
    carousel.on(Topic::Any, move |event| sink.lock().unwrap().push(*event));
    log
}

/// `(current, previous)` of each recorded `slideChange`
pub fn changes(log: &Log) -> Vec<(usize, usize)> {
    log.lock()
        .unwrap()
        .iter()
        .filter_map(|event| match event {
            CarouselEvent::SlideChange { current, previous } => Some((*current, *previous)),
            CarouselEvent::Slide { .. } => None,
        })
        .collect()
}

/// Play the browser: complete the running transition and notify the carousel
pub fn finish(carousel: &mut Carousel<HeadlessDocument>) -> bool {
    let container = carousel.container().unwrap();
    carousel.host_mut().finish_transition(container) && carousel.handle_transition_end()
}

pub fn transform(carousel: &Carousel<HeadlessDocument>) -> String {
    let container = carousel.container().unwrap();
    carousel
        .host()
        .style(container, "transform")
        .unwrap_or_default()
        .to_string()
}

pub fn duration(carousel: &Carousel<HeadlessDocument>) -> String {
    let container = carousel.container().unwrap();
    carousel
        .host()
        .style(container, "transition-duration")
        .unwrap_or_default()
        .to_string()
}

/// Slide texts in container order
pub fn texts(carousel: &Carousel<HeadlessDocument>) -> Vec<String> {
    let container = carousel.container().unwrap();
    carousel
        .host()
        .child_texts(container)
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Drag horizontally from x=200 by `dx` and release
pub fn drag(carousel: &mut Carousel<HeadlessDocument>, dx: f32) {
    carousel.handle_pointer(&PointerEvent::mouse(PointerPhase::Down, 200.0, 100.0));
    carousel.handle_pointer(&PointerEvent::mouse(PointerPhase::Move, 200.0 + dx, 100.0));
    carousel.handle_pointer(&PointerEvent::mouse(PointerPhase::Up, 200.0 + dx, 100.0));
}
