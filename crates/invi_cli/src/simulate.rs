//! Scenario playback
//!
//! Builds the scenario's page in a [`HeadlessDocument`], plays each step
//! against a carousel and writes one JSON object per emitted event, followed
//! by the final state.

use std::io::Write;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::{Context, Result};
use invi_carousel::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::scenario::{Scenario, Step};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EventLine {
    at_ms: u128,
    #[serde(flatten)]
    event: CarouselEvent,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StateLine {
    #[serde(rename = "type")]
    kind: &'static str,
    at_ms: u128,
    current: usize,
    order: Vec<usize>,
    busy: bool,
    running: bool,
}

/// Lay out the scenario's page; returns the document and the carousel root
pub fn build_page(scenario: &Scenario) -> Result<(HeadlessDocument, NodeId)> {
    let mut doc = HeadlessDocument::with_capabilities(Capabilities {
        transition_end: scenario.transitions,
        touch: false,
    });
    let body = doc.body();
    let root = doc.append_new(body, "section")?;
    let list = doc.append_new(root, "ul")?;
    doc.set_width(list, scenario.width)?;
    for i in 0..scenario.slides {
        let slide = doc.append_new(list, "li")?;
        doc.set_text(slide, &format!("slide {i}"))?;
    }

    let nav = doc.append_new(body, "nav")?;
    for _ in 0..scenario.indicators {
        let dot = doc.append_new(nav, "span")?;
        doc.add_class(dot, "dot")?;
    }
    Ok((doc, root))
}

/// Plays a scenario, writing event lines to `out`
pub struct Simulation<W: Write> {
    carousel: Carousel<HeadlessDocument>,
    events: mpsc::Receiver<CarouselEvent>,
    auto_settle: bool,
    out: W,
}

impl<W: Write> Simulation<W> {
    pub fn new(scenario: &Scenario, out: W) -> Result<Self> {
        let (doc, root) = build_page(scenario)?;
        let mut carousel = Carousel::new(doc, root, &scenario.carousel)
            .context("Failed to build the carousel")?;

        let (sender, events) = mpsc::channel();
        carousel.on(Topic::Any, move |event| {
            let _ = sender.send(*event);
        });

        let mut simulation = Self {
            carousel,
            events,
            auto_settle: scenario.auto_settle,
            out,
        };
        simulation.carousel.flush();
        simulation.drain()?;
        Ok(simulation)
    }

    /// Play every step, then write the final state
    pub fn run(&mut self, steps: &[Step]) -> Result<()> {
        for (i, step) in steps.iter().enumerate() {
            debug!("step {}: {:?}", i + 1, step);
            self.step(step)?;
        }
        self.write_state()
    }

    pub fn step(&mut self, step: &Step) -> Result<()> {
        match step {
            Step::Next => {
                let _ = self.carousel.next();
            }
            Step::Prev => {
                let _ = self.carousel.prev();
            }
            Step::Slide { index } => {
                let _ = self.carousel.slide(*index);
            }
            Step::Drag { dx, dy, touch } => self.drag(*dx, *dy, *touch),
            Step::Wait { ms } => return self.wait(Duration::from_millis(*ms)),
            Step::Start => self.carousel.start(),
            Step::Stop => self.carousel.stop(),
            Step::TransitionEnd => {
                self.end_transition();
            }
            Step::Refresh { width } => {
                if let (Some(width), Some(container)) = (width, self.carousel.container()) {
                    self.carousel.host_mut().set_width(container, *width)?;
                }
                self.carousel.refresh()?;
            }
        }

        self.carousel.flush();
        self.drain()?;
        if self.auto_settle {
            self.settle()?;
        }
        Ok(())
    }

    fn drag(&mut self, dx: f32, dy: f32, touch: bool) {
        let (x, y) = (200.0, 100.0);
        let event = |phase, x, y| {
            if touch {
                PointerEvent::touch(phase, x, y, 1)
            } else {
                PointerEvent::mouse(phase, x, y)
            }
        };
        self.carousel.handle_pointer(&event(PointerPhase::Down, x, y));
        self.carousel
            .handle_pointer(&event(PointerPhase::Move, x + dx, y + dy));
        self.carousel
            .handle_pointer(&event(PointerPhase::Up, x + dx, y + dy));
    }

    fn end_transition(&mut self) -> bool {
        let Some(container) = self.carousel.container() else {
            return false;
        };
        self.carousel.host_mut().finish_transition(container) && self.carousel.handle_transition_end()
    }

    /// Let the running transition play out for its duration, then complete it
    fn settle(&mut self) -> Result<()> {
        let Some(container) = self.carousel.container() else {
            return Ok(());
        };
        while self.carousel.host().is_armed(container) {
            let speed = Duration::from_millis(u64::from(self.carousel.config().speed_ms));
            self.carousel.tick(speed);
            self.end_transition();
            self.carousel.flush();
            self.drain()?;
        }
        Ok(())
    }

    fn wait(&mut self, total: Duration) -> Result<()> {
        let end = self.carousel.now() + total;
        loop {
            let now = self.carousel.now();
            if now >= end {
                break;
            }
            // Stop at each timer so events are stamped with the time they fired
            let until = self
                .carousel
                .next_timer()
                .filter(|due| *due > now && *due < end)
                .unwrap_or(end);
            self.carousel.tick(until - now);
            self.drain()?;
            if self.auto_settle {
                self.settle()?;
            }
        }
        Ok(())
    }

    fn drain(&mut self) -> Result<()> {
        let at_ms = self.carousel.now().as_millis();
        while let Ok(event) = self.events.try_recv() {
            let line = serde_json::to_string(&EventLine { at_ms, event })?;
            writeln!(self.out, "{line}")?;
        }
        Ok(())
    }

    fn write_state(&mut self) -> Result<()> {
        let state = StateLine {
            kind: "state",
            at_ms: self.carousel.now().as_millis(),
            current: self.carousel.current(),
            order: self.carousel.order(),
            busy: self.carousel.is_busy(),
            running: self.carousel.is_running(),
        };
        writeln!(self.out, "{}", serde_json::to_string(&state)?)?;
        info!(
            "simulation finished at {}ms on slide {}",
            state.at_ms, state.current
        );
        Ok(())
    }
}
