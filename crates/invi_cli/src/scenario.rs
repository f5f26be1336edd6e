//! Scenario files
//!
//! A scenario describes a page and a script of interactions:
//!
//! ```toml
//! slides = 4
//! width = 320
//! indicators = 4
//!
//! [carousel]
//! continuous = true
//! speed = 300
//! classes = { active = "current", indicatorActive = "on" }
//! selectors = { indicator = ".dot" }
//!
//! [[step]]
//! action = "next"
//!
//! [[step]]
//! action = "drag"
//! dx = -180
//!
//! [[step]]
//! action = "wait"
//! ms = 5000
//! ```

use anyhow::{Context, Result};
use invi_carousel::CarouselOptions;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// A page plus the interactions to play against it
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    /// Number of `<li>` slides
    #[serde(default = "default_slides")]
    pub slides: usize,
    /// Container width in pixels
    #[serde(default = "default_width")]
    pub width: f32,
    /// Number of `<span class="dot">` indicators placed outside the carousel
    #[serde(default)]
    pub indicators: usize,
    /// Whether the host reports transition end; without it every move is
    /// instantaneous
    #[serde(default = "default_true")]
    pub transitions: bool,
    /// Complete each transition once its duration has elapsed
    #[serde(default = "default_true")]
    pub auto_settle: bool,
    /// Carousel options, same keys as a configuration file
    #[serde(default)]
    pub carousel: CarouselOptions,
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

fn default_slides() -> usize {
    3
}

fn default_width() -> f32 {
    320.0
}

fn default_true() -> bool {
    true
}

/// One scripted interaction
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum Step {
    Next,
    Prev,
    /// Move to an original slide index
    Slide { index: usize },
    /// Press, move by (`dx`, `dy`) and release
    Drag {
        dx: f32,
        #[serde(default)]
        dy: f32,
        /// Use touch input instead of the mouse
        #[serde(default)]
        touch: bool,
    },
    /// Let virtual time pass
    Wait { ms: u64 },
    Start,
    Stop,
    /// Complete the running transition now
    TransitionEnd,
    /// Resize the container and re-measure
    Refresh {
        #[serde(default)]
        width: Option<f32>,
    },
}

impl Scenario {
    pub fn parse(source: &str) -> Result<Self> {
        toml::from_str(source).context("Failed to parse scenario")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let scenario: Scenario = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(scenario)
    }
}
