//! Carousel configuration
//!
//! Three layers:
//!
//! - [`CarouselOptions`] - what a caller passes: every field optional
//! - [`CarouselSettings`] - the complete user-facing form kept as the
//!   per-type defaults in a [`ConfigRegistry`](invi_core::ConfigRegistry)
//! - [`CarouselConfig`] - the immutable, normalized values one instance runs
//!   with, after host capabilities are taken into account

use std::time::Duration;

use invi_core::{ConfigError, Configurable};
use invi_platform::Capabilities;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// Settings (registry form)
// =============================================================================

/// Element discovery selectors
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SelectorSettings {
    /// Selects one slide; the first match's parent becomes the container
    pub item: String,
    /// Selects the indicators, document-wide
    pub indicator: Option<String>,
}

impl Default for SelectorSettings {
    fn default() -> Self {
        Self {
            item: "li".to_string(),
            indicator: None,
        }
    }
}

/// Class names toggled on slides and indicators
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClassSettings {
    /// Applied to the current slide
    pub active: Option<String>,
    /// Applied to the current indicator
    pub indicator_active: Option<String>,
}

/// Complete user-facing carousel settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CarouselSettings {
    pub selectors: SelectorSettings,
    pub classes: ClassSettings,
    /// Slide duration in ms
    pub speed: u32,
    /// Loop mode
    pub continuous: bool,
    /// Fraction of a slide width a drag must cross to commit (0-1)
    pub threshold: f64,
    /// Drag resistance (0-1), larger resists more
    pub resistance: f64,
    /// Slide shown after setup
    pub index: usize,
    /// Autoplay
    pub auto: bool,
    /// Autoplay delay in ms
    pub delay: u64,
}

impl Default for CarouselSettings {
    fn default() -> Self {
        Self {
            selectors: SelectorSettings::default(),
            classes: ClassSettings::default(),
            speed: 500,
            continuous: false,
            threshold: 0.4,
            resistance: 0.4,
            index: 0,
            auto: false,
            delay: 4000,
        }
    }
}

fn is_ratio(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}

impl Configurable for CarouselSettings {
    fn sanitize(&mut self, fallback: &Self) {
        if self.auto {
            self.continuous = true;
        }
        if !is_ratio(self.threshold) {
            tracing::warn!(
                "threshold {} out of range, using {}",
                self.threshold,
                fallback.threshold
            );
            self.threshold = fallback.threshold;
        }
        if !is_ratio(self.resistance) {
            tracing::warn!(
                "resistance {} out of range, using {}",
                self.resistance,
                fallback.resistance
            );
            self.resistance = fallback.resistance;
        }
        // Indicators need both a selector and a class to be useful
        if self.selectors.indicator.is_none() || self.classes.indicator_active.is_none() {
            self.selectors.indicator = None;
            self.classes.indicator_active = None;
        }
    }
}

// =============================================================================
// Options (partial form)
// =============================================================================

/// Partial selector overrides
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectorOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indicator: Option<String>,
}

/// Partial class overrides
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indicator_active: Option<String>,
}

/// Caller-supplied carousel options; unset fields keep the defaults
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarouselOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selectors: Option<SelectorOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classes: Option<ClassOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continuous: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resistance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<u64>,
}

impl CarouselOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let tree = invi_core::decode_toml(source)?;
        Ok(serde_json::from_value(tree)?)
    }

    /// Parse options from a JSON document
    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(source)?)
    }

    /// Partial settings tree holding only the fields that were set
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_default()
    }

    /// Set the item selector
    pub fn item_selector(mut self, selector: impl Into<String>) -> Self {
        self.selectors.get_or_insert_with(Default::default).item = Some(selector.into());
        self
    }

    /// Set the indicator selector
    pub fn indicator_selector(mut self, selector: impl Into<String>) -> Self {
        self.selectors.get_or_insert_with(Default::default).indicator = Some(selector.into());
        self
    }

    /// Set the class applied to the current slide
    pub fn active_class(mut self, class: impl Into<String>) -> Self {
        self.classes.get_or_insert_with(Default::default).active = Some(class.into());
        self
    }

    /// Set the class applied to the current indicator
    pub fn indicator_active_class(mut self, class: impl Into<String>) -> Self {
        self.classes
            .get_or_insert_with(Default::default)
            .indicator_active = Some(class.into());
        self
    }

    /// Set the slide duration in ms
    pub fn speed(mut self, ms: u32) -> Self {
        self.speed = Some(ms);
        self
    }

    /// Enable or disable loop mode
    pub fn continuous(mut self, continuous: bool) -> Self {
        self.continuous = Some(continuous);
        self
    }

    /// Set the commit threshold (0-1)
    pub fn threshold(mut self, ratio: f64) -> Self {
        self.threshold = Some(ratio);
        self
    }

    /// Set the drag resistance (0-1)
    pub fn resistance(mut self, ratio: f64) -> Self {
        self.resistance = Some(ratio);
        self
    }

    /// Set the slide shown after setup
    pub fn index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    /// Enable or disable autoplay
    pub fn autoplay(mut self, auto: bool) -> Self {
        self.auto = Some(auto);
        self
    }

    /// Set the autoplay delay in ms
    pub fn delay(mut self, ms: u64) -> Self {
        self.delay = Some(ms);
        self
    }
}

// =============================================================================
// Resolved per-instance configuration
// =============================================================================

/// Normalized configuration of one carousel instance
#[derive(Clone, Debug, PartialEq)]
pub struct CarouselConfig {
    pub item_selector: String,
    pub indicator_selector: Option<String>,
    pub active_class: Option<String>,
    pub indicator_active_class: Option<String>,
    /// Slide duration in ms; 0 when the host cannot signal transition end
    pub speed_ms: u32,
    pub continuous: bool,
    pub threshold_ratio: f32,
    /// Multiplier applied to drag deltas (`1 - resistance`)
    pub resistance_factor: f32,
    pub initial_index: usize,
    pub autoplay: bool,
    pub delay: Duration,
}

impl CarouselConfig {
    pub fn from_settings(settings: &CarouselSettings, capabilities: Capabilities) -> Self {
        let speed_ms = if capabilities.transition_end {
            settings.speed
        } else {
            0
        };

        Self {
            item_selector: settings.selectors.item.clone(),
            indicator_selector: settings.selectors.indicator.clone(),
            active_class: settings.classes.active.clone(),
            indicator_active_class: settings.classes.indicator_active.clone(),
            speed_ms,
            continuous: settings.continuous,
            threshold_ratio: settings.threshold as f32,
            resistance_factor: (1.0 - settings.resistance) as f32,
            initial_index: settings.index,
            autoplay: settings.auto,
            delay: Duration::from_millis(settings.delay),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use invi_core::ConfigRegistry;
    use serde_json::json;

    #[test]
    fn test_defaults_tree_has_nullable_classes() {
        let tree = serde_json::to_value(CarouselSettings::default()).unwrap();
        assert_eq!(tree["selectors"]["item"], "li");
        assert_eq!(tree["classes"]["active"], Value::Null);
        assert_eq!(tree["speed"], 500);
    }

    #[test]
    fn test_options_serialize_only_set_fields() {
        let options = CarouselOptions::new().speed(250).active_class("on");
        assert_eq!(
            options.to_value(),
            json!({ "speed": 250, "classes": { "active": "on" } })
        );
    }

    #[test]
    fn test_resolve_normalizes() {
        let registry = ConfigRegistry::<CarouselSettings>::new();
        let options = CarouselOptions::new()
            .autoplay(true)
            .threshold(1.5)
            .resistance(-0.1)
            .indicator_selector(".dot");

        let settings = registry.resolve(&options.to_value()).unwrap();
        assert!(settings.continuous);
        assert_eq!(settings.threshold, 0.4);
        assert_eq!(settings.resistance, 0.4);
        // No indicator-active class, so the selector is dropped too
        assert_eq!(settings.selectors.indicator, None);
    }

    #[test]
    fn test_keeps_indicator_pair() {
        let registry = ConfigRegistry::<CarouselSettings>::new();
        let options = CarouselOptions::new()
            .indicator_selector(".dot")
            .indicator_active_class("dot-on");

        let settings = registry.resolve(&options.to_value()).unwrap();
        assert_eq!(settings.selectors.indicator.as_deref(), Some(".dot"));
        assert_eq!(settings.classes.indicator_active.as_deref(), Some("dot-on"));
    }

    #[test]
    fn test_mismatched_override_keeps_default() {
        let registry = ConfigRegistry::<CarouselSettings>::new();
        let settings = registry
            .resolve(&json!({ "speed": "fast", "continuous": 1, "delay": 1000 }))
            .unwrap();
        assert_eq!(settings.speed, 500);
        assert!(!settings.continuous);
        assert_eq!(settings.delay, 1000);
    }

    #[test]
    fn test_unrepresentable_override_keeps_default() {
        let registry = ConfigRegistry::<CarouselSettings>::new();
        let settings = registry
            .resolve(&json!({ "speed": 2.5, "index": -1, "delay": 1000 }))
            .unwrap();
        assert_eq!(settings.speed, 500);
        assert_eq!(settings.index, 0);
        assert_eq!(settings.delay, 1000);
    }

    #[test]
    fn test_configure_keeps_user_facing_resistance() {
        let registry = ConfigRegistry::<CarouselSettings>::new();
        registry.configure(&json!({ "resistance": 0.25 })).unwrap();
        registry.configure(&json!({ "speed": 100 })).unwrap();

        let settings = registry.defaults();
        assert_eq!(settings.resistance, 0.25);

        let config = CarouselConfig::from_settings(&settings, Capabilities::default());
        assert!((config.resistance_factor - 0.75).abs() < f32::EPSILON);
        assert_eq!(config.speed_ms, 100);
    }

    #[test]
    fn test_missing_transition_end_disables_speed() {
        let settings = CarouselSettings::default();
        let config = CarouselConfig::from_settings(
            &settings,
            Capabilities {
                transition_end: false,
                touch: false,
            },
        );
        assert_eq!(config.speed_ms, 0);
    }

    #[test]
    fn test_options_from_toml() {
        let options = CarouselOptions::from_toml_str(
            "speed = 300\nauto = true\n[selectors]\nitem = \"[data-slide]\"\n",
        )
        .unwrap();
        assert_eq!(options.speed, Some(300));
        assert_eq!(options.auto, Some(true));
        assert_eq!(
            options.selectors.and_then(|s| s.item).as_deref(),
            Some("[data-slide]")
        );
    }

    #[test]
    fn test_options_from_json() {
        let options = CarouselOptions::from_json_str(
            r#"{ "speed": 300, "selectors": { "item": ".slide" }, "classes": { "indicatorActive": "on" } }"#,
        )
        .unwrap();
        assert_eq!(options.speed, Some(300));
        assert_eq!(options.auto, None);
        assert_eq!(
            options.selectors.and_then(|s| s.item).as_deref(),
            Some(".slide")
        );
        assert_eq!(
            options.classes.and_then(|c| c.indicator_active).as_deref(),
            Some("on")
        );

        assert!(matches!(
            CarouselOptions::from_json_str(r#"{ "speed": "#),
            Err(ConfigError::Json(_))
        ));
    }
}
