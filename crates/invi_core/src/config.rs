//! Widget configuration registry
//!
//! Every widget type owns a set of user-facing defaults. Instances are
//! configured by merging a partial settings tree onto those defaults:
//!
//! - a `null` (or missing) default adopts the override verbatim
//! - an override whose JSON kind differs from the default is rejected
//! - objects merge recursively
//! - arrays and scalars are replaced wholesale
//! - a value the typed settings cannot hold keeps the default
//!
//! [`ConfigRegistry::resolve`] is pure, [`ConfigRegistry::configure`] also
//! stores the result as the defaults for subsequently created instances.
//!
//! # Example
//!
//! ```ignore
//! let registry = ConfigRegistry::<MySettings>::new();
//! let settings = registry.resolve(&serde_json::json!({ "speed": 250 }))?;
//! registry.configure(&serde_json::json!({ "speed": 300 }))?;
//! ```

use std::any::{Any, TypeId};
use std::sync::{Arc, LazyLock, Mutex, PoisonError, RwLock};

use rustc_hash::FxHashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The merged tree does not fit the typed settings
    #[error("invalid settings: {0}")]
    Json(#[from] serde_json::Error),

    /// A TOML document could not be parsed
    #[error("invalid TOML settings: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Runtime kind of a settings value, used to reject mismatched overrides
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JsonKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl JsonKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => JsonKind::Null,
            Value::Bool(_) => JsonKind::Bool,
            Value::Number(_) => JsonKind::Number,
            Value::String(_) => JsonKind::String,
            Value::Array(_) => JsonKind::Array,
            Value::Object(_) => JsonKind::Object,
        }
    }
}

/// Merge `overrides` onto `defaults`, returning a new tree
///
/// Neither input is modified. A non-object `overrides` yields a copy of the
/// defaults.
pub fn merge_defaults(defaults: &Value, overrides: &Value) -> Value {
    let (Value::Object(base), Value::Object(patch)) = (defaults, overrides) else {
        return defaults.clone();
    };

    let mut merged: Map<String, Value> = base.clone();
    for (key, incoming) in patch {
        let current = match base.get(key) {
            None | Some(Value::Null) => {
                merged.insert(key.clone(), incoming.clone());
                continue;
            }
            Some(current) => current,
        };

        let expected = JsonKind::of(current);
        let found = JsonKind::of(incoming);
        if expected != found {
            tracing::warn!(
                "ignoring setting `{}`: expected {:?}, found {:?}",
                key,
                expected,
                found
            );
            continue;
        }

        let value = if expected == JsonKind::Object {
            merge_defaults(current, incoming)
        } else {
            incoming.clone()
        };
        merged.insert(key.clone(), value);
    }
    Value::Object(merged)
}

/// Parse a JSON document into a partial settings tree
pub fn decode_json(source: &str) -> Result<Value, ConfigError> {
    Ok(serde_json::from_str(source)?)
}

/// Parse a TOML document into a partial settings tree
pub fn decode_toml(source: &str) -> Result<Value, ConfigError> {
    let table: toml::Table = toml::from_str(source)?;
    Ok(serde_json::to_value(table)?)
}

/// Copy the leaves of `merged` that differ from `accepted` one at a time,
/// keeping only those `T` can still deserialize
fn admit_leaves<T: DeserializeOwned>(
    accepted: &mut Value,
    merged: &Value,
    path: &mut Vec<String>,
) {
    let Some(Value::Object(entries)) = lookup(merged, path) else {
        return;
    };
    for (key, incoming) in entries {
        path.push(key.clone());
        let current = lookup(accepted, path);
        if incoming.is_object() && current.is_some_and(Value::is_object) {
            admit_leaves::<T>(accepted, merged, path);
        } else if current != Some(incoming) {
            let mut candidate = accepted.clone();
            assign(&mut candidate, path, incoming.clone());
            if serde_json::from_value::<T>(candidate.clone()).is_ok() {
                *accepted = candidate;
            } else {
                tracing::warn!(
                    "ignoring setting `{}`: {} does not fit",
                    path.join("."),
                    incoming
                );
            }
        }
        path.pop();
    }
}

fn lookup<'a>(tree: &'a Value, path: &[String]) -> Option<&'a Value> {
    path.iter().try_fold(tree, |node, key| node.get(key.as_str()))
}

fn assign(tree: &mut Value, path: &[String], value: Value) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };
    let parent = parents
        .iter()
        .try_fold(tree, |node, key| node.get_mut(key.as_str()));
    if let Some(Value::Object(map)) = parent {
        map.insert(last.clone(), value);
    }
}

/// Settings types that can live in a [`ConfigRegistry`]
pub trait Configurable: Clone + Default + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Repair values after a merge
    ///
    /// `fallback` holds the defaults the merge started from; invalid values
    /// should be reset to the corresponding fallback value.
    fn sanitize(&mut self, fallback: &Self) {
        let _ = fallback;
    }
}

/// Defaults of one widget type
pub struct ConfigRegistry<T: Configurable> {
    defaults: RwLock<T>,
}

impl<T: Configurable> Default for ConfigRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Process-wide registries, one per settings type
static GLOBAL_REGISTRIES: LazyLock<Mutex<FxHashMap<TypeId, Arc<dyn Any + Send + Sync>>>> =
    LazyLock::new(|| Mutex::new(FxHashMap::default()));

impl<T: Configurable> ConfigRegistry<T> {
    /// Create a registry seeded with `T::default()`
    pub fn new() -> Self {
        Self::with_defaults(T::default())
    }

    pub fn with_defaults(defaults: T) -> Self {
        Self {
            defaults: RwLock::new(defaults),
        }
    }

    /// The process-wide registry for `T`
    ///
    /// Created lazily on first access; every later call returns the same
    /// registry.
    pub fn global() -> Arc<Self> {
        let mut registries = GLOBAL_REGISTRIES
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let type_id = TypeId::of::<T>();

        if let Some(existing) = registries.get(&type_id) {
            if let Ok(registry) = Arc::clone(existing).downcast::<Self>() {
                return registry;
            }
        }

        let registry = Arc::new(Self::new());
        registries.insert(type_id, registry.clone());
        registry
    }

    /// Snapshot of the current defaults
    pub fn defaults(&self) -> T {
        self.defaults
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Merge `partial` onto the current defaults without storing the result
    pub fn resolve(&self, partial: &Value) -> Result<T, ConfigError> {
        let defaults = self.defaults();
        let tree = serde_json::to_value(&defaults)?;
        let merged = merge_defaults(&tree, partial);

        let mut settings: T = match serde_json::from_value(merged.clone()) {
            Ok(settings) => settings,
            Err(err) => {
                tracing::debug!("settings do not fit as a whole ({}), merging per key", err);
                let mut accepted = tree;
                admit_leaves::<T>(&mut accepted, &merged, &mut Vec::new());
                serde_json::from_value(accepted)?
            }
        };
        settings.sanitize(&defaults);
        Ok(settings)
    }

    /// Merge `partial` onto the current defaults and make the result the new
    /// defaults
    pub fn configure(&self, partial: &Value) -> Result<T, ConfigError> {
        let settings = self.resolve(partial)?;
        *self
            .defaults
            .write()
            .unwrap_or_else(PoisonError::into_inner) = settings.clone();
        tracing::debug!("updated defaults for {}", std::any::type_name::<T>());
        Ok(settings)
    }

    /// Restore `T::default()`
    pub fn reset(&self) {
        *self
            .defaults
            .write()
            .unwrap_or_else(PoisonError::into_inner) = T::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[test]
    fn test_merge_recurses_into_objects() {
        let defaults = json!({ "a": 1, "b": { "c": "c", "d": true } });
        let merged = merge_defaults(&defaults, &json!({ "b": { "c": "c1" } }));
        assert_eq!(merged, json!({ "a": 1, "b": { "c": "c1", "d": true } }));
    }

    #[test]
    fn test_merge_rejects_kind_mismatch() {
        let defaults = json!({ "a": 1, "flag": false });
        let merged = merge_defaults(&defaults, &json!({ "a": "a", "flag": null }));
        assert_eq!(merged, defaults);
    }

    #[test]
    fn test_merge_null_default_adopts_anything() {
        let defaults = json!({ "active": null });
        let merged = merge_defaults(&defaults, &json!({ "active": 5, "extra": [1] }));
        assert_eq!(merged, json!({ "active": 5, "extra": [1] }));
    }

    #[test]
    fn test_merge_replaces_arrays_wholesale() {
        let defaults = json!({ "indexes": [-1, 4, 5] });
        let merged = merge_defaults(&defaults, &json!({ "indexes": [2] }));
        assert_eq!(merged, json!({ "indexes": [2] }));
    }

    #[test]
    fn test_merge_ignores_non_object_overrides() {
        let defaults = json!({ "a": 1 });
        assert_eq!(merge_defaults(&defaults, &json!([1, 2])), defaults);
        assert_eq!(merge_defaults(&defaults, &Value::Null), defaults);
    }

    #[test]
    fn test_decode_json_tree() {
        let tree = decode_json(r#"{ "speed": 300, "classes": { "active": "on" } }"#).unwrap();
        assert_eq!(tree, json!({ "speed": 300, "classes": { "active": "on" } }));
        assert!(matches!(decode_json("{ \"speed\": "), Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_decode_toml_tree() {
        let tree = decode_toml("speed = 300\n[classes]\nactive = \"on\"\n").unwrap();
        assert_eq!(tree, json!({ "speed": 300, "classes": { "active": "on" } }));
        assert!(decode_toml("speed = ").is_err());
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct Knobs {
        level: u32,
        ratio: f64,
        label: Option<String>,
    }

    impl Default for Knobs {
        fn default() -> Self {
            Self {
                level: 1,
                ratio: 0.5,
                label: None,
            }
        }
    }

    impl Configurable for Knobs {
        fn sanitize(&mut self, fallback: &Self) {
            if !(0.0..=1.0).contains(&self.ratio) {
                self.ratio = fallback.ratio;
            }
        }
    }

    #[test]
    fn test_resolve_is_pure() {
        let registry = ConfigRegistry::<Knobs>::new();
        let resolved = registry.resolve(&json!({ "level": 3, "label": "x" })).unwrap();

        assert_eq!(resolved.level, 3);
        assert_eq!(resolved.label.as_deref(), Some("x"));
        assert_eq!(registry.defaults(), Knobs::default());
    }

    #[test]
    fn test_configure_updates_defaults() {
        let registry = ConfigRegistry::<Knobs>::new();
        registry.configure(&json!({ "level": 9 })).unwrap();

        let next = registry.resolve(&json!({})).unwrap();
        assert_eq!(next.level, 9);

        registry.reset();
        assert_eq!(registry.defaults().level, 1);
    }

    #[test]
    fn test_sanitize_falls_back_to_current_defaults() {
        let registry = ConfigRegistry::<Knobs>::new();
        registry.configure(&json!({ "ratio": 0.8 })).unwrap();

        let resolved = registry.resolve(&json!({ "ratio": 1.5 })).unwrap();
        assert_eq!(resolved.ratio, 0.8);
    }

    #[test]
    fn test_untyped_adoption_falls_back() {
        let registry = ConfigRegistry::<Knobs>::new();
        let resolved = registry.resolve(&json!({ "label": 42, "level": 2 })).unwrap();
        assert_eq!(resolved.label, None);
        assert_eq!(resolved.level, 2);
    }

    #[test]
    fn test_unfit_numbers_fall_back_per_key() {
        let registry = ConfigRegistry::<Knobs>::new();
        let resolved = registry
            .resolve(&json!({ "level": -3, "ratio": 0.25, "label": "kept" }))
            .unwrap();
        assert_eq!(resolved.level, 1);
        assert_eq!(resolved.ratio, 0.25);
        assert_eq!(resolved.label.as_deref(), Some("kept"));

        let resolved = registry.resolve(&json!({ "level": 2.5 })).unwrap();
        assert_eq!(resolved, Knobs::default());
    }

    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Nested {
        inner: Knobs,
        enabled: bool,
    }

    impl Configurable for Nested {}

    #[test]
    fn test_fallback_reaches_nested_leaves() {
        let registry = ConfigRegistry::<Nested>::new();
        let resolved = registry
            .resolve(&json!({ "inner": { "level": -1, "ratio": 0.9 }, "enabled": true }))
            .unwrap();
        assert_eq!(resolved.inner.level, 1);
        assert_eq!(resolved.inner.ratio, 0.9);
        assert!(resolved.enabled);
    }

    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    struct GlobalOnly {
        count: u32,
    }

    impl Configurable for GlobalOnly {}

    #[test]
    fn test_global_registry_is_shared() {
        let first = ConfigRegistry::<GlobalOnly>::global();
        first.configure(&json!({ "count": 4 })).unwrap();

        let second = ConfigRegistry::<GlobalOnly>::global();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.defaults().count, 4);
    }
}
