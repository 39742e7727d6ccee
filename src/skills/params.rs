//! Effect parameter bag.
//!
//! Catalog entries carry type-specific parameters such as `radius`,
//! `count` or `direction`. The engine reads them through typed getters
//! with handler-chosen defaults.
//!
//! ## ParamValue Types
//!
//! - `Bool`: Flags (`include_own`)
//! - `Int`: Counts, radii, durations, amounts
//! - `Float`: Multipliers
//! - `Text`: Directions, element names
//! - `TextList`: Tag lists
//!
//! Values are untagged in JSON, so a catalog can write
//! `{"radius": 1, "direction": "right"}` directly.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::Direction;

/// Value for an effect parameter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    TextList(Vec<String>),
}

impl ParamValue {
    /// Get as integer. Floats are truncated toward zero.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ParamValue::Int(v) => Some(*v),
            ParamValue::Float(v) => Some(*v as i64),
            _ => None,
        }
    }

    /// Get as float. Integers are widened.
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            ParamValue::Float(v) => Some(*v),
            ParamValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParamValue::Text(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text_list(&self) -> Option<&[String]> {
        match self {
            ParamValue::TextList(v) => Some(v),
            _ => None,
        }
    }

    /// Multiply numeric values by a level factor; other values are unchanged.
    ///
    /// Integers are rounded to the nearest whole number.
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        match self {
            ParamValue::Int(v) => ParamValue::Int((*v as f64 * factor).round() as i64),
            ParamValue::Float(v) => ParamValue::Float(v * factor),
            other => other.clone(),
        }
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        ParamValue::Int(i64::from(v))
    }
}

impl From<u32> for ParamValue {
    fn from(v: u32) -> Self {
        ParamValue::Int(i64::from(v))
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Text(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Text(v.to_string())
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(v: Vec<String>) -> Self {
        ParamValue::TextList(v)
    }
}

/// Keyed collection of effect parameters.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EffectParams(FxHashMap<String, ParamValue>);

impl EffectParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter (builder pattern).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set a parameter, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Integer parameter with a default.
    #[must_use]
    pub fn int(&self, key: &str, default: i64) -> i64 {
        self.get(key).and_then(ParamValue::as_int).unwrap_or(default)
    }

    /// Non-negative integer parameter with a default; negatives clamp to 0.
    #[must_use]
    pub fn count(&self, key: &str, default: u32) -> u32 {
        let value = self.int(key, i64::from(default));
        u32::try_from(value.max(0)).unwrap_or(u32::MAX)
    }

    /// Float parameter with a default.
    #[must_use]
    pub fn float(&self, key: &str, default: f64) -> f64 {
        self.get(key).and_then(ParamValue::as_float).unwrap_or(default)
    }

    /// Boolean parameter with a default.
    #[must_use]
    pub fn flag(&self, key: &str, default: bool) -> bool {
        self.get(key).and_then(ParamValue::as_bool).unwrap_or(default)
    }

    /// Text parameter.
    #[must_use]
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(ParamValue::as_text)
    }

    /// Direction parameter, parsed from its name.
    #[must_use]
    pub fn direction(&self, key: &str) -> Option<Direction> {
        self.text(key).and_then(Direction::parse)
    }

    /// A copy with every numeric value multiplied by `factor`.
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        if (factor - 1.0).abs() < f64::EPSILON {
            return self.clone();
        }
        Self(
            self.0
                .iter()
                .map(|(key, value)| (key.clone(), value.scaled(factor)))
                .collect(),
        )
    }

    /// Iterate over `(key, value)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_getters() {
        let params = EffectParams::new()
            .with("radius", 2)
            .with("multiplier", 1.5)
            .with("include_own", true)
            .with("direction", "left");

        assert_eq!(params.int("radius", 1), 2);
        assert_eq!(params.int("missing", 7), 7);
        assert!((params.float("multiplier", 1.0) - 1.5).abs() < f64::EPSILON);
        assert!(params.flag("include_own", false));
        assert_eq!(params.direction("direction"), Some(Direction::Left));
        assert_eq!(params.text("radius"), None);
    }

    #[test]
    fn test_count_clamps_negative() {
        let params = EffectParams::new().with("count", -3);
        assert_eq!(params.count("count", 1), 0);
    }

    #[test]
    fn test_scaling() {
        let params = EffectParams::new()
            .with("amount", 3)
            .with("multiplier", 2.0)
            .with("direction", "up");

        let scaled = params.scaled(1.5);
        assert_eq!(scaled.int("amount", 0), 5); // 4.5 rounds to 5
        assert!((scaled.float("multiplier", 0.0) - 3.0).abs() < f64::EPSILON);
        assert_eq!(scaled.text("direction"), Some("up"));
    }

    #[test]
    fn test_untagged_json() {
        let params: EffectParams =
            serde_json::from_str(r#"{"radius": 1, "scale": 0.5, "element": "fire", "own": false}"#)
                .unwrap();

        assert_eq!(params.get("radius"), Some(&ParamValue::Int(1)));
        assert_eq!(params.get("scale"), Some(&ParamValue::Float(0.5)));
        assert_eq!(params.text("element"), Some("fire"));
        assert!(!params.flag("own", true));
    }
}
