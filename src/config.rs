use serde::{Deserialize, Serialize};

use crate::geometry::{DEDUP_EPSILON, INTERSECTION_EPSILON};
use crate::model::GridBounds;

/// Padding added around the grid bounds when intersecting lines with the box edges.
pub const DEFAULT_PADDING: f64 = 2.0;

/// Tunables of a [`crate::engine::GraphEngine`].
///
/// Every field has a default, so a partial JSON object is a valid config.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub bounds: GridBounds,
    pub padding: f64,
    pub intersection_epsilon: f64,
    pub dedup_epsilon: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bounds: GridBounds::default(),
            padding: DEFAULT_PADDING,
            intersection_epsilon: INTERSECTION_EPSILON,
            dedup_epsilon: DEDUP_EPSILON,
        }
    }
}

impl EngineConfig {
    pub fn with_bounds(bounds: GridBounds) -> Self {
        Self {
            bounds: bounds.normalized(),
            ..Self::default()
        }
    }

    /// Parses a config, reordering inverted bounds.
    pub fn from_json(json: &str) -> Result<Self, crate::GraphError> {
        let config: Self = serde_json::from_str(json)?;
        Ok(Self {
            bounds: config.bounds.normalized(),
            ..config
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_uses_defaults() {
        let config = EngineConfig::from_json(r#"{ "padding": 3.5 }"#).unwrap();
        assert_eq!(config.padding, 3.5);
        assert_eq!(config.bounds, GridBounds::default());
        assert_eq!(config.dedup_epsilon, DEDUP_EPSILON);
    }

    #[test]
    fn bounds_from_json() {
        let config = EngineConfig::from_json(
            r#"{ "bounds": { "xMin": -5, "xMax": 5, "yMin": 0, "yMax": 20 } }"#).unwrap();
        assert_eq!(config.bounds.x_min, -5.0);
        assert_eq!(config.bounds.y_max, 20.0);
        assert_eq!(config.padding, DEFAULT_PADDING);
    }

    #[test]
    fn inverted_bounds_from_json_are_reordered() {
        let config = EngineConfig::from_json(
            r#"{ "bounds": { "xMin": 10, "xMax": -10, "yMin": -10, "yMax": 10 } }"#).unwrap();
        assert_eq!(config.bounds, GridBounds::default());
    }
}
