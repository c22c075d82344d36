use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::engine::{GraphEngine, RegionChange};
use crate::model::{GraphLine, GridBounds, LineId};
use crate::region::{RegionKey, SideAssignment};
use crate::GraphError;

/// Serializable state of a graph.
///
/// `regions` holds the keys of all shaded regions. Older snapshots only carry the `shade` field
/// of each line; for those the regions are rebuilt from the shades on load.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphSnapshot {
    pub lines: Vec<GraphLine>,
    #[serde(default)]
    pub grid_bounds: GridBounds,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regions: Option<Vec<RegionKey>>,
}

impl Default for GraphSnapshot {
    fn default() -> Self {
        Self {
            lines: Vec::new(),
            grid_bounds: GridBounds::default(),
            regions: None,
        }
    }
}

impl GraphSnapshot {
    pub fn to_json(&self) -> Result<String, GraphError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Region keys implied by the lines' `shade` fields.
    fn keys_from_shades(&self) -> Vec<RegionKey> {
        let shaded: Vec<_> = self.lines.iter()
            .filter(|l| l.is_complete())
            .filter_map(|l| Some(SideAssignment { line: l.id, above: l.shade?.is_above() }))
            .collect();

        let complete = self.lines.iter().filter(|l| l.is_complete()).count();
        if complete == 2 && shaded.len() == 2 {
            vec![RegionKey::new(shaded)]
        } else {
            shaded.into_iter().map(|s| RegionKey::new(vec![s])).collect()
        }
    }
}

impl GraphEngine {
    pub fn snapshot(&self) -> GraphSnapshot {
        let regions: Vec<_> = self.regions().iter().map(|r| r.key.clone()).collect();
        GraphSnapshot {
            lines: self.lines().to_vec(),
            grid_bounds: self.bounds(),
            regions: if regions.is_empty() { None } else { Some(regions) },
        }
    }

    pub fn from_snapshot(snapshot: &GraphSnapshot) -> Self {
        Self::from_snapshot_with_config(snapshot, EngineConfig::default())
    }

    /// Rebuilds an engine from a snapshot. The snapshot's grid bounds override `config.bounds`.
    ///
    /// Input the engine would never have produced is trimmed: duplicate lines, points beyond the
    /// second, and regions that cannot be built are dropped with a warning.
    pub fn from_snapshot_with_config(snapshot: &GraphSnapshot, config: EngineConfig) -> Self {
        let mut engine = GraphEngine::new(EngineConfig {
            bounds: snapshot.grid_bounds,
            ..config
        });

        let mut seen: Vec<LineId> = Vec::new();
        for line in &snapshot.lines {
            if seen.contains(&line.id) {
                log::warn!("snapshot has {} twice, ignoring the second", line.id);
                continue
            }
            seen.push(line.id);
            engine.restore_line(line);
        }

        let keys = match &snapshot.regions {
            Some(keys) => keys.clone(),
            None => snapshot.keys_from_shades(),
        };

        for key in keys {
            let key = RegionKey::new(key.sides().to_vec());
            if engine.regions().find(&key).is_some() {
                continue
            }
            if engine.toggle_region(key.clone()) == RegionChange::Unchanged {
                log::warn!("snapshot region {:?} cannot be rebuilt", key);
            }
        }

        engine
    }

    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        Ok(Self::from_snapshot(&GraphSnapshot::from_json(json)?))
    }

    pub fn to_json(&self) -> Result<String, GraphError> {
        self.snapshot().to_json()
    }

    fn restore_line(&mut self, line: &GraphLine) {
        for p in &line.points {
            if let Err(e) = self.add_point(line.id, p.x, p.y, p.is_open) {
                log::warn!("dropping snapshot point ({}, {}): {}", p.x, p.y, e);
            }
        }

        if line.is_dashed && self.line(line.id).is_some() {
            self.toggle_dash(line.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GraphPoint, Shade};
    use crate::region::RegionShape;

    fn axes_snapshot(shades: [Option<Shade>; 2]) -> GraphSnapshot {
        let mut l1 = GraphLine::new(LineId::Line1);
        l1.points = vec![GraphPoint::new(0.0, -5.0, false), GraphPoint::new(0.0, 5.0, true)];
        l1.shade = shades[0];
        l1.is_dashed = true;

        let mut l2 = GraphLine::new(LineId::Line2);
        l2.points = vec![GraphPoint::new(-5.0, 0.0, false), GraphPoint::new(5.0, 0.0, false)];
        l2.shade = shades[1];

        GraphSnapshot {
            lines: vec![l1, l2],
            grid_bounds: GridBounds::default(),
            regions: None,
        }
    }

    #[test]
    fn empty_engine_matches_default_snapshot() {
        let engine = GraphEngine::default();
        assert_eq!(engine.snapshot(), GraphSnapshot::default());

        let json = GraphSnapshot::default().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value, serde_json::json!({
            "lines": [],
            "gridBounds": { "xMin": -10.0, "xMax": 10.0, "yMin": -10.0, "yMax": 10.0 },
        }));
    }

    #[test]
    fn json_field_names() {
        let mut engine = GraphEngine::default();
        engine.add_point(LineId::Line1, -2.0, 0.0, true).unwrap();
        engine.add_point(LineId::Line1, 2.0, 0.0, false).unwrap();
        engine.resolve_region(0.0, 5.0);

        let value: serde_json::Value = serde_json::from_str(&engine.to_json().unwrap()).unwrap();
        assert_eq!(value["lines"][0]["id"], "line1");
        assert_eq!(value["lines"][0]["points"][0]["isOpen"], true);
        assert_eq!(value["lines"][0]["isDashed"], false);
        assert_eq!(value["lines"][0]["shade"], "above");
        assert_eq!(value["regions"][0][0]["line"], "line1");
        assert_eq!(value["regions"][0][0]["above"], true);
    }

    #[test]
    fn full_snapshot_restores_polygons() {
        let mut engine = GraphEngine::from_snapshot(&axes_snapshot([None, None]));
        engine.resolve_region(3.0, 3.0);
        engine.resolve_region(-3.0, -3.0);

        let restored = GraphEngine::from_json(&engine.to_json().unwrap()).unwrap();
        assert_eq!(restored.lines(), engine.lines());
        assert_eq!(restored.regions().len(), 2);

        for (a, b) in restored.regions().iter().zip(engine.regions().iter()) {
            assert_eq!(a.key, b.key);
            assert_eq!(a.shape, b.shape);
        }
    }

    #[test]
    fn legacy_single_line_shade() {
        let mut snapshot = axes_snapshot([Some(Shade::Below), None]);
        snapshot.lines.truncate(1);

        let engine = GraphEngine::from_snapshot(&snapshot);
        assert_eq!(engine.regions().len(), 1);

        let region = engine.regions().iter().next().unwrap();
        assert_eq!(region.shape, RegionShape::HalfPlane { line: LineId::Line1, shade: Shade::Below });
        assert_eq!(engine.line(LineId::Line1).unwrap().shade, Some(Shade::Below));
    }

    #[test]
    fn legacy_two_line_shades_rebuild_polygon() {
        let engine = GraphEngine::from_snapshot(&axes_snapshot([Some(Shade::Above), Some(Shade::Below)]));
        assert_eq!(engine.regions().len(), 1);

        let region = engine.regions().iter().next().unwrap();
        assert_eq!(region.key.side(LineId::Line1), Some(true));
        assert_eq!(region.key.side(LineId::Line2), Some(false));
        assert!(region.shape.vertices().len() >= 3);
        assert_eq!(engine.line(LineId::Line2).unwrap().shade, Some(Shade::Below));
    }

    #[test]
    fn styles_survive_restore() {
        let engine = GraphEngine::from_snapshot(&axes_snapshot([None, None]));
        let line = engine.line(LineId::Line1).unwrap();
        assert!(line.is_dashed);
        assert!(!line.points[0].is_open);
        assert!(line.points[1].is_open);
        assert!(!engine.line(LineId::Line2).unwrap().is_dashed);
    }

    #[test]
    fn over_capacity_input_is_trimmed() {
        let json = r#"{
            "lines": [
                { "id": "line1", "points": [
                    { "x": 0, "y": 0 }, { "x": 1, "y": 1 }, { "x": 2, "y": 5 }
                ] },
                { "id": "line1", "points": [{ "x": 3, "y": 3 }] }
            ],
            "gridBounds": { "xMin": -10, "xMax": 10, "yMin": -10, "yMax": 10 }
        }"#;

        let engine = GraphEngine::from_json(json).unwrap();
        assert_eq!(engine.lines().len(), 1);
        assert_eq!(engine.line(LineId::Line1).unwrap().points.len(), 2);
    }

    #[test]
    fn unbuildable_regions_are_dropped() {
        let mut snapshot = axes_snapshot([None, None]);
        snapshot.lines.truncate(1);
        snapshot.regions = Some(vec![RegionKey::new(vec![
            SideAssignment { line: LineId::Line1, above: true },
            SideAssignment { line: LineId::Line2, above: true },
        ])]);

        let engine = GraphEngine::from_snapshot(&snapshot);
        assert!(engine.regions().is_empty());
    }

    #[test]
    fn custom_bounds_round_trip() {
        let bounds = GridBounds { x_min: -5.0, x_max: 5.0, y_min: 0.0, y_max: 20.0 };
        let engine = GraphEngine::new(EngineConfig::with_bounds(bounds));

        let restored = GraphEngine::from_json(&engine.to_json().unwrap()).unwrap();
        assert_eq!(restored.bounds(), bounds);
    }

    #[test]
    fn inverted_snapshot_bounds_are_reordered() {
        let mut engine = GraphEngine::from_json(
            r#"{"lines":[],"gridBounds":{"xMin":10,"xMax":-10,"yMin":-10,"yMax":10}}"#).unwrap();
        assert_eq!(engine.bounds(), GridBounds::default());

        let outcome = engine.on_pointer_down(1.0, 1.0, crate::PointerMode::PlacePoint);
        assert_eq!(outcome, crate::PointerOutcome::PointPlaced { line: LineId::Line1, index: 0 });
        assert!(engine.move_point(LineId::Line1, 0, 20.0, 3.0));
        assert_eq!(engine.line(LineId::Line1).unwrap().points[0].x, 10.0);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(GraphEngine::from_json("{ \"lines\": 3 }"), Err(GraphError::Json(_))));
    }
}
