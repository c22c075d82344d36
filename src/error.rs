use thiserror::Error;

use crate::model::LineId;

#[derive(Debug, Error)]
pub enum GraphError {
    /// The line already holds both of its points.
    #[error("{line} already has two points")]
    CapacityExceeded { line: LineId },

    #[error("point ({x}, {y}) is not finite")]
    NonFinite { x: f64, y: f64 },

    #[error("invalid graph json: {0}")]
    Json(#[from] serde_json::Error),
}
