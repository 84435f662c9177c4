use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::{Direction, GeometryProvider, GradientDirection, InfoItem};
use crate::error::{FunnelError, FunnelResult};
use crate::interaction::TooltipElement;
use crate::render::{NodeKind, Scene};

use super::{FunnelGraph, Lifecycle};

/// Serializable deterministic state snapshot used by regression tests and
/// debugging tooling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub id: String,
    pub lifecycle: Lifecycle,
    pub direction: Direction,
    pub gradient_direction: GradientDirection,
    pub width: f64,
    pub height: f64,
    pub full_width: f64,
    pub full_height: f64,
    pub percentages: Vec<f64>,
    pub info: Vec<InfoItem>,
    pub line_positions: Vec<f64>,
    pub pending_tasks: usize,
    pub handler_count: usize,
    pub tooltip: Option<TooltipElement>,
    /// SVG path data keyed by node id, in join order.
    pub path_data: IndexMap<String, String>,
    pub scene: Scene,
}

impl<G: GeometryProvider> FunnelGraph<G> {
    pub fn snapshot(&self) -> GraphSnapshot {
        let scene = &self.runtime.scene;
        let path_data = scene
            .path_ids()
            .iter()
            .filter_map(|id| scene.node(*id))
            .filter_map(|node| match &node.kind {
                NodeKind::Path(path) => Some((node.id.raw().to_string(), path.shape.to_svg_d())),
                _ => None,
            })
            .collect();

        GraphSnapshot {
            id: self.id.clone(),
            lifecycle: self.runtime.lifecycle,
            direction: self.model.config.direction,
            gradient_direction: self.model.config.gradient_direction,
            width: self.width(false),
            height: self.height(false),
            full_width: self.width(true),
            full_height: self.height(true),
            percentages: self.model.percentages.clone(),
            info: self.info(),
            line_positions: self.model.line_positions.clone(),
            pending_tasks: self.runtime.scheduler.len(),
            handler_count: self.runtime.router.len(),
            tooltip: self.tooltip(),
            path_data,
            scene: scene.clone(),
        }
    }

    /// Serializes the snapshot as pretty JSON for fixture-based checks.
    pub fn snapshot_json_pretty(&self) -> FunnelResult<String> {
        serde_json::to_string_pretty(&self.snapshot())
            .map_err(|e| FunnelError::InvalidData(format!("failed to serialize snapshot: {e}")))
    }
}
