use serde::{Deserialize, Serialize};

use crate::api::Lifecycle;
use crate::core::{Direction, GradientDirection};
use crate::render::NodeId;

/// Read-only state snapshot passed to plugin hooks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GraphPluginContext {
    pub stage_count: usize,
    pub is_2d: bool,
    pub direction: Direction,
    pub gradient_direction: GradientDirection,
    pub width: f64,
    pub height: f64,
    pub pending_tasks: usize,
    pub lifecycle: Lifecycle,
}

/// Event stream exposed to plugins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GraphEvent {
    Drawn { paths: usize, label_groups: usize, dividers: usize },
    DataUpdated { stages: usize },
    DirectionChanged { direction: Direction },
    GradientDirectionChanged { direction: GradientDirection },
    Resized { width: f64, height: f64 },
    InteractionWired { node: NodeId },
    SectionClicked { index: usize, section_index: usize },
    TooltipShown { section_index: usize },
    Destroyed,
}

/// Extension hook interface for bounded custom logic.
///
/// Plugins observe lifecycle events and read graph context without mutating
/// graph internals.
pub trait GraphPlugin {
    fn id(&self) -> &str;
    fn on_event(&mut self, event: GraphEvent, context: GraphPluginContext);
}
