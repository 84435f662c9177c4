mod router;
mod tooltip;

use serde::{Deserialize, Serialize};

use crate::render::NodeId;

pub use router::{
    AttachOutcome, ClickBinding, HandlerRegistry, HoverBinding, NodeHandlers, NodePayload,
    NodeRole, SectionDetail, SectionMetadata, resolve_metadata, resolve_section,
};
pub use tooltip::{
    TooltipElement, TooltipHandle, TooltipPayload, shared_tooltip_handles, tooltip_label,
    tooltip_lines,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerEventKind {
    Enter,
    Move,
    Leave,
    Click,
}

/// Pointer input delivered by the host, targeted at one scene node.
///
/// Offsets are in root scene coordinates, as reported by the host surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub target: NodeId,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl PointerEvent {
    #[must_use]
    pub const fn new(kind: PointerEventKind, target: NodeId, offset_x: f64, offset_y: f64) -> Self {
        Self {
            kind,
            target,
            offset_x,
            offset_y,
        }
    }

    #[must_use]
    pub const fn enter(target: NodeId, offset_x: f64, offset_y: f64) -> Self {
        Self::new(PointerEventKind::Enter, target, offset_x, offset_y)
    }

    #[must_use]
    pub const fn moved(target: NodeId, offset_x: f64, offset_y: f64) -> Self {
        Self::new(PointerEventKind::Move, target, offset_x, offset_y)
    }

    #[must_use]
    pub const fn leave(target: NodeId) -> Self {
        Self::new(PointerEventKind::Leave, target, 0.0, 0.0)
    }

    #[must_use]
    pub const fn click(target: NodeId, offset_x: f64, offset_y: f64) -> Self {
        Self::new(PointerEventKind::Click, target, offset_x, offset_y)
    }

    /// Coordinate along the funnel's primary axis.
    #[must_use]
    pub fn primary_coordinate(&self, vertical: bool) -> f64 {
        if vertical {
            self.offset_y
        } else {
            self.offset_x
        }
    }
}
