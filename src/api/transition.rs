use std::time::Duration;

use crate::core::ease::lerp;
use crate::core::PathShape;
use crate::interaction::{NodeRole, PointerEvent, SectionMetadata};

/// Stagger between consecutive nodes of one join.
pub(crate) const STAGGER: Duration = Duration::from_millis(100);
pub(crate) const PATH_DURATION: Duration = Duration::from_millis(550);
pub(crate) const LABEL_DURATION: Duration = Duration::from_millis(400);
pub(crate) const HOVER_STROKE_DURATION: Duration = Duration::from_millis(500);
pub(crate) const TOOLTIP_DELAY: Duration = Duration::from_millis(500);
pub(crate) const HOVER_STROKE_WIDTH: f64 = 4.0;
/// Opacity label groups restart from when their content changes.
pub(crate) const LABEL_UPDATE_OPACITY: f64 = 0.5;

pub(crate) fn stagger(index: usize) -> Duration {
    STAGGER.saturating_mul(u32::try_from(index).unwrap_or(u32::MAX))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    Enter,
    Update,
    Exit,
}

/// Animated attributes of a path node.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PathVisual {
    pub(crate) shape: PathShape,
    pub(crate) opacity: f64,
    pub(crate) stroke_width: f64,
}

impl PathVisual {
    pub(crate) fn interpolate(&self, to: &Self, t: f64) -> Self {
        Self {
            shape: self.shape.interpolate(&to.shape, t),
            opacity: lerp(self.opacity, to.opacity, t),
            stroke_width: lerp(self.stroke_width, to.stroke_width, t),
        }
    }
}

/// Work items driven by the graph scheduler.
#[derive(Debug, Clone)]
pub(crate) enum GraphTask {
    Path {
        phase: Phase,
        from: PathVisual,
        to: PathVisual,
    },
    Label {
        phase: Phase,
        from_opacity: f64,
    },
    Stroke {
        from: f64,
        to: f64,
    },
    Tooltip {
        role: NodeRole,
        event: PointerEvent,
        metadata: SectionMetadata,
    },
    Resize,
}
