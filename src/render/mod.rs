mod null_renderer;
mod scene;
mod svg;

pub use null_renderer::NullRenderer;
pub use scene::{
    DividerNode, GradientStop, LabelGroupNode, LinearGradient, NodeId, NodeKind, Paint, PathNode,
    RootSvg, Scene, SceneNode, SvgLength, TextLine, TextRole,
};
pub use svg::{SvgRenderer, scene_to_svg};

use crate::error::FunnelResult;

/// Contract implemented by any rendering backend.
///
/// Backends receive the retained scene as-is so drawing code stays isolated
/// from reconciliation and interaction logic.
pub trait Renderer {
    fn render(&mut self, scene: &Scene) -> FunnelResult<()>;
}
