use crate::error::FunnelResult;
use crate::render::{NodeKind, Renderer, Scene};

/// No-op renderer used by tests and headless usage.
///
/// It still validates the scene so tests can catch invalid geometry before a
/// real backend sees it.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub last_path_count: usize,
    pub last_label_group_count: usize,
    pub last_divider_count: usize,
    pub frames: usize,
}

impl Renderer for NullRenderer {
    fn render(&mut self, scene: &Scene) -> FunnelResult<()> {
        scene.validate()?;
        let (mut paths, mut groups, mut dividers) = (0, 0, 0);
        for node in scene.nodes() {
            match node.kind {
                NodeKind::Path(_) => paths += 1,
                NodeKind::LabelGroup(_) => groups += 1,
                NodeKind::Divider(_) => dividers += 1,
            }
        }
        self.last_path_count = paths;
        self.last_label_group_count = groups;
        self.last_divider_count = dividers;
        self.frames += 1;
        Ok(())
    }
}
