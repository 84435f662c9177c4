use tracing::info;

use crate::core::GeometryProvider;
use crate::extensions::GraphEvent;

use super::{FunnelGraph, Lifecycle};

impl<G: GeometryProvider> FunnelGraph<G> {
    /// Tears the graph down.
    ///
    /// Order: pending tasks, resize listener, handlers, payloads, scene nodes,
    /// then the tooltip handle. Nothing scheduled before can fire afterwards.
    /// Calling it again is a no-op.
    pub fn destroy(&mut self) {
        if self.runtime.lifecycle == Lifecycle::Destroyed {
            return;
        }

        let cancelled = self.runtime.scheduler.clear();
        self.detach_resize_listener();
        let handlers = self.runtime.router.len();
        self.runtime.router.clear();
        self.runtime.payloads.clear();
        let nodes = self.runtime.scene.node_count();
        self.runtime.scene.clear();
        self.model.line_positions.clear();
        if let Some(tooltip) = self.runtime.tooltip.take() {
            tooltip.hide_if_owned(&self.id);
        }
        self.runtime.lifecycle = Lifecycle::Destroyed;

        info!(graph_id = %self.id, cancelled, handlers, nodes, "destroyed");
        self.emit_plugin_event(GraphEvent::Destroyed);
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.runtime.lifecycle == Lifecycle::Destroyed
    }
}
