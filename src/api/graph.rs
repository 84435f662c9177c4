use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::{
    ContainerBox, DataSeries, Direction, FunnelGeometry, GeometryProvider, GradientDirection,
    InfoItem, TextMeasurer,
};
use crate::error::FunnelResult;
use crate::extensions::{GraphEvent, GraphPlugin};
use crate::interaction::{HandlerRegistry, NodeHandlers, NodePayload, TooltipElement, TooltipHandle};
use crate::render::{NodeId, Renderer, RootSvg, Scene, SvgLength, scene_to_svg};

use super::{GraphConfig, GraphTask, ResizeListener, Scheduler, TaskKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lifecycle {
    /// Constructed, no root container yet.
    Created,
    /// Root container mounted.
    Drawn,
    Destroyed,
}

/// Main orchestration facade consumed by host applications.
///
/// `FunnelGraph` owns configuration and data, sequences the draw pipeline
/// (geometry, path join, label join, resize sync) and routes host pointer
/// input to tooltips and callbacks.
pub struct FunnelGraph<G: GeometryProvider = FunnelGeometry> {
    pub(super) id: String,
    pub(super) geometry: G,
    pub(super) measurer: Box<dyn TextMeasurer>,
    pub(super) model: GraphModel,
    pub(super) runtime: GraphRuntime,
}

/// Configuration and data state.
pub(super) struct GraphModel {
    pub(super) config: GraphConfig,
    pub(super) series: DataSeries,
    pub(super) percentages: Vec<f64>,
    pub(super) container: Option<ContainerBox>,
    pub(super) line_positions: Vec<f64>,
}

/// Scene, timers, handlers and other live resources.
pub(super) struct GraphRuntime {
    pub(super) scene: Scene,
    pub(super) payloads: HashMap<NodeId, NodePayload>,
    pub(super) router: HandlerRegistry,
    pub(super) scheduler: Scheduler<GraphTask>,
    pub(super) tooltip: Option<TooltipHandle>,
    pub(super) resize_listener: Option<ResizeListener>,
    pub(super) plugins: Vec<Box<dyn GraphPlugin>>,
    pub(super) lifecycle: Lifecycle,
}

impl<G: GeometryProvider> FunnelGraph<G> {
    /// Mounts the root scene container and runs the draw pipeline.
    pub fn draw(&mut self) {
        if self.runtime.lifecycle == Lifecycle::Destroyed {
            warn!(graph_id = %self.id, "draw ignored on destroyed graph");
            return;
        }
        let config = &self.model.config;
        if !config.full_width().is_finite() || !config.full_height().is_finite() {
            warn!(
                graph_id = %self.id,
                width = config.width,
                height = config.height,
                "draw ignored for non-finite size"
            );
            return;
        }
        self.runtime.scene.mount(RootSvg {
            id: self.id.clone(),
            width: SvgLength::Px(config.full_width()),
            height: SvgLength::Px(config.full_height()),
            view_box: (config.full_width(), config.full_height()),
            graph_offset: (config.margin.left, config.margin.top),
        });
        self.runtime.lifecycle = Lifecycle::Drawn;
        self.draw_graph();
    }

    /// Re-runs the pipeline without touching configuration.
    pub fn redraw(&mut self) {
        self.draw_graph();
    }

    /// Records the client box of the hosting container.
    pub fn set_container_size(&mut self, client_width: f64, client_height: f64) {
        self.model.container = Some(ContainerBox::new(client_width, client_height));
    }

    pub fn render<R: Renderer>(&self, renderer: &mut R) -> FunnelResult<()> {
        renderer.render(&self.runtime.scene)
    }

    #[must_use]
    pub fn to_svg(&self) -> String {
        scene_to_svg(&self.runtime.scene)
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Plotting width, optionally including margins.
    #[must_use]
    pub fn width(&self, with_margin: bool) -> f64 {
        if with_margin {
            self.model.config.full_width()
        } else {
            self.model.config.width
        }
    }

    /// Plotting height, optionally including margins.
    #[must_use]
    pub fn height(&self, with_margin: bool) -> f64 {
        if with_margin {
            self.model.config.full_height()
        } else {
            self.model.config.height
        }
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.model.config.direction
    }

    #[must_use]
    pub fn gradient_direction(&self) -> GradientDirection {
        self.model.config.gradient_direction
    }

    #[must_use]
    pub fn config(&self) -> &GraphConfig {
        &self.model.config
    }

    #[must_use]
    pub fn series(&self) -> &DataSeries {
        &self.model.series
    }

    #[must_use]
    pub fn percentages(&self) -> &[f64] {
        &self.model.percentages
    }

    #[must_use]
    pub fn info(&self) -> Vec<InfoItem> {
        self.context().info()
    }

    /// Stage boundaries from the last layout pass or hit-test.
    #[must_use]
    pub fn line_positions(&self) -> &[f64] {
        &self.model.line_positions
    }

    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.runtime.scene
    }

    #[must_use]
    pub fn lifecycle(&self) -> Lifecycle {
        self.runtime.lifecycle
    }

    /// Current virtual time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.runtime.scheduler.now()
    }

    #[must_use]
    pub fn pending_tasks(&self) -> usize {
        self.runtime.scheduler.len()
    }

    #[must_use]
    pub fn has_pending_task(&self, key: TaskKey) -> bool {
        self.runtime.scheduler.contains(key)
    }

    #[must_use]
    pub fn handlers(&self, node: NodeId) -> NodeHandlers {
        self.runtime.router.handlers(node)
    }

    #[must_use]
    pub fn handler_registry(&self) -> &HandlerRegistry {
        &self.runtime.router
    }

    #[must_use]
    pub fn payload(&self, node: NodeId) -> Option<&NodePayload> {
        self.runtime.payloads.get(&node)
    }

    /// State of the shared tooltip element, `None` once this graph released it.
    #[must_use]
    pub fn tooltip(&self) -> Option<TooltipElement> {
        self.runtime.tooltip.as_ref().map(TooltipHandle::snapshot)
    }

    #[must_use]
    pub fn tooltip_handle(&self) -> Option<&TooltipHandle> {
        self.runtime.tooltip.as_ref()
    }

    /// Full pipeline: layout pass followed by resize listener sync.
    pub(super) fn draw_graph(&mut self) {
        self.render_pass();
        self.sync_resize_listener();
    }

    /// Geometry, path join and label join against a fresh context snapshot.
    pub(super) fn render_pass(&mut self) {
        if !self.runtime.scene.is_mounted() {
            debug!(graph_id = %self.id, "draw pass skipped before mount");
            return;
        }
        if !self.update_root() {
            return;
        }

        let context = self.context();
        let cross_axis_points = self.geometry.cross_axis_points(&context);
        let definitions = self.geometry.path_definitions(&context, &cross_axis_points);

        let paths = self.bind_paths(&context, &definitions);
        let (label_groups, dividers) = self.bind_info(&context);
        self.model.line_positions = context.line_positions();

        debug!(
            graph_id = %self.id,
            stages = context.stage_count(),
            paths,
            label_groups,
            dividers,
            "draw pass"
        );
        self.emit_plugin_event(GraphEvent::Drawn {
            paths,
            label_groups,
            dividers,
        });
    }

    /// Syncs root sizing attributes with the configuration.
    ///
    /// Returns `false` for non-finite dimensions, leaving the last valid scene
    /// untouched.
    pub(super) fn update_root(&mut self) -> bool {
        let config = &self.model.config;
        let (width, height) = (config.full_width(), config.full_height());
        if !width.is_finite() || !height.is_finite() {
            warn!(graph_id = %self.id, width, height, "scene update skipped for non-finite size");
            return false;
        }
        let responsive = config.responsive;
        let offset = (config.margin.left, config.margin.top);
        if let Some(root) = self.runtime.scene.root_mut() {
            root.width = if responsive.width {
                SvgLength::Percent(100.0)
            } else {
                SvgLength::Px(width)
            };
            root.height = if responsive.height {
                SvgLength::Percent(100.0)
            } else {
                SvgLength::Px(height)
            };
            root.view_box = (width, height);
            root.graph_offset = offset;
        }
        true
    }

    /// Removes a node with its payload, handlers and pending tasks.
    pub(super) fn remove_node(&mut self, node: NodeId) {
        self.runtime
            .scheduler
            .cancel_target(super::TaskTarget::Node(node));
        self.runtime.router.detach_all(node);
        self.runtime.payloads.remove(&node);
        self.runtime.scene.remove(node);
    }
}
