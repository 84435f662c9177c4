use std::time::Duration;

use tracing::{trace, warn};

use crate::core::ease::lerp;
use crate::core::{Ease, GeometryProvider};
use crate::error::{FunnelError, FunnelResult};
use crate::extensions::GraphEvent;
use crate::interaction::{
    ClickBinding, HoverBinding, NodeRole, PointerEvent, PointerEventKind, SectionMetadata,
    TooltipPayload, resolve_metadata, resolve_section, tooltip_label, tooltip_lines,
};
use crate::render::{NodeId, NodeKind, SceneNode};

use super::transition::{HOVER_STROKE_DURATION, HOVER_STROKE_WIDTH, Phase, TOOLTIP_DELAY};
use super::{FunnelGraph, GraphTask, Lifecycle, Task, TaskChannel, TaskKey, TaskTarget};

const TOOLTIP_OFFSET: f64 = 10.0;
/// Upper bound on scheduler rounds in one `settle` call.
const SETTLE_ROUNDS: usize = 10_000;

impl<G: GeometryProvider> FunnelGraph<G> {
    /// Routes one host pointer event to the handlers attached to its target.
    ///
    /// Returns `true` when a handler ran. Enter, move and click are ignored on
    /// nodes that do not accept pointer input; leave always reaches hover
    /// handlers.
    pub fn dispatch_pointer(&mut self, event: PointerEvent) -> bool {
        if self.runtime.lifecycle == Lifecycle::Destroyed {
            return false;
        }
        let handlers = self.runtime.router.handlers(event.target);
        let accepts = self
            .runtime
            .scene
            .node(event.target)
            .is_some_and(SceneNode::accepts_pointer);
        trace!(
            graph_id = %self.id,
            node = event.target.raw(),
            kind = ?event.kind,
            accepts,
            "pointer event"
        );

        match event.kind {
            PointerEventKind::Click => match handlers.click {
                Some(binding) if accepts => self.handle_click(event, binding),
                _ => false,
            },
            PointerEventKind::Enter | PointerEventKind::Move => match handlers.hover {
                Some(binding) if accepts => {
                    self.handle_hover(event, binding, handlers.click.is_some())
                }
                _ => false,
            },
            PointerEventKind::Leave => handlers.hover.is_some() && self.handle_leave(event),
        }
    }

    /// Moves the virtual clock forward by `step`, completing due tasks in
    /// order and sampling running transitions.
    ///
    /// The clock saturates at `Duration::MAX`.
    pub fn advance(&mut self, step: Duration) {
        let until = self.runtime.scheduler.now().saturating_add(step);
        loop {
            let due = self.runtime.scheduler.pop_due(until);
            if due.is_empty() {
                break;
            }
            self.sample_running();
            for task in due {
                self.complete_task(task);
            }
        }
        self.sample_running();
    }

    /// [`advance`](Self::advance) with a step in milliseconds.
    pub fn advance_by_millis(&mut self, millis: f64) -> FunnelResult<()> {
        if !millis.is_finite() || millis < 0.0 {
            return Err(FunnelError::InvalidTimeStep(millis));
        }
        let step = Duration::try_from_secs_f64(millis / 1000.0)
            .map_err(|_| FunnelError::InvalidTimeStep(millis))?;
        self.advance(step);
        Ok(())
    }

    /// Advances until no task is pending.
    pub fn settle(&mut self) {
        for _ in 0..SETTLE_ROUNDS {
            let Some(deadline) = self.runtime.scheduler.next_deadline() else {
                return;
            };
            let step = deadline.saturating_sub(self.runtime.scheduler.now());
            self.advance(step);
        }
        warn!(
            graph_id = %self.id,
            pending = self.runtime.scheduler.len(),
            "settle stopped with tasks still pending"
        );
    }

    fn handle_click(&mut self, event: PointerEvent, binding: ClickBinding) -> bool {
        let Some(metadata) = self.section_metadata(&event) else {
            return false;
        };
        let callbacks = &self.model.config.callbacks;
        let callback = match binding {
            ClickBinding::Path => callbacks.click.clone(),
            ClickBinding::Label => callbacks.label.clone(),
        };
        if let Some(callback) = callback {
            callback(&event, &metadata);
        }
        self.emit_plugin_event(GraphEvent::SectionClicked {
            index: metadata.index,
            section_index: metadata.section_index,
        });
        true
    }

    /// Restarts the tooltip delay; enter also raises the stroke.
    fn handle_hover(&mut self, event: PointerEvent, binding: HoverBinding, has_click: bool) -> bool {
        let node = event.target;
        let Some(metadata) = self.section_metadata(&event) else {
            return false;
        };
        let role = match binding {
            HoverBinding::Path => NodeRole::Path,
            HoverBinding::Label => NodeRole::LabelGroup,
        };
        self.runtime.scheduler.schedule(
            TaskKey::node(node, TaskChannel::Tooltip),
            TOOLTIP_DELAY,
            Duration::ZERO,
            Ease::Linear,
            GraphTask::Tooltip {
                role,
                event,
                metadata,
            },
        );

        if event.kind == PointerEventKind::Enter {
            self.animate_stroke(node, HOVER_STROKE_WIDTH);
            if has_click {
                if let Some(scene_node) = self.runtime.scene.node_mut(node) {
                    match &mut scene_node.kind {
                        NodeKind::Path(path) => path.cursor_pointer = true,
                        NodeKind::LabelGroup(group) => group.cursor_pointer = true,
                        NodeKind::Divider(_) => {}
                    }
                }
            }
        }
        true
    }

    fn handle_leave(&mut self, event: PointerEvent) -> bool {
        let node = event.target;
        self.runtime
            .scheduler
            .cancel(TaskKey::node(node, TaskChannel::Tooltip));
        if let Some(tooltip) = &self.runtime.tooltip {
            tooltip.hide();
        }
        self.animate_stroke(node, 0.0);
        true
    }

    /// Animates a path's stroke width; other nodes have no stroke.
    fn animate_stroke(&mut self, node: NodeId, to: f64) {
        let Some(from) = self
            .runtime
            .scene
            .node(node)
            .and_then(SceneNode::as_path)
            .map(|path| path.stroke_width)
        else {
            return;
        };
        self.runtime.scheduler.schedule(
            TaskKey::node(node, TaskChannel::Stroke),
            Duration::ZERO,
            HOVER_STROKE_DURATION,
            Ease::default(),
            GraphTask::Stroke { from, to },
        );
    }

    /// Hit-tests the event against freshly computed stage boundaries.
    fn section_metadata(&mut self, event: &PointerEvent) -> Option<SectionMetadata> {
        let context = self.context();
        self.model.line_positions = context.line_positions();
        let coordinate = event.primary_coordinate(context.is_vertical());
        let section = resolve_section(coordinate, &self.model.line_positions);
        let payload = self.runtime.payloads.get(&event.target)?;
        Some(resolve_metadata(payload, section))
    }

    fn sample_running(&mut self) {
        let runtime = &mut self.runtime;
        for (task, progress) in runtime.scheduler.running() {
            let TaskTarget::Node(node) = task.key.target else {
                continue;
            };
            let Some(scene_node) = runtime.scene.node_mut(node) else {
                continue;
            };
            match (&task.payload, &mut scene_node.kind) {
                (GraphTask::Path { from, to, .. }, NodeKind::Path(path)) => {
                    let visual = from.interpolate(to, progress);
                    path.shape = visual.shape;
                    path.opacity = visual.opacity;
                    path.stroke_width = visual.stroke_width;
                }
                (GraphTask::Label { from_opacity, .. }, NodeKind::LabelGroup(group)) => {
                    group.opacity = lerp(*from_opacity, 1.0, progress);
                }
                (GraphTask::Stroke { from, to }, NodeKind::Path(path)) => {
                    path.stroke_width = lerp(*from, *to, progress);
                }
                _ => {}
            }
        }
    }

    fn complete_task(&mut self, task: Task<GraphTask>) {
        match (task.key.target, task.payload) {
            (
                TaskTarget::Node(node),
                GraphTask::Path {
                    phase: Phase::Exit, ..
                },
            ) => {
                self.runtime.router.detach_click(node);
                self.remove_node(node);
                trace!(graph_id = %self.id, node = node.raw(), "path removed");
            }
            (TaskTarget::Node(node), GraphTask::Path { to, .. }) => {
                if let Some(path) = self
                    .runtime
                    .scene
                    .node_mut(node)
                    .and_then(SceneNode::as_path_mut)
                {
                    path.shape = to.shape;
                    path.opacity = to.opacity;
                    path.stroke_width = to.stroke_width;
                    path.pointer_events = true;
                }
                self.wire_node(node);
            }
            (TaskTarget::Node(node), GraphTask::Label { phase, .. }) => {
                if let Some(group) = self
                    .runtime
                    .scene
                    .node_mut(node)
                    .and_then(SceneNode::as_label_group_mut)
                {
                    group.opacity = 1.0;
                    group.pointer_events = true;
                }
                self.wire_node(node);
                trace!(graph_id = %self.id, node = node.raw(), ?phase, "label group settled");
            }
            (TaskTarget::Node(node), GraphTask::Stroke { to, .. }) => {
                if let Some(path) = self
                    .runtime
                    .scene
                    .node_mut(node)
                    .and_then(SceneNode::as_path_mut)
                {
                    path.stroke_width = to;
                }
            }
            (
                TaskTarget::Node(_),
                GraphTask::Tooltip {
                    role,
                    event,
                    metadata,
                },
            ) => self.fire_tooltip(role, &event, metadata),
            (TaskTarget::Graph, GraphTask::Resize) => self.on_resize(),
            (target, _) => {
                trace!(graph_id = %self.id, ?target, "task without effect");
            }
        }
    }

    /// Shows the tooltip for a resolved section once the hover delay elapsed.
    fn fire_tooltip(&mut self, role: NodeRole, event: &PointerEvent, metadata: SectionMetadata) {
        let config = &self.model.config;
        let (enabled, callback) = match role {
            NodeRole::Path => (config.tooltip, config.callbacks.tooltip.clone()),
            NodeRole::LabelGroup => (config.tooltip_label, config.callbacks.tooltip_label.clone()),
        };
        if !enabled {
            return;
        }
        let is_2d = self.model.series.is_2d();

        if let Some(callback) = callback {
            callback(
                event,
                &TooltipPayload {
                    label: tooltip_label(&metadata, is_2d),
                    value: metadata.value,
                    x: event.offset_x,
                    y: event.offset_y,
                    section_details: metadata.section_details.clone(),
                },
            );
        } else {
            let lines = tooltip_lines(&metadata, is_2d, &config.format);
            if lines.is_empty() {
                return;
            }
            let Some(tooltip) = &self.runtime.tooltip else {
                return;
            };
            tooltip.show(
                &self.id,
                lines,
                event.offset_x + TOOLTIP_OFFSET,
                event.offset_y + TOOLTIP_OFFSET,
            );
        }
        self.emit_plugin_event(GraphEvent::TooltipShown {
            section_index: metadata.section_index,
        });
    }
}
