use tracing::{debug, trace};

use crate::core::{
    ColorStops, Ease, GeometryProvider, GraphContext, PathDefinition, PathDefinitions,
    default_colors,
};
use crate::extensions::GraphEvent;
use crate::interaction::{ClickBinding, HoverBinding, NodePayload, NodeRole};
use crate::render::{NodeId, NodeKind, Paint, PathNode};

use super::transition::{PATH_DURATION, Phase, PathVisual, stagger};
use super::{FunnelGraph, GraphTask, TaskChannel, TaskKey};

impl<G: GeometryProvider> FunnelGraph<G> {
    /// Reconciles path nodes against `definitions` by position.
    ///
    /// Returns the number of active paths after the join.
    pub(super) fn bind_paths(
        &mut self,
        context: &GraphContext,
        definitions: &PathDefinitions,
    ) -> usize {
        let target = definitions.paths.len();
        let previous = self.runtime.scene.path_ids().to_vec();

        for (index, node) in previous.iter().enumerate().skip(target) {
            self.exit_path(*node, index);
        }
        self.runtime.scene.paths_mut().truncate(target);

        for (index, definition) in definitions.paths.iter().enumerate() {
            let fill = self.resolve_fill(context, index);
            let payload = path_payload(context, index);
            match previous.get(index) {
                Some(node) => self.update_path(*node, index, definition, fill, payload),
                None => self.enter_path(index, definition, fill, payload),
            }
        }
        target
    }

    fn enter_path(
        &mut self,
        index: usize,
        definition: &PathDefinition,
        fill: Paint,
        payload: NodePayload,
    ) {
        let node = self.runtime.scene.insert(NodeKind::Path(PathNode {
            shape: definition.path.clone(),
            stroke: fill.clone(),
            fill,
            opacity: 0.0,
            stroke_width: 0.0,
            pointer_events: false,
            cursor_pointer: false,
        }));
        self.runtime.scene.paths_mut().push(node);
        self.runtime.payloads.insert(node, payload);

        let from = PathVisual {
            shape: definition.path.clone(),
            opacity: 0.0,
            stroke_width: 0.0,
        };
        let to = PathVisual {
            opacity: 1.0,
            ..from.clone()
        };
        self.runtime.scheduler.schedule(
            TaskKey::node(node, TaskChannel::Transition),
            stagger(index),
            PATH_DURATION,
            Ease::default(),
            GraphTask::Path {
                phase: Phase::Enter,
                from,
                to,
            },
        );
        trace!(graph_id = %self.id, node = node.raw(), index, "path entered");
    }

    fn update_path(
        &mut self,
        node: NodeId,
        index: usize,
        definition: &PathDefinition,
        fill: Paint,
        payload: NodePayload,
    ) {
        self.runtime.payloads.insert(node, payload);
        let in_flight = self
            .runtime
            .scheduler
            .contains(TaskKey::node(node, TaskChannel::Transition));
        let to = PathVisual {
            shape: definition.path.clone(),
            opacity: 1.0,
            stroke_width: 0.0,
        };

        let Some(path) = self
            .runtime
            .scene
            .node_mut(node)
            .and_then(|scene_node| scene_node.as_path_mut())
        else {
            return;
        };
        path.stroke = fill.clone();
        path.fill = fill;
        let from = PathVisual {
            shape: path.shape.clone(),
            opacity: path.opacity,
            stroke_width: path.stroke_width,
        };

        if !in_flight && path.pointer_events && from == to {
            self.wire_node(node);
            return;
        }

        path.pointer_events = false;
        self.runtime
            .scheduler
            .cancel(TaskKey::node(node, TaskChannel::Stroke));
        self.runtime.scheduler.schedule(
            TaskKey::node(node, TaskChannel::Transition),
            stagger(index),
            PATH_DURATION,
            Ease::default(),
            GraphTask::Path {
                phase: Phase::Update,
                from,
                to,
            },
        );
    }

    /// Starts the fade-out of a path leaving the join, staggered by its
    /// position before the join.
    ///
    /// The node stays in the scene until the fade completes but no longer
    /// takes part in joins.
    fn exit_path(&mut self, node: NodeId, index: usize) {
        self.runtime
            .scheduler
            .cancel(TaskKey::node(node, TaskChannel::Stroke));
        self.runtime
            .scheduler
            .cancel(TaskKey::node(node, TaskChannel::Tooltip));

        let Some(scene_node) = self.runtime.scene.node_mut(node) else {
            return;
        };
        scene_node.exiting = true;
        let Some(path) = scene_node.as_path_mut() else {
            return;
        };
        path.pointer_events = false;
        let from = PathVisual {
            shape: path.shape.clone(),
            opacity: path.opacity,
            stroke_width: path.stroke_width,
        };
        let to = PathVisual {
            opacity: 0.0,
            stroke_width: 0.0,
            ..from.clone()
        };
        self.runtime.scheduler.schedule(
            TaskKey::node(node, TaskChannel::Transition),
            stagger(index),
            PATH_DURATION,
            Ease::default(),
            GraphTask::Path {
                phase: Phase::Exit,
                from,
                to,
            },
        );
        trace!(graph_id = %self.id, node = node.raw(), index, "path exiting");
    }

    /// Paint for the path at `index`: a solid color, or a gradient def kept
    /// under a stable id whose stops are replaced in place.
    fn resolve_fill(&mut self, context: &GraphContext, index: usize) -> Paint {
        let stops = context
            .colors
            .for_path(index, context.is_2d())
            .filter(|stops| !stops.is_empty())
            .unwrap_or_else(|| {
                debug!(graph_id = %self.id, index, "no colors for path, using palette");
                ColorStops::solid(default_colors(index + 1).pop().unwrap_or_default())
            });

        if let Some(color) = stops.solid_color() {
            return Paint::Color(color.to_owned());
        }
        let gradient_id = format!("funnelGradient-{}", index + 1);
        self.runtime
            .scene
            .upsert_gradient(&gradient_id, context.gradient_direction, stops.as_slice());
        Paint::Gradient(gradient_id)
    }

    /// Attaches handlers to a node whose transition completed.
    ///
    /// Label groups drop their click binding first so the current callback
    /// configuration is always the one wired.
    pub(super) fn wire_node(&mut self, node: NodeId) {
        let Some(role) = self.runtime.payloads.get(&node).map(|payload| payload.role) else {
            return;
        };
        let callbacks = &self.model.config.callbacks;
        let (click, hover) = match role {
            NodeRole::Path => (
                callbacks.click.as_ref().map(|_| ClickBinding::Path),
                HoverBinding::Path,
            ),
            NodeRole::LabelGroup => (
                callbacks.label.as_ref().map(|_| ClickBinding::Label),
                HoverBinding::Label,
            ),
        };
        let hover = self.model.config.details.then_some(hover);

        if role == NodeRole::LabelGroup {
            self.runtime.router.detach_click(node);
        }
        let outcome = self.runtime.router.attach_interaction(node, click, hover);

        if role == NodeRole::LabelGroup {
            let has_click = self.runtime.router.handlers(node).click.is_some();
            if let Some(group) = self
                .runtime
                .scene
                .node_mut(node)
                .and_then(|scene_node| scene_node.as_label_group_mut())
            {
                group.cursor_pointer = has_click;
            }
        }

        trace!(
            graph_id = %self.id,
            node = node.raw(),
            click = outcome.click_attached,
            hover = outcome.hover_attached,
            hover_cleared = outcome.hover_cleared,
            "interaction wired"
        );
        self.emit_plugin_event(GraphEvent::InteractionWired { node });
    }
}

/// Data a path exposes to hit-testing: its sub-series column for 2D funnels,
/// every stage value for 1D funnels.
fn path_payload(context: &GraphContext, index: usize) -> NodePayload {
    let values = if context.is_2d() {
        context.series.values.sub_series(index)
    } else {
        context.series.values.stage_totals()
    };
    NodePayload {
        role: NodeRole::Path,
        index,
        values,
        labels: context.series.labels.clone(),
        sub_labels: context.series.sub_labels.clone(),
        section_details: None,
    }
}
