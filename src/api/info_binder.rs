use std::time::Duration;

use smallvec::SmallVec;

use crate::core::{
    Ease, FormatItem, FunnelValues, GeometryProvider, GraphContext, InfoItem, TextMeasurer,
};
use crate::interaction::{NodePayload, NodeRole, SectionDetail};
use crate::render::{DividerNode, LabelGroupNode, NodeId, NodeKind, TextLine, TextRole};

use super::transition::{LABEL_DURATION, LABEL_UPDATE_OPACITY, Phase};
use super::{FunnelGraph, GraphTask, TaskChannel, TaskKey};

const VALUE_FONT_SIZE: f64 = 18.0;
const TITLE_FONT_SIZE: f64 = 14.0;
const PERCENTAGE_FONT_SIZE: f64 = 14.0;
const LINE_PADDING: f64 = 5.0;

/// Stage spacing along the primary axis for one info pass.
#[derive(Debug, Clone, Copy)]
struct InfoLayout {
    vertical: bool,
    spacing: f64,
    origin: f64,
    text_left: f64,
    text_top: f64,
    /// Stage count plus one; divides the spacing into the label inset.
    text_gap: f64,
    full_width: f64,
    full_height: f64,
}

impl InfoLayout {
    fn new(context: &GraphContext) -> Self {
        let vertical = context.is_vertical();
        let stages = context.stage_count().max(1) as f64;
        let margin = &context.margin;
        let (extent, origin) = if vertical {
            (context.height, margin.top)
        } else {
            (context.width, margin.left)
        };
        Self {
            vertical,
            spacing: extent / stages,
            origin,
            text_left: margin.text.left,
            text_top: margin.text.top,
            text_gap: context.stage_count() as f64 + 1.0,
            full_width: context.full_width(),
            full_height: context.full_height(),
        }
    }

    fn anchor(&self, index: usize) -> (f64, f64) {
        let position = self.spacing * index as f64
            + self.origin
            + self.text_left
            + self.spacing / self.text_gap;
        if self.vertical {
            (self.text_left, position)
        } else {
            (position, self.text_top)
        }
    }

    fn divider(&self, index: usize) -> DividerNode {
        let position = self.spacing * (index + 1) as f64 + self.origin;
        if self.vertical {
            DividerNode {
                x1: 0.0,
                y1: position,
                x2: self.full_width,
                y2: position,
            }
        } else {
            DividerNode {
                x1: position,
                y1: 0.0,
                x2: position,
                y2: self.full_height,
            }
        }
    }
}

impl<G: GeometryProvider> FunnelGraph<G> {
    /// Reconciles label groups and dividers.
    ///
    /// Returns `(label_groups, dividers)` after the join.
    pub(super) fn bind_info(&mut self, context: &GraphContext) -> (usize, usize) {
        if !context.details {
            self.clear_info();
            return (0, 0);
        }

        let layout = InfoLayout::new(context);
        let info = context.info();
        let previous = self.runtime.scene.label_group_ids().to_vec();
        for node in previous.iter().skip(info.len()) {
            self.remove_node(*node);
        }

        for (index, item) in info.iter().enumerate() {
            let lines = self.label_lines(&layout, index, item);
            let payload = label_payload(context, index);
            match previous.get(index) {
                Some(node) => self.update_label_group(*node, lines, payload),
                None => self.enter_label_group(lines, payload),
            }
        }

        let dividers = self.bind_dividers(&layout, info.len().saturating_sub(1));
        (info.len(), dividers)
    }

    fn label_lines(
        &self,
        layout: &InfoLayout,
        index: usize,
        item: &InfoItem,
    ) -> SmallVec<[TextLine; 3]> {
        let value = self.model.config.format.format_value(&FormatItem {
            index,
            label: item.label.clone(),
            value: item.value,
            percentage: item.percentage.clone(),
        });
        let texts = [
            (TextRole::Value, value, VALUE_FONT_SIZE),
            (TextRole::Title, item.label.clone(), TITLE_FONT_SIZE),
            (
                TextRole::Percentage,
                item.percentage.clone().unwrap_or_default(),
                PERCENTAGE_FONT_SIZE,
            ),
        ];
        stack_lines(&*self.measurer, layout.anchor(index), texts)
    }

    fn enter_label_group(&mut self, lines: SmallVec<[TextLine; 3]>, payload: NodePayload) {
        let node = self.runtime.scene.insert(NodeKind::LabelGroup(LabelGroupNode {
            lines,
            opacity: 0.0,
            pointer_events: false,
            cursor_pointer: false,
        }));
        self.runtime.scene.label_groups_mut().push(node);
        self.runtime.payloads.insert(node, payload);
        self.schedule_label(node, Phase::Enter, 0.0);
    }

    fn update_label_group(
        &mut self,
        node: NodeId,
        lines: SmallVec<[TextLine; 3]>,
        payload: NodePayload,
    ) {
        self.runtime.payloads.insert(node, payload);
        let in_flight = self
            .runtime
            .scheduler
            .contains(TaskKey::node(node, TaskChannel::Transition));
        let Some(group) = self
            .runtime
            .scene
            .node_mut(node)
            .and_then(|scene_node| scene_node.as_label_group_mut())
        else {
            return;
        };

        if !in_flight && group.pointer_events && group.lines == lines {
            self.wire_node(node);
            return;
        }
        group.lines = lines;
        group.opacity = LABEL_UPDATE_OPACITY;
        self.schedule_label(node, Phase::Update, LABEL_UPDATE_OPACITY);
    }

    fn schedule_label(&mut self, node: NodeId, phase: Phase, from_opacity: f64) {
        self.runtime.scheduler.schedule(
            TaskKey::node(node, TaskChannel::Transition),
            Duration::ZERO,
            LABEL_DURATION,
            Ease::default(),
            GraphTask::Label {
                phase,
                from_opacity,
            },
        );
    }

    /// Positions `count` dividers; they are not animated.
    fn bind_dividers(&mut self, layout: &InfoLayout, count: usize) -> usize {
        let previous = self.runtime.scene.divider_ids().to_vec();
        for node in previous.iter().skip(count) {
            self.remove_node(*node);
        }
        for index in 0..count {
            let divider = layout.divider(index);
            match previous.get(index) {
                Some(node) => {
                    if let Some(scene_node) = self.runtime.scene.node_mut(*node) {
                        scene_node.kind = NodeKind::Divider(divider);
                    }
                }
                None => {
                    let node = self.runtime.scene.insert(NodeKind::Divider(divider));
                    self.runtime.scene.dividers_mut().push(node);
                }
            }
        }
        count
    }

    fn clear_info(&mut self) {
        let nodes: Vec<NodeId> = self
            .runtime
            .scene
            .label_group_ids()
            .iter()
            .chain(self.runtime.scene.divider_ids())
            .copied()
            .collect();
        for node in nodes {
            self.remove_node(node);
        }
    }
}

/// Stacks text lines below an anchor.
///
/// The running offset starts at the anchor's y; every line lands at
/// `height + offset + 5` and pushes the offset by `height + 5`.
fn stack_lines(
    measurer: &dyn TextMeasurer,
    (x, anchor_y): (f64, f64),
    texts: [(TextRole, String, f64); 3],
) -> SmallVec<[TextLine; 3]> {
    let mut offset = 0.0;
    texts
        .into_iter()
        .map(|(role, text, font_size)| {
            if offset == 0.0 {
                offset = anchor_y;
            }
            let (_, height) = measurer.measure(&text, font_size);
            let y = height + offset + LINE_PADDING;
            offset += height + LINE_PADDING;
            TextLine { role, text, x, y }
        })
        .collect()
}

/// Label groups see stage totals, plus a named sub-series breakdown with
/// in-stage shares for 2D funnels with sub-labels.
fn label_payload(context: &GraphContext, index: usize) -> NodePayload {
    let series = &context.series;
    let section_details = (context.is_2d() && !series.sub_labels.is_empty()).then(|| {
        let shares = series.values.sub_percentages();
        match &series.values {
            FunnelValues::TwoD(stages) => stages
                .iter()
                .zip(&shares)
                .map(|(stage, stage_shares)| {
                    stage
                        .iter()
                        .zip(stage_shares)
                        .enumerate()
                        .map(|(sub, (value, share))| SectionDetail {
                            value: *value,
                            name: series
                                .sub_labels
                                .get(sub)
                                .filter(|name| !name.is_empty())
                                .cloned()
                                .unwrap_or_else(|| "NA".to_owned()),
                            share: *share,
                        })
                        .collect()
                })
                .collect(),
            FunnelValues::OneD(_) => Vec::new(),
        }
    });
    NodePayload {
        role: NodeRole::LabelGroup,
        index,
        values: series.values.stage_totals(),
        labels: series.labels.clone(),
        sub_labels: Vec::new(),
        section_details,
    }
}
