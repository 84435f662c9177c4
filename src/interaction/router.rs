use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::render::NodeId;

/// What kind of node a payload or binding belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeRole {
    Path,
    LabelGroup,
}

/// Which callback slot a click handler dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClickBinding {
    Path,
    Label,
}

/// Which tooltip gate a hover handler set is subject to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HoverBinding {
    Path,
    Label,
}

/// Handlers attached to one node. Hover covers enter, move and leave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NodeHandlers {
    pub click: Option<ClickBinding>,
    pub hover: Option<HoverBinding>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AttachOutcome {
    pub click_attached: bool,
    pub hover_attached: bool,
    pub hover_cleared: bool,
}

/// Explicit per-node registry of attached handler kinds.
#[derive(Debug, Clone, Default)]
pub struct HandlerRegistry {
    handlers: HashMap<NodeId, NodeHandlers>,
}

impl HandlerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wires a node.
    ///
    /// A click binding is only added when the node has none. Hover handlers
    /// are only added when the node has none; passing `None` clears them.
    pub fn attach_interaction(
        &mut self,
        node: NodeId,
        click: Option<ClickBinding>,
        hover: Option<HoverBinding>,
    ) -> AttachOutcome {
        let entry = self.handlers.entry(node).or_default();
        let mut outcome = AttachOutcome::default();

        if entry.click.is_none() && click.is_some() {
            entry.click = click;
            outcome.click_attached = true;
        }

        match hover {
            Some(binding) if entry.hover.is_none() => {
                entry.hover = Some(binding);
                outcome.hover_attached = true;
            }
            Some(_) => {}
            None => {
                outcome.hover_cleared = entry.hover.take().is_some();
            }
        }

        if *entry == NodeHandlers::default() {
            self.handlers.remove(&node);
        }
        outcome
    }

    /// Removes the click binding. Returns `true` when one was attached.
    pub fn detach_click(&mut self, node: NodeId) -> bool {
        let Some(entry) = self.handlers.get_mut(&node) else {
            return false;
        };
        let removed = entry.click.take().is_some();
        if entry.hover.is_none() {
            self.handlers.remove(&node);
        }
        removed
    }

    pub fn detach_all(&mut self, node: NodeId) -> bool {
        self.handlers.remove(&node).is_some()
    }

    pub fn clear(&mut self) {
        self.handlers.clear();
    }

    #[must_use]
    pub fn handlers(&self, node: NodeId) -> NodeHandlers {
        self.handlers.get(&node).copied().unwrap_or_default()
    }

    /// Number of nodes with at least one handler.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    #[must_use]
    pub fn click_handler_count(&self) -> usize {
        self.handlers
            .values()
            .filter(|entry| entry.click.is_some())
            .count()
    }

    #[must_use]
    pub fn hover_handler_count(&self) -> usize {
        self.handlers
            .values()
            .filter(|entry| entry.hover.is_some())
            .count()
    }
}

/// Maps a primary-axis coordinate to a section index.
///
/// Returns `i + 1` for the first boundary `i` whose interval
/// `[boundaries[i], boundaries[i + 1]]` contains `coord`; the last interval
/// has no upper bound. Anything before the first boundary is section 0.
#[must_use]
pub fn resolve_section(coord: f64, boundaries: &[f64]) -> usize {
    boundaries
        .iter()
        .enumerate()
        .position(|(index, start)| {
            let end = boundaries.get(index + 1).copied().unwrap_or(f64::INFINITY);
            coord >= *start && coord <= end
        })
        .map_or(0, |index| index + 1)
}

/// Named sub-series value inside one stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionDetail {
    pub value: f64,
    pub name: String,
    /// Percent of the stage total held by this sub-series.
    pub share: f64,
}

/// Data snapshot attached to a path or label group when it was last bound.
///
/// Hit-testing reads it at event time, so handlers never close over stale
/// series data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodePayload {
    pub role: NodeRole,
    pub index: usize,
    /// Per-stage values seen by this node.
    pub values: Vec<f64>,
    pub labels: Vec<String>,
    pub sub_labels: Vec<String>,
    /// Per-stage sub-series breakdown, label groups of 2D funnels only.
    pub section_details: Option<Vec<Vec<SectionDetail>>>,
}

/// Metadata handed to click and tooltip consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionMetadata {
    pub index: usize,
    pub value: Option<f64>,
    pub label: Option<String>,
    pub sub_label: Option<String>,
    pub section_index: usize,
    pub section_details: Option<Vec<SectionDetail>>,
}

#[must_use]
pub fn resolve_metadata(payload: &NodePayload, section_index: usize) -> SectionMetadata {
    let non_empty = |text: Option<&String>| text.filter(|text| !text.is_empty()).cloned();
    SectionMetadata {
        index: payload.index,
        value: payload.values.get(section_index).copied(),
        label: non_empty(payload.labels.get(section_index)),
        sub_label: non_empty(payload.sub_labels.get(payload.index)),
        section_index,
        section_details: payload
            .section_details
            .as_ref()
            .and_then(|stages| stages.get(section_index))
            .cloned(),
    }
}
