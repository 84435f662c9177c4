use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{GradientDirection, PathShape};
use crate::error::{FunnelError, FunnelResult};

/// Identity of one retained scene node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(u64);

impl NodeId {
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Root size attribute: fixed pixels or a percentage of the container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SvgLength {
    Px(f64),
    Percent(f64),
}

impl std::fmt::Display for SvgLength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Px(value) => write!(f, "{value}"),
            Self::Percent(value) => write!(f, "{value}%"),
        }
    }
}

/// Root container of a chart scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootSvg {
    pub id: String,
    pub width: SvgLength,
    pub height: SvgLength,
    pub view_box: (f64, f64),
    /// Translation of the graph group, taken from the margin.
    pub graph_offset: (f64, f64),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Paint {
    None,
    Color(String),
    Gradient(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathNode {
    pub shape: PathShape,
    pub fill: Paint,
    pub stroke: Paint,
    pub opacity: f64,
    pub stroke_width: f64,
    pub pointer_events: bool,
    pub cursor_pointer: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextRole {
    Value,
    Title,
    Percentage,
}

impl TextRole {
    #[must_use]
    pub const fn class_name(self) -> &'static str {
        match self {
            Self::Value => "label__value",
            Self::Title => "label__title",
            Self::Percentage => "label__percentage",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLine {
    pub role: TextRole,
    pub text: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelGroupNode {
    pub lines: SmallVec<[TextLine; 3]>,
    pub opacity: f64,
    pub pointer_events: bool,
    pub cursor_pointer: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DividerNode {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    Path(PathNode),
    LabelGroup(LabelGroupNode),
    Divider(DividerNode),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    pub id: NodeId,
    pub kind: NodeKind,
    /// Set while the node fades out; exiting nodes leave every join.
    pub exiting: bool,
}

impl SceneNode {
    #[must_use]
    pub fn as_path(&self) -> Option<&PathNode> {
        match &self.kind {
            NodeKind::Path(path) => Some(path),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_path_mut(&mut self) -> Option<&mut PathNode> {
        match &mut self.kind {
            NodeKind::Path(path) => Some(path),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_label_group(&self) -> Option<&LabelGroupNode> {
        match &self.kind {
            NodeKind::LabelGroup(group) => Some(group),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_label_group_mut(&mut self) -> Option<&mut LabelGroupNode> {
        match &mut self.kind {
            NodeKind::LabelGroup(group) => Some(group),
            _ => None,
        }
    }

    /// Whether the node currently accepts pointer input.
    #[must_use]
    pub fn accepts_pointer(&self) -> bool {
        match &self.kind {
            NodeKind::Path(path) => path.pointer_events && !self.exiting,
            NodeKind::LabelGroup(group) => group.pointer_events && !self.exiting,
            NodeKind::Divider(_) => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradientStop {
    pub offset_percent: u32,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinearGradient {
    pub id: String,
    pub direction: GradientDirection,
    pub stops: Vec<GradientStop>,
}

/// Retained vector scene of one chart.
///
/// Nodes live in an insertion-ordered arena. The positional join order of each
/// node family is kept separately so reconciliation can address nodes by index.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    next_id: u64,
    root: Option<RootSvg>,
    nodes: IndexMap<NodeId, SceneNode>,
    gradients: IndexMap<String, LinearGradient>,
    paths: Vec<NodeId>,
    label_groups: Vec<NodeId>,
    dividers: Vec<NodeId>,
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn root(&self) -> Option<&RootSvg> {
        self.root.as_ref()
    }

    pub fn root_mut(&mut self) -> Option<&mut RootSvg> {
        self.root.as_mut()
    }

    pub fn mount(&mut self, root: RootSvg) {
        self.root = Some(root);
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.root.is_some()
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(&id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &SceneNode> {
        self.nodes.values()
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn insert(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(
            id,
            SceneNode {
                id,
                kind,
                exiting: false,
            },
        );
        id
    }

    /// Removes a node from the arena and from every join list.
    pub(crate) fn remove(&mut self, id: NodeId) -> Option<SceneNode> {
        self.paths.retain(|node| *node != id);
        self.label_groups.retain(|node| *node != id);
        self.dividers.retain(|node| *node != id);
        self.nodes.shift_remove(&id)
    }

    /// Active path nodes in join order.
    #[must_use]
    pub fn path_ids(&self) -> &[NodeId] {
        &self.paths
    }

    #[must_use]
    pub fn label_group_ids(&self) -> &[NodeId] {
        &self.label_groups
    }

    #[must_use]
    pub fn divider_ids(&self) -> &[NodeId] {
        &self.dividers
    }

    pub(crate) fn paths_mut(&mut self) -> &mut Vec<NodeId> {
        &mut self.paths
    }

    pub(crate) fn label_groups_mut(&mut self) -> &mut Vec<NodeId> {
        &mut self.label_groups
    }

    pub(crate) fn dividers_mut(&mut self) -> &mut Vec<NodeId> {
        &mut self.dividers
    }

    /// Path nodes currently fading out.
    pub fn exiting_path_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .values()
            .filter(|node| node.exiting && matches!(node.kind, NodeKind::Path(_)))
            .map(|node| node.id)
    }

    #[must_use]
    pub fn gradient(&self, id: &str) -> Option<&LinearGradient> {
        self.gradients.get(id)
    }

    pub fn gradients(&self) -> impl Iterator<Item = &LinearGradient> {
        self.gradients.values()
    }

    /// Creates the gradient if absent, otherwise replaces its stops in place.
    pub(crate) fn upsert_gradient(
        &mut self,
        id: &str,
        direction: GradientDirection,
        colors: &[String],
    ) {
        let stops = gradient_stops(colors);
        match self.gradients.get_mut(id) {
            Some(gradient) => {
                gradient.direction = direction;
                gradient.stops = stops;
            }
            None => {
                self.gradients.insert(
                    id.to_owned(),
                    LinearGradient {
                        id: id.to_owned(),
                        direction,
                        stops,
                    },
                );
            }
        }
    }

    pub(crate) fn set_gradient_direction(&mut self, direction: GradientDirection) {
        for gradient in self.gradients.values_mut() {
            gradient.direction = direction;
        }
    }

    /// Drops every node, gradient and the root.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.gradients.clear();
        self.paths.clear();
        self.label_groups.clear();
        self.dividers.clear();
        self.root = None;
    }

    /// Checks that every numeric attribute is renderable.
    pub fn validate(&self) -> FunnelResult<()> {
        if let Some(root) = &self.root {
            let (width, height) = root.view_box;
            if !width.is_finite() || !height.is_finite() || width < 0.0 || height < 0.0 {
                return Err(FunnelError::InvalidSize { width, height });
            }
        }
        for node in self.nodes.values() {
            match &node.kind {
                NodeKind::Path(path) => {
                    validate_unit("path opacity", path.opacity)?;
                    if !path.stroke_width.is_finite() || path.stroke_width < 0.0 {
                        return Err(FunnelError::InvalidData(
                            "path stroke width must be finite and >= 0".to_owned(),
                        ));
                    }
                    if path
                        .shape
                        .upper
                        .iter()
                        .chain(&path.shape.lower)
                        .any(|point| !point.x.is_finite() || !point.y.is_finite())
                    {
                        return Err(FunnelError::InvalidData(
                            "path coordinates must be finite".to_owned(),
                        ));
                    }
                }
                NodeKind::LabelGroup(group) => {
                    validate_unit("label opacity", group.opacity)?;
                    if group
                        .lines
                        .iter()
                        .any(|line| !line.x.is_finite() || !line.y.is_finite())
                    {
                        return Err(FunnelError::InvalidData(
                            "label coordinates must be finite".to_owned(),
                        ));
                    }
                }
                NodeKind::Divider(line) => {
                    if [line.x1, line.y1, line.x2, line.y2]
                        .iter()
                        .any(|value| !value.is_finite())
                    {
                        return Err(FunnelError::InvalidData(
                            "divider coordinates must be finite".to_owned(),
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}

fn validate_unit(name: &str, value: f64) -> FunnelResult<()> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(FunnelError::InvalidData(format!(
            "{name} must be finite and in [0, 1]"
        )));
    }
    Ok(())
}

fn gradient_stops(colors: &[String]) -> Vec<GradientStop> {
    let last = colors.len().saturating_sub(1).max(1) as f64;
    colors
        .iter()
        .enumerate()
        .map(|(index, color)| GradientStop {
            offset_percent: (100.0 * index as f64 / last).round() as u32,
            color: color.clone(),
        })
        .collect()
}
