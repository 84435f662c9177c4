use serde::{Deserialize, Serialize};

/// Primary flow direction of the funnel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Horizontal,
    Vertical,
}

impl Direction {
    /// Parses a loose direction name; anything unknown falls back to horizontal.
    #[must_use]
    pub fn from_name(name: Option<&str>) -> Self {
        match name {
            Some("vertical") => Self::Vertical,
            _ => Self::Horizontal,
        }
    }

    #[must_use]
    pub fn is_vertical(self) -> bool {
        self == Self::Vertical
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }
}

/// Axis along which multi-color gradients run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientDirection {
    #[default]
    Horizontal,
    Vertical,
}

impl GradientDirection {
    /// Only an explicit `"vertical"` selects the vertical axis.
    #[must_use]
    pub fn from_name(name: Option<&str>) -> Self {
        match name {
            Some("vertical") => Self::Vertical,
            _ => Self::Horizontal,
        }
    }

    /// Gradient vector as `(x1, y1, x2, y2)`.
    #[must_use]
    pub fn vector(self) -> (f64, f64, f64, f64) {
        match self {
            Self::Vertical => (0.0, 0.0, 0.0, 1.0),
            Self::Horizontal => (0.0, 0.0, 1.0, 0.0),
        }
    }
}

/// Offset applied to label text blocks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextMargin {
    #[serde(default)]
    pub left: f64,
    #[serde(default)]
    pub top: f64,
}

impl Default for TextMargin {
    fn default() -> Self {
        Self {
            left: 0.0,
            top: 10.0,
        }
    }
}

/// Space reserved around the plotting area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
    pub text: TextMargin,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            top: 120.0,
            right: 60.0,
            bottom: 60.0,
            left: 60.0,
            text: TextMargin::default(),
        }
    }
}

impl Margin {
    /// Shallow merge: only fields present in `update` are replaced.
    pub fn merge(&mut self, update: &MarginUpdate) {
        if let Some(top) = update.top {
            self.top = top;
        }
        if let Some(right) = update.right {
            self.right = right;
        }
        if let Some(bottom) = update.bottom {
            self.bottom = bottom;
        }
        if let Some(left) = update.left {
            self.left = left;
        }
        match update.text {
            Some(TextMarginUpdate::Offset(top)) => {
                self.text = TextMargin { left: 0.0, top };
            }
            Some(TextMarginUpdate::Full(text)) => self.text = text,
            None => {}
        }
    }

    #[must_use]
    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    #[must_use]
    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

/// Text offset may be given as a bare number (top offset) or as an object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextMarginUpdate {
    Offset(f64),
    Full(TextMargin),
}

/// Partial margin used by options and data updates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MarginUpdate {
    #[serde(default)]
    pub top: Option<f64>,
    #[serde(default)]
    pub right: Option<f64>,
    #[serde(default)]
    pub bottom: Option<f64>,
    #[serde(default)]
    pub left: Option<f64>,
    #[serde(default)]
    pub text: Option<TextMarginUpdate>,
}

/// Client box of the element hosting the chart.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ContainerBox {
    pub client_width: f64,
    pub client_height: f64,
}

impl ContainerBox {
    #[must_use]
    pub fn new(client_width: f64, client_height: f64) -> Self {
        Self {
            client_width,
            client_height,
        }
    }
}

/// Which dimensions stretch to the container (`100%`) instead of fixed pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResponsiveFlags {
    pub width: bool,
    pub height: bool,
}

impl ResponsiveFlags {
    #[must_use]
    pub fn from_options(responsive: bool, width: bool, height: bool) -> Self {
        Self {
            width: responsive || width,
            height: responsive || height,
        }
    }
}
