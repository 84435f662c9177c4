use std::fmt;
use std::rc::Rc;

use serde::Deserialize;

use crate::core::{
    ColorSet, ContainerBox, DataSeries, Direction, FormatOptions, GradientDirection, Margin, MarginUpdate,
    ResponsiveFlags,
};
use crate::error::FunnelResult;
use crate::interaction::{PointerEvent, SectionMetadata, TooltipPayload};

use super::{ResizePolicy, ResizeSetting};

pub type ClickCallback = Rc<dyn Fn(&PointerEvent, &SectionMetadata)>;
pub type TooltipCallback = Rc<dyn Fn(&PointerEvent, &TooltipPayload)>;

/// Consumer callbacks. An absent slot means the matching handler is never
/// wired.
#[derive(Clone, Default)]
pub struct Callbacks {
    /// Path clicks.
    pub click: Option<ClickCallback>,
    /// Replaces the shared tooltip element for path hovers.
    pub tooltip: Option<TooltipCallback>,
    /// Replaces the shared tooltip element for label group hovers.
    pub tooltip_label: Option<TooltipCallback>,
    /// Label group clicks.
    pub label: Option<ClickCallback>,
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("click", &self.click.is_some())
            .field("tooltip", &self.tooltip.is_some())
            .field("tooltip_label", &self.tooltip_label.is_some())
            .field("label", &self.label.is_some())
            .finish()
    }
}

impl Callbacks {
    #[must_use]
    pub fn with_click(mut self, callback: impl Fn(&PointerEvent, &SectionMetadata) + 'static) -> Self {
        self.click = Some(Rc::new(callback));
        self
    }

    #[must_use]
    pub fn with_tooltip(
        mut self,
        callback: impl Fn(&PointerEvent, &TooltipPayload) + 'static,
    ) -> Self {
        self.tooltip = Some(Rc::new(callback));
        self
    }

    #[must_use]
    pub fn with_tooltip_label(
        mut self,
        callback: impl Fn(&PointerEvent, &TooltipPayload) + 'static,
    ) -> Self {
        self.tooltip_label = Some(Rc::new(callback));
        self
    }

    #[must_use]
    pub fn with_label(mut self, callback: impl Fn(&PointerEvent, &SectionMetadata) + 'static) -> Self {
        self.label = Some(Rc::new(callback));
        self
    }
}

/// Series and colors of a graph, as found under `data` in JSON options.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GraphData {
    #[serde(flatten)]
    pub series: DataSeries,
    #[serde(default)]
    pub colors: Option<ColorSet>,
}

/// Public graph bootstrap options.
///
/// Deserializable so hosts can keep chart setup in JSON; closures (format
/// providers and callbacks) are attached with the builder methods.
#[derive(Debug, Clone, Deserialize)]
pub struct FunnelGraphOptions {
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    /// Client box of the hosting container; sizes the graph when width or
    /// height are absent.
    #[serde(default)]
    pub container: Option<ContainerBox>,
    #[serde(default)]
    pub margin: Option<MarginUpdate>,
    #[serde(default, deserialize_with = "deserialize_direction")]
    pub direction: Direction,
    #[serde(
        default,
        alias = "gradientDirection",
        deserialize_with = "deserialize_gradient_direction"
    )]
    pub gradient_direction: GradientDirection,
    #[serde(default)]
    pub responsive: bool,
    #[serde(default, alias = "responsiveWidth")]
    pub responsive_width: bool,
    #[serde(default, alias = "responsiveHeight")]
    pub responsive_height: bool,
    #[serde(default)]
    pub resize: Option<ResizeSetting>,
    #[serde(default = "default_true")]
    pub details: bool,
    #[serde(default = "default_true")]
    pub tooltip: bool,
    #[serde(default = "default_true", alias = "tooltipLabel")]
    pub tooltip_label: bool,
    #[serde(default, alias = "displayPercent")]
    pub display_percent: bool,
    #[serde(default)]
    pub data: GraphData,
    #[serde(skip)]
    pub format: FormatOptions,
    #[serde(skip)]
    pub callbacks: Callbacks,
}

impl Default for FunnelGraphOptions {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            container: None,
            margin: None,
            direction: Direction::default(),
            gradient_direction: GradientDirection::default(),
            responsive: false,
            responsive_width: false,
            responsive_height: false,
            resize: None,
            details: true,
            tooltip: true,
            tooltip_label: true,
            display_percent: false,
            data: GraphData::default(),
            format: FormatOptions::default(),
            callbacks: Callbacks::default(),
        }
    }
}

impl FunnelGraphOptions {
    #[must_use]
    pub fn new(series: DataSeries) -> Self {
        Self {
            data: GraphData {
                series,
                colors: None,
            },
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> FunnelResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use]
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    #[must_use]
    pub fn with_container(mut self, client_width: f64, client_height: f64) -> Self {
        self.container = Some(ContainerBox::new(client_width, client_height));
        self
    }

    #[must_use]
    pub fn with_margin(mut self, margin: MarginUpdate) -> Self {
        self.margin = Some(margin);
        self
    }

    #[must_use]
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    #[must_use]
    pub fn with_gradient_direction(mut self, direction: GradientDirection) -> Self {
        self.gradient_direction = direction;
        self
    }

    #[must_use]
    pub fn with_responsive(mut self, width: bool, height: bool) -> Self {
        self.responsive_width = width;
        self.responsive_height = height;
        self
    }

    #[must_use]
    pub fn with_resize(mut self, resize: ResizeSetting) -> Self {
        self.resize = Some(resize);
        self
    }

    #[must_use]
    pub fn with_details(mut self, details: bool) -> Self {
        self.details = details;
        self
    }

    #[must_use]
    pub fn with_tooltip(mut self, tooltip: bool) -> Self {
        self.tooltip = tooltip;
        self
    }

    #[must_use]
    pub fn with_tooltip_label(mut self, tooltip_label: bool) -> Self {
        self.tooltip_label = tooltip_label;
        self
    }

    #[must_use]
    pub fn with_display_percent(mut self, display_percent: bool) -> Self {
        self.display_percent = display_percent;
        self
    }

    #[must_use]
    pub fn with_colors(mut self, colors: ColorSet) -> Self {
        self.data.colors = Some(colors);
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: FormatOptions) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn with_callbacks(mut self, callbacks: Callbacks) -> Self {
        self.callbacks = callbacks;
        self
    }
}

/// Live configuration owned by one graph.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    /// Plotting width, margins excluded.
    pub width: f64,
    /// Plotting height, margins excluded.
    pub height: f64,
    pub original_width: f64,
    pub original_height: f64,
    pub margin: Margin,
    pub direction: Direction,
    pub gradient_direction: GradientDirection,
    pub responsive: ResponsiveFlags,
    pub resize: Option<ResizePolicy>,
    pub details: bool,
    pub tooltip: bool,
    pub tooltip_label: bool,
    pub display_percent: bool,
    pub colors: ColorSet,
    pub format: FormatOptions,
    pub callbacks: Callbacks,
}

impl GraphConfig {
    /// Width including margins.
    #[must_use]
    pub fn full_width(&self) -> f64 {
        self.width + self.margin.horizontal()
    }

    /// Height including margins.
    #[must_use]
    pub fn full_height(&self) -> f64 {
        self.height + self.margin.vertical()
    }
}

fn default_true() -> bool {
    true
}

fn deserialize_direction<'de, D>(deserializer: D) -> Result<Direction, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let name: Option<String> = Option::deserialize(deserializer)?;
    Ok(Direction::from_name(name.as_deref()))
}

fn deserialize_gradient_direction<'de, D>(deserializer: D) -> Result<GradientDirection, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let name: Option<String> = Option::deserialize(deserializer)?;
    Ok(GradientDirection::from_name(name.as_deref()))
}
