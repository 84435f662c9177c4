use serde::{Deserialize, Serialize};

use crate::core::{
    ColorSet, ContainerBox, DataSeries, Direction, GradientDirection, InfoItem, Margin,
    ResponsiveFlags, info_items,
};

/// Read-only snapshot of a graph's configuration and derived data.
///
/// Every pass builds a fresh snapshot, so geometry, binders and hit-testing
/// never observe a half-applied mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphContext {
    pub id: String,
    pub direction: Direction,
    pub gradient_direction: GradientDirection,
    /// Plotting width, margins excluded.
    pub width: f64,
    /// Plotting height, margins excluded.
    pub height: f64,
    pub margin: Margin,
    pub series: DataSeries,
    pub percentages: Vec<f64>,
    pub colors: ColorSet,
    pub details: bool,
    pub tooltip: bool,
    pub tooltip_label: bool,
    pub display_percent: bool,
    pub responsive: ResponsiveFlags,
    pub container: Option<ContainerBox>,
    /// Whether the root scene container exists.
    pub mounted: bool,
}

/// Rendered box of the root scene relative to its nominal size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderedBox {
    pub width: f64,
    pub height: f64,
    pub x_factor: f64,
    pub y_factor: f64,
}

impl GraphContext {
    #[must_use]
    pub fn is_2d(&self) -> bool {
        self.series.is_2d()
    }

    #[must_use]
    pub fn is_vertical(&self) -> bool {
        self.direction.is_vertical()
    }

    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.series.stage_count()
    }

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

    #[must_use]
    pub fn info(&self) -> Vec<InfoItem> {
        info_items(&self.series, &self.percentages, self.display_percent)
    }

    /// Size the root occupies on screen.
    ///
    /// Responsive dimensions follow the container box when one is known; fixed
    /// dimensions use the nominal full size. Before the root is mounted the
    /// nominal size is reported with unit factors.
    #[must_use]
    pub fn rendered_box(&self) -> RenderedBox {
        let full_width = self.full_width();
        let full_height = self.full_height();
        if !self.mounted {
            return RenderedBox {
                width: full_width,
                height: full_height,
                x_factor: 1.0,
                y_factor: 1.0,
            };
        }

        let width = match (self.responsive.width, self.container) {
            (true, Some(container)) => container.client_width,
            _ => full_width,
        };
        let height = match (self.responsive.height, self.container) {
            (true, Some(container)) => container.client_height,
            _ => full_height,
        };

        RenderedBox {
            width,
            height,
            x_factor: scale_factor(width, full_width),
            y_factor: scale_factor(height, full_height),
        }
    }

    /// Stage boundary positions in rendered coordinates, one per stage.
    ///
    /// The last boundary sits on the far edge of the plotting area.
    #[must_use]
    pub fn line_positions(&self) -> Vec<f64> {
        let stages = self.stage_count();
        if stages == 0 {
            return Vec::new();
        }
        let rendered = self.rendered_box();
        let margin = &self.margin;
        let no_margin_width =
            rendered.width - margin.left * rendered.x_factor - margin.right * rendered.x_factor;
        let no_margin_height =
            rendered.height - margin.top * rendered.y_factor - margin.bottom * rendered.y_factor;
        let (extent, origin) = if self.is_vertical() {
            (no_margin_height, margin.top * rendered.y_factor)
        } else {
            (no_margin_width, margin.left * rendered.x_factor)
        };
        let spacing = extent / stages as f64;

        (0..stages)
            .map(|index| spacing * (index + 1) as f64 + origin)
            .collect()
    }
}

fn scale_factor(actual: f64, nominal: f64) -> f64 {
    if nominal > 0.0 && actual.is_finite() {
        actual / nominal
    } else {
        1.0
    }
}
