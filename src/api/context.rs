use crate::core::{GeometryProvider, GraphContext};

use super::FunnelGraph;

impl<G: GeometryProvider> FunnelGraph<G> {
    /// Immutable snapshot of the current configuration and derived data.
    #[must_use]
    pub fn context(&self) -> GraphContext {
        let config = &self.model.config;
        GraphContext {
            id: self.id.clone(),
            direction: config.direction,
            gradient_direction: config.gradient_direction,
            width: config.width,
            height: config.height,
            margin: config.margin,
            series: self.model.series.clone(),
            percentages: self.model.percentages.clone(),
            colors: config.colors.clone(),
            details: config.details,
            tooltip: config.tooltip,
            tooltip_label: config.tooltip_label,
            display_percent: config.display_percent,
            responsive: config.responsive,
            container: self.model.container,
            mounted: self.runtime.scene.is_mounted(),
        }
    }
}
