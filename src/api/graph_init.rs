use std::collections::HashMap;

use tracing::{info, warn};
use ulid::Ulid;

use crate::core::{
    FunnelGeometry, GeometryProvider, HeuristicTextMeasurer, Margin, ResponsiveFlags,
    TextMeasurer, default_color_set,
};
use crate::interaction::{HandlerRegistry, TooltipHandle};
use crate::render::Scene;

use super::{
    FunnelGraph, FunnelGraphOptions, GraphConfig, Lifecycle, Scheduler,
    graph::{GraphModel, GraphRuntime},
};

impl FunnelGraph<FunnelGeometry> {
    /// Creates a graph with the default funnel geometry.
    #[must_use]
    pub fn new(options: FunnelGraphOptions) -> Self {
        Self::with_geometry(options, FunnelGeometry)
    }
}

impl<G: GeometryProvider> FunnelGraph<G> {
    /// Creates a graph that computes its outlines with `geometry`.
    #[must_use]
    pub fn with_geometry(options: FunnelGraphOptions, geometry: G) -> Self {
        let FunnelGraphOptions {
            width,
            height,
            container,
            margin: margin_update,
            direction,
            gradient_direction,
            responsive,
            responsive_width,
            responsive_height,
            resize,
            details,
            tooltip,
            tooltip_label,
            display_percent,
            data,
            format,
            callbacks,
        } = options;

        let id = format!("id_{}", Ulid::new().to_string().to_lowercase());
        let series = data.series;
        let colors = data.colors.unwrap_or_else(|| {
            default_color_set(series.is_2d(), series.values.sub_series_len())
        });

        let mut margin = Margin::default();
        if let Some(update) = &margin_update {
            margin.merge(update);
        }

        let width = width.or(container.map(|container| container.client_width));
        let height = height.or(container.map(|container| container.client_height));
        if width.is_none() || height.is_none() {
            warn!(graph_id = %id, "no size or container box given, missing dimensions default to 0");
        }
        let (width, height) = (width.unwrap_or(0.0), height.unwrap_or(0.0));

        let config = GraphConfig {
            width,
            height,
            original_width: width,
            original_height: height,
            margin,
            direction,
            gradient_direction,
            responsive: ResponsiveFlags::from_options(responsive, responsive_width, responsive_height),
            resize: None,
            details,
            tooltip,
            tooltip_label,
            display_percent,
            colors,
            format,
            callbacks,
        };

        let mut graph = Self {
            id,
            geometry,
            measurer: Box::new(HeuristicTextMeasurer),
            model: GraphModel {
                config,
                percentages: series.percentages(),
                series,
                container,
                line_positions: Vec::new(),
            },
            runtime: GraphRuntime {
                scene: Scene::new(),
                payloads: HashMap::new(),
                router: HandlerRegistry::new(),
                scheduler: Scheduler::new(),
                tooltip: Some(TooltipHandle::acquire()),
                resize_listener: None,
                plugins: Vec::new(),
                lifecycle: Lifecycle::Created,
            },
        };

        if let Some(setting) = &resize {
            graph.set_resize_setting(setting);
        }
        if direction.is_vertical() {
            graph.make_vertical(true);
        } else {
            graph.make_horizontal(true);
        }

        info!(
            graph_id = %graph.id,
            stages = graph.model.series.stage_count(),
            is_2d = graph.model.series.is_2d(),
            "initialized"
        );
        graph
    }

    /// Replaces the text measurer used to stack label lines.
    #[must_use]
    pub fn with_measurer(mut self, measurer: impl TextMeasurer + 'static) -> Self {
        self.measurer = Box::new(measurer);
        self
    }
}
