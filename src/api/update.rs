use serde::{Deserialize, Deserializer};
use tracing::debug;

use crate::core::data::normalize_labels;
use crate::core::{ColorSet, FunnelValues, GeometryProvider, MarginUpdate, default_color_set};
use crate::error::FunnelResult;
use crate::extensions::GraphEvent;

use super::{FunnelGraph, ResizeSetting};

/// Field of a partial update, in the order updates are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateField {
    Resize,
    Responsive,
    ResponsiveWidth,
    ResponsiveHeight,
    Width,
    Height,
    Margin,
    Details,
    Tooltip,
    TooltipLabel,
    Values,
    Labels,
    SubLabels,
    Colors,
}

/// Fixed order in which provided fields are applied. Colors come after
/// values so regenerated defaults see the new series shape.
pub const UPDATE_DISPATCH_ORDER: [UpdateField; 14] = [
    UpdateField::Resize,
    UpdateField::Responsive,
    UpdateField::ResponsiveWidth,
    UpdateField::ResponsiveHeight,
    UpdateField::Width,
    UpdateField::Height,
    UpdateField::Margin,
    UpdateField::Details,
    UpdateField::Tooltip,
    UpdateField::TooltipLabel,
    UpdateField::Values,
    UpdateField::Labels,
    UpdateField::SubLabels,
    UpdateField::Colors,
];

/// Partial graph configuration. Absent fields keep their current value.
///
/// `colors: Some(None)` (JSON `null`) regenerates the default palette.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GraphUpdate {
    #[serde(default)]
    pub resize: Option<ResizeSetting>,
    #[serde(default)]
    pub responsive: Option<bool>,
    #[serde(default, alias = "responsiveWidth")]
    pub responsive_width: Option<bool>,
    #[serde(default, alias = "responsiveHeight")]
    pub responsive_height: Option<bool>,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub margin: Option<MarginUpdate>,
    #[serde(default)]
    pub details: Option<bool>,
    #[serde(default)]
    pub tooltip: Option<bool>,
    #[serde(default, alias = "tooltipLabel")]
    pub tooltip_label: Option<bool>,
    #[serde(default)]
    pub values: Option<FunnelValues>,
    #[serde(default, deserialize_with = "deserialize_update_labels")]
    pub labels: Option<Vec<String>>,
    #[serde(
        default,
        alias = "subLabels",
        deserialize_with = "deserialize_update_labels"
    )]
    pub sub_labels: Option<Vec<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub colors: Option<Option<ColorSet>>,
}

impl GraphUpdate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Provided fields in dispatch order.
    #[must_use]
    pub fn fields(&self) -> Vec<UpdateField> {
        UPDATE_DISPATCH_ORDER
            .into_iter()
            .filter(|field| self.has(*field))
            .collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }

    fn has(&self, field: UpdateField) -> bool {
        match field {
            UpdateField::Resize => self.resize.is_some(),
            UpdateField::Responsive => self.responsive.is_some(),
            UpdateField::ResponsiveWidth => self.responsive_width.is_some(),
            UpdateField::ResponsiveHeight => self.responsive_height.is_some(),
            UpdateField::Width => self.width.is_some(),
            UpdateField::Height => self.height.is_some(),
            UpdateField::Margin => self.margin.is_some(),
            UpdateField::Details => self.details.is_some(),
            UpdateField::Tooltip => self.tooltip.is_some(),
            UpdateField::TooltipLabel => self.tooltip_label.is_some(),
            UpdateField::Values => self.values.is_some(),
            UpdateField::Labels => self.labels.is_some(),
            UpdateField::SubLabels => self.sub_labels.is_some(),
            UpdateField::Colors => self.colors.is_some(),
        }
    }

    #[must_use]
    pub fn with_values(mut self, values: FunnelValues) -> Self {
        self.values = Some(values);
        self
    }

    #[must_use]
    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_sub_labels<I, S>(mut self, sub_labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sub_labels = Some(sub_labels.into_iter().map(Into::into).collect());
        self
    }

    /// `None` resets the colors to the default palette.
    #[must_use]
    pub fn with_colors(mut self, colors: Option<ColorSet>) -> Self {
        self.colors = Some(colors);
        self
    }

    #[must_use]
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    #[must_use]
    pub fn with_margin(mut self, margin: MarginUpdate) -> Self {
        self.margin = Some(margin);
        self
    }

    #[must_use]
    pub fn with_details(mut self, details: bool) -> Self {
        self.details = Some(details);
        self
    }

    #[must_use]
    pub fn with_tooltip(mut self, tooltip: bool) -> Self {
        self.tooltip = Some(tooltip);
        self
    }

    #[must_use]
    pub fn with_tooltip_label(mut self, tooltip_label: bool) -> Self {
        self.tooltip_label = Some(tooltip_label);
        self
    }

    #[must_use]
    pub fn with_resize(mut self, resize: ResizeSetting) -> Self {
        self.resize = Some(resize);
        self
    }

    #[must_use]
    pub fn with_responsive(mut self, responsive: bool) -> Self {
        self.responsive = Some(responsive);
        self
    }
}

impl<G: GeometryProvider> FunnelGraph<G> {
    /// Applies the provided fields in dispatch order, recomputes percentages
    /// and re-runs the draw pipeline.
    pub fn update_data(&mut self, mut update: GraphUpdate) {
        let fields = update.fields();
        for field in &fields {
            self.apply_update_field(*field, &mut update);
        }
        self.model.percentages = self.model.series.percentages();

        let stages = self.model.series.stage_count();
        debug!(graph_id = %self.id, ?fields, stages, "data updated");
        self.emit_plugin_event(GraphEvent::DataUpdated { stages });
        self.draw_graph();
    }

    /// [`update_data`](Self::update_data) from a JSON partial configuration.
    pub fn update_data_from_json(&mut self, json: &str) -> FunnelResult<()> {
        let update: GraphUpdate = serde_json::from_str(json)?;
        self.update_data(update);
        Ok(())
    }

    fn apply_update_field(&mut self, field: UpdateField, update: &mut GraphUpdate) {
        let config = &mut self.model.config;
        match field {
            UpdateField::Resize => {
                if let Some(setting) = update.resize.take() {
                    self.set_resize_setting(&setting);
                }
            }
            UpdateField::Responsive => {
                if let Some(responsive) = update.responsive {
                    config.responsive.width = responsive;
                    config.responsive.height = responsive;
                }
            }
            UpdateField::ResponsiveWidth => {
                if let Some(width) = update.responsive_width {
                    config.responsive.width = width;
                }
            }
            UpdateField::ResponsiveHeight => {
                if let Some(height) = update.responsive_height {
                    config.responsive.height = height;
                }
            }
            UpdateField::Width => {
                if let Some(width) = update.width {
                    config.width = width;
                }
            }
            UpdateField::Height => {
                if let Some(height) = update.height {
                    config.height = height;
                }
            }
            UpdateField::Margin => {
                if let Some(margin) = &update.margin {
                    config.margin.merge(margin);
                }
            }
            UpdateField::Details => {
                if let Some(details) = update.details {
                    config.details = details;
                }
            }
            UpdateField::Tooltip => {
                if let Some(tooltip) = update.tooltip {
                    config.tooltip = tooltip;
                }
            }
            UpdateField::TooltipLabel => {
                if let Some(tooltip_label) = update.tooltip_label {
                    config.tooltip_label = tooltip_label;
                }
            }
            UpdateField::Values => {
                if let Some(values) = update.values.take() {
                    self.model.series.values = values;
                }
            }
            UpdateField::Labels => {
                if let Some(labels) = update.labels.take() {
                    self.model.series.labels = labels;
                }
            }
            UpdateField::SubLabels => {
                if let Some(sub_labels) = update.sub_labels.take() {
                    self.model.series.sub_labels = sub_labels;
                }
            }
            UpdateField::Colors => {
                if let Some(colors) = update.colors.take() {
                    let values = &self.model.series.values;
                    config.colors = colors.unwrap_or_else(|| {
                        default_color_set(values.is_2d(), values.sub_series_len())
                    });
                }
            }
        }
    }
}

fn deserialize_update_labels<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<Option<String>>> = Option::deserialize(deserializer)?;
    Ok(raw.map(|labels| normalize_labels(Some(labels))))
}

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`).
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_follow_dispatch_order() {
        let update = GraphUpdate::new()
            .with_colors(None)
            .with_values(FunnelValues::OneD(vec![1.0]))
            .with_resize(ResizeSetting::Toggle(true))
            .with_details(false);
        assert_eq!(
            update.fields(),
            vec![
                UpdateField::Resize,
                UpdateField::Details,
                UpdateField::Values,
                UpdateField::Colors
            ]
        );
    }

    #[test]
    fn null_colors_differ_from_absent_colors() {
        let reset: GraphUpdate = serde_json::from_str(r#"{"colors": null}"#).expect("valid");
        assert_eq!(reset.colors, Some(None));

        let untouched: GraphUpdate = serde_json::from_str(r#"{"width": 300}"#).expect("valid");
        assert_eq!(untouched.colors, None);
        assert_eq!(untouched.fields(), vec![UpdateField::Width]);
    }

    #[test]
    fn json_labels_normalize_nulls() {
        let update: GraphUpdate =
            serde_json::from_str(r#"{"subLabels": ["a", null], "tooltipLabel": false}"#)
                .expect("valid");
        assert_eq!(update.sub_labels, Some(vec!["a".to_owned(), String::new()]));
        assert_eq!(update.tooltip_label, Some(false));
    }
}
