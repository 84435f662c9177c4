use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Stage values of a funnel.
///
/// A 1D funnel has one value per stage. A 2D funnel has, per stage, one value
/// per sub-series. Deserialization accepts either a flat or a nested array and
/// the shape of the first entry decides which variant is produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged, from = "RawFunnelValues")]
pub enum FunnelValues {
    OneD(Vec<f64>),
    TwoD(Vec<Vec<f64>>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFunnelValues {
    Nested(Vec<Vec<f64>>),
    Flat(Vec<f64>),
}

impl From<RawFunnelValues> for FunnelValues {
    fn from(raw: RawFunnelValues) -> Self {
        match raw {
            RawFunnelValues::Nested(values) if values.is_empty() => Self::OneD(Vec::new()),
            RawFunnelValues::Nested(values) => Self::TwoD(values),
            RawFunnelValues::Flat(values) => Self::OneD(values),
        }
    }
}

impl Default for FunnelValues {
    fn default() -> Self {
        Self::OneD(Vec::new())
    }
}

impl FunnelValues {
    #[must_use]
    pub fn is_2d(&self) -> bool {
        matches!(self, Self::TwoD(_))
    }

    /// Number of stages.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::OneD(values) => values.len(),
            Self::TwoD(values) => values.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of sub-series, taken from the first stage. Zero for 1D funnels.
    #[must_use]
    pub fn sub_series_len(&self) -> usize {
        match self {
            Self::OneD(_) => 0,
            Self::TwoD(values) => values.first().map_or(0, Vec::len),
        }
    }

    /// Per-stage value: the raw value for 1D, the stage total for 2D.
    #[must_use]
    pub fn stage_totals(&self) -> Vec<f64> {
        match self {
            Self::OneD(values) => values.clone(),
            Self::TwoD(values) => values.iter().map(|stage| stage.iter().sum()).collect(),
        }
    }

    /// Values of one sub-series across all stages (missing entries read as 0).
    #[must_use]
    pub fn sub_series(&self, sub_index: usize) -> Vec<f64> {
        match self {
            Self::OneD(values) => values.clone(),
            Self::TwoD(values) => values
                .iter()
                .map(|stage| stage.get(sub_index).copied().unwrap_or(0.0))
                .collect(),
        }
    }

    /// Share of each sub-series within its stage, in percent.
    #[must_use]
    pub fn sub_percentages(&self) -> Vec<Vec<f64>> {
        match self {
            Self::OneD(_) => Vec::new(),
            Self::TwoD(values) => values
                .iter()
                .map(|stage| {
                    let total: f64 = stage.iter().sum();
                    stage
                        .iter()
                        .map(|value| {
                            if total == 0.0 {
                                0.0
                            } else {
                                round_point(value * 100.0 / total)
                            }
                        })
                        .collect()
                })
                .collect(),
        }
    }
}

/// Rounds to two decimal places.
#[must_use]
pub fn round_point(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Percentages of each value relative to the maximum.
///
/// A zero (or non-finite) value always maps to 0; the maximum maps to 100 when
/// it is positive.
#[must_use]
pub fn percentages_of(values: &[f64]) -> Vec<f64> {
    let max = values
        .iter()
        .copied()
        .filter(|value| value.is_finite())
        .map(OrderedFloat)
        .max()
        .map_or(0.0, |max| max.0);

    values
        .iter()
        .map(|&value| {
            if value == 0.0 || !value.is_finite() || max == 0.0 {
                0.0
            } else {
                round_point(value * 100.0 / max)
            }
        })
        .collect()
}

/// Values, stage labels and sub-series labels of one funnel.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DataSeries {
    #[serde(default)]
    pub values: FunnelValues,
    #[serde(default, deserialize_with = "deserialize_labels")]
    pub labels: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_labels", alias = "subLabels")]
    pub sub_labels: Vec<String>,
}

impl DataSeries {
    #[must_use]
    pub fn new(values: FunnelValues) -> Self {
        Self {
            values,
            labels: Vec::new(),
            sub_labels: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = labels.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_sub_labels<I, S>(mut self, sub_labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sub_labels = sub_labels.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_2d(&self) -> bool {
        self.values.is_2d()
    }

    #[must_use]
    pub fn percentages(&self) -> Vec<f64> {
        percentages_of(&self.values.stage_totals())
    }
}

/// Labels may contain `null` entries; they normalize to empty strings.
pub(crate) fn deserialize_labels<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<Vec<Option<String>>> = Option::deserialize(deserializer)?;
    Ok(normalize_labels(raw))
}

#[must_use]
pub(crate) fn normalize_labels(raw: Option<Vec<Option<String>>>) -> Vec<String> {
    raw.unwrap_or_default()
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect()
}

/// Display item for one stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfoItem {
    pub label: String,
    pub value: f64,
    pub percentage: Option<String>,
}

/// Builds the per-stage display items.
#[must_use]
pub fn info_items(series: &DataSeries, percentages: &[f64], display_percent: bool) -> Vec<InfoItem> {
    let totals = series.values.stage_totals();
    percentages
        .iter()
        .enumerate()
        .map(|(index, percentage)| {
            let label = series
                .labels
                .get(index)
                .filter(|label| !label.is_empty())
                .cloned()
                .unwrap_or_else(|| "NA".to_owned());
            InfoItem {
                label,
                value: totals.get(index).copied().unwrap_or(0.0),
                percentage: display_percent.then(|| format!("{percentage}%")),
            }
        })
        .collect()
}
