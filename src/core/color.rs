use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Colors of one painted shape: one entry means solid, more mean a gradient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawColorStops", into = "Vec<String>")]
pub struct ColorStops(pub SmallVec<[String; 4]>);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawColorStops {
    Single(String),
    Many(Vec<String>),
}

impl From<RawColorStops> for ColorStops {
    fn from(raw: RawColorStops) -> Self {
        match raw {
            RawColorStops::Single(color) => Self::solid(color),
            RawColorStops::Many(colors) => Self(colors.into_iter().collect()),
        }
    }
}

impl From<ColorStops> for Vec<String> {
    fn from(stops: ColorStops) -> Self {
        stops.0.into_vec()
    }
}

impl ColorStops {
    #[must_use]
    pub fn solid(color: impl Into<String>) -> Self {
        let mut stops = SmallVec::new();
        stops.push(color.into());
        Self(stops)
    }

    #[must_use]
    pub fn gradient<I, S>(colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(colors.into_iter().map(Into::into).collect())
    }

    /// The single color when this set renders solid.
    #[must_use]
    pub fn solid_color(&self) -> Option<&str> {
        match self.0.as_slice() {
            [only] => Some(only.as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Color configuration of a funnel.
///
/// 1D funnels paint their single path with one color set. 2D funnels paint
/// each sub-series path with its own set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorSet {
    PerSeries(Vec<ColorStops>),
    Shared(ColorStops),
}

impl ColorSet {
    /// Color set used by the path at `index`.
    #[must_use]
    pub fn for_path(&self, index: usize, is_2d: bool) -> Option<ColorStops> {
        match self {
            Self::Shared(stops) => Some(stops.clone()),
            Self::PerSeries(sets) if is_2d => sets.get(index).cloned(),
            // A flat list of single colors on a 1D funnel is one gradient.
            Self::PerSeries(sets) => Some(ColorStops(
                sets.iter().flat_map(|set| set.0.iter().cloned()).collect(),
            )),
        }
    }
}

const PALETTE: [&str; 10] = [
    "#FF4B4B", "#FF9C3F", "#FFD25F", "#4BC28C", "#3FA7FF", "#7B6CFF", "#C06CFF", "#FF6CB5",
    "#6CE0E0", "#A0A0A0",
];

/// Default palette for `count` colors.
///
/// The palette is deterministic so repeated draws of the same chart match.
#[must_use]
pub fn default_colors(count: usize) -> Vec<String> {
    (0..count)
        .map(|index| PALETTE[index % PALETTE.len()].to_owned())
        .collect()
}

/// Default color set for a funnel shape.
///
/// 2D funnels get one solid color per sub-series; 1D funnels get a two-color
/// gradient.
#[must_use]
pub fn default_color_set(is_2d: bool, sub_series_len: usize) -> ColorSet {
    if is_2d {
        ColorSet::PerSeries(
            default_colors(sub_series_len)
                .into_iter()
                .map(ColorStops::solid)
                .collect(),
        )
    } else {
        ColorSet::Shared(ColorStops::gradient(default_colors(2)))
    }
}
