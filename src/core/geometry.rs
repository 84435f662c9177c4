use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::{FunnelValues, GraphContext};
use crate::core::ease::lerp;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Renderable outline of one funnel area.
///
/// `upper` and `lower` run along the primary axis in the same order; the
/// outline goes forward along `upper` and back along `lower`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathShape {
    pub upper: Vec<Point>,
    pub lower: Vec<Point>,
    pub vertical: bool,
}

impl PathShape {
    /// A shape with no area, used as the starting point of entering paths.
    #[must_use]
    pub fn empty(vertical: bool) -> Self {
        Self {
            upper: Vec::new(),
            lower: Vec::new(),
            vertical,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.upper.is_empty()
    }

    /// Whether `other` can be interpolated point-by-point from `self`.
    #[must_use]
    pub fn is_compatible(&self, other: &Self) -> bool {
        self.vertical == other.vertical
            && self.upper.len() == other.upper.len()
            && self.lower.len() == other.lower.len()
    }

    /// Interpolates towards `to`. Incompatible shapes jump to `to` at the end.
    #[must_use]
    pub fn interpolate(&self, to: &Self, t: f64) -> Self {
        if !self.is_compatible(to) {
            return if t >= 1.0 { to.clone() } else { self.clone() };
        }
        let mix = |from: &[Point], target: &[Point]| {
            from.iter()
                .zip(target)
                .map(|(a, b)| Point::new(lerp(a.x, b.x, t), lerp(a.y, b.y, t)))
                .collect()
        };
        Self {
            upper: mix(&self.upper, &to.upper),
            lower: mix(&self.lower, &to.lower),
            vertical: to.vertical,
        }
    }

    /// SVG path data with smooth segments between consecutive points.
    #[must_use]
    pub fn to_svg_d(&self) -> String {
        let (Some(first), Some(last_lower)) = (self.upper.first(), self.lower.last()) else {
            return String::new();
        };
        let mut d = format!("M{} {}", fmt_coord(first.x), fmt_coord(first.y));
        self.push_curves(&mut d, self.upper.iter());
        d.push_str(&format!(
            " L{} {}",
            fmt_coord(last_lower.x),
            fmt_coord(last_lower.y)
        ));
        self.push_curves(&mut d, self.lower.iter().rev());
        d.push_str(" Z");
        d
    }

    fn push_curves<'a>(&self, d: &mut String, mut points: impl Iterator<Item = &'a Point>) {
        let Some(mut previous) = points.next() else {
            return;
        };
        for point in points {
            let (c1, c2) = if self.vertical {
                let mid = (previous.y + point.y) / 2.0;
                (Point::new(previous.x, mid), Point::new(point.x, mid))
            } else {
                let mid = (previous.x + point.x) / 2.0;
                (Point::new(mid, previous.y), Point::new(mid, point.y))
            };
            d.push_str(&format!(
                " C{} {},{} {},{} {}",
                fmt_coord(c1.x),
                fmt_coord(c1.y),
                fmt_coord(c2.x),
                fmt_coord(c2.y),
                fmt_coord(point.x),
                fmt_coord(point.y)
            ));
            previous = point;
        }
    }
}

pub(crate) fn fmt_coord(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        "0".to_owned()
    } else {
        rounded.to_string()
    }
}

/// Cross-axis coordinates of each area boundary line.
///
/// Entry `j` holds the boundary between area `j - 1` and area `j`, sampled at
/// every primary-axis point.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CrossAxisPoints {
    pub lines: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathDefinition {
    pub path: PathShape,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PathDefinitions {
    pub paths: Vec<PathDefinition>,
}

/// Turns a context snapshot into renderable area outlines.
///
/// Implementations must be pure functions of the snapshot.
pub trait GeometryProvider {
    fn cross_axis_points(&self, context: &GraphContext) -> CrossAxisPoints;
    fn path_definitions(
        &self,
        context: &GraphContext,
        cross_axis_points: &CrossAxisPoints,
    ) -> PathDefinitions;
}

/// Default funnel outline: areas centered on the primary axis with extents
/// proportional to each stage total, 2D sub-series stacked inside the stage.
///
/// A 1D funnel yields one area per stage. A 2D funnel yields one band per
/// sub-series spanning every stage.
#[derive(Debug, Clone, Copy, Default)]
pub struct FunnelGeometry;

impl FunnelGeometry {
    fn main_positions(context: &GraphContext, samples: usize) -> Vec<f64> {
        let length = if context.is_vertical() {
            context.height
        } else {
            context.width
        };
        let stages = samples.saturating_sub(1).max(1);
        (0..samples)
            .map(|index| length * index as f64 / stages as f64)
            .collect()
    }
}

impl GeometryProvider for FunnelGeometry {
    fn cross_axis_points(&self, context: &GraphContext) -> CrossAxisPoints {
        let totals = context.series.values.stage_totals();
        let Some(&last) = totals.last() else {
            return CrossAxisPoints::default();
        };
        let cross = if context.is_vertical() {
            context.width
        } else {
            context.height
        };
        let max = totals
            .iter()
            .copied()
            .filter(|value| value.is_finite())
            .map(OrderedFloat)
            .max()
            .map_or(0.0, |max| max.0);

        let mut samples = totals.clone();
        samples.push(last);
        let extents: Vec<f64> = samples
            .iter()
            .map(|total| {
                if max > 0.0 && total.is_finite() {
                    cross * (total / max).max(0.0)
                } else {
                    0.0
                }
            })
            .collect();
        let starts: Vec<f64> = extents.iter().map(|extent| (cross - extent) / 2.0).collect();

        let shares: Vec<Vec<f64>> = match &context.series.values {
            FunnelValues::TwoD(stages) => {
                let mut per_stage = stages.clone();
                per_stage.push(stages.last().cloned().unwrap_or_default());
                per_stage
            }
            FunnelValues::OneD(_) => samples.iter().map(|total| vec![*total]).collect(),
        };

        let series_count = shares.first().map_or(1, Vec::len).max(1);
        let mut lines = vec![Vec::with_capacity(samples.len()); series_count + 1];
        for (sample, stage_shares) in shares.iter().enumerate() {
            let total: f64 = stage_shares.iter().sum();
            let mut cursor = starts[sample];
            lines[0].push(cursor);
            for (sub, share) in stage_shares.iter().enumerate().take(series_count) {
                if total > 0.0 {
                    cursor += extents[sample] * share.max(0.0) / total;
                }
                lines[sub + 1].push(cursor);
            }
            for line in lines.iter_mut().skip(stage_shares.len() + 1) {
                line.push(cursor);
            }
        }

        CrossAxisPoints { lines }
    }

    fn path_definitions(
        &self,
        context: &GraphContext,
        cross_axis_points: &CrossAxisPoints,
    ) -> PathDefinitions {
        let vertical = context.is_vertical();
        let samples = cross_axis_points.lines.first().map_or(0, Vec::len);
        let main = Self::main_positions(context, samples);
        let to_point = |main: f64, cross: f64| {
            if vertical {
                Point::new(cross, main)
            } else {
                Point::new(main, cross)
            }
        };

        let outline = |upper: &[f64], lower: &[f64], range: std::ops::Range<usize>| PathShape {
            upper: range
                .clone()
                .map(|sample| to_point(main[sample], upper[sample]))
                .collect(),
            lower: range
                .map(|sample| to_point(main[sample], lower[sample]))
                .collect(),
            vertical,
        };

        // 1D funnels get one area per stage; 2D funnels one band per sub-series.
        let paths = if context.is_2d() {
            cross_axis_points
                .lines
                .windows(2)
                .map(|pair| PathDefinition {
                    path: outline(&pair[0], &pair[1], 0..samples),
                })
                .collect()
        } else {
            match cross_axis_points.lines.as_slice() {
                [upper, lower] => (0..samples.saturating_sub(1))
                    .map(|stage| PathDefinition {
                        path: outline(upper, lower, stage..stage + 2),
                    })
                    .collect(),
                _ => Vec::new(),
            }
        };

        PathDefinitions { paths }
    }
}
