use serde::{Deserialize, Serialize};

/// Easing curves used by scene transitions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Ease {
    Linear,
    /// Symmetric polynomial in-out curve with the given exponent.
    PolyInOut(f64),
    OutCubic,
}

impl Default for Ease {
    fn default() -> Self {
        Self::PolyInOut(3.0)
    }
}

impl Ease {
    /// Maps linear progress `t` in `[0, 1]` to eased progress.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Self::Linear => t,
            Self::PolyInOut(exponent) => {
                let doubled = t * 2.0;
                if doubled <= 1.0 {
                    doubled.powf(exponent) / 2.0
                } else {
                    (2.0 - (2.0 - doubled).powf(exponent)) / 2.0
                }
            }
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
        }
    }
}

/// Linear interpolation between `from` and `to`.
#[must_use]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}
