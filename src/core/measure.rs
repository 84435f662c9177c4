/// Text measurement hook used to stack label lines.
///
/// There is no layout engine in a headless scene, so label stacking asks a
/// measurer for line heights. Hosts with real font metrics can plug their own.
pub trait TextMeasurer {
    /// Returns `(width, height)` of `text` in scene units.
    fn measure(&self, text: &str, font_size: f64) -> (f64, f64);
}

/// Assumes ~0.6em glyph advance and a 1em line box. Empty text measures zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicTextMeasurer;

impl TextMeasurer for HeuristicTextMeasurer {
    fn measure(&self, text: &str, font_size: f64) -> (f64, f64) {
        if text.is_empty() {
            return (0.0, 0.0);
        }
        let width = 0.6 * font_size * text.chars().count() as f64;
        (width, font_size)
    }
}
