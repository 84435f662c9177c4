use tracing::debug;

use crate::core::{Direction, GeometryProvider, GradientDirection};
use crate::extensions::GraphEvent;

use super::FunnelGraph;

impl<G: GeometryProvider> FunnelGraph<G> {
    /// Lays the funnel out top to bottom, swapping the original dimensions.
    ///
    /// Returns `true` without doing anything when already vertical and not
    /// forced.
    pub fn make_vertical(&mut self, force: bool) -> bool {
        if !force && self.model.config.direction.is_vertical() {
            return true;
        }
        self.apply_direction(Direction::Vertical);
        false
    }

    /// Lays the funnel out left to right with the original dimensions.
    ///
    /// Returns `true` without doing anything when already horizontal and not
    /// forced.
    pub fn make_horizontal(&mut self, force: bool) -> bool {
        if !force && !self.model.config.direction.is_vertical() {
            return true;
        }
        self.apply_direction(Direction::Horizontal);
        false
    }

    pub fn toggle_direction(&mut self) {
        match self.model.config.direction {
            Direction::Horizontal => self.make_vertical(false),
            Direction::Vertical => self.make_horizontal(false),
        };
    }

    /// Points every gradient along the vertical axis. Geometry is untouched.
    pub fn gradient_make_vertical(&mut self) -> bool {
        self.apply_gradient_direction(GradientDirection::Vertical)
    }

    pub fn gradient_make_horizontal(&mut self) -> bool {
        self.apply_gradient_direction(GradientDirection::Horizontal)
    }

    pub fn gradient_toggle_direction(&mut self) {
        match self.model.config.gradient_direction {
            GradientDirection::Horizontal => self.gradient_make_vertical(),
            GradientDirection::Vertical => self.gradient_make_horizontal(),
        };
    }

    fn apply_direction(&mut self, direction: Direction) {
        let config = &mut self.model.config;
        config.direction = direction;
        let (width, height) = match direction {
            Direction::Vertical => (config.original_height, config.original_width),
            Direction::Horizontal => (config.original_width, config.original_height),
        };
        config.width = width;
        config.height = height;
        debug!(graph_id = %self.id, ?direction, width, height, "direction applied");

        self.emit_plugin_event(GraphEvent::DirectionChanged { direction });
        self.draw_graph();
    }

    fn apply_gradient_direction(&mut self, direction: GradientDirection) -> bool {
        if self.model.config.gradient_direction == direction {
            return true;
        }
        self.model.config.gradient_direction = direction;
        self.runtime.scene.set_gradient_direction(direction);
        debug!(graph_id = %self.id, ?direction, "gradient direction applied");
        self.emit_plugin_event(GraphEvent::GradientDirectionChanged { direction });
        true
    }
}
