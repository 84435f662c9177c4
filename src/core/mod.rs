pub mod color;
pub mod context;
pub mod data;
pub mod ease;
pub mod format;
pub mod geometry;
pub mod measure;
pub mod types;

pub use color::{ColorSet, ColorStops, default_color_set, default_colors};
pub use context::{GraphContext, RenderedBox};
pub use data::{DataSeries, FunnelValues, InfoItem, info_items, percentages_of, round_point};
pub use ease::Ease;
pub use format::{FormatFn, FormatItem, FormatOptions, format_number};
pub use geometry::{
    CrossAxisPoints, FunnelGeometry, GeometryProvider, PathDefinition, PathDefinitions, PathShape,
    Point,
};
pub use measure::{HeuristicTextMeasurer, TextMeasurer};
pub use types::{
    ContainerBox, Direction, GradientDirection, Margin, MarginUpdate, ResponsiveFlags, TextMargin,
    TextMarginUpdate,
};
