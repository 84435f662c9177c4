//! Observer hooks layered on top of the graph lifecycle.

pub mod plugins;

pub use plugins::{GraphEvent, GraphPlugin, GraphPluginContext};
