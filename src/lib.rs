//! funnel-rs: headless funnel chart engine.
//!
//! A [`FunnelGraph`] turns stage values into a retained vector scene (area
//! paths, label groups and stage dividers) and keeps it reconciled across
//! data, direction and size changes with timed transitions. Time is virtual:
//! hosts drive it with [`FunnelGraph::advance`] and feed pointer input through
//! [`FunnelGraph::dispatch_pointer`]. Scenes render through the
//! [`render::Renderer`] trait or straight to SVG markup.

pub mod api;
pub mod core;
pub mod error;
pub mod extensions;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{FunnelGraph, FunnelGraphOptions, GraphUpdate};
pub use error::{FunnelError, FunnelResult};
