mod config;
mod context;
mod direction;
mod graph;
mod graph_init;
mod info_binder;
mod path_binder;
mod plugin_registry;
mod pointer_dispatch;
mod resize;
mod scheduler;
mod snapshot;
mod teardown;
mod transition;
mod update;

pub use config::{Callbacks, ClickCallback, FunnelGraphOptions, GraphConfig, GraphData, TooltipCallback};
pub use graph::{FunnelGraph, Lifecycle};
pub use resize::{InvalidResizeSetting, ResizeListener, ResizePolicy, ResizeSetting};
pub use scheduler::{Scheduler, Task, TaskChannel, TaskKey, TaskTarget};
pub use snapshot::GraphSnapshot;
pub use update::{GraphUpdate, UPDATE_DISPATCH_ORDER, UpdateField};

pub(crate) use transition::GraphTask;
