use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use funnel_rs::api::{
    FunnelGraph, FunnelGraphOptions, GraphUpdate, ResizeSetting, TaskChannel, TaskKey,
};
use funnel_rs::core::{DataSeries, FunnelValues};
use funnel_rs::extensions::{GraphEvent, GraphPlugin, GraphPluginContext};
use funnel_rs::render::SvgLength;

struct ResizeRecorder {
    sizes: Rc<RefCell<Vec<(f64, f64)>>>,
}

impl GraphPlugin for ResizeRecorder {
    fn id(&self) -> &str {
        "resize-recorder"
    }

    fn on_event(&mut self, event: GraphEvent, _context: GraphPluginContext) {
        if let GraphEvent::Resized { width, height } = event {
            self.sizes.borrow_mut().push((width, height));
        }
    }
}

fn series() -> DataSeries {
    DataSeries::new(FunnelValues::OneD(vec![900.0, 600.0, 300.0]))
}

/// Plotting area of 280x220 inside the default margins is a 400x400 box.
fn options(resize: ResizeSetting) -> FunnelGraphOptions {
    FunnelGraphOptions::new(series())
        .with_size(280.0, 220.0)
        .with_container(500.0, 500.0)
        .with_resize(resize)
}

fn default_factors() -> ResizeSetting {
    serde_json::from_str(r#"{"factor": {}}"#).expect("resize setting")
}

#[test]
fn enabling_resize_applies_the_formula_on_first_draw() {
    let mut graph = FunnelGraph::new(options(default_factors()));
    let sizes = Rc::new(RefCell::new(Vec::new()));
    graph
        .register_plugin(Box::new(ResizeRecorder {
            sizes: sizes.clone(),
        }))
        .expect("register plugin");

    assert!(!graph.has_resize_listener());
    graph.draw();

    assert!(graph.has_resize_listener());
    assert!((graph.width(false) - 460.0).abs() <= 1e-9);
    assert!((graph.height(false) - 300.0).abs() <= 1e-9);
    assert_eq!(sizes.borrow().as_slice(), &[(460.0, 300.0)]);

    let listener = graph.resize_listener().expect("listener");
    assert_eq!(listener.key, format!("resize.{}", graph.id()));

    let root = graph.scene().root().expect("mounted");
    assert_eq!(root.width, SvgLength::Px(580.0));
    assert_eq!(root.view_box, (580.0, 480.0));
}

#[test]
fn window_resizes_are_debounced() {
    let setting = ResizeSetting::factors(0.1, 0.5).with_wait(Duration::from_millis(100));
    let mut graph = FunnelGraph::new(options(setting));
    graph.draw();
    graph.settle();
    let key = TaskKey::graph(TaskChannel::Resize);

    graph.notify_window_resize();
    graph.advance(Duration::from_millis(50));
    graph.set_container_size(1_000.0, 800.0);
    graph.notify_window_resize();
    graph.advance(Duration::from_millis(99));
    assert!(graph.has_pending_task(key));
    assert!((graph.width(false) - 460.0).abs() <= 1e-9);

    graph.advance(Duration::from_millis(1));
    assert!(!graph.has_pending_task(key));
    assert!((graph.width(false) - 942.0).abs() <= 1e-9);
    assert!((graph.height(false) - 560.0).abs() <= 1e-9);
}

#[test]
fn boolean_resize_uses_equal_factors() {
    let mut graph = FunnelGraph::new(options(ResizeSetting::Toggle(true)));
    graph.draw();
    assert!((graph.width(false) - 340.0).abs() <= 1e-9);
    assert!((graph.height(false) - 340.0).abs() <= 1e-9);
}

#[test]
fn malformed_resize_setting_disables_resize() {
    let invalid: ResizeSetting = serde_json::from_str(r#"{"factor": 0.3}"#).expect("parses");
    let mut graph = FunnelGraph::new(options(invalid));
    assert!(graph.config().resize.is_none());

    graph.draw();
    graph.settle();
    assert!(!graph.has_resize_listener());
    assert!((graph.width(false) - 280.0).abs() <= 1e-9);
    graph.notify_window_resize();
    assert_eq!(graph.pending_tasks(), 0);
}

#[test]
fn disabling_resize_detaches_the_listener() {
    let mut graph = FunnelGraph::new(options(default_factors()));
    graph.draw();
    graph.notify_window_resize();
    assert!(graph.has_pending_task(TaskKey::graph(TaskChannel::Resize)));

    graph.update_data(GraphUpdate::new().with_resize(ResizeSetting::Toggle(false)));
    assert!(!graph.has_resize_listener());
    assert!(!graph.has_pending_task(TaskKey::graph(TaskChannel::Resize)));
}

#[test]
fn destroy_removes_the_listener() {
    let mut graph = FunnelGraph::new(options(default_factors()));
    graph.draw();
    graph.destroy();
    assert!(!graph.has_resize_listener());
    graph.notify_window_resize();
    assert_eq!(graph.pending_tasks(), 0);
}

#[test]
fn responsive_root_stretches_to_the_container() {
    let mut graph = FunnelGraph::new(
        FunnelGraphOptions::new(series())
            .with_size(280.0, 220.0)
            .with_responsive(true, false),
    );
    graph.draw();
    let root = graph.scene().root().expect("mounted");
    assert_eq!(root.width, SvgLength::Percent(100.0));
    assert_eq!(root.height, SvgLength::Px(400.0));

    graph.update_data(GraphUpdate::new().with_responsive(false));
    let root = graph.scene().root().expect("mounted");
    assert_eq!(root.width, SvgLength::Px(400.0));
}

#[test]
fn container_box_sizes_graphs_without_explicit_dimensions() {
    let graph = FunnelGraph::new(FunnelGraphOptions::new(series()).with_container(640.0, 360.0));
    assert!((graph.width(false) - 640.0).abs() <= 1e-9);
    assert!((graph.height(false) - 360.0).abs() <= 1e-9);
}
