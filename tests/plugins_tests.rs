use std::cell::RefCell;
use std::rc::Rc;

use funnel_rs::FunnelError;
use funnel_rs::api::{Callbacks, FunnelGraph, FunnelGraphOptions, GraphUpdate, Lifecycle};
use funnel_rs::core::{DataSeries, Direction, FunnelValues};
use funnel_rs::extensions::{GraphEvent, GraphPlugin, GraphPluginContext};
use funnel_rs::interaction::PointerEvent;

#[derive(Clone)]
struct RecordingPlugin {
    id: String,
    events: Rc<RefCell<Vec<GraphEvent>>>,
    contexts: Rc<RefCell<Vec<GraphPluginContext>>>,
}

impl RecordingPlugin {
    fn new(id: impl Into<String>, events: Rc<RefCell<Vec<GraphEvent>>>) -> Self {
        Self {
            id: id.into(),
            events,
            contexts: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl GraphPlugin for RecordingPlugin {
    fn id(&self) -> &str {
        &self.id
    }

    fn on_event(&mut self, event: GraphEvent, context: GraphPluginContext) {
        self.events.borrow_mut().push(event);
        self.contexts.borrow_mut().push(context);
    }
}

fn event_kind(event: &GraphEvent) -> &'static str {
    match event {
        GraphEvent::Drawn { .. } => "drawn",
        GraphEvent::DataUpdated { .. } => "data",
        GraphEvent::DirectionChanged { .. } => "direction",
        GraphEvent::GradientDirectionChanged { .. } => "gradient",
        GraphEvent::Resized { .. } => "resized",
        GraphEvent::InteractionWired { .. } => "wired",
        GraphEvent::SectionClicked { .. } => "clicked",
        GraphEvent::TooltipShown { .. } => "tooltip",
        GraphEvent::Destroyed => "destroyed",
    }
}

fn graph() -> FunnelGraph {
    let series = DataSeries::new(FunnelValues::OneD(vec![100.0, 60.0, 20.0]))
        .with_labels(["Leads", "Trials", "Paid"]);
    let callbacks = Callbacks::default().with_click(|_, _| {});
    FunnelGraph::new(
        FunnelGraphOptions::new(series)
            .with_size(600.0, 400.0)
            .with_callbacks(callbacks),
    )
}

#[test]
fn plugin_receives_deterministic_event_sequence() {
    let mut graph = graph();
    let events = Rc::new(RefCell::new(Vec::<GraphEvent>::new()));
    let plugin = RecordingPlugin::new("recorder", events.clone());
    let contexts = plugin.contexts.clone();
    graph.register_plugin(Box::new(plugin)).expect("register plugin");

    graph.draw();
    assert_eq!(
        events.borrow().as_slice(),
        &[GraphEvent::Drawn {
            paths: 3,
            label_groups: 3,
            dividers: 2,
        }]
    );

    graph.settle();
    let wired = events
        .borrow()
        .iter()
        .filter(|event| matches!(event, GraphEvent::InteractionWired { .. }))
        .count();
    assert_eq!(wired, 6);

    events.borrow_mut().clear();
    graph.update_data(GraphUpdate::new().with_values(FunnelValues::OneD(vec![5.0, 4.0])));
    graph.toggle_direction();
    graph.gradient_toggle_direction();
    let kinds: Vec<&str> = events.borrow().iter().map(event_kind).collect();
    assert_eq!(kinds, vec!["data", "drawn", "direction", "drawn", "gradient"]);
    assert_eq!(
        events.borrow()[2],
        GraphEvent::DirectionChanged {
            direction: Direction::Vertical
        }
    );

    let last = *contexts.borrow().last().expect("context");
    assert_eq!(last.stage_count, 2);
    assert_eq!(last.direction, Direction::Vertical);
    assert_eq!(last.lifecycle, Lifecycle::Drawn);
}

#[test]
fn clicks_and_tooltips_are_reported() {
    let mut graph = graph();
    let events = Rc::new(RefCell::new(Vec::<GraphEvent>::new()));
    graph
        .register_plugin(Box::new(RecordingPlugin::new("recorder", events.clone())))
        .expect("register plugin");
    graph.draw();
    graph.settle();
    events.borrow_mut().clear();

    let path = graph.scene().path_ids()[0];
    graph.dispatch_pointer(PointerEvent::click(path, 300.0, 100.0));
    graph.dispatch_pointer(PointerEvent::enter(path, 300.0, 100.0));
    graph.settle();

    let events = events.borrow();
    assert!(events.contains(&GraphEvent::SectionClicked {
        index: 0,
        section_index: 1,
    }));
    assert!(events.contains(&GraphEvent::TooltipShown { section_index: 1 }));
}

#[test]
fn destroy_is_the_last_event() {
    let mut graph = graph();
    let events = Rc::new(RefCell::new(Vec::<GraphEvent>::new()));
    graph
        .register_plugin(Box::new(RecordingPlugin::new("recorder", events.clone())))
        .expect("register plugin");
    graph.draw();
    graph.destroy();
    graph.destroy();
    graph.settle();

    let events = events.borrow();
    assert_eq!(events.last(), Some(&GraphEvent::Destroyed));
    assert_eq!(
        events
            .iter()
            .filter(|event| **event == GraphEvent::Destroyed)
            .count(),
        1
    );
}

#[test]
fn plugin_registry_rejects_duplicate_and_empty_ids() {
    let mut graph = graph();
    let events = Rc::new(RefCell::new(Vec::<GraphEvent>::new()));
    graph
        .register_plugin(Box::new(RecordingPlugin::new("recorder", events.clone())))
        .expect("register plugin");

    let duplicate = graph
        .register_plugin(Box::new(RecordingPlugin::new("recorder", events.clone())))
        .expect_err("duplicate id");
    assert!(matches!(duplicate, FunnelError::InvalidData(_)));

    let empty = graph
        .register_plugin(Box::new(RecordingPlugin::new("", events.clone())))
        .expect_err("empty id");
    assert!(matches!(empty, FunnelError::InvalidData(_)));

    assert_eq!(graph.plugin_count(), 1);
    assert!(graph.has_plugin("recorder"));
    assert!(graph.unregister_plugin("recorder"));
    assert!(!graph.unregister_plugin("recorder"));
    assert_eq!(graph.plugin_count(), 0);

    graph.draw();
    assert!(events.borrow().is_empty());
}
