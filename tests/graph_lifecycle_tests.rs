use std::time::Duration;

use funnel_rs::FunnelError;
use funnel_rs::api::{FunnelGraph, FunnelGraphOptions, GraphUpdate, Lifecycle, TaskChannel, TaskKey};
use funnel_rs::core::{DataSeries, Direction, FunnelValues, GradientDirection, PathShape};
use funnel_rs::render::{NullRenderer, Paint};

fn one_d_series() -> DataSeries {
    DataSeries::new(FunnelValues::OneD(vec![12_000.0, 5_700.0, 360.0]))
        .with_labels(["Impressions", "Add To Cart", "Buy"])
}

fn two_d_series() -> DataSeries {
    DataSeries::new(FunnelValues::TwoD(vec![
        vec![3_000.0, 2_500.0, 6_500.0],
        vec![3_000.0, 1_700.0, 1_000.0],
        vec![600.0, 200.0, 130.0],
        vec![200.0, 100.0, 60.0],
    ]))
    .with_labels(["Impressions", "Add To Cart", "Checkout", "Buy"])
    .with_sub_labels(["Direct", "Social Media", "Ads"])
}

fn path_shapes(graph: &FunnelGraph) -> Vec<PathShape> {
    graph
        .scene()
        .path_ids()
        .iter()
        .map(|id| {
            graph
                .scene()
                .node(*id)
                .and_then(|node| node.as_path())
                .expect("path node")
                .shape
                .clone()
        })
        .collect()
}

fn drawn(series: DataSeries) -> FunnelGraph {
    let mut graph = FunnelGraph::new(FunnelGraphOptions::new(series).with_size(600.0, 400.0));
    graph.draw();
    graph.settle();
    graph
}

#[test]
fn construction_does_not_mount_until_draw() {
    let graph = FunnelGraph::new(FunnelGraphOptions::new(one_d_series()).with_size(600.0, 400.0));
    assert_eq!(graph.lifecycle(), Lifecycle::Created);
    assert!(!graph.scene().is_mounted());
    assert_eq!(graph.scene().node_count(), 0);
    assert!(graph.id().starts_with("id_"));
    assert_eq!(graph.direction(), Direction::Horizontal);
    assert!((graph.width(true) - 720.0).abs() <= 1e-9);
    assert!((graph.height(true) - 580.0).abs() <= 1e-9);
}

#[test]
fn one_d_draw_produces_stage_paths_groups_and_dividers() {
    let graph = drawn(one_d_series());
    let scene = graph.scene();

    assert_eq!(graph.lifecycle(), Lifecycle::Drawn);
    assert_eq!(scene.path_ids().len(), 3);
    assert_eq!(scene.label_group_ids().len(), 3);
    assert_eq!(scene.divider_ids().len(), 2);
    assert_eq!(graph.pending_tasks(), 0);
    assert_eq!(graph.line_positions().len(), 3);

    for id in scene.path_ids() {
        let path = scene.node(*id).and_then(|node| node.as_path()).expect("path node");
        assert!((path.opacity - 1.0).abs() <= 1e-9);
        assert!(path.stroke_width.abs() <= 1e-9);
        assert!(path.pointer_events);
        assert!(!path.shape.is_empty());
    }
}

#[test]
fn two_d_draw_produces_one_band_per_sub_series() {
    let graph = drawn(two_d_series());
    let scene = graph.scene();

    assert_eq!(scene.path_ids().len(), 3);
    assert_eq!(scene.label_group_ids().len(), 4);
    assert_eq!(scene.divider_ids().len(), 3);

    let percentages = graph.percentages();
    assert!((percentages[0] - 100.0).abs() <= 1e-9);
    assert!((percentages[1] - 47.5).abs() <= 1e-9);
}

#[test]
fn render_backends_see_the_reconciled_scene() {
    let graph = drawn(two_d_series());
    let mut renderer = NullRenderer::default();
    graph.render(&mut renderer).expect("render");

    assert_eq!(renderer.frames, 1);
    assert_eq!(renderer.last_path_count, 3);
    assert_eq!(renderer.last_label_group_count, 4);
    assert_eq!(renderer.last_divider_count, 3);
}

#[test]
fn shrinking_data_fades_extra_paths_out_before_removal() {
    let mut graph = drawn(two_d_series());
    graph.update_data(
        GraphUpdate::new()
            .with_values(FunnelValues::TwoD(vec![
                vec![100.0, 50.0],
                vec![60.0, 20.0],
            ]))
            .with_sub_labels(["Direct", "Ads"]),
    );

    assert_eq!(graph.scene().path_ids().len(), 2);
    let exiting: Vec<_> = graph.scene().exiting_path_ids().collect();
    assert_eq!(exiting.len(), 1);
    assert!(graph.scene().node(exiting[0]).is_some());
    assert_eq!(graph.scene().label_group_ids().len(), 2);
    assert_eq!(graph.scene().divider_ids().len(), 1);

    graph.settle();
    assert_eq!(graph.scene().path_ids().len(), 2);
    assert_eq!(graph.scene().exiting_path_ids().count(), 0);
    assert!(graph.scene().node(exiting[0]).is_none());
    assert_eq!(graph.pending_tasks(), 0);
}

#[test]
fn growing_data_reuses_existing_nodes_in_order() {
    let mut graph = drawn(one_d_series());
    let before = graph.scene().path_ids().to_vec();

    graph.update_data(GraphUpdate::new().with_values(FunnelValues::OneD(vec![
        10.0, 8.0, 6.0, 4.0, 2.0,
    ])));
    graph.settle();

    let after = graph.scene().path_ids().to_vec();
    assert_eq!(after.len(), 5);
    assert_eq!(&after[..3], before.as_slice());
    assert_eq!(graph.scene().label_group_ids().len(), 5);
    assert_eq!(graph.scene().divider_ids().len(), 4);
}

#[test]
fn update_keeps_fields_it_does_not_mention() {
    let mut graph = drawn(one_d_series());
    graph.update_data(GraphUpdate::new().with_values(FunnelValues::OneD(vec![9.0, 3.0, 1.0])));
    graph.settle();

    assert_eq!(graph.series().labels, vec!["Impressions", "Add To Cart", "Buy"]);
    assert!(graph.config().details);
    assert!(graph.config().tooltip);
    assert!((graph.width(false) - 600.0).abs() <= 1e-9);
    assert!((graph.height(false) - 400.0).abs() <= 1e-9);

    let info = graph.info();
    assert_eq!(info.len(), 3);
    assert_eq!(info[0].label, "Impressions");
    assert!((info[2].value - 1.0).abs() <= 1e-9);
}

#[test]
fn json_update_merges_margin_and_toggles_details() {
    let mut graph = drawn(one_d_series());
    graph
        .update_data_from_json(r#"{"margin": {"left": 10}, "details": false}"#)
        .expect("valid update");
    graph.settle();

    assert!((graph.config().margin.left - 10.0).abs() <= 1e-9);
    assert!((graph.config().margin.top - 120.0).abs() <= 1e-9);
    assert!(graph.scene().label_group_ids().is_empty());
    assert!(graph.scene().divider_ids().is_empty());
    assert_eq!(graph.scene().path_ids().len(), 3);

    let err = graph
        .update_data_from_json(r#"{"width": "wide"}"#)
        .expect_err("invalid width");
    assert!(err.to_string().contains("invalid options"));
}

#[test]
fn null_colors_regenerate_the_default_palette() {
    let mut graph = drawn(two_d_series());
    graph.update_data_from_json(r#"{"colors": null}"#).expect("valid update");
    graph.settle();

    for id in graph.scene().path_ids() {
        let path = graph
            .scene()
            .node(*id)
            .and_then(|node| node.as_path())
            .expect("path node");
        assert!(matches!(path.fill, Paint::Color(_)));
    }
}

#[test]
fn toggling_direction_twice_restores_dimensions() {
    let mut graph = drawn(one_d_series());

    graph.toggle_direction();
    assert_eq!(graph.direction(), Direction::Vertical);
    assert!((graph.width(false) - 400.0).abs() <= 1e-9);
    assert!((graph.height(false) - 600.0).abs() <= 1e-9);
    graph.settle();
    assert_eq!(graph.scene().path_ids().len(), 3);

    graph.toggle_direction();
    graph.settle();
    assert_eq!(graph.direction(), Direction::Horizontal);
    assert!((graph.width(false) - 600.0).abs() <= 1e-9);
    assert!((graph.height(false) - 400.0).abs() <= 1e-9);
}

#[test]
fn make_direction_reports_noops() {
    let mut graph = drawn(one_d_series());
    assert!(graph.make_horizontal(false));
    assert!(!graph.make_vertical(false));
    assert!(graph.make_vertical(false));
    assert!(!graph.make_vertical(true));
}

#[test]
fn gradient_direction_toggles_without_touching_ids() {
    let mut graph = drawn(one_d_series());
    let ids: Vec<String> = graph.scene().gradients().map(|g| g.id.clone()).collect();
    assert!(ids.iter().any(|id| id == "funnelGradient-1"));

    assert!(graph.gradient_make_vertical());
    assert!(graph.gradient_make_vertical());
    assert_eq!(graph.gradient_direction(), GradientDirection::Vertical);
    let gradient = graph.scene().gradient("funnelGradient-1").expect("gradient");
    assert_eq!(gradient.direction, GradientDirection::Vertical);

    graph.gradient_toggle_direction();
    assert_eq!(graph.gradient_direction(), GradientDirection::Horizontal);
    let after: Vec<String> = graph.scene().gradients().map(|g| g.id.clone()).collect();
    assert_eq!(ids, after);
}

#[test]
fn advance_rejects_invalid_steps() {
    let mut graph = drawn(one_d_series());
    assert!(graph.advance_by_millis(-1.0).is_err());
    assert!(graph.advance_by_millis(f64::NAN).is_err());
    graph.advance_by_millis(16.0).expect("valid step");
}

#[test]
fn oversized_steps_are_rejected_or_saturate() {
    let mut graph = drawn(one_d_series());
    let err = graph.advance_by_millis(1e300).expect_err("step overflows");
    assert!(matches!(err, FunnelError::InvalidTimeStep(_)));

    graph.advance(Duration::MAX);
    assert_eq!(graph.now(), Duration::MAX);
    graph.advance(Duration::from_millis(1));
    graph.advance_by_millis(16.0).expect("valid step");

    graph.update_data(GraphUpdate::new().with_values(FunnelValues::OneD(vec![3.0, 2.0, 1.0])));
    graph.settle();
    assert_eq!(graph.pending_tasks(), 0);
    assert_eq!(graph.scene().path_ids().len(), 3);
}

#[test]
fn non_finite_size_keeps_the_last_valid_scene() {
    let mut graph = drawn(one_d_series());
    let shapes = path_shapes(&graph);
    let view_box = graph.scene().root().expect("mounted").view_box;

    graph.update_data(GraphUpdate::new().with_size(f64::NAN, 400.0));
    graph.settle();

    let mut renderer = NullRenderer::default();
    graph.render(&mut renderer).expect("scene stays valid");
    assert_eq!(renderer.last_path_count, 3);
    assert_eq!(path_shapes(&graph), shapes);
    assert_eq!(graph.scene().root().expect("mounted").view_box, view_box);

    graph.update_data(GraphUpdate::new().with_size(600.0, 400.0));
    graph.settle();
    graph.render(&mut renderer).expect("render");
    assert_eq!(path_shapes(&graph), shapes);
}

#[test]
fn draw_with_non_finite_size_mounts_nothing() {
    let mut graph = FunnelGraph::new(
        FunnelGraphOptions::new(one_d_series()).with_size(f64::INFINITY, 400.0),
    );
    graph.draw();
    assert_eq!(graph.lifecycle(), Lifecycle::Created);
    assert!(!graph.scene().is_mounted());
    assert_eq!(graph.pending_tasks(), 0);
    graph
        .render(&mut NullRenderer::default())
        .expect("empty scene renders");
}

#[test]
fn redrawing_an_unchanged_settled_scene_schedules_nothing() {
    for series in [one_d_series(), two_d_series()] {
        let mut graph = drawn(series);
        let shapes = path_shapes(&graph);

        graph.redraw();
        assert_eq!(graph.pending_tasks(), 0);
        graph.update_data(GraphUpdate::new());
        assert_eq!(graph.pending_tasks(), 0);
        assert_eq!(path_shapes(&graph), shapes);
    }
}

#[test]
fn update_during_a_transition_replaces_it() {
    let next = FunnelValues::OneD(vec![9_000.0, 4_000.0, 1_000.0]);
    let mut graph = FunnelGraph::new(FunnelGraphOptions::new(one_d_series()).with_size(600.0, 400.0));
    graph.draw();
    graph.advance(Duration::from_millis(300));
    assert_eq!(graph.pending_tasks(), 6);

    graph.update_data(GraphUpdate::new().with_values(next.clone()));
    let nodes: Vec<_> = graph
        .scene()
        .path_ids()
        .iter()
        .chain(graph.scene().label_group_ids())
        .copied()
        .collect();
    assert_eq!(nodes.len(), 6);
    for node in &nodes {
        assert!(graph.has_pending_task(TaskKey::node(*node, TaskChannel::Transition)));
    }
    assert_eq!(graph.pending_tasks(), nodes.len());

    graph.settle();
    let fresh = drawn(DataSeries::new(next).with_labels(["Impressions", "Add To Cart", "Buy"]));
    assert_eq!(path_shapes(&graph), path_shapes(&fresh));
    assert_eq!(graph.info(), fresh.info());
    assert_eq!(graph.handler_registry().len(), fresh.handler_registry().len());
    for id in graph.scene().path_ids() {
        let path = graph.scene().node(*id).and_then(|node| node.as_path()).expect("path");
        assert!((path.opacity - 1.0).abs() <= 1e-9);
        assert!(path.pointer_events);
    }
}

#[test]
fn exiting_paths_stagger_by_their_previous_position() {
    let mut graph = drawn(DataSeries::new(FunnelValues::OneD(vec![50.0, 40.0, 30.0, 20.0, 10.0])));
    let before = graph.scene().path_ids().to_vec();

    graph.update_data(GraphUpdate::new().with_values(FunnelValues::OneD(vec![50.0, 40.0])));
    graph.advance(Duration::from_millis(700));
    for node in &before[2..] {
        assert!(graph.scene().node(*node).is_some());
    }

    graph.advance(Duration::from_millis(50));
    assert!(graph.scene().node(before[2]).is_none());
    assert!(graph.scene().node(before[3]).is_some());

    graph.advance(Duration::from_millis(100));
    assert!(graph.scene().node(before[3]).is_none());
    assert!(graph.scene().node(before[4]).is_some());

    graph.advance(Duration::from_millis(100));
    assert!(graph.scene().node(before[4]).is_none());
}

#[test]
fn paths_settle_after_the_stagger_and_duration() {
    let mut graph = FunnelGraph::new(FunnelGraphOptions::new(one_d_series()).with_size(600.0, 400.0));
    graph.draw();

    let last = *graph.scene().path_ids().last().expect("paths");
    graph.advance_by_millis(300.0).expect("advance");
    let fading = graph
        .scene()
        .node(last)
        .and_then(|node| node.as_path())
        .expect("path")
        .opacity;
    assert!(fading < 1.0);

    graph.advance_by_millis(2_000.0).expect("advance");
    assert_eq!(graph.pending_tasks(), 0);
    let settled = graph
        .scene()
        .node(last)
        .and_then(|node| node.as_path())
        .expect("path");
    assert!((settled.opacity - 1.0).abs() <= 1e-9);
}

#[test]
fn snapshot_serializes_to_json() {
    let graph = drawn(two_d_series());
    let snapshot = graph.snapshot();
    assert_eq!(snapshot.path_data.len(), 3);
    assert_eq!(snapshot.pending_tasks, 0);
    assert_eq!(snapshot.info.len(), 4);

    let json = graph.snapshot_json_pretty().expect("snapshot json");
    assert!(json.contains("\"path_data\""));
    assert!(json.contains(graph.id()));
}
