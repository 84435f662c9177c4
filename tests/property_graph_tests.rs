use funnel_rs::api::{FunnelGraph, FunnelGraphOptions, GraphUpdate};
use funnel_rs::core::{DataSeries, Direction, FunnelValues, percentages_of};
use funnel_rs::interaction::resolve_section;
use funnel_rs::render::NullRenderer;
use proptest::prelude::*;

fn sorted_boundaries() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.0f64..1_000.0, 1..12).prop_map(|mut values| {
        values.sort_by(f64::total_cmp);
        values
    })
}

proptest! {
    #[test]
    fn percentages_are_bounded_and_peak_at_one_hundred(
        values in prop::collection::vec(0.0f64..1_000_000.0, 1..16)
    ) {
        let percentages = percentages_of(&values);
        prop_assert_eq!(percentages.len(), values.len());
        for (value, percentage) in values.iter().zip(&percentages) {
            prop_assert!((0.0..=100.0).contains(percentage));
            if *value == 0.0 {
                prop_assert!(percentage.abs() <= 1e-12);
            }
        }

        let max = values.iter().copied().fold(0.0, f64::max);
        if max > 0.0 {
            prop_assert!(percentages.iter().any(|p| (p - 100.0).abs() <= 1e-9));
        } else {
            prop_assert!(percentages.iter().all(|p| p.abs() <= 1e-12));
        }
    }

    #[test]
    fn non_zero_values_keep_a_non_zero_share(
        values in prop::collection::vec(prop_oneof![Just(0.0f64), 1.0f64..1_000.0], 1..16)
    ) {
        let percentages = percentages_of(&values);
        for (value, percentage) in values.iter().zip(&percentages) {
            prop_assert_eq!(*value == 0.0, *percentage == 0.0);
        }
    }

    #[test]
    fn toggling_twice_restores_dimensions(
        width in 50.0f64..2_000.0,
        height in 50.0f64..2_000.0,
        vertical in any::<bool>(),
    ) {
        let options = FunnelGraphOptions::new(DataSeries::new(FunnelValues::OneD(vec![3.0, 2.0, 1.0])))
            .with_size(width, height)
            .with_direction(if vertical { Direction::Vertical } else { Direction::Horizontal });
        let mut graph = FunnelGraph::new(options);
        graph.draw();
        let before = (graph.width(false), graph.height(false), graph.direction());

        graph.toggle_direction();
        prop_assert_ne!(graph.direction(), before.2);
        prop_assert!((graph.width(false) - before.1).abs() <= 1e-9);
        graph.toggle_direction();
        graph.settle();

        prop_assert_eq!((graph.width(false), graph.height(false), graph.direction()), before);
    }

    #[test]
    fn resolve_section_is_monotonic_and_bounded(
        boundaries in sorted_boundaries(),
        a in -100.0f64..1_200.0,
        b in -100.0f64..1_200.0,
    ) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let low_section = resolve_section(low, &boundaries);
        let high_section = resolve_section(high, &boundaries);

        prop_assert!(low_section <= boundaries.len());
        prop_assert!(high_section <= boundaries.len());
        prop_assert!(low_section <= high_section);
        if low < boundaries[0] {
            prop_assert_eq!(low_section, 0);
        }
        if high > boundaries[boundaries.len() - 1] {
            prop_assert_eq!(high_section, boundaries.len());
        }
    }

    #[test]
    fn settled_scenes_match_the_data_shape(
        values in prop::collection::vec(1.0f64..10_000.0, 1..9),
        next in prop::collection::vec(1.0f64..10_000.0, 1..9),
    ) {
        let stages = values.len();
        let mut graph = FunnelGraph::new(
            FunnelGraphOptions::new(DataSeries::new(FunnelValues::OneD(values)))
                .with_size(600.0, 400.0),
        );
        graph.draw();
        graph.settle();

        prop_assert_eq!(graph.pending_tasks(), 0);
        prop_assert_eq!(graph.scene().path_ids().len(), stages);
        prop_assert_eq!(graph.scene().label_group_ids().len(), stages);
        prop_assert_eq!(graph.scene().divider_ids().len(), stages - 1);

        let next_stages = next.len();
        graph.update_data(GraphUpdate::new().with_values(FunnelValues::OneD(next)));
        graph.settle();

        prop_assert_eq!(graph.scene().path_ids().len(), next_stages);
        prop_assert_eq!(graph.scene().exiting_path_ids().count(), 0);
        prop_assert_eq!(graph.scene().label_group_ids().len(), next_stages);
        prop_assert_eq!(graph.line_positions().len(), next_stages);

        let mut renderer = NullRenderer::default();
        prop_assert!(graph.render(&mut renderer).is_ok());
        prop_assert_eq!(renderer.last_path_count, next_stages);
    }
}
