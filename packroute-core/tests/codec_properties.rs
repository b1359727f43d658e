//! Property-based tests for the random-key codec and fitness evaluator.
//!
//! # Invariants tested
//!
//! - **Exact cover:** every customer appears in exactly one route.
//! - **Capacity:** decoded routes never exceed the vehicle capacity.
//! - **Depot framing:** stop lists start and end at the depot, so
//!   `Σ len − 2·routes` equals the customer count.
//! - **Fitness:** decoded solutions carry no penalty and score equals distance.
//! - **Clamping:** clamped positions stay inside the search space.


use packroute_core::{RandomKeyCodec, SolutionCodec, baseline, fitness};
use proptest::prelude::*;

use proptest_support::{assert_exact_cover, instance_and_position, instance_strategy};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn decoded_routes_cover_every_customer_once((instance, position) in instance_and_position()) {
        let routes = RandomKeyCodec.decode(&position, &instance);
        assert_exact_cover(&routes, &instance)?;
    }

    #[test]
    fn decoded_routes_respect_capacity((instance, position) in instance_and_position()) {
        for route in RandomKeyCodec.decode(&position, &instance) {
            prop_assert_eq!(fitness::route_overflow(&route, &instance), 0);
        }
    }

    #[test]
    fn stop_lists_are_depot_framed((instance, position) in instance_and_position()) {
        let routes = RandomKeyCodec.decode(&position, &instance);
        let stops: Vec<Vec<u64>> = routes.iter().map(|r| r.stops(&instance)).collect();
        for list in &stops {
            prop_assert_eq!(list.first(), Some(&0));
            prop_assert_eq!(list.last(), Some(&0));
        }
        let total: usize = stops.iter().map(Vec::len).sum();
        prop_assert_eq!(total - 2 * stops.len(), instance.customer_count());
    }

    #[test]
    #[expect(clippy::float_arithmetic, reason = "tolerance check")]
    fn feasible_fitness_equals_distance((instance, position) in instance_and_position()) {
        let routes = RandomKeyCodec.decode(&position, &instance);
        let score = fitness::evaluate(&routes, &instance);
        let distance: f64 = fitness::summarize(&routes, &instance)
            .iter()
            .map(|summary| summary.distance)
            .sum();
        prop_assert!(score.is_finite() && score >= 0.0);
        prop_assert!((score - distance).abs() < 1e-9);
    }

    #[test]
    fn clamped_positions_stay_in_bounds((instance, mut position) in instance_and_position()) {
        RandomKeyCodec.clamp(&mut position, &instance);
        let space = RandomKeyCodec.search_space(&instance);
        prop_assert!(position.iter().all(|value| space.contains(*value)));
    }

    #[test]
    fn baseline_covers_every_customer(instance in instance_strategy(1, 25)) {
        let plan = baseline::nearest_neighbour(&instance);
        assert_exact_cover(&plan.routes, &instance)?;
        for route in &plan.routes {
            prop_assert_eq!(fitness::route_overflow(route, &instance), 0);
        }
    }
}
