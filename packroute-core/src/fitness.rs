//! Score decoded routes: travel distance plus a capacity-overflow penalty.
//!
//! Lower fitness is better. Every function here is pure and deterministic for
//! a given instance.

use crate::{Instance, Route, RouteSummary};

/// Total distance travelled along `route`, depot legs included.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "route length is a sum of floating-point leg distances"
)]
pub fn route_distance(route: &Route, instance: &Instance) -> f64 {
    let distances = instance.distances();
    let nodes: Vec<usize> = route.nodes().collect();
    nodes
        .windows(2)
        .map(|leg| match leg {
            [from, to] => distances.get(*from, *to),
            _ => 0.0,
        })
        .sum()
}

/// Total demand carried by `route`.
#[must_use]
pub fn route_load(route: &Route, instance: &Instance) -> u64 {
    route
        .visits()
        .iter()
        .map(|visit| u64::from(instance.demand(*visit)))
        .sum()
}

/// Units by which `route` exceeds the vehicle capacity, or `0`.
#[must_use]
pub fn route_overflow(route: &Route, instance: &Instance) -> u64 {
    route_load(route, instance).saturating_sub(u64::from(instance.vehicle_capacity()))
}

/// Fitness of a complete route set.
///
/// `Σ distance + penalty_coefficient × Σ max(0, load − capacity)`.
///
/// # Examples
/// ```
/// use packroute_core::{Customer, Instance, Location, Route, fitness};
///
/// # fn main() -> Result<(), packroute_core::InstanceError> {
/// let instance = Instance::builder(Location::depot(0.0, 0.0), 10)
///     .customer(Customer::new(1, 3.0, 4.0, 5))
///     .build()?;
/// let score = fitness::evaluate(&[Route::new(vec![0])], &instance);
/// assert_eq!(score, 10.0);
/// # Ok(())
/// # }
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "fitness combines distance and penalty as floating-point cost"
)]
pub fn evaluate(routes: &[Route], instance: &Instance) -> f64 {
    let (distance, overflow) = routes.iter().fold((0.0_f64, 0_u64), |(d, o), route| {
        (
            d + route_distance(route, instance),
            o.saturating_add(route_overflow(route, instance)),
        )
    });
    let penalty = if overflow == 0 {
        0.0
    } else {
        instance.penalty_coefficient() * overflow as f64
    };
    distance + penalty
}

/// Describe each route with its depot-bounded stops, distance and load.
#[must_use]
pub fn summarize(routes: &[Route], instance: &Instance) -> Vec<RouteSummary> {
    routes
        .iter()
        .map(|route| RouteSummary {
            stops: route.stops(instance),
            distance: route_distance(route, instance),
            load: route_load(route, instance),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Customer, Location};
    use rstest::{fixture, rstest};

    #[fixture]
    fn line() -> Instance {
        Instance::builder(Location::depot(0.0, 0.0), 20)
            .customer(Customer::new(1, 0.0, 1.0, 15))
            .customer(Customer::new(2, 0.0, 2.0, 15))
            .penalty_coefficient(1000.0)
            .build()
            .expect("valid instance")
    }

    #[rstest]
    fn single_customer_round_trip(line: Instance) {
        let score = evaluate(&[Route::new(vec![0])], &line);
        assert!((score - 2.0).abs() < 1e-12);
    }

    #[rstest]
    fn overflow_is_penalised_per_unit(line: Instance) {
        let routes = [Route::new(vec![0, 1])];
        let score = evaluate(&routes, &line);
        // 0 -> 1 -> 2 -> 0 is 1 + 1 + 2, plus 10 units over capacity.
        assert!((score - (4.0 + 10_000.0)).abs() < 1e-9);
        assert_eq!(route_overflow(&routes[0], &line), 10);
    }

    #[rstest]
    fn feasible_split_has_no_penalty(line: Instance) {
        let routes = [Route::new(vec![0]), Route::new(vec![1])];
        let score = evaluate(&routes, &line);
        assert!((score - 6.0).abs() < 1e-12);
    }

    #[rstest]
    fn coincident_customers_score_zero() {
        let instance = Instance::builder(Location::depot(5.0, 5.0), 10)
            .customer(Customer::new(1, 5.0, 5.0, 1))
            .customer(Customer::new(2, 5.0, 5.0, 1))
            .build()
            .expect("valid instance");
        assert_eq!(evaluate(&[Route::new(vec![0, 1])], &instance), 0.0);
    }

    #[rstest]
    fn summary_reports_stops_distance_and_load(line: Instance) {
        let summary = summarize(&[Route::new(vec![1])], &line);
        assert_eq!(summary.len(), 1);
        let only = summary.first().expect("one summary");
        assert_eq!(only.stops, vec![0, 2, 0]);
        assert_eq!(only.load, 15);
        assert!((only.distance - 4.0).abs() < 1e-12);
    }
}
