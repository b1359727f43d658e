//! Nearest-neighbour construction used as a comparison baseline.
//!
//! The baseline never feeds the optimizer; callers use it to judge how much
//! the search improved on a simple greedy plan.

use crate::{Instance, Route, fitness};

/// Routes and cost produced by [`nearest_neighbour`].
#[derive(Debug, Clone, PartialEq)]
pub struct BaselineSolution {
    /// Constructed routes.
    pub routes: Vec<Route>,
    /// Total travelled distance (no penalty; the construction never overflows
    /// a feasible instance).
    pub distance: f64,
}

/// Build routes by repeatedly driving to the closest unserved customer that
/// still fits, returning to the depot when none does.
///
/// Ties go to the lower customer position so the result is deterministic.
///
/// # Examples
/// ```
/// use packroute_core::{Customer, Instance, Location, baseline};
///
/// # fn main() -> Result<(), packroute_core::InstanceError> {
/// let instance = Instance::builder(Location::depot(0.0, 0.0), 10)
///     .customer(Customer::new(1, 0.0, 2.0, 5))
///     .customer(Customer::new(2, 0.0, 1.0, 5))
///     .build()?;
/// let plan = baseline::nearest_neighbour(&instance);
/// assert_eq!(plan.routes.len(), 1);
/// assert_eq!(plan.routes[0].stops(&instance), vec![0, 2, 1, 0]);
/// # Ok(())
/// # }
/// ```
#[must_use]
pub fn nearest_neighbour(instance: &Instance) -> BaselineSolution {
    let capacity = u64::from(instance.vehicle_capacity());
    let distances = instance.distances();
    let mut served = vec![false; instance.customer_count()];
    let mut remaining = instance.customer_count();
    let mut routes = Vec::new();

    while remaining > 0 {
        let mut route = Route::default();
        let mut load = 0_u64;
        let mut node = 0_usize;

        loop {
            let next = served
                .iter()
                .enumerate()
                .filter(|(index, done)| {
                    !**done
                        && load.saturating_add(u64::from(instance.demand(*index))) <= capacity
                })
                .map(|(index, _)| (index, distances.get(node, index.saturating_add(1))))
                .min_by(|(lhs_index, lhs), (rhs_index, rhs)| {
                    lhs.total_cmp(rhs).then_with(|| lhs_index.cmp(rhs_index))
                });
            let Some((index, _)) = next else {
                break;
            };
            if let Some(flag) = served.get_mut(index) {
                *flag = true;
            }
            remaining = remaining.saturating_sub(1);
            load = load.saturating_add(u64::from(instance.demand(index)));
            node = index.saturating_add(1);
            route.push(index);
        }

        if route.is_empty() {
            // Only customers larger than a vehicle remain; serve each alone.
            for (index, done) in served.iter_mut().enumerate() {
                if !*done {
                    *done = true;
                    routes.push(Route::new(vec![index]));
                }
            }
            break;
        }
        routes.push(route);
    }

    let distance = routes
        .iter()
        .map(|route| fitness::route_distance(route, instance))
        .sum();
    log::debug!(
        "nearest-neighbour baseline built {} routes, distance {distance:.3}",
        routes.len()
    );
    BaselineSolution { routes, distance }
}
