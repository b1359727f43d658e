//! Map continuous wolf positions onto discrete route sets.
//!
//! The GWO update rule works in a continuous space. A [`SolutionCodec`]
//! defines that space and turns a point in it into capacity-respecting routes.
//! [`RandomKeyCodec`] is the default: the position holds one key per customer
//! and sorting the keys yields the visiting order.

use std::cmp::Ordering;

use crate::{Instance, Route};

/// Closed box bounding every coordinate of a position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchSpace {
    /// Inclusive lower bound.
    pub lower: f64,
    /// Inclusive upper bound.
    pub upper: f64,
}

impl SearchSpace {
    /// Clip `value` into the space. NaN collapses onto the lower bound.
    #[must_use]
    pub const fn clip(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.lower;
        }
        value.clamp(self.lower, self.upper)
    }

    /// Whether `value` lies inside the space.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        (self.lower..=self.upper).contains(&value)
    }
}

/// Strategy translating continuous positions into route sets.
///
/// Implementations must be total: every position of the right length decodes
/// to routes that cover each customer exactly once. Codecs are shared across
/// threads by the job layer, hence the `Send + Sync` bound.
pub trait SolutionCodec: Send + Sync {
    /// Number of coordinates a position needs for `instance`.
    fn dimensions(&self, instance: &Instance) -> usize {
        instance.customer_count()
    }

    /// Bounds applied to every coordinate.
    fn search_space(&self, instance: &Instance) -> SearchSpace;

    /// Decode `position` into depot-bounded routes.
    fn decode(&self, position: &[f64], instance: &Instance) -> Vec<Route>;

    /// Clip every coordinate of `position` into the search space in place.
    fn clamp(&self, position: &mut [f64], instance: &Instance) {
        let space = self.search_space(instance);
        for value in position.iter_mut() {
            *value = space.clip(*value);
        }
    }
}

/// Random-key encoding with greedy capacity packing.
///
/// # Examples
/// ```
/// use packroute_core::{Customer, Instance, Location, RandomKeyCodec, SolutionCodec};
///
/// # fn main() -> Result<(), packroute_core::InstanceError> {
/// let instance = Instance::builder(Location::depot(0.0, 0.0), 10)
///     .customer(Customer::new(1, 1.0, 0.0, 6))
///     .customer(Customer::new(2, 2.0, 0.0, 6))
///     .customer(Customer::new(3, 3.0, 0.0, 3))
///     .build()?;
/// let routes = RandomKeyCodec.decode(&[0.9, 0.1, 0.5], &instance);
/// let stops: Vec<Vec<u64>> = routes.iter().map(|r| r.stops(&instance)).collect();
/// assert_eq!(stops, vec![vec![0, 2, 3, 0], vec![0, 1, 0]]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RandomKeyCodec;

impl RandomKeyCodec {
    /// Customer positions ordered by key, ties broken by ascending id.
    #[must_use]
    pub fn visiting_order(position: &[f64], instance: &Instance) -> Vec<usize> {
        let mut order: Vec<usize> = (0..instance.customer_count()).collect();
        order.sort_by(|lhs, rhs| {
            let lhs_key = position.get(*lhs).copied().unwrap_or(f64::INFINITY);
            let rhs_key = position.get(*rhs).copied().unwrap_or(f64::INFINITY);
            lhs_key
                .total_cmp(&rhs_key)
                .then_with(|| instance.customer_id(*lhs).cmp(&instance.customer_id(*rhs)))
        });
        order
    }

    /// Split a visiting order into routes without exceeding capacity.
    ///
    /// A customer that cannot fit even into an empty vehicle still gets a
    /// route of its own; feasibility checks reject such instances earlier.
    #[must_use]
    pub fn pack(order: &[usize], instance: &Instance) -> Vec<Route> {
        let capacity = u64::from(instance.vehicle_capacity());
        let mut routes = Vec::new();
        let mut current = Route::default();
        let mut load = 0_u64;

        for &visit in order {
            let demand = u64::from(instance.demand(visit));
            let next_load = load.saturating_add(demand);
            if next_load > capacity && !current.is_empty() {
                routes.push(std::mem::take(&mut current));
                load = demand;
            } else {
                load = next_load;
            }
            current.push(visit);
        }
        if !current.is_empty() {
            routes.push(current);
        }
        routes
    }
}

impl SolutionCodec for RandomKeyCodec {
    #[expect(
        clippy::cast_precision_loss,
        reason = "customer counts are far below f64's exact integer range"
    )]
    fn search_space(&self, instance: &Instance) -> SearchSpace {
        SearchSpace {
            lower: 0.0,
            upper: instance.customer_count() as f64,
        }
    }

    fn decode(&self, position: &[f64], instance: &Instance) -> Vec<Route> {
        debug_assert_eq!(
            position.len(),
            instance.customer_count(),
            "position length must match the customer count"
        );
        let order = Self::visiting_order(position, instance);
        Self::pack(&order, instance)
    }
}

/// Compare two fitness values, ordering NaN after every number.
#[must_use]
pub fn compare_fitness(lhs: f64, rhs: f64) -> Ordering {
    match (lhs.is_nan(), rhs.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => lhs.total_cmp(&rhs),
    }
}
