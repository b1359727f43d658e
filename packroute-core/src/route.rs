//! Decoded vehicle routes.
//!
//! A [`Route`] stores customer positions (indices into
//! [`Instance::customers`](crate::Instance::customers)); the depot is implied
//! at both ends. [`Route::stops`] renders the depot-bounded id sequence used in
//! results.

use crate::{DEPOT_ID, Instance};

/// One vehicle tour, implicitly starting and ending at the depot.
///
/// # Examples
/// ```
/// use packroute_core::{Customer, Instance, Location, Route};
///
/// # fn main() -> Result<(), packroute_core::InstanceError> {
/// let instance = Instance::builder(Location::depot(0.0, 0.0), 10)
///     .customer(Customer::new(7, 1.0, 0.0, 2))
///     .customer(Customer::new(9, 2.0, 0.0, 2))
///     .build()?;
/// let route = Route::new(vec![1, 0]);
/// assert_eq!(route.stops(&instance), vec![0, 9, 7, 0]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Route {
    visits: Vec<usize>,
}

impl Route {
    /// Construct a route visiting the given customer positions in order.
    #[must_use]
    pub const fn new(visits: Vec<usize>) -> Self {
        Self { visits }
    }

    /// Customer positions in visiting order.
    #[must_use]
    pub fn visits(&self) -> &[usize] {
        &self.visits
    }

    /// Number of customers served.
    #[must_use]
    pub fn len(&self) -> usize {
        self.visits.len()
    }

    /// Whether the route serves nobody.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.visits.is_empty()
    }

    /// Append a customer position.
    pub fn push(&mut self, visit: usize) {
        self.visits.push(visit);
    }

    /// Matrix nodes travelled, depot included at both ends.
    pub fn nodes(&self) -> impl Iterator<Item = usize> + '_ {
        std::iter::once(0)
            .chain(self.visits.iter().map(|visit| visit.saturating_add(1)))
            .chain(std::iter::once(0))
    }

    /// Customer ids bounded by the depot id: `[0, c1, ..., ck, 0]`.
    #[must_use]
    pub fn stops(&self, instance: &Instance) -> Vec<u64> {
        std::iter::once(DEPOT_ID)
            .chain(self.visits.iter().map(|visit| instance.customer_id(*visit)))
            .chain(std::iter::once(DEPOT_ID))
            .collect()
    }
}

/// Per-route figures reported alongside a result.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteSummary {
    /// Depot-bounded customer ids.
    pub stops: Vec<u64>,
    /// Travelled distance under the instance metric.
    pub distance: f64,
    /// Total demand carried.
    pub load: u64,
}
