//! The immutable CVRP instance: one depot, many customers, one capacity.
//!
//! Constructors validate shape eagerly. Feasibility (every single demand fits
//! into a vehicle) is checked separately by [`Instance::check_feasible`] so
//! the optimizer can re-validate before it starts.

use std::collections::HashSet;

use thiserror::Error;

use crate::{Customer, DEPOT_ID, DistanceMatrix, DistanceMetric, Location};

/// Penalty applied per unit of capacity overflow when none is configured.
pub const DEFAULT_PENALTY_COEFFICIENT: f64 = 1000.0;

/// Errors returned when an instance is malformed or infeasible.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InstanceError {
    /// No customers were supplied.
    #[error("instance must contain at least one customer")]
    NoCustomers,
    /// Vehicle capacity was zero.
    #[error("vehicle capacity must be positive")]
    NonPositiveCapacity,
    /// The penalty coefficient was negative or not a number.
    #[error("penalty coefficient must be a non-negative number, got {0}")]
    InvalidPenalty(f64),
    /// A customer used the depot identifier.
    #[error("customer id 0 is reserved for the depot")]
    ReservedCustomerId,
    /// Two customers share an identifier.
    #[error("customer id {id} appears more than once")]
    DuplicateCustomer {
        /// The repeated identifier.
        id: u64,
    },
    /// A customer has no demand.
    #[error("customer {id} must have a positive demand")]
    ZeroDemand {
        /// The offending customer.
        id: u64,
    },
    /// A coordinate was NaN or infinite.
    #[error("location {id} has a non-finite coordinate")]
    NonFiniteCoordinate {
        /// The offending location.
        id: u64,
    },
    /// A single customer needs more than one vehicle can carry.
    #[error("customer {id} demands {demand} units but vehicle capacity is {capacity}")]
    DemandExceedsCapacity {
        /// The offending customer.
        id: u64,
        /// Its demand.
        demand: u32,
        /// The vehicle capacity.
        capacity: u32,
    },
}

/// A validated single-depot CVRP instance.
///
/// # Examples
/// ```
/// use packroute_core::{Customer, Instance, Location};
///
/// # fn main() -> Result<(), packroute_core::InstanceError> {
/// let instance = Instance::builder(Location::depot(0.0, 0.0), 50)
///     .customer(Customer::new(1, 1.0, 0.0, 20))
///     .customer(Customer::new(2, 0.0, 1.0, 30))
///     .build()?;
/// assert_eq!(instance.customer_count(), 2);
/// assert_eq!(instance.total_demand(), 50);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "InstanceSpec", into = "InstanceSpec")
)]
pub struct Instance {
    depot: Location,
    customers: Vec<Customer>,
    vehicle_capacity: u32,
    penalty_coefficient: f64,
    distance_metric: DistanceMetric,
    distances: DistanceMatrix,
}

impl Instance {
    /// Validate and construct an instance.
    ///
    /// # Errors
    ///
    /// Returns an [`InstanceError`] when the customer list is empty, ids are
    /// duplicated or reserved, a demand is zero, a coordinate is not finite,
    /// the capacity is zero or the penalty is negative.
    pub fn new(
        depot: Location,
        customers: Vec<Customer>,
        vehicle_capacity: u32,
        penalty_coefficient: f64,
        distance_metric: DistanceMetric,
    ) -> Result<Self, InstanceError> {
        validate_shape(&depot, &customers, vehicle_capacity, penalty_coefficient)?;
        let anchored = Location {
            id: DEPOT_ID,
            ..depot
        };
        let nodes: Vec<Location> = std::iter::once(anchored)
            .chain(customers.iter().map(|customer| customer.location))
            .collect();
        let distances = DistanceMatrix::build(&nodes, distance_metric);
        Ok(Self {
            depot: anchored,
            customers,
            vehicle_capacity,
            penalty_coefficient,
            distance_metric,
            distances,
        })
    }

    /// Start building an instance around a depot and capacity.
    #[must_use]
    pub const fn builder(depot: Location, vehicle_capacity: u32) -> InstanceBuilder {
        InstanceBuilder {
            depot,
            customers: Vec::new(),
            vehicle_capacity,
            penalty_coefficient: DEFAULT_PENALTY_COEFFICIENT,
            distance_metric: DistanceMetric::Euclidean,
        }
    }

    /// Confirm every customer fits into an empty vehicle on its own.
    ///
    /// # Errors
    ///
    /// Returns [`InstanceError::DemandExceedsCapacity`] for the first customer
    /// whose demand alone exceeds the vehicle capacity.
    pub fn check_feasible(&self) -> Result<(), InstanceError> {
        self.customers
            .iter()
            .find(|customer| customer.demand > self.vehicle_capacity)
            .map_or(Ok(()), |customer| {
                Err(InstanceError::DemandExceedsCapacity {
                    id: customer.id(),
                    demand: customer.demand,
                    capacity: self.vehicle_capacity,
                })
            })
    }

    /// The depot location.
    #[must_use]
    pub const fn depot(&self) -> &Location {
        &self.depot
    }

    /// Customers in their input order.
    #[must_use]
    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    /// Number of customers.
    #[must_use]
    pub fn customer_count(&self) -> usize {
        self.customers.len()
    }

    /// Capacity shared by every vehicle.
    #[must_use]
    pub const fn vehicle_capacity(&self) -> u32 {
        self.vehicle_capacity
    }

    /// Cost added per unit of capacity overflow.
    #[must_use]
    pub const fn penalty_coefficient(&self) -> f64 {
        self.penalty_coefficient
    }

    /// Metric used to build the distance matrix.
    #[must_use]
    pub const fn distance_metric(&self) -> DistanceMetric {
        self.distance_metric
    }

    /// Precomputed node distances (node `0` is the depot).
    #[must_use]
    pub const fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }

    /// Sum of all customer demands.
    #[must_use]
    pub fn total_demand(&self) -> u64 {
        self.customers
            .iter()
            .map(|customer| u64::from(customer.demand))
            .sum()
    }

    /// Customer at position `index`, if any.
    #[must_use]
    pub fn customer(&self, index: usize) -> Option<&Customer> {
        self.customers.get(index)
    }

    /// Demand of the customer at position `index`, or `0` when out of range.
    #[must_use]
    pub fn demand(&self, index: usize) -> u32 {
        self.customer(index).map_or(0, |customer| customer.demand)
    }

    /// Identifier of the customer at position `index`, or the depot id when
    /// out of range.
    #[must_use]
    pub fn customer_id(&self, index: usize) -> u64 {
        self.customer(index).map_or(DEPOT_ID, Customer::id)
    }
}

fn validate_shape(
    depot: &Location,
    customers: &[Customer],
    vehicle_capacity: u32,
    penalty_coefficient: f64,
) -> Result<(), InstanceError> {
    if customers.is_empty() {
        return Err(InstanceError::NoCustomers);
    }
    if vehicle_capacity == 0 {
        return Err(InstanceError::NonPositiveCapacity);
    }
    if !(penalty_coefficient >= 0.0 && penalty_coefficient.is_finite()) {
        return Err(InstanceError::InvalidPenalty(penalty_coefficient));
    }
    if !depot.is_finite() {
        return Err(InstanceError::NonFiniteCoordinate { id: DEPOT_ID });
    }

    let mut seen = HashSet::with_capacity(customers.len());
    for customer in customers {
        let id = customer.id();
        if id == DEPOT_ID {
            return Err(InstanceError::ReservedCustomerId);
        }
        if !seen.insert(id) {
            return Err(InstanceError::DuplicateCustomer { id });
        }
        if customer.demand == 0 {
            return Err(InstanceError::ZeroDemand { id });
        }
        if !customer.location.is_finite() {
            return Err(InstanceError::NonFiniteCoordinate { id });
        }
    }
    Ok(())
}

/// Incremental constructor for [`Instance`].
#[derive(Debug, Clone)]
#[must_use]
pub struct InstanceBuilder {
    depot: Location,
    customers: Vec<Customer>,
    vehicle_capacity: u32,
    penalty_coefficient: f64,
    distance_metric: DistanceMetric,
}

impl InstanceBuilder {
    /// Append a customer.
    pub fn customer(mut self, customer: Customer) -> Self {
        self.customers.push(customer);
        self
    }

    /// Append several customers.
    pub fn customers<I>(mut self, customers: I) -> Self
    where
        I: IntoIterator<Item = Customer>,
    {
        self.customers.extend(customers);
        self
    }

    /// Override the penalty per unit of capacity overflow.
    pub fn penalty_coefficient(mut self, penalty_coefficient: f64) -> Self {
        self.penalty_coefficient = penalty_coefficient;
        self
    }

    /// Override the distance metric.
    pub fn distance_metric(mut self, distance_metric: DistanceMetric) -> Self {
        self.distance_metric = distance_metric;
        self
    }

    /// Validate and build the instance.
    ///
    /// # Errors
    ///
    /// See [`Instance::new`].
    pub fn build(self) -> Result<Instance, InstanceError> {
        Instance::new(
            self.depot,
            self.customers,
            self.vehicle_capacity,
            self.penalty_coefficient,
            self.distance_metric,
        )
    }
}

/// Serialized form of an [`Instance`]; the distance matrix is rebuilt on load.
#[cfg(feature = "serde")]
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct InstanceSpec {
    depot: Location,
    customers: Vec<Customer>,
    vehicle_capacity: u32,
    #[serde(default = "default_penalty")]
    penalty_coefficient: f64,
    #[serde(default)]
    distance_metric: DistanceMetric,
}

#[cfg(feature = "serde")]
const fn default_penalty() -> f64 {
    DEFAULT_PENALTY_COEFFICIENT
}

#[cfg(feature = "serde")]
impl TryFrom<InstanceSpec> for Instance {
    type Error = InstanceError;

    fn try_from(spec: InstanceSpec) -> Result<Self, Self::Error> {
        Self::new(
            spec.depot,
            spec.customers,
            spec.vehicle_capacity,
            spec.penalty_coefficient,
            spec.distance_metric,
        )
    }
}

#[cfg(feature = "serde")]
impl From<Instance> for InstanceSpec {
    fn from(instance: Instance) -> Self {
        Self {
            depot: instance.depot,
            customers: instance.customers,
            vehicle_capacity: instance.vehicle_capacity,
            penalty_coefficient: instance.penalty_coefficient,
            distance_metric: instance.distance_metric,
        }
    }
}
