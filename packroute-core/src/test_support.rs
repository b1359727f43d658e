//! Small hand-built instances shared by unit, behaviour and property tests.

use crate::{Customer, Instance, InstanceError, Location};

/// Five customers with demands 20, 15, 25, 30 and 18 around a depot at the
/// origin; capacity 50 forces at least three routes (108 units in total).
///
/// # Errors
///
/// Never in practice; the fixture data is valid.
pub fn five_customer_instance() -> Result<Instance, InstanceError> {
    Instance::builder(Location::depot(0.0, 0.0), 50)
        .customers([
            Customer::new(1, 1.0, 1.0, 20),
            Customer::new(2, 2.0, 2.0, 15),
            Customer::new(3, -1.0, 1.0, 25),
            Customer::new(4, -2.0, -1.0, 30),
            Customer::new(5, 1.0, -2.0, 18),
        ])
        .build()
}

/// `count` unit-demand customers spaced one degree apart along a line.
///
/// # Errors
///
/// Returns [`InstanceError::NoCustomers`] when `count` is zero or
/// [`InstanceError::NonPositiveCapacity`] for a zero capacity.
pub fn line_instance(count: u32, vehicle_capacity: u32) -> Result<Instance, InstanceError> {
    Instance::builder(Location::depot(0.0, 0.0), vehicle_capacity)
        .customers((1..=count).map(|id| Customer::new(u64::from(id), 0.0, f64::from(id), 1)))
        .build()
}

/// A customer whose demand exceeds the capacity of 10.
///
/// # Errors
///
/// Never in practice; shape validation passes and only feasibility fails.
pub fn oversized_demand_instance() -> Result<Instance, InstanceError> {
    Instance::builder(Location::depot(0.0, 0.0), 10)
        .customer(Customer::new(1, 0.0, 1.0, 4))
        .customer(Customer::new(2, 0.0, 2.0, 11))
        .build()
}
