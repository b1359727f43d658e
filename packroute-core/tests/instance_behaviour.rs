//! Behavioural tests for instance construction using rstest-bdd.

use std::cell::RefCell;

use packroute_core::{Customer, DistanceMetric, Instance, InstanceError, Location};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

#[derive(Debug)]
struct InstanceWorld {
    depot: RefCell<Location>,
    capacity: RefCell<u32>,
    customers: RefCell<Vec<Customer>>,
    json: RefCell<String>,
    outcome: RefCell<Option<Result<Instance, InstanceError>>>,
}

impl InstanceWorld {
    fn new() -> Self {
        Self {
            depot: RefCell::new(Location::depot(0.0, 0.0)),
            capacity: RefCell::new(1),
            customers: RefCell::new(Vec::new()),
            json: RefCell::new(String::new()),
            outcome: RefCell::new(None),
        }
    }

    #[expect(
        clippy::expect_used,
        reason = "behaviour tests use expect for readable failures"
    )]
    fn expect_outcome(&self) -> Result<Instance, InstanceError> {
        self.outcome
            .borrow()
            .as_ref()
            .cloned()
            .expect("outcome should be recorded before assertions")
    }
}

#[fixture]
fn world() -> InstanceWorld {
    InstanceWorld::new()
}

#[given("a depot at the origin with vehicle capacity 50")]
fn given_depot(world: &InstanceWorld) {
    world.depot.replace(Location::depot(0.0, 0.0));
    world.capacity.replace(50);
}

#[given("customers with demands 20, 15, 25, 30 and 18")]
fn given_five_customers(world: &InstanceWorld) {
    world.customers.replace(vec![
        Customer::new(1, 1.0, 1.0, 20),
        Customer::new(2, 2.0, 2.0, 15),
        Customer::new(3, -1.0, 1.0, 25),
        Customer::new(4, -2.0, -1.0, 30),
        Customer::new(5, 1.0, -2.0, 18),
    ]);
}

#[given("two customers sharing id 4")]
fn given_duplicate_ids(world: &InstanceWorld) {
    world.customers.replace(vec![
        Customer::new(4, 1.0, 1.0, 5),
        Customer::new(4, 2.0, 2.0, 5),
    ]);
}

#[given("a customer demanding 60 units")]
fn given_oversized_customer(world: &InstanceWorld) {
    world
        .customers
        .replace(vec![Customer::new(1, 1.0, 1.0, 60)]);
}

#[given("a JSON instance without penalty or metric")]
fn given_json_instance(world: &InstanceWorld) {
    world.json.replace(
        r#"{
            "depot": {"id": 0, "latitude": 0.0, "longitude": 0.0},
            "customers": [
                {"location": {"id": 1, "latitude": 0.0, "longitude": 1.0}, "demand": 3},
                {"location": {"id": 2, "latitude": 1.0, "longitude": 0.0}, "demand": 4}
            ],
            "vehicle_capacity": 10
        }"#
        .to_owned(),
    );
}

#[when("the instance is built")]
fn when_built(world: &InstanceWorld) {
    let outcome = Instance::builder(*world.depot.borrow(), *world.capacity.borrow())
        .customers(world.customers.borrow().iter().copied())
        .build();
    world.outcome.replace(Some(outcome));
}

#[when("the JSON is parsed")]
#[expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]
fn when_json_parsed(world: &InstanceWorld) {
    let instance: Instance =
        serde_json::from_str(&world.json.borrow()).expect("instance JSON should parse");
    world.outcome.replace(Some(Ok(instance)));
}

#[then("the instance has 5 customers and total demand 108")]
#[expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]
fn then_counts(world: &InstanceWorld) {
    let instance = world.expect_outcome().expect("expected a valid instance");
    assert_eq!(instance.customer_count(), 5);
    assert_eq!(instance.total_demand(), 108);
}

#[then("the instance is feasible")]
#[expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]
fn then_feasible(world: &InstanceWorld) {
    let instance = world.expect_outcome().expect("expected a valid instance");
    assert!(instance.check_feasible().is_ok());
}

#[then("building fails because customer 4 is duplicated")]
#[expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]
fn then_duplicate(world: &InstanceWorld) {
    let err = world.expect_outcome().expect_err("expected a shape error");
    assert_eq!(err, InstanceError::DuplicateCustomer { id: 4 });
}

#[then("the instance is infeasible because of customer 1")]
#[expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]
fn then_infeasible(world: &InstanceWorld) {
    let instance = world
        .expect_outcome()
        .expect("shape validation should pass");
    let err = instance.check_feasible().expect_err("expected infeasibility");
    assert_eq!(
        err,
        InstanceError::DemandExceedsCapacity {
            id: 1,
            demand: 60,
            capacity: 50,
        }
    );
}

#[then("the penalty coefficient is 1000")]
#[expect(
    clippy::expect_used,
    clippy::float_cmp,
    reason = "behaviour tests use expect and strict float checks for clarity"
)]
fn then_default_penalty(world: &InstanceWorld) {
    let instance = world.expect_outcome().expect("expected a parsed instance");
    assert_eq!(instance.penalty_coefficient(), 1000.0);
}

#[then("the distance metric is euclidean")]
#[expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]
fn then_default_metric(world: &InstanceWorld) {
    let instance = world.expect_outcome().expect("expected a parsed instance");
    assert_eq!(instance.distance_metric(), DistanceMetric::Euclidean);
}

#[scenario(path = "tests/features/instance.feature", index = 0)]
fn well_formed_instance(world: InstanceWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/instance.feature", index = 1)]
fn duplicate_ids(world: InstanceWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/instance.feature", index = 2)]
fn oversized_demand(world: InstanceWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/instance.feature", index = 3)]
fn json_defaults(world: InstanceWorld) {
    let _ = world;
}
