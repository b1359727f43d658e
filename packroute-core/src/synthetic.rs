//! Deterministic synthetic instances for demos, benchmarks and tests.
//!
//! Both generators place the depot at a centre coordinate and scatter
//! customers around it. The same spec always yields the same instance.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use thiserror::Error;

use crate::{Customer, DistanceMetric, Instance, InstanceError, Location};

/// Latitude of the default centre (San Francisco).
pub const DEFAULT_CENTER_LATITUDE: f64 = 37.7749;
/// Longitude of the default centre (San Francisco).
pub const DEFAULT_CENTER_LONGITUDE: f64 = -122.4194;

/// Errors raised while generating a synthetic instance.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SyntheticError {
    /// A generator was asked for zero customers.
    #[error("at least one customer is required")]
    NoCustomers,
    /// A clustered generator was asked for zero clusters.
    #[error("at least one cluster is required")]
    NoClusters,
    /// The demand range was empty or started at zero.
    #[error("demand range {low}..={high} must be non-empty and start above zero")]
    InvalidDemandRange {
        /// Lower bound.
        low: u32,
        /// Upper bound.
        high: u32,
    },
    /// A spread was negative or not finite.
    #[error("spread must be a finite non-negative number of degrees, got {0}")]
    InvalidSpread(f64),
    /// The generated instance failed validation.
    #[error(transparent)]
    Instance(#[from] InstanceError),
}

/// Parameters for [`uniform`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct UniformSpec {
    /// Number of customers to place.
    pub customers: usize,
    /// Depot latitude.
    pub center_latitude: f64,
    /// Depot longitude.
    pub center_longitude: f64,
    /// Half-width of the square customers are drawn from, in degrees.
    pub spread: f64,
    /// Smallest demand drawn.
    pub demand_low: u32,
    /// Largest demand drawn.
    pub demand_high: u32,
    /// Vehicle capacity of the generated instance.
    pub vehicle_capacity: u32,
    /// Distance metric of the generated instance.
    pub distance_metric: DistanceMetric,
    /// Generator seed.
    pub seed: u64,
}

impl Default for UniformSpec {
    fn default() -> Self {
        Self {
            customers: 20,
            center_latitude: DEFAULT_CENTER_LATITUDE,
            center_longitude: DEFAULT_CENTER_LONGITUDE,
            spread: 0.1,
            demand_low: 1,
            demand_high: 10,
            vehicle_capacity: 50,
            distance_metric: DistanceMetric::Euclidean,
            seed: 42,
        }
    }
}

/// Parameters for [`clustered`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ClusteredSpec {
    /// Number of customers to place.
    pub customers: usize,
    /// Number of cluster centres.
    pub clusters: usize,
    /// Depot latitude.
    pub center_latitude: f64,
    /// Depot longitude.
    pub center_longitude: f64,
    /// Half-width of the square cluster centres are drawn from, in degrees.
    pub overall_spread: f64,
    /// Standard deviation of customers around their centre, in degrees.
    pub cluster_spread: f64,
    /// Smallest demand drawn.
    pub demand_low: u32,
    /// Largest demand drawn.
    pub demand_high: u32,
    /// Vehicle capacity of the generated instance.
    pub vehicle_capacity: u32,
    /// Distance metric of the generated instance.
    pub distance_metric: DistanceMetric,
    /// Generator seed.
    pub seed: u64,
}

impl Default for ClusteredSpec {
    fn default() -> Self {
        Self {
            customers: 30,
            clusters: 3,
            center_latitude: DEFAULT_CENTER_LATITUDE,
            center_longitude: DEFAULT_CENTER_LONGITUDE,
            overall_spread: 0.15,
            cluster_spread: 0.05,
            demand_low: 5,
            demand_high: 20,
            vehicle_capacity: 100,
            distance_metric: DistanceMetric::Euclidean,
            seed: 42,
        }
    }
}

/// Scatter customers uniformly in a square around the centre.
///
/// # Errors
///
/// Returns a [`SyntheticError`] for an empty request, an unusable demand
/// range or spread, or when a drawn demand cannot fit into a vehicle.
///
/// # Examples
/// ```
/// use packroute_core::synthetic::{UniformSpec, uniform};
///
/// # fn main() -> Result<(), packroute_core::synthetic::SyntheticError> {
/// let spec = UniformSpec { customers: 12, ..UniformSpec::default() };
/// let instance = uniform(&spec)?;
/// assert_eq!(instance.customer_count(), 12);
/// assert_eq!(instance, uniform(&spec)?);
/// # Ok(())
/// # }
/// ```
pub fn uniform(spec: &UniformSpec) -> Result<Instance, SyntheticError> {
    if spec.customers == 0 {
        return Err(SyntheticError::NoCustomers);
    }
    check_demand_range(spec.demand_low, spec.demand_high)?;
    check_spread(spec.spread)?;

    let mut rng = ChaCha8Rng::seed_from_u64(spec.seed);
    let customers = (1..=spec.customers)
        .map(|id| {
            let latitude = offset(&mut rng, spec.center_latitude, spec.spread);
            let longitude = offset(&mut rng, spec.center_longitude, spec.spread);
            let demand = rng.gen_range(spec.demand_low..=spec.demand_high);
            Customer::new(id_of(id), latitude, longitude, demand)
        })
        .collect();

    finish(
        Location::depot(spec.center_latitude, spec.center_longitude),
        customers,
        spec.vehicle_capacity,
        spec.distance_metric,
    )
}

/// Group customers around randomly placed cluster centres.
///
/// Customers are split as evenly as possible; the first `customers % clusters`
/// clusters receive one extra. Ids run consecutively through the clusters.
///
/// # Errors
///
/// As for [`uniform`], plus [`SyntheticError::NoClusters`].
pub fn clustered(spec: &ClusteredSpec) -> Result<Instance, SyntheticError> {
    if spec.customers == 0 {
        return Err(SyntheticError::NoCustomers);
    }
    if spec.clusters == 0 {
        return Err(SyntheticError::NoClusters);
    }
    check_demand_range(spec.demand_low, spec.demand_high)?;
    check_spread(spec.overall_spread)?;
    let scatter = Normal::new(0.0, spec.cluster_spread)
        .map_err(|_| SyntheticError::InvalidSpread(spec.cluster_spread))?;

    let mut rng = ChaCha8Rng::seed_from_u64(spec.seed);
    let centres: Vec<(f64, f64)> = (0..spec.clusters)
        .map(|_| {
            (
                offset(&mut rng, spec.center_latitude, spec.overall_spread),
                offset(&mut rng, spec.center_longitude, spec.overall_spread),
            )
        })
        .collect();

    #[expect(
        clippy::integer_division,
        clippy::integer_division_remainder_used,
        reason = "even split of customers across clusters"
    )]
    let (per_cluster, extra) = (spec.customers / spec.clusters, spec.customers % spec.clusters);

    let mut customers = Vec::with_capacity(spec.customers);
    for (cluster, (centre_latitude, centre_longitude)) in centres.into_iter().enumerate() {
        let members = per_cluster.saturating_add(usize::from(cluster < extra));
        for _ in 0..members {
            #[expect(clippy::float_arithmetic, reason = "gaussian offset from the centre")]
            let (latitude, longitude) = (
                round_coordinate(centre_latitude + scatter.sample(&mut rng)),
                round_coordinate(centre_longitude + scatter.sample(&mut rng)),
            );
            let demand = rng.gen_range(spec.demand_low..=spec.demand_high);
            let id = id_of(customers.len().saturating_add(1));
            customers.push(Customer::new(id, latitude, longitude, demand));
        }
    }

    finish(
        Location::depot(spec.center_latitude, spec.center_longitude),
        customers,
        spec.vehicle_capacity,
        spec.distance_metric,
    )
}

fn finish(
    depot: Location,
    customers: Vec<Customer>,
    vehicle_capacity: u32,
    distance_metric: DistanceMetric,
) -> Result<Instance, SyntheticError> {
    let instance = Instance::builder(depot, vehicle_capacity)
        .customers(customers)
        .distance_metric(distance_metric)
        .build()?;
    instance.check_feasible()?;
    log::debug!(
        "generated {} customers with total demand {}",
        instance.customer_count(),
        instance.total_demand()
    );
    Ok(instance)
}

const fn check_demand_range(low: u32, high: u32) -> Result<(), SyntheticError> {
    if low == 0 || low > high {
        return Err(SyntheticError::InvalidDemandRange { low, high });
    }
    Ok(())
}

const fn check_spread(spread: f64) -> Result<(), SyntheticError> {
    if spread.is_finite() && spread >= 0.0 {
        Ok(())
    } else {
        Err(SyntheticError::InvalidSpread(spread))
    }
}

/// Uniform draw in `[centre - spread, centre + spread)`, rounded to 1e-6°.
#[expect(clippy::float_arithmetic, reason = "uniform offset from the centre")]
fn offset(rng: &mut ChaCha8Rng, centre: f64, spread: f64) -> f64 {
    let unit: f64 = rng.r#gen();
    round_coordinate(centre + (unit - 0.5) * 2.0 * spread)
}

#[expect(clippy::float_arithmetic, reason = "fixed-precision rounding")]
const fn round_coordinate(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}

fn id_of(index: usize) -> u64 {
    u64::try_from(index).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn uniform_is_reproducible_and_feasible() {
        let spec = UniformSpec::default();
        let first = uniform(&spec).expect("generated");
        let second = uniform(&spec).expect("generated");
        assert_eq!(first, second);
        assert_eq!(first.customer_count(), 20);
        assert!(first.check_feasible().is_ok());
        for customer in first.customers() {
            assert!((1..=10).contains(&customer.demand));
            assert!((customer.location.latitude - DEFAULT_CENTER_LATITUDE).abs() <= 0.1 + 1e-6);
        }
    }

    #[rstest]
    fn seeds_change_the_layout() {
        let a = uniform(&UniformSpec::default()).expect("generated");
        let b = uniform(&UniformSpec {
            seed: 7,
            ..UniformSpec::default()
        })
        .expect("generated");
        assert_ne!(a, b);
    }

    #[rstest]
    #[case(10, 3)]
    #[case(3, 3)]
    #[case(7, 1)]
    fn clustered_places_every_customer(#[case] customers: usize, #[case] clusters: usize) {
        let instance = clustered(&ClusteredSpec {
            customers,
            clusters,
            ..ClusteredSpec::default()
        })
        .expect("generated");
        let ids: Vec<u64> = instance.customers().iter().map(Customer::id).collect();
        let expected: Vec<u64> = (1..=u64::try_from(customers).expect("small")).collect();
        assert_eq!(ids, expected);
    }

    #[rstest]
    fn demand_above_capacity_is_rejected() {
        let err = uniform(&UniformSpec {
            demand_low: 60,
            demand_high: 60,
            vehicle_capacity: 50,
            ..UniformSpec::default()
        })
        .expect_err("infeasible");
        assert!(matches!(
            err,
            SyntheticError::Instance(InstanceError::DemandExceedsCapacity { .. })
        ));
    }

    #[rstest]
    #[case(UniformSpec { customers: 0, ..UniformSpec::default() }, "at least one customer")]
    #[case(UniformSpec { demand_low: 0, ..UniformSpec::default() }, "demand range")]
    #[case(UniformSpec { spread: -1.0, ..UniformSpec::default() }, "spread")]
    fn bad_requests_are_explained(#[case] spec: UniformSpec, #[case] fragment: &str) {
        let err = uniform(&spec).expect_err("invalid request");
        assert!(err.to_string().contains(fragment), "{err}");
    }

    #[rstest]
    fn zero_clusters_are_rejected() {
        let err = clustered(&ClusteredSpec {
            clusters: 0,
            ..ClusteredSpec::default()
        })
        .expect_err("no clusters");
        assert_eq!(err, SyntheticError::NoClusters);
    }
}
