//! Distance metrics and the precomputed node-to-node matrix.
//!
//! Node `0` is always the depot and node `i + 1` is the customer at position
//! `i` of [`Instance::customers`](crate::Instance::customers).

use geo::{Distance, Euclidean, Haversine};

use crate::Location;

/// How travel distance between two locations is measured.
///
/// [`DistanceMetric::Euclidean`] works directly in coordinate units (degrees),
/// while [`DistanceMetric::Haversine`] returns great-circle metres. Choose the
/// penalty coefficient relative to the metric's scale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DistanceMetric {
    /// Straight-line distance in coordinate space.
    #[default]
    Euclidean,
    /// Great-circle distance on a spherical Earth, in metres.
    Haversine,
}

impl DistanceMetric {
    /// Measure the distance between two locations.
    ///
    /// # Examples
    /// ```
    /// use packroute_core::{DistanceMetric, Location};
    ///
    /// let a = Location::new(1, 0.0, 0.0);
    /// let b = Location::new(2, 3.0, 4.0);
    /// assert_eq!(DistanceMetric::Euclidean.between(&a, &b), 5.0);
    /// ```
    #[must_use]
    pub fn between(self, from: &Location, to: &Location) -> f64 {
        match self {
            Self::Euclidean => Euclidean.distance(from.point(), to.point()),
            Self::Haversine => Haversine.distance(from.point(), to.point()),
        }
    }
}

/// Square matrix of distances between the depot and every customer.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    size: usize,
    cells: Vec<f64>,
}

impl DistanceMatrix {
    /// Build the matrix for `nodes`, where `nodes[0]` is the depot.
    #[must_use]
    pub fn build(nodes: &[Location], metric: DistanceMetric) -> Self {
        let size = nodes.len();
        let cells = nodes
            .iter()
            .flat_map(|from| nodes.iter().map(move |to| metric.between(from, to)))
            .collect();
        Self { size, cells }
    }

    /// Number of nodes (depot included).
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Distance from node `from` to node `to`.
    ///
    /// Out-of-range nodes yield `0.0`; callers only pass nodes derived from
    /// the owning instance.
    #[must_use]
    pub fn get(&self, from: usize, to: usize) -> f64 {
        let offset = from.saturating_mul(self.size).saturating_add(to);
        let value = self.cells.get(offset).copied();
        debug_assert!(
            value.is_some() && from < self.size && to < self.size,
            "distance lookup out of range: from={from}, to={to}"
        );
        value.unwrap_or(0.0)
    }
}
