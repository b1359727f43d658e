//! Depot and customer locations.

use geo::Point;

/// Identifier reserved for the depot.
pub const DEPOT_ID: u64 = 0;

/// A fixed geographic position with an identifier.
///
/// Coordinates are WGS84 degrees. [`Location::point`] maps them onto a
/// [`geo::Point`] with `x = longitude` and `y = latitude`.
///
/// # Examples
/// ```
/// use packroute_core::Location;
///
/// let depot = Location::depot(51.5, -0.12);
/// assert_eq!(depot.id, 0);
/// assert_eq!(depot.point().y(), 51.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    /// Unique identifier; `0` is reserved for the depot.
    pub id: u64,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl Location {
    /// Construct a location.
    #[must_use]
    pub const fn new(id: u64, latitude: f64, longitude: f64) -> Self {
        Self {
            id,
            latitude,
            longitude,
        }
    }

    /// Construct the depot location, which always carries [`DEPOT_ID`].
    #[must_use]
    pub const fn depot(latitude: f64, longitude: f64) -> Self {
        Self::new(DEPOT_ID, latitude, longitude)
    }

    /// Return the location as a `geo` point (`x = longitude`, `y = latitude`).
    #[must_use]
    pub fn point(&self) -> Point<f64> {
        Point::new(self.longitude, self.latitude)
    }

    /// Whether both coordinates are finite numbers.
    #[must_use]
    pub const fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

/// A customer stop with a positive demand.
///
/// # Examples
/// ```
/// use packroute_core::Customer;
///
/// let customer = Customer::new(7, 1.0, 2.0, 15);
/// assert_eq!(customer.id(), 7);
/// assert_eq!(customer.demand, 15);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Customer {
    /// Where the customer is located.
    pub location: Location,
    /// Units the customer needs delivered.
    pub demand: u32,
}

impl Customer {
    /// Construct a customer from raw coordinates.
    #[must_use]
    pub const fn new(id: u64, latitude: f64, longitude: f64, demand: u32) -> Self {
        Self {
            location: Location::new(id, latitude, longitude),
            demand,
        }
    }

    /// The customer identifier.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.location.id
    }
}
