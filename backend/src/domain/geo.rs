//! Geographic value objects shared by the ingest and query paths.
//!
//! [`BoundingBox::from_points`] derives the rectangle recorded against every
//! uploaded file; the same type describes stored file extents and the
//! coverage lookups made against them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest valid latitude in decimal degrees.
pub const MIN_LATITUDE: f64 = -90.0;
/// Largest valid latitude in decimal degrees.
pub const MAX_LATITUDE: f64 = 90.0;
/// Smallest valid longitude in decimal degrees.
pub const MIN_LONGITUDE: f64 = -180.0;
/// Largest valid longitude in decimal degrees.
pub const MAX_LONGITUDE: f64 = 180.0;

/// Validation errors raised by geographic constructors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BoundingBoxError {
    /// No points were supplied, so no rectangle exists.
    #[error("cannot derive a bounding box from zero points")]
    EmptyInput,
    /// A coordinate was NaN or infinite.
    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },
    /// A coordinate lies outside the valid geographic range.
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    /// A minimum bound exceeds its maximum.
    #[error("{axis} minimum must not exceed maximum")]
    InvertedBounds { axis: &'static str },
}

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check that both components are finite and within geographic range.
    ///
    /// # Examples
    /// ```
    /// use marine_backend::domain::Coordinate;
    ///
    /// assert!(Coordinate::new(45.0, -120.0).validate().is_ok());
    /// assert!(Coordinate::new(91.0, 0.0).validate().is_err());
    /// ```
    pub fn validate(self) -> Result<Self, BoundingBoxError> {
        validate_latitude(self.latitude, "latitude")?;
        validate_longitude(self.longitude, "longitude")?;
        Ok(self)
    }
}

/// Axis-aligned geographic rectangle.
///
/// ## Invariants
/// - every bound is finite;
/// - `lat_min <= lat_max` and `long_min <= long_max`.
///
/// Serialised with camelCase keys (`latMin`, `latMax`, `longMin`, `longMax`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    lat_min: f64,
    lat_max: f64,
    long_min: f64,
    long_max: f64,
}

impl BoundingBox {
    /// Create a validated rectangle.
    ///
    /// # Examples
    /// ```
    /// use marine_backend::domain::BoundingBox;
    ///
    /// let bbox = BoundingBox::new(10.0, 20.0, -5.0, 5.0).expect("ordered bounds");
    /// assert_eq!(bbox.lat_max(), 20.0);
    /// assert!(BoundingBox::new(20.0, 10.0, -5.0, 5.0).is_err());
    /// ```
    pub fn new(
        lat_min: f64,
        lat_max: f64,
        long_min: f64,
        long_max: f64,
    ) -> Result<Self, BoundingBoxError> {
        ensure_finite(lat_min, "latMin")?;
        ensure_finite(lat_max, "latMax")?;
        ensure_finite(long_min, "longMin")?;
        ensure_finite(long_max, "longMax")?;
        if lat_min > lat_max {
            return Err(BoundingBoxError::InvertedBounds { axis: "latitude" });
        }
        if long_min > long_max {
            return Err(BoundingBoxError::InvertedBounds { axis: "longitude" });
        }
        Ok(Self {
            lat_min,
            lat_max,
            long_min,
            long_max,
        })
    }

    /// Derive the minimal rectangle enclosing every coordinate.
    ///
    /// The result does not depend on input order. A single point yields a
    /// degenerate rectangle where each minimum equals its maximum.
    ///
    /// # Examples
    /// ```
    /// use marine_backend::domain::{BoundingBox, Coordinate};
    ///
    /// let bbox = BoundingBox::from_points([
    ///     Coordinate::new(1.0, 2.0),
    ///     Coordinate::new(3.0, -4.0),
    /// ])
    /// .expect("non-empty input");
    /// assert_eq!(bbox, BoundingBox::new(1.0, 3.0, -4.0, 2.0).expect("valid"));
    /// ```
    pub fn from_points<I>(points: I) -> Result<Self, BoundingBoxError>
    where
        I: IntoIterator<Item = Coordinate>,
    {
        let mut iter = points.into_iter();
        let first = iter.next().ok_or(BoundingBoxError::EmptyInput)?;
        ensure_finite(first.latitude, "latitude")?;
        ensure_finite(first.longitude, "longitude")?;

        let mut bbox = Self {
            lat_min: first.latitude,
            lat_max: first.latitude,
            long_min: first.longitude,
            long_max: first.longitude,
        };
        for point in iter {
            ensure_finite(point.latitude, "latitude")?;
            ensure_finite(point.longitude, "longitude")?;
            bbox.lat_min = bbox.lat_min.min(point.latitude);
            bbox.lat_max = bbox.lat_max.max(point.latitude);
            bbox.long_min = bbox.long_min.min(point.longitude);
            bbox.long_max = bbox.long_max.max(point.longitude);
        }
        Ok(bbox)
    }

    pub fn lat_min(&self) -> f64 {
        self.lat_min
    }

    pub fn lat_max(&self) -> f64 {
        self.lat_max
    }

    pub fn long_min(&self) -> f64 {
        self.long_min
    }

    pub fn long_max(&self) -> f64 {
        self.long_max
    }

    /// Whether the coordinate lies inside the rectangle; edges are inclusive.
    pub fn contains(&self, coordinate: Coordinate) -> bool {
        (self.lat_min..=self.lat_max).contains(&coordinate.latitude)
            && (self.long_min..=self.long_max).contains(&coordinate.longitude)
    }
}

fn ensure_finite(value: f64, field: &'static str) -> Result<(), BoundingBoxError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(BoundingBoxError::NonFinite { field })
    }
}

fn ensure_range(
    value: f64,
    field: &'static str,
    min: f64,
    max: f64,
) -> Result<(), BoundingBoxError> {
    ensure_finite(value, field)?;
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(BoundingBoxError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

/// Validate a latitude in decimal degrees.
pub fn validate_latitude(value: f64, field: &'static str) -> Result<(), BoundingBoxError> {
    ensure_range(value, field, MIN_LATITUDE, MAX_LATITUDE)
}

/// Validate a longitude in decimal degrees.
pub fn validate_longitude(value: f64, field: &'static str) -> Result<(), BoundingBoxError> {
    ensure_range(value, field, MIN_LONGITUDE, MAX_LONGITUDE)
}
