//! Cache key for bounding-box query results.
use thiserror::Error;

use crate::domain::ObservationFilter;

const PREFIX: &str = "elementData";
const UNBOUNDED: &str = "null";
const ALL_ELEMENTS: &str = "all";

/// Cache key identifying the joined result of one [`ObservationFilter`].
///
/// Keys have the shape
/// `elementData:<latMin>:<latMax>:<longMin>:<longMax>:<elementId>`, with
/// `null` for an absent bound and `all` for an absent element filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObservationCacheKey(String);

impl ObservationCacheKey {
    /// Derive the key for a filter.
    ///
    /// Bounds use the shortest round-trip decimal form of `f64`, so `1.0`
    /// renders as `1`.
    ///
    /// # Examples
    /// ```
    /// use marine_backend::domain::{ElementId, ObservationFilter};
    /// use marine_backend::domain::ports::ObservationCacheKey;
    ///
    /// let filter = ObservationFilter {
    ///     lat_min: Some(1.0),
    ///     long_max: Some(-1.5),
    ///     element_id: Some(ElementId::new(4)),
    ///     ..ObservationFilter::default()
    /// };
    /// let key = ObservationCacheKey::for_filter(&filter);
    /// assert_eq!(key.as_str(), "elementData:1:null:null:-1.5:4");
    /// ```
    pub fn for_filter(filter: &ObservationFilter) -> Self {
        let bound = |value: Option<f64>| {
            value.map_or_else(|| UNBOUNDED.to_owned(), |v| v.to_string())
        };
        let element = filter
            .element_id
            .map_or_else(|| ALL_ELEMENTS.to_owned(), |id| id.to_string());
        Self(format!(
            "{PREFIX}:{}:{}:{}:{}:{element}",
            bound(filter.lat_min),
            bound(filter.lat_max),
            bound(filter.long_min),
            bound(filter.long_max),
        ))
    }

    /// Wrap a raw key after checking it is non-empty and trimmed.
    pub fn new(value: impl Into<String>) -> Result<Self, ObservationCacheKeyValidationError> {
        let raw = value.into();
        if raw.trim().is_empty() {
            return Err(ObservationCacheKeyValidationError::Empty);
        }
        if raw.trim() != raw {
            return Err(ObservationCacheKeyValidationError::ContainsWhitespace);
        }
        Ok(Self(raw))
    }

    /// Borrow the underlying key as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for ObservationCacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for ObservationCacheKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Validation errors returned when constructing [`ObservationCacheKey`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObservationCacheKeyValidationError {
    /// Key is empty after trimming whitespace.
    #[error("observation cache key must not be empty")]
    Empty,
    /// Key contains leading or trailing whitespace.
    #[error("observation cache key must not contain surrounding whitespace")]
    ContainsWhitespace,
}
