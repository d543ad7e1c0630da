//! Observation points and the bounding-box filter applied to them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Coordinate, ElementId, FileId, UploaderSummary};

/// A single measurement stored in the observation store.
///
/// Points are immutable once written and always belong to exactly one file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationPoint {
    pub element_id: ElementId,
    pub file_id: FileId,
    pub latitude: f64,
    pub longitude: f64,
    pub value: f64,
    pub timestamp: DateTime<Utc>,
}

impl ObservationPoint {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// Optional rectangle bounds plus an optional element filter.
///
/// Every field is independent: a `None` bound leaves that side of the
/// rectangle open. Bounds are inclusive. Inverted bounds are accepted and
/// simply match nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ObservationFilter {
    pub lat_min: Option<f64>,
    pub lat_max: Option<f64>,
    pub long_min: Option<f64>,
    pub long_max: Option<f64>,
    pub element_id: Option<ElementId>,
}

impl ObservationFilter {
    /// Whether `point` satisfies every supplied bound and the element filter.
    ///
    /// In-memory adapters use this to mirror the store's range query.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use marine_backend::domain::{ElementId, FileId, ObservationFilter, ObservationPoint};
    ///
    /// let point = ObservationPoint {
    ///     element_id: ElementId::new(1),
    ///     file_id: FileId::new(9),
    ///     latitude: 12.0,
    ///     longitude: -40.0,
    ///     value: 18.5,
    ///     timestamp: Utc::now(),
    /// };
    /// let filter = ObservationFilter { lat_min: Some(10.0), ..ObservationFilter::default() };
    /// assert!(filter.matches(&point));
    /// ```
    pub fn matches(&self, point: &ObservationPoint) -> bool {
        let above = |bound: Option<f64>, value: f64| bound.is_none_or(|min| value >= min);
        let below = |bound: Option<f64>, value: f64| bound.is_none_or(|max| value <= max);

        above(self.lat_min, point.latitude)
            && below(self.lat_max, point.latitude)
            && above(self.long_min, point.longitude)
            && below(self.long_max, point.longitude)
            && self.element_id.is_none_or(|id| id == point.element_id)
    }
}

/// An observation joined with the identity of its uploader.
///
/// `user` is omitted from JSON when the file has no metadata record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResultRow {
    #[serde(flatten)]
    pub point: ObservationPoint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UploaderSummary>,
}
