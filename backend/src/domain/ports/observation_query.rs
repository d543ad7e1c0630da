//! Driving port for bounding-box observation queries.

use async_trait::async_trait;

use crate::domain::{Error, ObservationFilter, QueryResultRow};

/// Read side of the observation store, joined with uploader identity.
///
/// # Examples
///
/// ```rust,no_run
/// # async fn example() -> Result<(), marine_backend::domain::Error> {
/// use marine_backend::domain::ObservationFilter;
/// use marine_backend::domain::ports::{FixtureObservationQuery, ObservationQuery};
///
/// let rows = FixtureObservationQuery
///     .query_by_bounding_box(ObservationFilter::default())
///     .await?;
/// assert!(rows.is_empty());
/// # Ok(())
/// # }
/// ```
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObservationQuery: Send + Sync {
    /// Observations inside the filter, newest first, each with its uploader.
    async fn query_by_bounding_box(
        &self,
        filter: ObservationFilter,
    ) -> Result<Vec<QueryResultRow>, Error>;
}

/// Fixture query returning no rows.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureObservationQuery;

#[async_trait]
impl ObservationQuery for FixtureObservationQuery {
    async fn query_by_bounding_box(
        &self,
        _filter: ObservationFilter,
    ) -> Result<Vec<QueryResultRow>, Error> {
        Ok(Vec::new())
    }
}
