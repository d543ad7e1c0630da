//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    ElementRepository, FixtureElementRepository, FixtureObservationIngest,
    FixtureObservationQuery, FixtureUploadsQuery, ObservationIngest, ObservationQuery,
    UploadsQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub observations: Arc<dyn ObservationQuery>,
    pub ingest: Arc<dyn ObservationIngest>,
    pub uploads: Arc<dyn UploadsQuery>,
    pub elements: Arc<dyn ElementRepository>,
}

impl HttpState {
    /// Bundle the ports used by the handlers.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use marine_backend::domain::ports::{
    ///     FixtureElementRepository, FixtureObservationIngest, FixtureObservationQuery,
    ///     FixtureUploadsQuery,
    /// };
    /// use marine_backend::inbound::http::state::HttpState;
    ///
    /// let state = HttpState::new(
    ///     Arc::new(FixtureObservationQuery),
    ///     Arc::new(FixtureObservationIngest),
    ///     Arc::new(FixtureUploadsQuery),
    ///     Arc::new(FixtureElementRepository),
    /// );
    /// let _query = Arc::clone(&state.observations);
    /// ```
    pub fn new(
        observations: Arc<dyn ObservationQuery>,
        ingest: Arc<dyn ObservationIngest>,
        uploads: Arc<dyn UploadsQuery>,
        elements: Arc<dyn ElementRepository>,
    ) -> Self {
        Self {
            observations,
            ingest,
            uploads,
            elements,
        }
    }

    /// State backed entirely by fixtures; every handler succeeds with empty
    /// data except ingest, which reports the stores as unavailable.
    pub fn fixtures() -> Self {
        Self::new(
            Arc::new(FixtureObservationQuery),
            Arc::new(FixtureObservationIngest),
            Arc::new(FixtureUploadsQuery),
            Arc::new(FixtureElementRepository),
        )
    }

    /// Replace the observation query port.
    #[must_use]
    pub fn with_observations(mut self, observations: Arc<dyn ObservationQuery>) -> Self {
        self.observations = observations;
        self
    }

    /// Replace the ingest port.
    #[must_use]
    pub fn with_ingest(mut self, ingest: Arc<dyn ObservationIngest>) -> Self {
        self.ingest = ingest;
        self
    }

    /// Replace the uploads port.
    #[must_use]
    pub fn with_uploads(mut self, uploads: Arc<dyn UploadsQuery>) -> Self {
        self.uploads = uploads;
        self
    }

    /// Replace the element reference port.
    #[must_use]
    pub fn with_elements(mut self, elements: Arc<dyn ElementRepository>) -> Self {
        self.elements = elements;
        self
    }
}
