//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, cache, metrics) are implemented in
//! `outbound`; driving ports (query, ingest, uploads) are implemented by the
//! domain services and consumed by `inbound::http`.

mod macros;
pub(crate) use macros::define_port_error;

mod cache_key;
mod cache_metrics;
mod element_repository;
mod file_metadata_repository;
mod observation_cache;
mod observation_ingest;
mod observation_query;
mod observation_repository;
mod uploads_query;

pub use cache_key::{ObservationCacheKey, ObservationCacheKeyValidationError};
#[cfg(test)]
pub use cache_metrics::MockObservationCacheMetrics;
pub use cache_metrics::{
    NoOpObservationCacheMetrics, ObservationCacheMetrics, ObservationCacheMetricsError,
};
#[cfg(test)]
pub use element_repository::MockElementRepository;
pub use element_repository::{ElementRepository, ElementRepositoryError, FixtureElementRepository};
#[cfg(test)]
pub use file_metadata_repository::MockFileMetadataRepository;
pub use file_metadata_repository::{
    FileMetadataRepository, FileMetadataRepositoryError, FixtureFileMetadataRepository,
};
#[cfg(test)]
pub use observation_cache::MockObservationCache;
pub use observation_cache::{DisabledObservationCache, ObservationCache, ObservationCacheError};
#[cfg(test)]
pub use observation_ingest::MockObservationIngest;
pub use observation_ingest::{
    FixtureObservationIngest, IngestFileRequest, IngestFileResponse, ObservationIngest,
    ObservationInput,
};
#[cfg(test)]
pub use observation_query::MockObservationQuery;
pub use observation_query::{FixtureObservationQuery, ObservationQuery};
#[cfg(test)]
pub use observation_repository::MockObservationRepository;
pub use observation_repository::{
    FixtureObservationRepository, ObservationRepository, ObservationRepositoryError,
};
#[cfg(test)]
pub use uploads_query::MockUploadsQuery;
pub use uploads_query::{
    CsvExport, FixtureUploadsQuery, PREVIEW_ROWS, PreviewRow, UploadSummary, UploadsQuery,
};
