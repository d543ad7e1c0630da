//! Domain types, services and ports.
//!
//! Purpose: define the marine observation model (points, files, elements,
//! bounding boxes), the use-case services built on it, and the ports that
//! adapters implement. Nothing in this module depends on Actix, Diesel or
//! Redis.
//!
//! Public surface:
//! - `BoundingBox`, `Coordinate`: geographic value objects.
//! - `ObservationPoint`, `ObservationFilter`, `QueryResultRow`: the
//!   observation store model and the joined query result.
//! - `FileMetadata`, `Element`, `UploaderSummary`: relational store model.
//! - `ObservationQueryService`, `ObservationIngestService`,
//!   `UploadsService`: implementations of the driving ports in [`ports`].
//! - `Error`, `ErrorCode`, `TraceId`: transport-agnostic failures and
//!   request correlation.

pub mod element;
pub mod error;
pub mod file_metadata;
pub mod geo;
pub mod ingest_service;
pub mod observation;
pub mod observation_query_service;
pub mod ports;
pub(crate) mod store_errors;
pub mod trace_id;
pub mod uploads_service;
pub mod user;

pub use self::element::{CategoryId, Element, ElementCategory, ElementId};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::file_metadata::{FileId, FileMetadata, FileUploader, NewFileMetadata};
pub use self::geo::{
    BoundingBox, BoundingBoxError, Coordinate, MAX_LATITUDE, MAX_LONGITUDE, MIN_LATITUDE,
    MIN_LONGITUDE, validate_latitude, validate_longitude,
};
pub use self::ingest_service::ObservationIngestService;
pub use self::observation::{ObservationFilter, ObservationPoint, QueryResultRow};
pub use self::observation_query_service::{DEFAULT_CACHE_TTL, ObservationQueryService};
pub use self::trace_id::TraceId;
pub use self::uploads_service::{CSV_HEADER, UploadsService, render_csv};
pub use self::user::{UploaderSummary, UserId};
