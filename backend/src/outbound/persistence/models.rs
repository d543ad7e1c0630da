//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions into domain types live next to
//! the repository that reads them.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::observation_schema::observation_points;
use super::schema::{files, users};

// ---------------------------------------------------------------------------
// Relational store
// ---------------------------------------------------------------------------

/// Row struct for reading from the files table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = files)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct FileRow {
    pub id: i64,
    pub user_id: i64,
    pub uploaded_at: DateTime<Utc>,
    pub lat_min: f64,
    pub lat_max: f64,
    pub long_min: f64,
    pub long_max: f64,
}

/// Insertable struct for recording a new upload.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = files)]
pub(crate) struct NewFileRow {
    pub user_id: i64,
    pub uploaded_at: DateTime<Utc>,
    pub lat_min: f64,
    pub lat_max: f64,
    pub long_min: f64,
    pub long_max: f64,
}

/// Public columns of the users table. `password_hash` is deliberately absent.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UploaderRow {
    pub id: i64,
    pub email: String,
    pub full_name: Option<String>,
}

// ---------------------------------------------------------------------------
// Observation store
// ---------------------------------------------------------------------------

/// Row struct for reading from the observation_points table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = observation_points)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ObservationRow {
    pub element_id: i64,
    pub file_id: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub value: f64,
    pub observed_at: DateTime<Utc>,
}

/// Insertable struct for appending observation points.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = observation_points)]
pub(crate) struct NewObservationRow {
    pub element_id: i64,
    pub file_id: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub value: f64,
    pub observed_at: DateTime<Utc>,
}
