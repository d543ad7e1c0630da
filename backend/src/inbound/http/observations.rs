//! Bounding-box observation query handler.
//!
//! ```text
//! GET /api/v1/observations?latMin=..&latMax=..&longMin=..&longMax=..&elementId=..
//! ```
//!
//! Every parameter is optional. Blank values count as absent; anything else
//! that is not a finite number is rejected with the offending field named in
//! `details.field`. Each returned row also carries its element's name.

use std::collections::HashMap;

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

use crate::domain::store_errors::map_element_error;
use crate::domain::{ElementId, Error, ObservationFilter, QueryResultRow};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, QueryResultRowSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_optional_f64, parse_optional_i64};

/// Raw query parameters; coerced by [`ObservationQueryParams::into_filter`].
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ObservationQueryParams {
    /// Inclusive southern bound in decimal degrees.
    #[param(value_type = Option<f64>, example = 40.0)]
    pub lat_min: Option<String>,
    /// Inclusive northern bound in decimal degrees.
    #[param(value_type = Option<f64>, example = 45.0)]
    pub lat_max: Option<String>,
    /// Inclusive western bound in decimal degrees.
    #[param(value_type = Option<f64>, example = -72.0)]
    pub long_min: Option<String>,
    /// Inclusive eastern bound in decimal degrees.
    #[param(value_type = Option<f64>, example = -65.0)]
    pub long_max: Option<String>,
    /// Restrict results to one element.
    #[param(value_type = Option<i64>, example = 1)]
    pub element_id: Option<String>,
}

impl ObservationQueryParams {
    /// Coerce the raw strings into a domain filter.
    pub fn into_filter(self) -> Result<ObservationFilter, Error> {
        Ok(ObservationFilter {
            lat_min: parse_optional_f64(self.lat_min.as_deref(), FieldName::new("latMin"))?,
            lat_max: parse_optional_f64(self.lat_max.as_deref(), FieldName::new("latMax"))?,
            long_min: parse_optional_f64(self.long_min.as_deref(), FieldName::new("longMin"))?,
            long_max: parse_optional_f64(self.long_max.as_deref(), FieldName::new("longMax"))?,
            element_id: parse_optional_i64(self.element_id.as_deref(), FieldName::new("elementId"))?
                .map(ElementId::new),
        })
    }
}

const UNKNOWN_ELEMENT: &str = "Unknown";

/// Query row as returned over HTTP.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationRowResponse {
    #[serde(flatten)]
    pub row: QueryResultRow,
    pub element_name: String,
}

async fn annotate_element_names(
    state: &HttpState,
    rows: Vec<QueryResultRow>,
) -> Result<Vec<ObservationRowResponse>, Error> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let names: HashMap<ElementId, String> = state
        .elements
        .list_elements(None)
        .await
        .map_err(map_element_error)?
        .into_iter()
        .map(|element| (element.id, element.name))
        .collect();
    Ok(rows
        .into_iter()
        .map(|row| {
            let element_name = names
                .get(&row.point.element_id)
                .map_or_else(|| UNKNOWN_ELEMENT.to_owned(), Clone::clone);
            ObservationRowResponse { row, element_name }
        })
        .collect())
}

/// Query observations inside a bounding box, joined with their uploader.
///
/// Results may be served from cache for up to the configured TTL.
#[utoipa::path(
    get,
    path = "/api/v1/observations",
    params(ObservationQueryParams),
    responses(
        (status = 200, description = "Matching observations", body = [QueryResultRowSchema]),
        (status = 400, description = "Invalid query parameter", body = ErrorSchema),
        (status = 503, description = "A store is unavailable", body = ErrorSchema)
    ),
    tags = ["observations"],
    operation_id = "queryObservations",
    security([])
)]
#[get("/observations")]
pub async fn query_observations(
    state: web::Data<HttpState>,
    params: web::Query<ObservationQueryParams>,
) -> ApiResult<web::Json<Vec<ObservationRowResponse>>> {
    let filter = params.into_inner().into_filter()?;
    let rows = state.observations.query_by_bounding_box(filter).await?;
    Ok(web::Json(annotate_element_names(&state, rows).await?))
}

#[cfg(test)]
#[path = "observations_tests.rs"]
mod tests;
