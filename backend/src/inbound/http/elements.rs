//! Element reference data endpoint.
//!
//! ```text
//! GET /api/v1/elements?categoryId=..
//! ```

use actix_web::{get, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::store_errors::map_element_error;
use crate::domain::{CategoryId, Element};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ElementSchema, ErrorSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_optional_i64};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ElementListParams {
    /// Only list elements in this category.
    #[param(value_type = Option<i64>, example = 2)]
    pub category_id: Option<String>,
}

/// List measurable elements with their categories, ordered by id.
#[utoipa::path(
    get,
    path = "/api/v1/elements",
    params(ElementListParams),
    responses(
        (status = 200, description = "Elements", body = [ElementSchema]),
        (status = 400, description = "Invalid category id", body = ErrorSchema),
        (status = 503, description = "Relational store unavailable", body = ErrorSchema)
    ),
    tags = ["elements"],
    operation_id = "listElements",
    security([])
)]
#[get("/elements")]
pub async fn list_elements(
    state: web::Data<HttpState>,
    params: web::Query<ElementListParams>,
) -> ApiResult<web::Json<Vec<Element>>> {
    let category = parse_optional_i64(
        params.category_id.as_deref(),
        FieldName::new("categoryId"),
    )?
    .map(CategoryId::new);
    let elements = state
        .elements
        .list_elements(category)
        .await
        .map_err(map_element_error)?;
    Ok(web::Json(elements))
}
