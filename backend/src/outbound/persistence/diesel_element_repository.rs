//! PostgreSQL-backed `ElementRepository` over the seeded reference tables.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ElementRepository, ElementRepositoryError};
use crate::domain::{CategoryId, Element, ElementCategory, ElementId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::pool::{DbPool, PoolError};
use super::schema::{element_categories, elements};

/// `(element id, element name, category id, category name)` from the left join.
type ElementJoinRow = (i64, String, Option<i64>, Option<String>);

/// Diesel-backed implementation of the element repository port.
#[derive(Clone)]
pub struct DieselElementRepository {
    pool: DbPool,
}

impl DieselElementRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ElementRepositoryError {
    map_basic_pool_error(error, ElementRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ElementRepositoryError {
    map_basic_diesel_error(
        error,
        ElementRepositoryError::query,
        ElementRepositoryError::connection,
    )
}

fn join_row_to_element((id, name, category_id, category_name): ElementJoinRow) -> Element {
    let category = category_id
        .zip(category_name)
        .map(|(id, name)| ElementCategory {
            id: CategoryId::new(id),
            name,
        });
    Element {
        id: ElementId::new(id),
        name,
        category,
    }
}

#[async_trait]
impl ElementRepository for DieselElementRepository {
    async fn list_elements(
        &self,
        category: Option<CategoryId>,
    ) -> Result<Vec<Element>, ElementRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = elements::table
            .left_join(element_categories::table)
            .select((
                elements::id,
                elements::name,
                element_categories::id.nullable(),
                element_categories::name.nullable(),
            ))
            .order(elements::id.asc())
            .into_boxed();
        if let Some(category) = category {
            query = query.filter(elements::category_id.eq(category.value()));
        }

        let rows: Vec<ElementJoinRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(join_row_to_element).collect())
    }

    async fn find_by_id(&self, id: ElementId) -> Result<Option<Element>, ElementRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<ElementJoinRow> = elements::table
            .left_join(element_categories::table)
            .filter(elements::id.eq(id.value()))
            .select((
                elements::id,
                elements::name,
                element_categories::id.nullable(),
                element_categories::name.nullable(),
            ))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(join_row_to_element))
    }
}
