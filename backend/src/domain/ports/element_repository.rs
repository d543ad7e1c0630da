//! Port for element reference data.

use async_trait::async_trait;

use crate::domain::{CategoryId, Element, ElementId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by element repository adapters.
    pub enum ElementRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "element repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } =>
            "element repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ElementRepository: Send + Sync {
    /// All elements ordered by id, optionally restricted to one category.
    async fn list_elements(
        &self,
        category: Option<CategoryId>,
    ) -> Result<Vec<Element>, ElementRepositoryError>;

    /// Find one element with its category.
    async fn find_by_id(&self, id: ElementId) -> Result<Option<Element>, ElementRepositoryError>;
}

/// Fixture implementation for tests that do not exercise reference data.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureElementRepository;

#[async_trait]
impl ElementRepository for FixtureElementRepository {
    async fn list_elements(
        &self,
        _category: Option<CategoryId>,
    ) -> Result<Vec<Element>, ElementRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_by_id(&self, _id: ElementId) -> Result<Option<Element>, ElementRepositoryError> {
        Ok(None)
    }
}
