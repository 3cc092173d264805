pub(crate) mod animation_type;
pub(crate) mod area;
#[cfg(test)]
pub(crate) mod memory;
pub(crate) mod result_type;

pub(crate) use animation_type::AnimationTypeRepository;
pub(crate) use area::AreaRepository;
pub(crate) use result_type::ResultTypeRepository;

use async_trait::async_trait;
use deadpool_postgres::Pool;

use crate::errors::AppError;
use crate::models::{AnimationType, Area, ResultType};

/// Read-only lookups the forms need from the backing store.
#[async_trait(?Send)]
pub(crate) trait Catalog: Send + Sync {
    /// Result types for one satellite, or all of them when `satellite_id` is `None`.
    async fn result_types(&self, satellite_id: Option<&str>) -> Result<Vec<ResultType>, AppError>;

    async fn animation_types(&self) -> Result<Vec<AnimationType>, AppError>;

    async fn area(&self, area_id: &str) -> Result<Option<Area>, AppError>;
}

/// `Catalog` backed by the Postgres pool; one pooled connection per lookup.
pub(crate) struct PgCatalog {
    pool: Pool,
}

impl PgCatalog {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait(?Send)]
impl Catalog for PgCatalog {
    async fn result_types(&self, satellite_id: Option<&str>) -> Result<Vec<ResultType>, AppError> {
        let client = self.pool.get().await?;
        ResultTypeRepository::list(&client, satellite_id).await
    }

    async fn animation_types(&self) -> Result<Vec<AnimationType>, AppError> {
        let client = self.pool.get().await?;
        AnimationTypeRepository::list(&client).await
    }

    async fn area(&self, area_id: &str) -> Result<Option<Area>, AppError> {
        let client = self.pool.get().await?;
        AreaRepository::get_by_id(&client, area_id).await
    }
}
