pub mod memory_repository;
pub mod pg_repository;

use async_trait::async_trait;
use thiserror::Error;

use crate::dtos::{Record, RecordInput};
use crate::models::Resource;

pub use memory_repository::MemoryStore;
pub use pg_repository::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("pool error: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),
    #[error("database error: {0}")]
    Database(#[from] tokio_postgres::Error),
    #[error("other: {0}")]
    Other(String),
}

/// The five record operations, shared by every resource.
///
/// Absence is never an error: lookups return `None` and writes report the
/// number of affected rows.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Every row of the resource's table, ordered by id.
    async fn find_all(&self, resource: &Resource) -> Result<Vec<Record>, StoreError>;

    async fn find_by_id(&self, resource: &Resource, id: i32)
        -> Result<Option<Record>, StoreError>;

    /// Returns the store-assigned id.
    async fn insert(&self, resource: &Resource, input: &RecordInput) -> Result<i32, StoreError>;

    /// Returns the number of rows updated, 0 or 1.
    async fn update(
        &self,
        resource: &Resource,
        id: i32,
        input: &RecordInput,
    ) -> Result<u64, StoreError>;

    /// Returns the number of rows deleted, 0 or 1.
    async fn remove(&self, resource: &Resource, id: i32) -> Result<u64, StoreError>;
}
