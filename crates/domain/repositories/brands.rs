use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::brands::{BrandEntity, InsertBrandEntity, UpdateBrandEntity},
    value_objects::{entitlements::QuotaInsert, pagination::ListFilter},
};

#[async_trait]
#[automock]
pub trait BrandRepository {
    async fn find_by_id(&self, brand_id: Uuid) -> Result<Option<BrandEntity>>;
    async fn count_owned_by(&self, client_id: Uuid) -> Result<i64>;
    async fn list_brands(&self, filter: &ListFilter) -> Result<(Vec<BrandEntity>, i64)>;
    /// Locks the owner, re-counts and inserts only while the count is below `quota`.
    /// `OwnerMissing` when the client's user row no longer exists.
    async fn insert_within_quota(
        &self,
        insert_brand_entity: InsertBrandEntity,
        quota: i64,
    ) -> Result<QuotaInsert<BrandEntity>>;
    async fn update(
        &self,
        brand_id: Uuid,
        update_brand_entity: UpdateBrandEntity,
    ) -> Result<Option<BrandEntity>>;
    async fn delete(&self, brand_id: Uuid) -> Result<bool>;
}
