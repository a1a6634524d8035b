use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::products::{InsertProductEntity, ProductEntity, UpdateProductEntity},
    value_objects::{entitlements::QuotaInsert, pagination::ListFilter},
};

#[async_trait]
#[automock]
pub trait ProductRepository {
    async fn find_by_id(&self, product_id: Uuid) -> Result<Option<ProductEntity>>;
    async fn count_by_brand(&self, brand_id: Uuid) -> Result<i64>;
    /// `filter.owner_id` restricts to products under brands of that client.
    async fn list_products(&self, filter: &ListFilter) -> Result<(Vec<ProductEntity>, i64)>;
    /// Locks the brand row, re-counts its products and inserts only while below `quota`.
    /// `OwnerMissing` when the brand was deleted in the meantime.
    async fn insert_within_quota(
        &self,
        insert_product_entity: InsertProductEntity,
        quota: i64,
    ) -> Result<QuotaInsert<ProductEntity>>;
    async fn update(
        &self,
        product_id: Uuid,
        update_product_entity: UpdateProductEntity,
    ) -> Result<Option<ProductEntity>>;
    async fn delete(&self, product_id: Uuid) -> Result<bool>;
}
