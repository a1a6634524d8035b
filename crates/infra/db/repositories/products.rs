use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, delete, insert_into, pg::Pg, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain,
    infra::db::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{brands, products},
    },
};
use domain::{
    entities::products::{InsertProductEntity, ProductEntity, UpdateProductEntity},
    repositories::products::ProductRepository,
    value_objects::{entitlements::QuotaInsert, pagination::ListFilter},
};

pub struct ProductPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl ProductPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

fn filtered(filter: &ListFilter) -> products::BoxedQuery<'static, Pg> {
    let mut query = products::table.into_boxed();

    if let Some(owner_id) = filter.owner_id {
        query = query.filter(
            products::brand_id.eq_any(
                brands::table
                    .filter(brands::client_id.eq(owner_id))
                    .select(brands::id),
            ),
        );
    }
    if let Some(pattern) = filter.search_pattern() {
        query = query.filter(products::title.ilike(pattern));
    }

    query
}

#[async_trait]
impl ProductRepository for ProductPostgres {
    async fn find_by_id(&self, product_id: Uuid) -> Result<Option<ProductEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let product = products::table
            .find(product_id)
            .select(ProductEntity::as_select())
            .first::<ProductEntity>(&mut conn)
            .optional()?;

        Ok(product)
    }

    async fn count_by_brand(&self, brand_id: Uuid) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let count = products::table
            .filter(products::brand_id.eq(brand_id))
            .count()
            .get_result::<i64>(&mut conn)?;

        Ok(count)
    }

    async fn list_products(&self, filter: &ListFilter) -> Result<(Vec<ProductEntity>, i64)> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let total = filtered(filter).count().get_result::<i64>(&mut conn)?;

        let rows = filtered(filter)
            .select(ProductEntity::as_select())
            .order(products::created_at.desc())
            .limit(filter.limit)
            .offset(filter.offset)
            .load::<ProductEntity>(&mut conn)?;

        Ok((rows, total))
    }

    async fn insert_within_quota(
        &self,
        insert_product_entity: InsertProductEntity,
        quota: i64,
    ) -> Result<QuotaInsert<ProductEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;
        let brand_id = insert_product_entity.brand_id;

        let inserted =
            conn.transaction::<QuotaInsert<ProductEntity>, diesel::result::Error, _>(|tx| {
                let owner = brands::table
                    .find(brand_id)
                    .select(brands::id)
                    .for_update()
                    .first::<Uuid>(tx)
                    .optional()?;

                if owner.is_none() {
                    return Ok(QuotaInsert::OwnerMissing);
                }

                let current = products::table
                    .filter(products::brand_id.eq(brand_id))
                    .count()
                    .get_result::<i64>(tx)?;

                if current >= quota {
                    return Ok(QuotaInsert::QuotaExceeded);
                }

                let product = insert_into(products::table)
                    .values(&insert_product_entity)
                    .returning(ProductEntity::as_returning())
                    .get_result::<ProductEntity>(tx)?;

                Ok(QuotaInsert::Inserted(product))
            })?;

        Ok(inserted)
    }

    async fn update(
        &self,
        product_id: Uuid,
        update_product_entity: UpdateProductEntity,
    ) -> Result<Option<ProductEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let product = update(products::table.find(product_id))
            .set(&update_product_entity)
            .returning(ProductEntity::as_returning())
            .get_result::<ProductEntity>(&mut conn)
            .optional()?;

        Ok(product)
    }

    async fn delete(&self, product_id: Uuid) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let deleted = delete(products::table.find(product_id)).execute(&mut conn)?;

        Ok(deleted > 0)
    }
}
