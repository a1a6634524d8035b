use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, delete, insert_into, pg::Pg, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain,
    infra::db::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{brands, users},
    },
};
use domain::{
    entities::brands::{BrandEntity, InsertBrandEntity, UpdateBrandEntity},
    repositories::brands::BrandRepository,
    value_objects::{entitlements::QuotaInsert, pagination::ListFilter},
};

pub struct BrandPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl BrandPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

fn filtered(filter: &ListFilter) -> brands::BoxedQuery<'static, Pg> {
    let mut query = brands::table.into_boxed();

    if let Some(owner_id) = filter.owner_id {
        query = query.filter(brands::client_id.eq(owner_id));
    }
    if let Some(pattern) = filter.search_pattern() {
        query = query.filter(brands::title.ilike(pattern));
    }

    query
}

#[async_trait]
impl BrandRepository for BrandPostgres {
    async fn find_by_id(&self, brand_id: Uuid) -> Result<Option<BrandEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let brand = brands::table
            .find(brand_id)
            .select(BrandEntity::as_select())
            .first::<BrandEntity>(&mut conn)
            .optional()?;

        Ok(brand)
    }

    async fn count_owned_by(&self, client_id: Uuid) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let count = brands::table
            .filter(brands::client_id.eq(client_id))
            .count()
            .get_result::<i64>(&mut conn)?;

        Ok(count)
    }

    async fn list_brands(&self, filter: &ListFilter) -> Result<(Vec<BrandEntity>, i64)> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let total = filtered(filter).count().get_result::<i64>(&mut conn)?;

        let rows = filtered(filter)
            .select(BrandEntity::as_select())
            .order(brands::created_at.desc())
            .limit(filter.limit)
            .offset(filter.offset)
            .load::<BrandEntity>(&mut conn)?;

        Ok((rows, total))
    }

    async fn insert_within_quota(
        &self,
        insert_brand_entity: InsertBrandEntity,
        quota: i64,
    ) -> Result<QuotaInsert<BrandEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;
        let client_id = insert_brand_entity.client_id;

        let inserted = conn.transaction::<QuotaInsert<BrandEntity>, diesel::result::Error, _>(|tx| {
            // Concurrent creates for one client queue on the user row.
            let owner = users::table
                .find(client_id)
                .select(users::id)
                .for_update()
                .first::<Uuid>(tx)
                .optional()?;

            if owner.is_none() {
                return Ok(QuotaInsert::OwnerMissing);
            }

            let current = brands::table
                .filter(brands::client_id.eq(client_id))
                .count()
                .get_result::<i64>(tx)?;

            if current >= quota {
                return Ok(QuotaInsert::QuotaExceeded);
            }

            let brand = insert_into(brands::table)
                .values(&insert_brand_entity)
                .returning(BrandEntity::as_returning())
                .get_result::<BrandEntity>(tx)?;

            Ok(QuotaInsert::Inserted(brand))
        })?;

        Ok(inserted)
    }

    async fn update(
        &self,
        brand_id: Uuid,
        update_brand_entity: UpdateBrandEntity,
    ) -> Result<Option<BrandEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let brand = update(brands::table.find(brand_id))
            .set(&update_brand_entity)
            .returning(BrandEntity::as_returning())
            .get_result::<BrandEntity>(&mut conn)
            .optional()?;

        Ok(brand)
    }

    async fn delete(&self, brand_id: Uuid) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let deleted = delete(brands::table.find(brand_id)).execute(&mut conn)?;

        Ok(deleted > 0)
    }
}
