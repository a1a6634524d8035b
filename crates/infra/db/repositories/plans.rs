use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, delete, insert_into, pg::Pg, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain;
use crate::infra::db::postgres::{postgres_connection::PgPoolSquad, schema::plans};
use domain::{
    entities::plans::{InsertPlanEntity, PlanEntity, PlanRow, UpdatePlanEntity},
    repositories::plans::PlanRepository,
    value_objects::pagination::ListFilter,
};

pub struct PlanPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl PlanPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

fn filtered(filter: &ListFilter) -> plans::BoxedQuery<'static, Pg> {
    let mut query = plans::table.into_boxed();

    if let Some(pattern) = filter.search_pattern() {
        query = query.filter(plans::title.ilike(pattern));
    }

    query
}

#[async_trait]
impl PlanRepository for PlanPostgres {
    async fn find_by_id(&self, plan_id: Uuid) -> Result<Option<PlanEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = plans::table
            .find(plan_id)
            .select(PlanRow::as_select())
            .first::<PlanRow>(&mut conn)
            .optional()?;

        Ok(row.map(PlanEntity::from))
    }

    async fn list_plans(&self, filter: &ListFilter) -> Result<(Vec<PlanEntity>, i64)> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let total = filtered(filter).count().get_result::<i64>(&mut conn)?;

        let rows = filtered(filter)
            .select(PlanRow::as_select())
            .order((plans::price_minor.asc(), plans::created_at.asc()))
            .limit(filter.limit)
            .offset(filter.offset)
            .load::<PlanRow>(&mut conn)?;

        Ok((rows.into_iter().map(PlanEntity::from).collect(), total))
    }

    async fn create(&self, insert_plan_entity: InsertPlanEntity) -> Result<PlanEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = insert_into(plans::table)
            .values(&insert_plan_entity)
            .returning(PlanRow::as_returning())
            .get_result::<PlanRow>(&mut conn)?;

        Ok(row.into())
    }

    async fn update(
        &self,
        plan_id: Uuid,
        update_plan_entity: UpdatePlanEntity,
    ) -> Result<Option<PlanEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = update(plans::table.find(plan_id))
            .set(&update_plan_entity)
            .returning(PlanRow::as_returning())
            .get_result::<PlanRow>(&mut conn)
            .optional()?;

        Ok(row.map(PlanEntity::from))
    }

    async fn delete(&self, plan_id: Uuid) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let deleted = delete(plans::table.find(plan_id)).execute(&mut conn)?;

        Ok(deleted > 0)
    }
}
