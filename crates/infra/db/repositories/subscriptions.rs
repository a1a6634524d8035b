use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::{RunQueryDsl, dsl::exists, insert_into, pg::Pg, prelude::*, select, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain,
    infra::db::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{plans, subscriptions, users},
    },
};
use domain::{
    entities::{
        plans::{PlanEntity, PlanRow},
        subscriptions::{InsertSubscriptionEntity, SubscriptionEntity},
    },
    repositories::subscriptions::SubscriptionRepository,
    value_objects::{
        enums::subscription_statuses::SubscriptionStatus, pagination::ListFilter,
    },
};

pub struct SubscriptionPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl SubscriptionPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

fn filtered(filter: &ListFilter) -> subscriptions::BoxedQuery<'static, Pg> {
    let mut query = subscriptions::table.into_boxed();

    if let Some(owner_id) = filter.owner_id {
        query = query.filter(subscriptions::client_id.eq(owner_id));
    }

    query
}

#[async_trait]
impl SubscriptionRepository for SubscriptionPostgres {
    async fn find_entitling_subscription(
        &self,
        client_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<(SubscriptionEntity, PlanEntity)>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = subscriptions::table
            .inner_join(plans::table)
            .filter(subscriptions::client_id.eq(client_id))
            .filter(subscriptions::status.eq(SubscriptionStatus::Active.to_string()))
            .filter(subscriptions::starts_at.le(now))
            .filter(subscriptions::ends_at.ge(now))
            .order(subscriptions::starts_at.desc())
            .select((SubscriptionEntity::as_select(), PlanRow::as_select()))
            .first::<(SubscriptionEntity, PlanRow)>(&mut conn)
            .optional()?;

        Ok(row.map(|(subscription, plan)| (subscription, plan.into())))
    }

    async fn find_by_id(&self, subscription_id: Uuid) -> Result<Option<SubscriptionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let subscription = subscriptions::table
            .find(subscription_id)
            .select(SubscriptionEntity::as_select())
            .first::<SubscriptionEntity>(&mut conn)
            .optional()?;

        Ok(subscription)
    }

    async fn list_subscriptions(
        &self,
        filter: &ListFilter,
    ) -> Result<(Vec<SubscriptionEntity>, i64)> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let total = filtered(filter).count().get_result::<i64>(&mut conn)?;

        let rows = filtered(filter)
            .select(SubscriptionEntity::as_select())
            .order(subscriptions::created_at.desc())
            .limit(filter.limit)
            .offset(filter.offset)
            .load::<SubscriptionEntity>(&mut conn)?;

        Ok((rows, total))
    }

    async fn create_exclusive(
        &self,
        insert_subscription_entity: InsertSubscriptionEntity,
        now: DateTime<Utc>,
    ) -> Result<Option<SubscriptionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;
        let client_id = insert_subscription_entity.client_id;
        let active = SubscriptionStatus::Active.to_string();

        let created = conn.transaction::<Option<SubscriptionEntity>, diesel::result::Error, _>(
            |tx| {
                users::table
                    .find(client_id)
                    .select(users::id)
                    .for_update()
                    .first::<Uuid>(tx)?;

                update(
                    subscriptions::table
                        .filter(subscriptions::client_id.eq(client_id))
                        .filter(subscriptions::status.eq(&active))
                        .filter(subscriptions::ends_at.lt(now)),
                )
                .set(subscriptions::status.eq(SubscriptionStatus::Expired.to_string()))
                .execute(tx)?;

                let still_active = select(exists(
                    subscriptions::table
                        .filter(subscriptions::client_id.eq(client_id))
                        .filter(subscriptions::status.eq(&active)),
                ))
                .get_result::<bool>(tx)?;

                if still_active {
                    return Ok(None);
                }

                let subscription = insert_into(subscriptions::table)
                    .values(&insert_subscription_entity)
                    .returning(SubscriptionEntity::as_returning())
                    .get_result::<SubscriptionEntity>(tx)?;

                Ok(Some(subscription))
            },
        )?;

        Ok(created)
    }

    async fn cancel(&self, subscription_id: Uuid) -> Result<Option<SubscriptionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let cancelled = update(
            subscriptions::table
                .filter(subscriptions::id.eq(subscription_id))
                .filter(subscriptions::status.eq(SubscriptionStatus::Active.to_string())),
        )
        .set(subscriptions::status.eq(SubscriptionStatus::Cancelled.to_string()))
        .returning(SubscriptionEntity::as_returning())
        .get_result::<SubscriptionEntity>(&mut conn)
        .optional()?;

        Ok(cancelled)
    }

    async fn exists_for_plan(&self, plan_id: Uuid) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let referenced = select(exists(
            subscriptions::table.filter(subscriptions::plan_id.eq(plan_id)),
        ))
        .get_result::<bool>(&mut conn)?;

        Ok(referenced)
    }
}
