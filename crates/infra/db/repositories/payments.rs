use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, insert_into, pg::Pg, prelude::*};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain,
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::payments},
};
use domain::{
    entities::payments::{InsertPaymentEntity, PaymentEntity},
    repositories::payments::PaymentRepository,
    value_objects::pagination::ListFilter,
};

pub struct PaymentPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl PaymentPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

fn filtered(filter: &ListFilter) -> payments::BoxedQuery<'static, Pg> {
    let mut query = payments::table.into_boxed();

    if let Some(owner_id) = filter.owner_id {
        query = query.filter(payments::client_id.eq(owner_id));
    }

    query
}

#[async_trait]
impl PaymentRepository for PaymentPostgres {
    async fn record_payment(
        &self,
        insert_payment_entity: InsertPaymentEntity,
    ) -> Result<PaymentEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let payment = insert_into(payments::table)
            .values(&insert_payment_entity)
            .returning(PaymentEntity::as_returning())
            .get_result::<PaymentEntity>(&mut conn)?;

        Ok(payment)
    }

    async fn find_by_id(&self, payment_id: Uuid) -> Result<Option<PaymentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let payment = payments::table
            .find(payment_id)
            .select(PaymentEntity::as_select())
            .first::<PaymentEntity>(&mut conn)
            .optional()?;

        Ok(payment)
    }

    async fn list_payments(&self, filter: &ListFilter) -> Result<(Vec<PaymentEntity>, i64)> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let total = filtered(filter).count().get_result::<i64>(&mut conn)?;

        let rows = filtered(filter)
            .select(PaymentEntity::as_select())
            .order(payments::created_at.desc())
            .limit(filter.limit)
            .offset(filter.offset)
            .load::<PaymentEntity>(&mut conn)?;

        Ok((rows, total))
    }
}
