use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::payments::{InsertPaymentEntity, PaymentEntity},
    value_objects::pagination::ListFilter,
};

#[async_trait]
#[automock]
pub trait PaymentRepository {
    async fn record_payment(&self, insert_payment_entity: InsertPaymentEntity)
    -> Result<PaymentEntity>;
    async fn find_by_id(&self, payment_id: Uuid) -> Result<Option<PaymentEntity>>;
    async fn list_payments(&self, filter: &ListFilter) -> Result<(Vec<PaymentEntity>, i64)>;
}
