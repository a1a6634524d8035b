use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::payments::PaymentEntity, value_objects::enums::payment_statuses::PaymentStatus,
};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PaymentModel {
    pub id: Uuid,
    pub client_id: Uuid,
    pub subscription_id: Option<Uuid>,
    pub amount_minor: i64,
    pub currency: String,
    pub status: PaymentStatus,
    pub provider_payment_id: String,
    pub card_last4: Option<String>,
    pub card_brand: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<PaymentEntity> for PaymentModel {
    fn from(entity: PaymentEntity) -> Self {
        Self {
            id: entity.id,
            client_id: entity.client_id,
            subscription_id: entity.subscription_id,
            amount_minor: entity.amount_minor,
            currency: entity.currency,
            status: PaymentStatus::from_str(&entity.status),
            provider_payment_id: entity.provider_payment_id,
            card_last4: entity.card_last4,
            card_brand: entity.card_brand,
            created_at: entity.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct InsertPaymentModel {
    pub amount_minor: i64,
    pub payment_method_id: String,
    pub subscription_id: Option<Uuid>,
}
