use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::subscriptions::SubscriptionEntity,
    value_objects::{enums::subscription_statuses::SubscriptionStatus, plans::PlanModel},
};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SubscriptionModel {
    pub id: Uuid,
    pub client_id: Uuid,
    pub plan_id: Uuid,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub status: SubscriptionStatus,
    pub provider_subscription_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<SubscriptionEntity> for SubscriptionModel {
    fn from(entity: SubscriptionEntity) -> Self {
        Self {
            id: entity.id,
            client_id: entity.client_id,
            plan_id: entity.plan_id,
            starts_at: entity.starts_at,
            ends_at: entity.ends_at,
            status: SubscriptionStatus::from_str(&entity.status),
            provider_subscription_id: entity.provider_subscription_id,
            created_at: entity.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct InsertSubscriptionModel {
    pub plan_id: Uuid,
    pub payment_method_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SubscribeResponse {
    pub subscription: SubscriptionModel,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UsageModel {
    pub used: i64,
    pub quota: i64,
}

/// What the client may still create under its current plan.
#[derive(Debug, Serialize)]
pub struct EntitlementSummaryModel {
    pub subscription: Option<SubscriptionModel>,
    pub plan: Option<PlanModel>,
    pub brands: Option<UsageModel>,
    pub videos: Option<UsageModel>,
    pub products_per_brand: Option<i64>,
}

impl EntitlementSummaryModel {
    pub fn unsubscribed() -> Self {
        Self {
            subscription: None,
            plan: None,
            brands: None,
            videos: None,
            products_per_brand: None,
        }
    }
}
