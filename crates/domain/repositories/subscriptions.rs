use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::{
        plans::PlanEntity,
        subscriptions::{InsertSubscriptionEntity, SubscriptionEntity},
    },
    value_objects::pagination::ListFilter,
};

#[async_trait]
#[automock]
pub trait SubscriptionRepository {
    /// The active subscription whose window contains `now`, with its plan.
    /// When several qualify the most recently started one wins.
    async fn find_entitling_subscription(
        &self,
        client_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<(SubscriptionEntity, PlanEntity)>>;

    async fn find_by_id(&self, subscription_id: Uuid) -> Result<Option<SubscriptionEntity>>;

    async fn list_subscriptions(
        &self,
        filter: &ListFilter,
    ) -> Result<(Vec<SubscriptionEntity>, i64)>;

    /// Inserts the subscription unless the client still holds an active one.
    /// Active rows that ended before `now` are retired to `expired` first.
    async fn create_exclusive(
        &self,
        insert_subscription_entity: InsertSubscriptionEntity,
        now: DateTime<Utc>,
    ) -> Result<Option<SubscriptionEntity>>;

    /// Moves an active subscription to `cancelled`. `None` if it was not active.
    async fn cancel(&self, subscription_id: Uuid) -> Result<Option<SubscriptionEntity>>;

    async fn exists_for_plan(&self, plan_id: Uuid) -> Result<bool>;
}
