use anyhow::Result;
use chrono::Utc;
use crates::domain::{
    entities::plans::PlanEntity,
    repositories::subscriptions::SubscriptionRepository,
    value_objects::entitlements::{
        Denial, EntitlementDecision, GatedAction, check_entitlement, check_quota, is_entitling,
    },
};
use std::sync::Arc;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::axum_http::error_responses::{AppError, AppResult};

/// Looks up a client's entitling subscription and applies the entitlement rules to it.
pub struct EntitlementGate<S>
where
    S: SubscriptionRepository + Send + Sync + 'static,
{
    subscription_repository: Arc<S>,
}

impl<S> EntitlementGate<S>
where
    S: SubscriptionRepository + Send + Sync + 'static,
{
    pub fn new(subscription_repository: Arc<S>) -> Self {
        Self {
            subscription_repository,
        }
    }

    pub async fn decide(
        &self,
        client_id: Uuid,
        action: GatedAction,
        current_count: i64,
    ) -> Result<EntitlementDecision> {
        let now = Utc::now();
        let entitling = self
            .subscription_repository
            .find_entitling_subscription(client_id, now)
            .await
            .map_err(|err| {
                error!(
                    %client_id,
                    %action,
                    db_error = ?err,
                    "entitlement: failed to load subscription"
                );
                err
            })?;

        let decision = check_entitlement(
            entitling.as_ref().map(|(subscription, plan)| (subscription, plan)),
            action,
            current_count,
            now,
        );

        debug!(%client_id, %action, current_count, ?decision, "entitlement: decided");

        Ok(decision)
    }

    /// Full gate for a create: `Ok(quota)` on allow, `EntitlementDenied` otherwise.
    pub async fn authorize(
        &self,
        client_id: Uuid,
        action: GatedAction,
        current_count: i64,
    ) -> AppResult<i64> {
        match self.decide(client_id, action, current_count).await? {
            EntitlementDecision::Allow { quota, .. } => Ok(quota),
            EntitlementDecision::Deny(denial) => Err(Self::denied(client_id, action, denial)),
        }
    }

    /// Subscription half of the gate. Returns the plan whose quotas apply.
    pub async fn require_subscription(
        &self,
        client_id: Uuid,
        action: GatedAction,
    ) -> AppResult<PlanEntity> {
        let now = Utc::now();
        let entitling = self
            .subscription_repository
            .find_entitling_subscription(client_id, now)
            .await
            .map_err(|err| {
                error!(
                    %client_id,
                    %action,
                    db_error = ?err,
                    "entitlement: failed to load subscription"
                );
                err
            })?;

        match entitling {
            Some((subscription, plan)) if is_entitling(&subscription, now) => Ok(plan),
            _ => Err(Self::denied(client_id, action, Denial::NoActiveSubscription)),
        }
    }

    /// Quota half of the gate, for callers that already hold the plan.
    pub fn require_quota(
        &self,
        client_id: Uuid,
        plan: &PlanEntity,
        action: GatedAction,
        current_count: i64,
    ) -> AppResult<i64> {
        match check_quota(plan, action, current_count) {
            EntitlementDecision::Allow { quota, .. } => Ok(quota),
            EntitlementDecision::Deny(denial) => Err(Self::denied(client_id, action, denial)),
        }
    }

    /// The locked re-count at insert time found the quota already used up.
    pub fn quota_race_lost(client_id: Uuid, action: GatedAction, quota: i64) -> AppError {
        Self::denied(
            client_id,
            action,
            Denial::QuotaExceeded {
                current: quota,
                quota,
            },
        )
    }

    fn denied(client_id: Uuid, action: GatedAction, denial: Denial) -> AppError {
        info!(
            %client_id,
            %action,
            %denial,
            status = axum::http::StatusCode::FORBIDDEN.as_u16(),
            "entitlement: create denied"
        );
        AppError::EntitlementDenied { action, denial }
    }
}
