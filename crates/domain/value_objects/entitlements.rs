//! Subscription entitlement rules.
//!
//! A client may create a quota-bound resource only while it holds a
//! subscription that is `active` and whose `[starts_at, ends_at]` window
//! contains the current instant, and only while its usage for that resource
//! is strictly below the plan quota. The rules here are pure: callers fetch
//! the subscription, plan and usage count and pass them in.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Display;

use crate::domain::{
    entities::{plans::PlanEntity, subscriptions::SubscriptionEntity},
    value_objects::enums::subscription_statuses::SubscriptionStatus,
};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GatedAction {
    CreateBrand,
    CreateProduct,
    CreateVideo,
}

impl GatedAction {
    pub fn resource(&self) -> &'static str {
        match self {
            GatedAction::CreateBrand => "brand",
            GatedAction::CreateProduct => "product",
            GatedAction::CreateVideo => "video",
        }
    }

    /// The plan quota that bounds this action.
    pub fn quota(&self, plan: &PlanEntity) -> i64 {
        let quota = match self {
            GatedAction::CreateBrand => plan.number_of_brands,
            GatedAction::CreateProduct => plan.number_of_products,
            GatedAction::CreateVideo => plan.number_of_videos,
        };
        i64::from(quota)
    }

    /// Client-facing text for a denial of this action.
    pub fn denial_message(&self, denial: &Denial) -> String {
        match denial {
            Denial::NoActiveSubscription => {
                format!("Active subscription required to add {}", self.resource())
            }
            Denial::QuotaExceeded { .. } => {
                let resource = self.resource();
                let mut chars = resource.chars();
                let capitalized = match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                };
                format!("{} limit exceeded for your subscription plan", capitalized)
            }
        }
    }
}

impl Display for GatedAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GatedAction::CreateBrand => f.write_str("create_brand"),
            GatedAction::CreateProduct => f.write_str("create_product"),
            GatedAction::CreateVideo => f.write_str("create_video"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    /// Covers never subscribed, cancelled, expired and not-yet-started alike.
    NoActiveSubscription,
    QuotaExceeded { current: i64, quota: i64 },
}

impl Display for Denial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Denial::NoActiveSubscription => f.write_str("no active subscription"),
            Denial::QuotaExceeded { .. } => f.write_str("quota exceeded"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntitlementDecision {
    Allow { current: i64, quota: i64 },
    Deny(Denial),
}

impl EntitlementDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, EntitlementDecision::Allow { .. })
    }
}

/// Outcome of an insert that re-checks its quota under a row lock.
#[derive(Debug, Clone, PartialEq)]
pub enum QuotaInsert<T> {
    Inserted(T),
    QuotaExceeded,
    /// The row the quota is counted against is gone.
    OwnerMissing,
}

/// Whether `subscription` entitles its client at `now`. Both window ends are inclusive.
pub fn is_entitling(subscription: &SubscriptionEntity, now: DateTime<Utc>) -> bool {
    SubscriptionStatus::from_str(&subscription.status) == SubscriptionStatus::Active
        && subscription.starts_at <= now
        && now <= subscription.ends_at
}

/// Decides whether `action` may proceed given the client's entitling subscription (with its
/// plan, if any) and the current usage count for the action's resource.
pub fn check_entitlement(
    entitling: Option<(&SubscriptionEntity, &PlanEntity)>,
    action: GatedAction,
    current_count: i64,
    now: DateTime<Utc>,
) -> EntitlementDecision {
    let Some((_, plan)) = entitling.filter(|(subscription, _)| is_entitling(subscription, now))
    else {
        return EntitlementDecision::Deny(Denial::NoActiveSubscription);
    };

    check_quota(plan, action, current_count)
}

/// Quota half of the gate, used on its own once the subscription is already known to entitle.
pub fn check_quota(plan: &PlanEntity, action: GatedAction, current_count: i64) -> EntitlementDecision {
    let quota = action.quota(plan);

    if current_count >= quota {
        return EntitlementDecision::Deny(Denial::QuotaExceeded {
            current: current_count,
            quota,
        });
    }

    EntitlementDecision::Allow {
        current: current_count,
        quota,
    }
}
