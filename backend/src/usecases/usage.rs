use chrono::Utc;
use crates::domain::{
    repositories::{
        brands::BrandRepository, subscriptions::SubscriptionRepository, videos::VideoRepository,
    },
    value_objects::{
        entitlements::GatedAction,
        subscriptions::{EntitlementSummaryModel, UsageModel},
    },
};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::axum_http::error_responses::AppResult;

/// Current plan and how much of each client-wide quota is used.
pub struct UsageUseCase<S, B, V>
where
    S: SubscriptionRepository + Send + Sync + 'static,
    B: BrandRepository + Send + Sync + 'static,
    V: VideoRepository + Send + Sync + 'static,
{
    subscription_repository: Arc<S>,
    brand_repository: Arc<B>,
    video_repository: Arc<V>,
}

impl<S, B, V> UsageUseCase<S, B, V>
where
    S: SubscriptionRepository + Send + Sync + 'static,
    B: BrandRepository + Send + Sync + 'static,
    V: VideoRepository + Send + Sync + 'static,
{
    pub fn new(
        subscription_repository: Arc<S>,
        brand_repository: Arc<B>,
        video_repository: Arc<V>,
    ) -> Self {
        Self {
            subscription_repository,
            brand_repository,
            video_repository,
        }
    }

    pub async fn summary(&self, client_id: Uuid) -> AppResult<EntitlementSummaryModel> {
        let Some((subscription, plan)) = self
            .subscription_repository
            .find_entitling_subscription(client_id, Utc::now())
            .await?
        else {
            debug!(%client_id, "usage: client has no entitling subscription");
            return Ok(EntitlementSummaryModel::unsubscribed());
        };

        let brands_used = self.brand_repository.count_owned_by(client_id).await?;
        let videos_used = self.video_repository.count_owned_by(client_id).await?;

        Ok(EntitlementSummaryModel {
            brands: Some(UsageModel {
                used: brands_used,
                quota: GatedAction::CreateBrand.quota(&plan),
            }),
            videos: Some(UsageModel {
                used: videos_used,
                quota: GatedAction::CreateVideo.quota(&plan),
            }),
            products_per_brand: Some(GatedAction::CreateProduct.quota(&plan)),
            subscription: Some(subscription.into()),
            plan: Some(plan.into()),
        })
    }
}
