use crates::domain::{
    entities::videos::VideoEntity,
    repositories::{subscriptions::SubscriptionRepository, videos::VideoRepository},
    value_objects::{
        entitlements::{GatedAction, QuotaInsert},
        ownership::is_owner_or_admin,
        pagination::{PageQuery, Paginated},
        videos::{InsertVideoModel, UpdateVideoModel, VideoModel},
    },
};
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    axum_http::error_responses::{AppError, AppResult},
    usecases::entitlement::EntitlementGate,
};

pub struct VideoUseCase<V, S>
where
    V: VideoRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    video_repository: Arc<V>,
    entitlement_gate: Arc<EntitlementGate<S>>,
}

impl<V, S> VideoUseCase<V, S>
where
    V: VideoRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    pub fn new(video_repository: Arc<V>, entitlement_gate: Arc<EntitlementGate<S>>) -> Self {
        Self {
            video_repository,
            entitlement_gate,
        }
    }

    pub async fn create_video(
        &self,
        auth: &AuthUser,
        insert_video_model: InsertVideoModel,
    ) -> AppResult<VideoModel> {
        auth.require_client()?;
        let client_id = auth.user_id;
        let action = GatedAction::CreateVideo;

        let current = self.video_repository.count_owned_by(client_id).await?;
        let quota = self
            .entitlement_gate
            .authorize(client_id, action, current)
            .await?;

        if insert_video_model.url.trim().is_empty() {
            return Err(AppError::BadRequest("url is required".to_string()));
        }

        let video = match self
            .video_repository
            .insert_within_quota(insert_video_model.to_entity(client_id), quota)
            .await
            .map_err(|err| {
                error!(%client_id, db_error = ?err, "videos: failed to create video");
                err
            })? {
            QuotaInsert::Inserted(video) => video,
            QuotaInsert::QuotaExceeded => {
                return Err(EntitlementGate::<S>::quota_race_lost(client_id, action, quota));
            }
            QuotaInsert::OwnerMissing => {
                return Err(AppError::Unauthorized("User no longer exists".to_string()));
            }
        };

        info!(%client_id, video_id = %video.id, "videos: created");

        Ok(video.into())
    }

    pub async fn list_videos(
        &self,
        auth: &AuthUser,
        query: &PageQuery,
    ) -> AppResult<Paginated<VideoModel>> {
        let filter = query.to_filter(auth.owner_scope());
        let (videos, total) = self.video_repository.list_videos(&filter).await?;

        Ok(Paginated::new(
            videos.into_iter().map(VideoModel::from).collect(),
            total,
            query,
        ))
    }

    pub async fn get_video(&self, auth: &AuthUser, video_id: Uuid) -> AppResult<VideoModel> {
        Ok(self.find_accessible(auth, video_id).await?.into())
    }

    pub async fn update_video(
        &self,
        auth: &AuthUser,
        video_id: Uuid,
        update_video_model: UpdateVideoModel,
    ) -> AppResult<VideoModel> {
        self.find_accessible(auth, video_id).await?;
        update_video_model.validate().map_err(AppError::BadRequest)?;

        let video = self
            .video_repository
            .update(video_id, update_video_model.to_entity())
            .await?
            .ok_or_else(video_not_found)?;

        info!(%video_id, status = %video.status, "videos: updated");

        Ok(video.into())
    }

    pub async fn delete_video(&self, auth: &AuthUser, video_id: Uuid) -> AppResult<()> {
        self.find_accessible(auth, video_id).await?;

        if !self.video_repository.delete(video_id).await? {
            return Err(video_not_found());
        }

        info!(%video_id, "videos: deleted");

        Ok(())
    }

    async fn find_accessible(&self, auth: &AuthUser, video_id: Uuid) -> AppResult<VideoEntity> {
        let video = self
            .video_repository
            .find_by_id(video_id)
            .await?
            .ok_or_else(video_not_found)?;

        if !is_owner_or_admin(auth.role, auth.user_id, video.client_id) {
            return Err(AppError::Forbidden("Access denied".to_string()));
        }

        Ok(video)
    }
}

fn video_not_found() -> AppError {
    AppError::NotFound("Video not found".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::entitlement::test_support::{active_subscription, plan};
    use chrono::Utc;
    use crates::domain::{
        repositories::{subscriptions::MockSubscriptionRepository, videos::MockVideoRepository},
        value_objects::enums::{user_roles::UserRole, video_statuses::VideoStatus},
    };

    fn client(user_id: Uuid) -> AuthUser {
        AuthUser {
            user_id,
            role: UserRole::Client,
        }
    }

    fn model() -> InsertVideoModel {
        InsertVideoModel {
            url: "https://cdn.example.com/v.mp4".to_string(),
            text: Some("Hello".to_string()),
            description: None,
            avatar_id: Some("avatar_1".to_string()),
            avatar_type: None,
            sound_tone: None,
            emotion: None,
            product_type: None,
        }
    }

    fn gate(client_id: Uuid, videos_quota: i32) -> Arc<EntitlementGate<MockSubscriptionRepository>> {
        let plan = plan(5, 5, videos_quota);
        let subscription = active_subscription(client_id, &plan);
        let mut subscription_repository = MockSubscriptionRepository::new();
        subscription_repository
            .expect_find_entitling_subscription()
            .returning(move |_, _| {
                let row = (subscription.clone(), plan.clone());
                Box::pin(async move { Ok(Some(row)) })
            });
        Arc::new(EntitlementGate::new(Arc::new(subscription_repository)))
    }

    #[tokio::test]
    async fn new_video_is_stored_pending() {
        let client_id = Uuid::new_v4();
        let mut video_repository = MockVideoRepository::new();
        video_repository
            .expect_count_owned_by()
            .returning(|_| Box::pin(async { Ok(0) }));
        video_repository
            .expect_insert_within_quota()
            .withf(move |entity, quota| {
                entity.client_id == client_id && entity.status == "pending" && *quota == 1
            })
            .returning(|entity, _| {
                let now = Utc::now();
                let video = VideoEntity {
                    id: Uuid::new_v4(),
                    client_id: entity.client_id,
                    url: entity.url,
                    text: entity.text,
                    description: entity.description,
                    status: entity.status,
                    avatar_id: entity.avatar_id,
                    avatar_type: entity.avatar_type,
                    sound_tone: entity.sound_tone,
                    emotion: entity.emotion,
                    product_type: entity.product_type,
                    created_at: now,
                    updated_at: now,
                };
                Box::pin(async move { Ok(QuotaInsert::Inserted(video)) })
            });

        let usecase = VideoUseCase::new(Arc::new(video_repository), gate(client_id, 1));

        let created = usecase.create_video(&client(client_id), model()).await.unwrap();
        assert_eq!(created.status, VideoStatus::Pending);
    }

    #[tokio::test]
    async fn video_quota_is_enforced() {
        let client_id = Uuid::new_v4();
        let mut video_repository = MockVideoRepository::new();
        video_repository
            .expect_count_owned_by()
            .returning(|_| Box::pin(async { Ok(1) }));
        video_repository.expect_insert_within_quota().never();

        let usecase = VideoUseCase::new(Arc::new(video_repository), gate(client_id, 1));

        let err = usecase
            .create_video(&client(client_id), model())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Video limit exceeded for your subscription plan");
    }

    #[tokio::test]
    async fn deleted_account_cannot_create() {
        let client_id = Uuid::new_v4();
        let mut video_repository = MockVideoRepository::new();
        video_repository
            .expect_count_owned_by()
            .returning(|_| Box::pin(async { Ok(0) }));
        video_repository
            .expect_insert_within_quota()
            .returning(|_, _| Box::pin(async { Ok(QuotaInsert::OwnerMissing) }));

        let usecase = VideoUseCase::new(Arc::new(video_repository), gate(client_id, 1));

        let result = usecase.create_video(&client(client_id), model()).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }
}
