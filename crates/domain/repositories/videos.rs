use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::videos::{InsertVideoEntity, UpdateVideoEntity, VideoEntity},
    value_objects::{entitlements::QuotaInsert, pagination::ListFilter},
};

#[async_trait]
#[automock]
pub trait VideoRepository {
    async fn find_by_id(&self, video_id: Uuid) -> Result<Option<VideoEntity>>;
    async fn count_owned_by(&self, client_id: Uuid) -> Result<i64>;
    async fn list_videos(&self, filter: &ListFilter) -> Result<(Vec<VideoEntity>, i64)>;
    async fn insert_within_quota(
        &self,
        insert_video_entity: InsertVideoEntity,
        quota: i64,
    ) -> Result<QuotaInsert<VideoEntity>>;
    async fn update(
        &self,
        video_id: Uuid,
        update_video_entity: UpdateVideoEntity,
    ) -> Result<Option<VideoEntity>>;
    async fn delete(&self, video_id: Uuid) -> Result<bool>;
}
