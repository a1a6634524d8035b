use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, delete, insert_into, pg::Pg, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain,
    infra::db::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{users, videos},
    },
};
use domain::{
    entities::videos::{InsertVideoEntity, UpdateVideoEntity, VideoEntity},
    repositories::videos::VideoRepository,
    value_objects::{entitlements::QuotaInsert, pagination::ListFilter},
};

pub struct VideoPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl VideoPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

fn filtered(filter: &ListFilter) -> videos::BoxedQuery<'static, Pg> {
    let mut query = videos::table.into_boxed();

    if let Some(owner_id) = filter.owner_id {
        query = query.filter(videos::client_id.eq(owner_id));
    }
    if let Some(pattern) = filter.search_pattern() {
        query = query.filter(videos::text.ilike(pattern));
    }

    query
}

#[async_trait]
impl VideoRepository for VideoPostgres {
    async fn find_by_id(&self, video_id: Uuid) -> Result<Option<VideoEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let video = videos::table
            .find(video_id)
            .select(VideoEntity::as_select())
            .first::<VideoEntity>(&mut conn)
            .optional()?;

        Ok(video)
    }

    async fn count_owned_by(&self, client_id: Uuid) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let count = videos::table
            .filter(videos::client_id.eq(client_id))
            .count()
            .get_result::<i64>(&mut conn)?;

        Ok(count)
    }

    async fn list_videos(&self, filter: &ListFilter) -> Result<(Vec<VideoEntity>, i64)> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let total = filtered(filter).count().get_result::<i64>(&mut conn)?;

        let rows = filtered(filter)
            .select(VideoEntity::as_select())
            .order(videos::created_at.desc())
            .limit(filter.limit)
            .offset(filter.offset)
            .load::<VideoEntity>(&mut conn)?;

        Ok((rows, total))
    }

    async fn insert_within_quota(
        &self,
        insert_video_entity: InsertVideoEntity,
        quota: i64,
    ) -> Result<QuotaInsert<VideoEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;
        let client_id = insert_video_entity.client_id;

        let inserted = conn.transaction::<QuotaInsert<VideoEntity>, diesel::result::Error, _>(|tx| {
            let owner = users::table
                .find(client_id)
                .select(users::id)
                .for_update()
                .first::<Uuid>(tx)
                .optional()?;

            if owner.is_none() {
                return Ok(QuotaInsert::OwnerMissing);
            }

            let current = videos::table
                .filter(videos::client_id.eq(client_id))
                .count()
                .get_result::<i64>(tx)?;

            if current >= quota {
                return Ok(QuotaInsert::QuotaExceeded);
            }

            let video = insert_into(videos::table)
                .values(&insert_video_entity)
                .returning(VideoEntity::as_returning())
                .get_result::<VideoEntity>(tx)?;

            Ok(QuotaInsert::Inserted(video))
        })?;

        Ok(inserted)
    }

    async fn update(
        &self,
        video_id: Uuid,
        update_video_entity: UpdateVideoEntity,
    ) -> Result<Option<VideoEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let video = update(videos::table.find(video_id))
            .set(&update_video_entity)
            .returning(VideoEntity::as_returning())
            .get_result::<VideoEntity>(&mut conn)
            .optional()?;

        Ok(video)
    }

    async fn delete(&self, video_id: Uuid) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let deleted = delete(videos::table.find(video_id)).execute(&mut conn)?;

        Ok(deleted > 0)
    }
}
