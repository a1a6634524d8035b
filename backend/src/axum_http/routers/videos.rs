use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use crates::{
    domain::{
        repositories::{subscriptions::SubscriptionRepository, videos::VideoRepository},
        value_objects::{
            pagination::PageQuery,
            videos::{InsertVideoModel, UpdateVideoModel},
        },
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::{subscriptions::SubscriptionPostgres, videos::VideoPostgres},
    },
};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    axum_http::error_responses::AppResult,
    usecases::{entitlement::EntitlementGate, videos::VideoUseCase},
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let video_repository = VideoPostgres::new(Arc::clone(&db_pool));
    let subscription_repository = SubscriptionPostgres::new(Arc::clone(&db_pool));
    let entitlement_gate = EntitlementGate::new(Arc::new(subscription_repository));
    let video_usecase = VideoUseCase::new(Arc::new(video_repository), Arc::new(entitlement_gate));

    Router::new()
        .route("/", get(list_videos).post(create_video))
        .route(
            "/:video_id",
            get(get_video).put(update_video).delete(delete_video),
        )
        .with_state(Arc::new(video_usecase))
}

pub async fn create_video<V, S>(
    State(video_usecase): State<Arc<VideoUseCase<V, S>>>,
    auth: AuthUser,
    Json(insert_video_model): Json<InsertVideoModel>,
) -> AppResult<impl IntoResponse>
where
    V: VideoRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    let video = video_usecase.create_video(&auth, insert_video_model).await?;
    Ok((StatusCode::CREATED, Json(video)))
}

pub async fn list_videos<V, S>(
    State(video_usecase): State<Arc<VideoUseCase<V, S>>>,
    auth: AuthUser,
    Query(query): Query<PageQuery>,
) -> AppResult<impl IntoResponse>
where
    V: VideoRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    let videos = video_usecase.list_videos(&auth, &query).await?;
    Ok(Json(videos))
}

pub async fn get_video<V, S>(
    State(video_usecase): State<Arc<VideoUseCase<V, S>>>,
    auth: AuthUser,
    Path(video_id): Path<Uuid>,
) -> AppResult<impl IntoResponse>
where
    V: VideoRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    let video = video_usecase.get_video(&auth, video_id).await?;
    Ok(Json(video))
}

pub async fn update_video<V, S>(
    State(video_usecase): State<Arc<VideoUseCase<V, S>>>,
    auth: AuthUser,
    Path(video_id): Path<Uuid>,
    Json(update_video_model): Json<UpdateVideoModel>,
) -> AppResult<impl IntoResponse>
where
    V: VideoRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    let video = video_usecase
        .update_video(&auth, video_id, update_video_model)
        .await?;
    Ok(Json(video))
}

pub async fn delete_video<V, S>(
    State(video_usecase): State<Arc<VideoUseCase<V, S>>>,
    auth: AuthUser,
    Path(video_id): Path<Uuid>,
) -> AppResult<impl IntoResponse>
where
    V: VideoRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    video_usecase.delete_video(&auth, video_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
