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
        repositories::{
            brands::BrandRepository, plans::PlanRepository,
            subscriptions::SubscriptionRepository, users::UserRepository,
            videos::VideoRepository,
        },
        value_objects::{pagination::PageQuery, subscriptions::InsertSubscriptionModel},
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::{
            brands::BrandPostgres, plans::PlanPostgres, subscriptions::SubscriptionPostgres,
            users::UserPostgres, videos::VideoPostgres,
        },
    },
    payments::gateway::PaymentGateway,
};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    axum_http::error_responses::AppResult,
    usecases::{subscriptions::SubscriptionUseCase, usage::UsageUseCase},
};

pub fn routes<G>(db_pool: Arc<PgPoolSquad>, payment_gateway: Arc<G>) -> Router
where
    G: PaymentGateway + Send + Sync + 'static,
{
    let subscription_repository = Arc::new(SubscriptionPostgres::new(Arc::clone(&db_pool)));
    let plan_repository = PlanPostgres::new(Arc::clone(&db_pool));
    let user_repository = UserPostgres::new(Arc::clone(&db_pool));
    let brand_repository = BrandPostgres::new(Arc::clone(&db_pool));
    let video_repository = VideoPostgres::new(Arc::clone(&db_pool));

    let subscription_usecase = SubscriptionUseCase::new(
        Arc::clone(&subscription_repository),
        Arc::new(plan_repository),
        Arc::new(user_repository),
        payment_gateway,
    );
    let usage_usecase = UsageUseCase::new(
        subscription_repository,
        Arc::new(brand_repository),
        Arc::new(video_repository),
    );

    let usage_router = Router::new()
        .route("/entitlements", get(entitlements))
        .with_state(Arc::new(usage_usecase));

    Router::new()
        .route("/", get(list_subscriptions).post(subscribe))
        .route(
            "/:subscription_id",
            get(get_subscription).delete(cancel_subscription),
        )
        .with_state(Arc::new(subscription_usecase))
        .merge(usage_router)
}

pub async fn subscribe<S, P, U, G>(
    State(subscription_usecase): State<Arc<SubscriptionUseCase<S, P, U, G>>>,
    auth: AuthUser,
    Json(insert_subscription_model): Json<InsertSubscriptionModel>,
) -> AppResult<impl IntoResponse>
where
    S: SubscriptionRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    G: PaymentGateway + Send + Sync + 'static,
{
    auth.require_client()?;

    let subscribe_response = subscription_usecase
        .subscribe(auth.user_id, insert_subscription_model)
        .await?;
    Ok((StatusCode::CREATED, Json(subscribe_response)))
}

pub async fn list_subscriptions<S, P, U, G>(
    State(subscription_usecase): State<Arc<SubscriptionUseCase<S, P, U, G>>>,
    auth: AuthUser,
    Query(query): Query<PageQuery>,
) -> AppResult<impl IntoResponse>
where
    S: SubscriptionRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    G: PaymentGateway + Send + Sync + 'static,
{
    let subscriptions = subscription_usecase.list_subscriptions(&auth, &query).await?;
    Ok(Json(subscriptions))
}

pub async fn get_subscription<S, P, U, G>(
    State(subscription_usecase): State<Arc<SubscriptionUseCase<S, P, U, G>>>,
    auth: AuthUser,
    Path(subscription_id): Path<Uuid>,
) -> AppResult<impl IntoResponse>
where
    S: SubscriptionRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    G: PaymentGateway + Send + Sync + 'static,
{
    let subscription = subscription_usecase
        .get_subscription(&auth, subscription_id)
        .await?;
    Ok(Json(subscription))
}

pub async fn cancel_subscription<S, P, U, G>(
    State(subscription_usecase): State<Arc<SubscriptionUseCase<S, P, U, G>>>,
    auth: AuthUser,
    Path(subscription_id): Path<Uuid>,
) -> AppResult<impl IntoResponse>
where
    S: SubscriptionRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    G: PaymentGateway + Send + Sync + 'static,
{
    let subscription = subscription_usecase
        .cancel_subscription(&auth, subscription_id)
        .await?;
    Ok(Json(subscription))
}

pub async fn entitlements<S, B, V>(
    State(usage_usecase): State<Arc<UsageUseCase<S, B, V>>>,
    auth: AuthUser,
) -> AppResult<impl IntoResponse>
where
    S: SubscriptionRepository + Send + Sync + 'static,
    B: BrandRepository + Send + Sync + 'static,
    V: VideoRepository + Send + Sync + 'static,
{
    auth.require_client()?;

    let summary = usage_usecase.summary(auth.user_id).await?;
    Ok(Json(summary))
}
