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
        repositories::{brands::BrandRepository, subscriptions::SubscriptionRepository},
        value_objects::{
            brands::{InsertBrandModel, UpdateBrandModel},
            pagination::PageQuery,
        },
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::{brands::BrandPostgres, subscriptions::SubscriptionPostgres},
    },
};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    axum_http::error_responses::AppResult,
    usecases::{brands::BrandUseCase, entitlement::EntitlementGate},
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let brand_repository = BrandPostgres::new(Arc::clone(&db_pool));
    let subscription_repository = SubscriptionPostgres::new(Arc::clone(&db_pool));
    let entitlement_gate = EntitlementGate::new(Arc::new(subscription_repository));
    let brand_usecase = BrandUseCase::new(Arc::new(brand_repository), Arc::new(entitlement_gate));

    Router::new()
        .route("/", get(list_brands).post(create_brand))
        .route(
            "/:brand_id",
            get(get_brand).put(update_brand).delete(delete_brand),
        )
        .with_state(Arc::new(brand_usecase))
}

pub async fn create_brand<B, S>(
    State(brand_usecase): State<Arc<BrandUseCase<B, S>>>,
    auth: AuthUser,
    Json(insert_brand_model): Json<InsertBrandModel>,
) -> AppResult<impl IntoResponse>
where
    B: BrandRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    let brand = brand_usecase.create_brand(&auth, insert_brand_model).await?;
    Ok((StatusCode::CREATED, Json(brand)))
}

pub async fn list_brands<B, S>(
    State(brand_usecase): State<Arc<BrandUseCase<B, S>>>,
    auth: AuthUser,
    Query(query): Query<PageQuery>,
) -> AppResult<impl IntoResponse>
where
    B: BrandRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    let brands = brand_usecase.list_brands(&auth, &query).await?;
    Ok(Json(brands))
}

pub async fn get_brand<B, S>(
    State(brand_usecase): State<Arc<BrandUseCase<B, S>>>,
    auth: AuthUser,
    Path(brand_id): Path<Uuid>,
) -> AppResult<impl IntoResponse>
where
    B: BrandRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    let brand = brand_usecase.get_brand(&auth, brand_id).await?;
    Ok(Json(brand))
}

pub async fn update_brand<B, S>(
    State(brand_usecase): State<Arc<BrandUseCase<B, S>>>,
    auth: AuthUser,
    Path(brand_id): Path<Uuid>,
    Json(update_brand_model): Json<UpdateBrandModel>,
) -> AppResult<impl IntoResponse>
where
    B: BrandRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    let brand = brand_usecase
        .update_brand(&auth, brand_id, update_brand_model)
        .await?;
    Ok(Json(brand))
}

pub async fn delete_brand<B, S>(
    State(brand_usecase): State<Arc<BrandUseCase<B, S>>>,
    auth: AuthUser,
    Path(brand_id): Path<Uuid>,
) -> AppResult<impl IntoResponse>
where
    B: BrandRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    brand_usecase.delete_brand(&auth, brand_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
