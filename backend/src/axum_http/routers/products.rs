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
            brands::BrandRepository, products::ProductRepository,
            subscriptions::SubscriptionRepository,
        },
        value_objects::{
            pagination::PageQuery,
            products::{InsertProductModel, UpdateProductModel},
        },
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::{
            brands::BrandPostgres, products::ProductPostgres, subscriptions::SubscriptionPostgres,
        },
    },
};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    axum_http::error_responses::AppResult,
    usecases::{entitlement::EntitlementGate, products::ProductUseCase},
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let product_repository = ProductPostgres::new(Arc::clone(&db_pool));
    let brand_repository = BrandPostgres::new(Arc::clone(&db_pool));
    let subscription_repository = SubscriptionPostgres::new(Arc::clone(&db_pool));
    let entitlement_gate = EntitlementGate::new(Arc::new(subscription_repository));
    let product_usecase = ProductUseCase::new(
        Arc::new(product_repository),
        Arc::new(brand_repository),
        Arc::new(entitlement_gate),
    );

    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/:product_id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .with_state(Arc::new(product_usecase))
}

pub async fn create_product<R, B, S>(
    State(product_usecase): State<Arc<ProductUseCase<R, B, S>>>,
    auth: AuthUser,
    Json(insert_product_model): Json<InsertProductModel>,
) -> AppResult<impl IntoResponse>
where
    R: ProductRepository + Send + Sync + 'static,
    B: BrandRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    let product = product_usecase
        .create_product(&auth, insert_product_model)
        .await?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn list_products<R, B, S>(
    State(product_usecase): State<Arc<ProductUseCase<R, B, S>>>,
    auth: AuthUser,
    Query(query): Query<PageQuery>,
) -> AppResult<impl IntoResponse>
where
    R: ProductRepository + Send + Sync + 'static,
    B: BrandRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    let products = product_usecase.list_products(&auth, &query).await?;
    Ok(Json(products))
}

pub async fn get_product<R, B, S>(
    State(product_usecase): State<Arc<ProductUseCase<R, B, S>>>,
    auth: AuthUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<impl IntoResponse>
where
    R: ProductRepository + Send + Sync + 'static,
    B: BrandRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    let product = product_usecase.get_product(&auth, product_id).await?;
    Ok(Json(product))
}

pub async fn update_product<R, B, S>(
    State(product_usecase): State<Arc<ProductUseCase<R, B, S>>>,
    auth: AuthUser,
    Path(product_id): Path<Uuid>,
    Json(update_product_model): Json<UpdateProductModel>,
) -> AppResult<impl IntoResponse>
where
    R: ProductRepository + Send + Sync + 'static,
    B: BrandRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    let product = product_usecase
        .update_product(&auth, product_id, update_product_model)
        .await?;
    Ok(Json(product))
}

pub async fn delete_product<R, B, S>(
    State(product_usecase): State<Arc<ProductUseCase<R, B, S>>>,
    auth: AuthUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<impl IntoResponse>
where
    R: ProductRepository + Send + Sync + 'static,
    B: BrandRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    product_usecase.delete_product(&auth, product_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
