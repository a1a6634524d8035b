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
        repositories::{plans::PlanRepository, subscriptions::SubscriptionRepository},
        value_objects::{
            pagination::PageQuery,
            plans::{InsertPlanModel, UpdatePlanModel},
        },
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::{plans::PlanPostgres, subscriptions::SubscriptionPostgres},
    },
};
use uuid::Uuid;

use crate::{auth::AuthUser, axum_http::error_responses::AppResult, usecases::plans::PlanUseCase};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let plan_repository = PlanPostgres::new(Arc::clone(&db_pool));
    let subscription_repository = SubscriptionPostgres::new(Arc::clone(&db_pool));
    let plan_usecase = PlanUseCase::new(Arc::new(plan_repository), Arc::new(subscription_repository));

    Router::new()
        .route("/", get(list_plans).post(create_plan))
        .route("/:plan_id", get(get_plan).put(update_plan).delete(delete_plan))
        .with_state(Arc::new(plan_usecase))
}

pub async fn list_plans<P, S>(
    State(plan_usecase): State<Arc<PlanUseCase<P, S>>>,
    Query(query): Query<PageQuery>,
) -> AppResult<impl IntoResponse>
where
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    let plans = plan_usecase.list_plans(&query).await?;
    Ok(Json(plans))
}

pub async fn get_plan<P, S>(
    State(plan_usecase): State<Arc<PlanUseCase<P, S>>>,
    Path(plan_id): Path<Uuid>,
) -> AppResult<impl IntoResponse>
where
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    let plan = plan_usecase.get_plan(plan_id).await?;
    Ok(Json(plan))
}

pub async fn create_plan<P, S>(
    State(plan_usecase): State<Arc<PlanUseCase<P, S>>>,
    auth: AuthUser,
    Json(insert_plan_model): Json<InsertPlanModel>,
) -> AppResult<impl IntoResponse>
where
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    auth.require_admin()?;

    let plan = plan_usecase.create_plan(insert_plan_model).await?;
    Ok((StatusCode::CREATED, Json(plan)))
}

pub async fn update_plan<P, S>(
    State(plan_usecase): State<Arc<PlanUseCase<P, S>>>,
    auth: AuthUser,
    Path(plan_id): Path<Uuid>,
    Json(update_plan_model): Json<UpdatePlanModel>,
) -> AppResult<impl IntoResponse>
where
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    auth.require_admin()?;

    let plan = plan_usecase.update_plan(plan_id, update_plan_model).await?;
    Ok(Json(plan))
}

pub async fn delete_plan<P, S>(
    State(plan_usecase): State<Arc<PlanUseCase<P, S>>>,
    auth: AuthUser,
    Path(plan_id): Path<Uuid>,
) -> AppResult<impl IntoResponse>
where
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    auth.require_admin()?;

    plan_usecase.delete_plan(plan_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
