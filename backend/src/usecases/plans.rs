use crates::domain::{
    repositories::{plans::PlanRepository, subscriptions::SubscriptionRepository},
    value_objects::{
        pagination::{PageQuery, Paginated},
        plans::{InsertPlanModel, PlanModel, UpdatePlanModel},
    },
};
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::axum_http::error_responses::{AppError, AppResult};

fn plan_not_found() -> AppError {
    AppError::NotFound("Plan not found".to_string())
}

pub struct PlanUseCase<P, S>
where
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    plan_repository: Arc<P>,
    subscription_repository: Arc<S>,
}

impl<P, S> PlanUseCase<P, S>
where
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    pub fn new(plan_repository: Arc<P>, subscription_repository: Arc<S>) -> Self {
        Self {
            plan_repository,
            subscription_repository,
        }
    }

    pub async fn list_plans(&self, query: &PageQuery) -> AppResult<Paginated<PlanModel>> {
        let filter = query.to_filter(None);
        let (plans, total) = self.plan_repository.list_plans(&filter).await.map_err(|err| {
            error!(db_error = ?err, "plans: failed to list plans");
            err
        })?;

        Ok(Paginated::new(
            plans.into_iter().map(PlanModel::from).collect(),
            total,
            query,
        ))
    }

    pub async fn get_plan(&self, plan_id: Uuid) -> AppResult<PlanModel> {
        let plan = self
            .plan_repository
            .find_by_id(plan_id)
            .await?
            .ok_or_else(plan_not_found)?;

        Ok(plan.into())
    }

    pub async fn create_plan(&self, insert_plan_model: InsertPlanModel) -> AppResult<PlanModel> {
        insert_plan_model.validate().map_err(AppError::BadRequest)?;

        let plan = self
            .plan_repository
            .create(insert_plan_model.to_entity())
            .await
            .map_err(|err| {
                error!(db_error = ?err, "plans: failed to create plan");
                err
            })?;

        info!(plan_id = %plan.id, price_minor = plan.price_minor, "plans: created");

        Ok(plan.into())
    }

    pub async fn update_plan(
        &self,
        plan_id: Uuid,
        update_plan_model: UpdatePlanModel,
    ) -> AppResult<PlanModel> {
        update_plan_model.validate().map_err(AppError::BadRequest)?;

        let plan = self
            .plan_repository
            .update(plan_id, update_plan_model.to_entity())
            .await
            .map_err(|err| {
                error!(%plan_id, db_error = ?err, "plans: failed to update plan");
                err
            })?
            .ok_or_else(plan_not_found)?;

        info!(%plan_id, "plans: updated");

        Ok(plan.into())
    }

    pub async fn delete_plan(&self, plan_id: Uuid) -> AppResult<()> {
        if self.plan_repository.find_by_id(plan_id).await?.is_none() {
            return Err(plan_not_found());
        }

        if self.subscription_repository.exists_for_plan(plan_id).await? {
            warn!(
                %plan_id,
                status = axum::http::StatusCode::CONFLICT.as_u16(),
                "plans: delete refused, plan has subscriptions"
            );
            return Err(AppError::Conflict(
                "Plan has subscriptions and cannot be deleted".to_string(),
            ));
        }

        if !self.plan_repository.delete(plan_id).await? {
            return Err(plan_not_found());
        }

        info!(%plan_id, "plans: deleted");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::entitlement::test_support::plan;
    use crates::domain::repositories::{
        plans::MockPlanRepository, subscriptions::MockSubscriptionRepository,
    };
    use mockall::predicate::eq;

    #[tokio::test]
    async fn create_rejects_negative_quota_without_touching_storage() {
        let usecase = PlanUseCase::new(
            Arc::new(MockPlanRepository::new()),
            Arc::new(MockSubscriptionRepository::new()),
        );

        let result = usecase
            .create_plan(InsertPlanModel {
                title: "Broken".to_string(),
                plan_type: "monthly".to_string(),
                price_minor: 100,
                description: None,
                features: vec![],
                number_of_brands: -1,
                number_of_products: 0,
                number_of_videos: 0,
                stripe_price_id: None,
            })
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn get_missing_plan_is_not_found() {
        let mut plan_repository = MockPlanRepository::new();
        plan_repository
            .expect_find_by_id()
            .returning(|_| Box::pin(async { Ok(None) }));

        let usecase = PlanUseCase::new(
            Arc::new(plan_repository),
            Arc::new(MockSubscriptionRepository::new()),
        );

        let result = usecase.get_plan(Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::NotFound(message)) if message == "Plan not found"));
    }

    #[tokio::test]
    async fn delete_refuses_plan_in_use() {
        let existing = plan(1, 1, 1);
        let plan_id = existing.id;

        let mut plan_repository = MockPlanRepository::new();
        plan_repository
            .expect_find_by_id()
            .with(eq(plan_id))
            .returning(move |_| {
                let existing = existing.clone();
                Box::pin(async move { Ok(Some(existing)) })
            });
        plan_repository.expect_delete().never();

        let mut subscription_repository = MockSubscriptionRepository::new();
        subscription_repository
            .expect_exists_for_plan()
            .with(eq(plan_id))
            .returning(|_| Box::pin(async { Ok(true) }));

        let usecase = PlanUseCase::new(Arc::new(plan_repository), Arc::new(subscription_repository));

        let result = usecase.delete_plan(plan_id).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn list_wraps_page_metadata() {
        let plans = vec![plan(1, 1, 1), plan(2, 2, 2)];
        let mut plan_repository = MockPlanRepository::new();
        plan_repository
            .expect_list_plans()
            .withf(|filter| filter.limit == 2 && filter.offset == 2)
            .returning(move |_| {
                let plans = plans.clone();
                Box::pin(async move { Ok((plans, 4)) })
            });

        let usecase = PlanUseCase::new(
            Arc::new(plan_repository),
            Arc::new(MockSubscriptionRepository::new()),
        );

        let page = usecase
            .list_plans(&PageQuery {
                page: Some(2),
                limit: Some(2),
                search: None,
            })
            .await
            .unwrap();

        assert_eq!(page.total, 4);
        assert_eq!(page.page, 2);
        assert_eq!(page.data.len(), 2);
    }
}
