use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::plans::{InsertPlanEntity, PlanEntity, UpdatePlanEntity},
    value_objects::pagination::ListFilter,
};

#[async_trait]
#[automock]
pub trait PlanRepository {
    async fn find_by_id(&self, plan_id: Uuid) -> Result<Option<PlanEntity>>;
    async fn list_plans(&self, filter: &ListFilter) -> Result<(Vec<PlanEntity>, i64)>;
    async fn create(&self, insert_plan_entity: InsertPlanEntity) -> Result<PlanEntity>;
    async fn update(
        &self,
        plan_id: Uuid,
        update_plan_entity: UpdatePlanEntity,
    ) -> Result<Option<PlanEntity>>;
    async fn delete(&self, plan_id: Uuid) -> Result<bool>;
}
