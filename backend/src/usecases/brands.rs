use crates::domain::{
    entities::brands::BrandEntity,
    repositories::{brands::BrandRepository, subscriptions::SubscriptionRepository},
    value_objects::{
        brands::{BrandModel, InsertBrandModel, UpdateBrandModel},
        entitlements::{GatedAction, QuotaInsert},
        ownership::is_owner_or_admin,
        pagination::{PageQuery, Paginated},
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

pub struct BrandUseCase<B, S>
where
    B: BrandRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    brand_repository: Arc<B>,
    entitlement_gate: Arc<EntitlementGate<S>>,
}

impl<B, S> BrandUseCase<B, S>
where
    B: BrandRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    pub fn new(brand_repository: Arc<B>, entitlement_gate: Arc<EntitlementGate<S>>) -> Self {
        Self {
            brand_repository,
            entitlement_gate,
        }
    }

    pub async fn create_brand(
        &self,
        auth: &AuthUser,
        insert_brand_model: InsertBrandModel,
    ) -> AppResult<BrandModel> {
        auth.require_client()?;
        let client_id = auth.user_id;
        let action = GatedAction::CreateBrand;

        let current = self.brand_repository.count_owned_by(client_id).await?;
        let quota = self
            .entitlement_gate
            .authorize(client_id, action, current)
            .await?;

        insert_brand_model.validate().map_err(AppError::BadRequest)?;

        let brand = match self
            .brand_repository
            .insert_within_quota(insert_brand_model.to_entity(client_id), quota)
            .await
            .map_err(|err| {
                error!(%client_id, db_error = ?err, "brands: failed to create brand");
                err
            })? {
            QuotaInsert::Inserted(brand) => brand,
            QuotaInsert::QuotaExceeded => {
                return Err(EntitlementGate::<S>::quota_race_lost(client_id, action, quota));
            }
            QuotaInsert::OwnerMissing => {
                return Err(AppError::Unauthorized("User no longer exists".to_string()));
            }
        };

        info!(%client_id, brand_id = %brand.id, used = current + 1, quota, "brands: created");

        Ok(brand.into())
    }

    pub async fn list_brands(
        &self,
        auth: &AuthUser,
        query: &PageQuery,
    ) -> AppResult<Paginated<BrandModel>> {
        let filter = query.to_filter(auth.owner_scope());
        let (brands, total) = self.brand_repository.list_brands(&filter).await?;

        Ok(Paginated::new(
            brands.into_iter().map(BrandModel::from).collect(),
            total,
            query,
        ))
    }

    pub async fn get_brand(&self, auth: &AuthUser, brand_id: Uuid) -> AppResult<BrandModel> {
        Ok(self.find_accessible(auth, brand_id).await?.into())
    }

    pub async fn update_brand(
        &self,
        auth: &AuthUser,
        brand_id: Uuid,
        update_brand_model: UpdateBrandModel,
    ) -> AppResult<BrandModel> {
        self.find_accessible(auth, brand_id).await?;
        update_brand_model.validate().map_err(AppError::BadRequest)?;

        let brand = self
            .brand_repository
            .update(brand_id, update_brand_model.to_entity())
            .await?
            .ok_or_else(brand_not_found)?;

        info!(%brand_id, "brands: updated");

        Ok(brand.into())
    }

    pub async fn delete_brand(&self, auth: &AuthUser, brand_id: Uuid) -> AppResult<()> {
        self.find_accessible(auth, brand_id).await?;

        if !self.brand_repository.delete(brand_id).await? {
            return Err(brand_not_found());
        }

        info!(%brand_id, user_id = %auth.user_id, "brands: deleted");

        Ok(())
    }

    async fn find_accessible(&self, auth: &AuthUser, brand_id: Uuid) -> AppResult<BrandEntity> {
        let brand = self
            .brand_repository
            .find_by_id(brand_id)
            .await?
            .ok_or_else(brand_not_found)?;

        if !is_owner_or_admin(auth.role, auth.user_id, brand.client_id) {
            return Err(AppError::Forbidden("Access denied".to_string()));
        }

        Ok(brand)
    }
}

fn brand_not_found() -> AppError {
    AppError::NotFound("Brand not found".to_string())
}
