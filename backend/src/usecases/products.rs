use crates::domain::{
    entities::products::ProductEntity,
    repositories::{
        brands::BrandRepository, products::ProductRepository,
        subscriptions::SubscriptionRepository,
    },
    value_objects::{
        entitlements::{GatedAction, QuotaInsert},
        ownership::is_owner_or_admin,
        pagination::{PageQuery, Paginated},
        products::{InsertProductModel, ProductModel, UpdateProductModel},
    },
};
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    axum_http::error_responses::{AppError, AppResult},
    usecases::entitlement::EntitlementGate,
};

pub struct ProductUseCase<R, B, S>
where
    R: ProductRepository + Send + Sync + 'static,
    B: BrandRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    product_repository: Arc<R>,
    brand_repository: Arc<B>,
    entitlement_gate: Arc<EntitlementGate<S>>,
}

impl<R, B, S> ProductUseCase<R, B, S>
where
    R: ProductRepository + Send + Sync + 'static,
    B: BrandRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    pub fn new(
        product_repository: Arc<R>,
        brand_repository: Arc<B>,
        entitlement_gate: Arc<EntitlementGate<S>>,
    ) -> Self {
        Self {
            product_repository,
            brand_repository,
            entitlement_gate,
        }
    }

    /// Subscription first, then the target brand, then the per-brand quota.
    pub async fn create_product(
        &self,
        auth: &AuthUser,
        insert_product_model: InsertProductModel,
    ) -> AppResult<ProductModel> {
        auth.require_client()?;
        let client_id = auth.user_id;
        let brand_id = insert_product_model.brand_id;
        let action = GatedAction::CreateProduct;

        let plan = self
            .entitlement_gate
            .require_subscription(client_id, action)
            .await?;

        let brand = self
            .brand_repository
            .find_by_id(brand_id)
            .await?
            .ok_or_else(brand_not_found)?;

        if brand.client_id != client_id {
            warn!(
                %client_id,
                %brand_id,
                status = axum::http::StatusCode::FORBIDDEN.as_u16(),
                "products: create under foreign brand"
            );
            return Err(AppError::Forbidden("Access denied to this brand".to_string()));
        }

        let current = self.product_repository.count_by_brand(brand_id).await?;
        let quota = self
            .entitlement_gate
            .require_quota(client_id, &plan, action, current)?;

        if insert_product_model.title.trim().is_empty() {
            return Err(AppError::BadRequest("title is required".to_string()));
        }

        let product = match self
            .product_repository
            .insert_within_quota(insert_product_model.to_entity(), quota)
            .await
            .map_err(|err| {
                error!(%client_id, %brand_id, db_error = ?err, "products: failed to create product");
                err
            })? {
            QuotaInsert::Inserted(product) => product,
            QuotaInsert::QuotaExceeded => {
                return Err(EntitlementGate::<S>::quota_race_lost(client_id, action, quota));
            }
            QuotaInsert::OwnerMissing => return Err(brand_not_found()),
        };

        info!(%client_id, %brand_id, product_id = %product.id, "products: created");

        Ok(product.into())
    }

    pub async fn list_products(
        &self,
        auth: &AuthUser,
        query: &PageQuery,
    ) -> AppResult<Paginated<ProductModel>> {
        let filter = query.to_filter(auth.owner_scope());
        let (products, total) = self.product_repository.list_products(&filter).await?;

        Ok(Paginated::new(
            products.into_iter().map(ProductModel::from).collect(),
            total,
            query,
        ))
    }

    pub async fn get_product(&self, auth: &AuthUser, product_id: Uuid) -> AppResult<ProductModel> {
        Ok(self.find_accessible(auth, product_id).await?.into())
    }

    pub async fn update_product(
        &self,
        auth: &AuthUser,
        product_id: Uuid,
        update_product_model: UpdateProductModel,
    ) -> AppResult<ProductModel> {
        self.find_accessible(auth, product_id).await?;
        update_product_model.validate().map_err(AppError::BadRequest)?;

        let product = self
            .product_repository
            .update(product_id, update_product_model.to_entity())
            .await?
            .ok_or_else(product_not_found)?;

        info!(%product_id, "products: updated");

        Ok(product.into())
    }

    pub async fn delete_product(&self, auth: &AuthUser, product_id: Uuid) -> AppResult<()> {
        self.find_accessible(auth, product_id).await?;

        if !self.product_repository.delete(product_id).await? {
            return Err(product_not_found());
        }

        info!(%product_id, user_id = %auth.user_id, "products: deleted");

        Ok(())
    }

    /// Products are owned through their brand.
    async fn find_accessible(&self, auth: &AuthUser, product_id: Uuid) -> AppResult<ProductEntity> {
        let product = self
            .product_repository
            .find_by_id(product_id)
            .await?
            .ok_or_else(product_not_found)?;

        if auth.is_admin() {
            return Ok(product);
        }

        let owner_id = self
            .brand_repository
            .find_by_id(product.brand_id)
            .await?
            .map(|brand| brand.client_id);

        match owner_id {
            Some(owner_id) if is_owner_or_admin(auth.role, auth.user_id, owner_id) => Ok(product),
            _ => Err(AppError::Forbidden("Access denied".to_string())),
        }
    }
}

fn brand_not_found() -> AppError {
    AppError::NotFound("Brand not found".to_string())
}

fn product_not_found() -> AppError {
    AppError::NotFound("Product not found".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::{
        brands::test_support::brand,
        entitlement::test_support::{active_subscription, plan},
    };
    use chrono::Utc;
    use crates::domain::{
        entities::brands::BrandEntity,
        repositories::{
            brands::MockBrandRepository, products::MockProductRepository,
            subscriptions::MockSubscriptionRepository,
        },
        value_objects::enums::user_roles::UserRole,
    };
    use mockall::predicate::eq;

    fn client(user_id: Uuid) -> AuthUser {
        AuthUser {
            user_id,
            role: UserRole::Client,
        }
    }

    fn product(brand_id: Uuid) -> ProductEntity {
        let now = Utc::now();
        ProductEntity {
            id: Uuid::new_v4(),
            brand_id,
            title: "Widget".to_string(),
            description: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn model(brand_id: Uuid) -> InsertProductModel {
        InsertProductModel {
            brand_id,
            title: "Widget".to_string(),
            description: None,
        }
    }

    fn subscribed_gate(client_id: Uuid, products_quota: i32) -> Arc<EntitlementGate<MockSubscriptionRepository>> {
        let plan = plan(5, products_quota, 5);
        let subscription = active_subscription(client_id, &plan);
        let mut subscription_repository = MockSubscriptionRepository::new();
        subscription_repository
            .expect_find_entitling_subscription()
            .returning(move |_, _| {
                let row = (subscription.clone(), plan.clone());
                Box::pin(async move { Ok(Some(row)) })
            });
        Arc::new(EntitlementGate::new(Arc::new(subscription_repository)))
    }

    fn brands_with(existing: Option<BrandEntity>) -> MockBrandRepository {
        let mut brand_repository = MockBrandRepository::new();
        brand_repository.expect_find_by_id().returning(move |_| {
            let existing = existing.clone();
            Box::pin(async move { Ok(existing) })
        });
        brand_repository
    }

    #[tokio::test]
    async fn subscription_is_checked_before_brand() {
        let client_id = Uuid::new_v4();
        let mut subscription_repository = MockSubscriptionRepository::new();
        subscription_repository
            .expect_find_entitling_subscription()
            .returning(|_, _| Box::pin(async { Ok(None) }));
        let gate = Arc::new(EntitlementGate::new(Arc::new(subscription_repository)));

        let mut brand_repository = MockBrandRepository::new();
        brand_repository.expect_find_by_id().never();

        let usecase = ProductUseCase::new(
            Arc::new(MockProductRepository::new()),
            Arc::new(brand_repository),
            gate,
        );

        let err = usecase
            .create_product(&client(client_id), model(Uuid::new_v4()))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Active subscription required to add product");
    }

    #[tokio::test]
    async fn missing_brand_is_not_found() {
        let client_id = Uuid::new_v4();
        let usecase = ProductUseCase::new(
            Arc::new(MockProductRepository::new()),
            Arc::new(brands_with(None)),
            subscribed_gate(client_id, 5),
        );

        let result = usecase
            .create_product(&client(client_id), model(Uuid::new_v4()))
            .await;
        assert!(matches!(result, Err(AppError::NotFound(message)) if message == "Brand not found"));
    }

    #[tokio::test]
    async fn foreign_brand_is_forbidden_before_quota() {
        let client_id = Uuid::new_v4();
        let foreign = brand(Uuid::new_v4());
        let brand_id = foreign.id;

        let mut product_repository = MockProductRepository::new();
        product_repository.expect_count_by_brand().never();

        let usecase = ProductUseCase::new(
            Arc::new(product_repository),
            Arc::new(brands_with(Some(foreign))),
            subscribed_gate(client_id, 5),
        );

        let result = usecase.create_product(&client(client_id), model(brand_id)).await;
        assert!(matches!(result, Err(AppError::Forbidden(message)) if message == "Access denied to this brand"));
    }

    #[tokio::test]
    async fn quota_counts_products_under_target_brand() {
        let client_id = Uuid::new_v4();
        let owned = brand(client_id);
        let brand_id = owned.id;

        let mut product_repository = MockProductRepository::new();
        product_repository
            .expect_count_by_brand()
            .with(eq(brand_id))
            .returning(|_| Box::pin(async { Ok(3) }));
        product_repository.expect_insert_within_quota().never();

        let usecase = ProductUseCase::new(
            Arc::new(product_repository),
            Arc::new(brands_with(Some(owned))),
            subscribed_gate(client_id, 3),
        );

        let err = usecase
            .create_product(&client(client_id), model(brand_id))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Product limit exceeded for your subscription plan");
    }

    #[tokio::test]
    async fn creates_under_own_brand() {
        let client_id = Uuid::new_v4();
        let owned = brand(client_id);
        let brand_id = owned.id;

        let mut product_repository = MockProductRepository::new();
        product_repository
            .expect_count_by_brand()
            .returning(|_| Box::pin(async { Ok(2) }));
        product_repository
            .expect_insert_within_quota()
            .withf(move |entity, quota| entity.brand_id == brand_id && *quota == 3)
            .returning(move |_, _| Box::pin(async move { Ok(QuotaInsert::Inserted(product(brand_id))) }));

        let usecase = ProductUseCase::new(
            Arc::new(product_repository),
            Arc::new(brands_with(Some(owned))),
            subscribed_gate(client_id, 3),
        );

        let created = usecase
            .create_product(&client(client_id), model(brand_id))
            .await
            .unwrap();
        assert_eq!(created.brand_id, brand_id);
    }

    #[tokio::test]
    async fn blank_title_update_is_rejected_before_storage() {
        let owner_id = Uuid::new_v4();
        let owned = brand(owner_id);
        let existing = product(owned.id);
        let product_id = existing.id;

        let mut product_repository = MockProductRepository::new();
        product_repository.expect_find_by_id().returning(move |_| {
            let existing = existing.clone();
            Box::pin(async move { Ok(Some(existing)) })
        });
        product_repository.expect_update().never();

        let usecase = ProductUseCase::new(
            Arc::new(product_repository),
            Arc::new(brands_with(Some(owned))),
            subscribed_gate(owner_id, 3),
        );

        let result = usecase
            .update_product(
                &client(owner_id),
                product_id,
                UpdateProductModel {
                    title: Some("".to_string()),
                    description: None,
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::BadRequest(message)) if message == "title must not be empty"));
    }

    #[tokio::test]
    async fn brand_deleted_before_insert_is_not_found() {
        let client_id = Uuid::new_v4();
        let owned = brand(client_id);
        let brand_id = owned.id;

        let mut product_repository = MockProductRepository::new();
        product_repository
            .expect_count_by_brand()
            .returning(|_| Box::pin(async { Ok(0) }));
        product_repository
            .expect_insert_within_quota()
            .times(1)
            .returning(|_, _| Box::pin(async { Ok(QuotaInsert::OwnerMissing) }));

        let usecase = ProductUseCase::new(
            Arc::new(product_repository),
            Arc::new(brands_with(Some(owned))),
            subscribed_gate(client_id, 3),
        );

        let result = usecase.create_product(&client(client_id), model(brand_id)).await;
        assert!(matches!(result, Err(AppError::NotFound(message)) if message == "Brand not found"));
    }

    #[tokio::test]
    async fn product_access_follows_brand_owner() {
        let owner_id = Uuid::new_v4();
        let owned = brand(owner_id);
        let existing = product(owned.id);
        let product_id = existing.id;

        let mut product_repository = MockProductRepository::new();
        product_repository
            .expect_find_by_id()
            .with(eq(product_id))
            .returning(move |_| {
                let existing = existing.clone();
                Box::pin(async move { Ok(Some(existing)) })
            });

        let mut subscription_repository = MockSubscriptionRepository::new();
        subscription_repository.expect_find_entitling_subscription().never();

        let usecase = ProductUseCase::new(
            Arc::new(product_repository),
            Arc::new(brands_with(Some(owned))),
            Arc::new(EntitlementGate::new(Arc::new(subscription_repository))),
        );

        assert!(usecase.get_product(&client(owner_id), product_id).await.is_ok());
        assert!(matches!(
            usecase.get_product(&client(Uuid::new_v4()), product_id).await,
            Err(AppError::Forbidden(_))
        ));
    }
}
