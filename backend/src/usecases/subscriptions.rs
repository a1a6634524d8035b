use chrono::{DateTime, Months, Utc};
use crates::{
    domain::{
        entities::subscriptions::{InsertSubscriptionEntity, SubscriptionEntity},
        repositories::{
            plans::PlanRepository, subscriptions::SubscriptionRepository, users::UserRepository,
        },
        value_objects::{
            enums::subscription_statuses::SubscriptionStatus,
            ownership::is_owner_or_admin,
            pagination::{PageQuery, Paginated},
            subscriptions::{InsertSubscriptionModel, SubscribeResponse, SubscriptionModel},
        },
    },
    payments::gateway::PaymentGateway,
};
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    axum_http::error_responses::{AppError, AppResult},
    usecases::customers::ensure_gateway_customer,
};

pub const FREE_PLAN_MONTHS: u32 = 12;

fn already_subscribed() -> AppError {
    AppError::Conflict("Client already has an active subscription".to_string())
}

fn subscription_not_found() -> AppError {
    AppError::NotFound("Subscription not found".to_string())
}

pub struct SubscriptionUseCase<S, P, U, G>
where
    S: SubscriptionRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    G: PaymentGateway + Send + Sync + 'static,
{
    subscription_repository: Arc<S>,
    plan_repository: Arc<P>,
    user_repository: Arc<U>,
    payment_gateway: Arc<G>,
}

impl<S, P, U, G> SubscriptionUseCase<S, P, U, G>
where
    S: SubscriptionRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    G: PaymentGateway + Send + Sync + 'static,
{
    pub fn new(
        subscription_repository: Arc<S>,
        plan_repository: Arc<P>,
        user_repository: Arc<U>,
        payment_gateway: Arc<G>,
    ) -> Self {
        Self {
            subscription_repository,
            plan_repository,
            user_repository,
            payment_gateway,
        }
    }

    pub async fn subscribe(
        &self,
        client_id: Uuid,
        insert_subscription_model: InsertSubscriptionModel,
    ) -> AppResult<SubscribeResponse> {
        let plan_id = insert_subscription_model.plan_id;
        info!(%client_id, %plan_id, "subscriptions: subscribe requested");

        let plan = self
            .plan_repository
            .find_by_id(plan_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Plan not found".to_string()))?;

        let now = Utc::now();
        if self
            .subscription_repository
            .find_entitling_subscription(client_id, now)
            .await?
            .is_some()
        {
            warn!(
                %client_id,
                status = axum::http::StatusCode::CONFLICT.as_u16(),
                "subscriptions: client already subscribed"
            );
            return Err(already_subscribed());
        }

        if plan.is_free() {
            let ends_at = now
                .checked_add_months(Months::new(FREE_PLAN_MONTHS))
                .ok_or_else(|| anyhow::anyhow!("Failed to compute free plan end date"))?;

            let subscription = self
                .store(client_id, plan_id, now, ends_at, None, now)
                .await?
                .ok_or_else(already_subscribed)?;

            info!(%client_id, subscription_id = %subscription.id, "subscriptions: free plan activated");

            return Ok(SubscribeResponse {
                subscription: subscription.into(),
                message: "Free plan activated".to_string(),
            });
        }

        let payment_method_id = insert_subscription_model
            .payment_method_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| {
                AppError::BadRequest("payment_method_id is required for paid plans".to_string())
            })?;
        let price_id = plan.stripe_price_id.clone().ok_or_else(|| {
            warn!(%plan_id, "subscriptions: paid plan has no gateway price");
            AppError::BadRequest("Plan is not available for purchase".to_string())
        })?;

        let (_, customer_id) = ensure_gateway_customer(
            self.user_repository.as_ref(),
            self.payment_gateway.as_ref(),
            client_id,
        )
        .await?;

        let gateway_subscription = self
            .payment_gateway
            .create_subscription(&customer_id, &price_id, &payment_method_id)
            .await
            .map_err(|err| {
                error!(%client_id, %plan_id, gateway_error = %err, "subscriptions: gateway subscription failed");
                err
            })?;

        if !gateway_subscription.is_paid() {
            warn!(
                %client_id,
                provider_subscription_id = %gateway_subscription.id,
                provider_status = %gateway_subscription.status,
                "subscriptions: gateway subscription not paid"
            );
            self.release_gateway_subscription(&gateway_subscription.id).await;
            return Err(AppError::BadRequest("Payment was not completed".to_string()));
        }

        let stored = self
            .store(
                client_id,
                plan_id,
                gateway_subscription.period_start,
                gateway_subscription.period_end,
                Some(gateway_subscription.id.clone()),
                now,
            )
            .await;

        let subscription = match stored {
            Ok(Some(subscription)) => subscription,
            Ok(None) => {
                // Another subscribe for this client committed first.
                self.release_gateway_subscription(&gateway_subscription.id).await;
                return Err(already_subscribed());
            }
            Err(err) => {
                self.release_gateway_subscription(&gateway_subscription.id).await;
                return Err(err);
            }
        };

        info!(
            %client_id,
            subscription_id = %subscription.id,
            provider_subscription_id = %gateway_subscription.id,
            "subscriptions: paid subscription created"
        );

        Ok(SubscribeResponse {
            subscription: subscription.into(),
            message: "Subscription created".to_string(),
        })
    }

    pub async fn list_subscriptions(
        &self,
        auth: &AuthUser,
        query: &PageQuery,
    ) -> AppResult<Paginated<SubscriptionModel>> {
        let filter = query.to_filter(auth.owner_scope());
        let (subscriptions, total) = self
            .subscription_repository
            .list_subscriptions(&filter)
            .await?;

        Ok(Paginated::new(
            subscriptions.into_iter().map(SubscriptionModel::from).collect(),
            total,
            query,
        ))
    }

    pub async fn get_subscription(
        &self,
        auth: &AuthUser,
        subscription_id: Uuid,
    ) -> AppResult<SubscriptionModel> {
        Ok(self.find_accessible(auth, subscription_id).await?.into())
    }

    pub async fn cancel_subscription(
        &self,
        auth: &AuthUser,
        subscription_id: Uuid,
    ) -> AppResult<SubscriptionModel> {
        let subscription = self.find_accessible(auth, subscription_id).await?;

        let status = SubscriptionStatus::from_str(&subscription.status);
        // An active row past its end is expired even before storage says so.
        if status.is_terminal() || subscription.ends_at < Utc::now() {
            warn!(
                %subscription_id,
                status = axum::http::StatusCode::CONFLICT.as_u16(),
                subscription_status = %status,
                "subscriptions: cancel refused"
            );
            return Err(AppError::Conflict(
                "Subscription is already cancelled or expired".to_string(),
            ));
        }

        if let Some(provider_subscription_id) = subscription.provider_subscription_id.as_deref() {
            self.payment_gateway
                .cancel_subscription(provider_subscription_id)
                .await
                .map_err(|err| {
                    error!(
                        %subscription_id,
                        provider_subscription_id,
                        gateway_error = %err,
                        "subscriptions: gateway cancel failed"
                    );
                    err
                })?;
        }

        let cancelled = self
            .subscription_repository
            .cancel(subscription_id)
            .await
            .map_err(|err| {
                error!(%subscription_id, db_error = ?err, "subscriptions: failed to store cancel");
                err
            })?
            .ok_or_else(|| {
                AppError::Conflict("Subscription is already cancelled or expired".to_string())
            })?;

        info!(%subscription_id, client_id = %cancelled.client_id, "subscriptions: cancelled");

        Ok(cancelled.into())
    }

    async fn find_accessible(
        &self,
        auth: &AuthUser,
        subscription_id: Uuid,
    ) -> AppResult<SubscriptionEntity> {
        let subscription = self
            .subscription_repository
            .find_by_id(subscription_id)
            .await?
            .ok_or_else(subscription_not_found)?;

        if !is_owner_or_admin(auth.role, auth.user_id, subscription.client_id) {
            return Err(AppError::Forbidden("Access denied".to_string()));
        }

        Ok(subscription)
    }

    async fn store(
        &self,
        client_id: Uuid,
        plan_id: Uuid,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
        provider_subscription_id: Option<String>,
        now: DateTime<Utc>,
    ) -> AppResult<Option<SubscriptionEntity>> {
        let insert_subscription_entity = InsertSubscriptionEntity {
            client_id,
            plan_id,
            starts_at,
            ends_at,
            status: SubscriptionStatus::Active.to_string(),
            provider_subscription_id,
        };

        let stored = self
            .subscription_repository
            .create_exclusive(insert_subscription_entity, now)
            .await
            .map_err(|err| {
                error!(%client_id, %plan_id, db_error = ?err, "subscriptions: failed to store subscription");
                err
            })?;

        Ok(stored)
    }

    /// Best effort: the client is already getting an error response.
    async fn release_gateway_subscription(&self, provider_subscription_id: &str) {
        if let Err(err) = self
            .payment_gateway
            .cancel_subscription(provider_subscription_id)
            .await
        {
            error!(
                provider_subscription_id,
                gateway_error = %err,
                "subscriptions: failed to release gateway subscription"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::{
        customers::test_support::client_user,
        entitlement::test_support::{active_subscription, plan, subscription_with_window},
    };
    use chrono::Duration;
    use crates::{
        domain::{
            repositories::{
                plans::MockPlanRepository, subscriptions::MockSubscriptionRepository,
                users::MockUserRepository,
            },
            value_objects::enums::user_roles::UserRole,
        },
        payments::gateway::{GatewayError, GatewaySubscription, MockPaymentGateway},
    };
    use mockall::predicate::{always, eq};

    type TestUseCase = SubscriptionUseCase<
        MockSubscriptionRepository,
        MockPlanRepository,
        MockUserRepository,
        MockPaymentGateway,
    >;

    fn usecase(
        subscription_repository: MockSubscriptionRepository,
        plan_repository: MockPlanRepository,
        user_repository: MockUserRepository,
        payment_gateway: MockPaymentGateway,
    ) -> TestUseCase {
        SubscriptionUseCase::new(
            Arc::new(subscription_repository),
            Arc::new(plan_repository),
            Arc::new(user_repository),
            Arc::new(payment_gateway),
        )
    }

    fn plan_repository_with(plan: crates::domain::entities::plans::PlanEntity) -> MockPlanRepository {
        let mut plan_repository = MockPlanRepository::new();
        plan_repository
            .expect_find_by_id()
            .with(eq(plan.id))
            .returning(move |_| {
                let plan = plan.clone();
                Box::pin(async move { Ok(Some(plan)) })
            });
        plan_repository
    }

    fn not_subscribed(subscription_repository: &mut MockSubscriptionRepository) {
        subscription_repository
            .expect_find_entitling_subscription()
            .returning(|_, _| Box::pin(async { Ok(None) }));
    }

    fn echo_create_exclusive(subscription_repository: &mut MockSubscriptionRepository) {
        subscription_repository
            .expect_create_exclusive()
            .returning(|entity, _| {
                let now = Utc::now();
                let stored = SubscriptionEntity {
                    id: Uuid::new_v4(),
                    client_id: entity.client_id,
                    plan_id: entity.plan_id,
                    starts_at: entity.starts_at,
                    ends_at: entity.ends_at,
                    status: entity.status,
                    provider_subscription_id: entity.provider_subscription_id,
                    created_at: now,
                    updated_at: now,
                };
                Box::pin(async move { Ok(Some(stored)) })
            });
    }

    fn client(user_id: Uuid) -> AuthUser {
        AuthUser {
            user_id,
            role: UserRole::Client,
        }
    }

    #[tokio::test]
    async fn free_plan_activates_for_a_year_without_gateway() {
        let client_id = Uuid::new_v4();
        let mut free = plan(1, 1, 1);
        free.price_minor = 0;
        let free_id = free.id;

        let mut subscription_repository = MockSubscriptionRepository::new();
        not_subscribed(&mut subscription_repository);
        echo_create_exclusive(&mut subscription_repository);

        let mut payment_gateway = MockPaymentGateway::new();
        payment_gateway.expect_create_subscription().never();

        let usecase = usecase(
            subscription_repository,
            plan_repository_with(free),
            MockUserRepository::new(),
            payment_gateway,
        );

        let response = usecase
            .subscribe(
                client_id,
                InsertSubscriptionModel {
                    plan_id: free_id,
                    payment_method_id: None,
                },
            )
            .await
            .unwrap();

        let subscription = response.subscription;
        assert_eq!(response.message, "Free plan activated");
        assert_eq!(subscription.status, SubscriptionStatus::Active);
        assert_eq!(subscription.provider_subscription_id, None);
        assert_eq!(
            subscription.starts_at.checked_add_months(Months::new(12)),
            Some(subscription.ends_at)
        );
    }

    #[tokio::test]
    async fn second_subscription_conflicts() {
        let client_id = Uuid::new_v4();
        let existing_plan = plan(1, 1, 1);
        let existing = active_subscription(client_id, &existing_plan);
        let target = plan(2, 2, 2);
        let target_id = target.id;

        let mut subscription_repository = MockSubscriptionRepository::new();
        subscription_repository
            .expect_find_entitling_subscription()
            .with(eq(client_id), always())
            .returning(move |_, _| {
                let row = (existing.clone(), existing_plan.clone());
                Box::pin(async move { Ok(Some(row)) })
            });
        subscription_repository.expect_create_exclusive().never();

        let usecase = usecase(
            subscription_repository,
            plan_repository_with(target),
            MockUserRepository::new(),
            MockPaymentGateway::new(),
        );

        let result = usecase
            .subscribe(
                client_id,
                InsertSubscriptionModel {
                    plan_id: target_id,
                    payment_method_id: Some("pm_card_visa".to_string()),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Conflict(message)) if message == "Client already has an active subscription"));
    }

    #[tokio::test]
    async fn paid_plan_stores_gateway_period() {
        let client_id = Uuid::new_v4();
        let paid = plan(3, 10, 5);
        let paid_id = paid.id;
        let period_start = Utc::now();
        let period_end = period_start + Duration::days(30);

        let mut subscription_repository = MockSubscriptionRepository::new();
        not_subscribed(&mut subscription_repository);
        echo_create_exclusive(&mut subscription_repository);

        let mut user_repository = MockUserRepository::new();
        user_repository
            .expect_find_by_id()
            .returning(move |_| Box::pin(async move { Ok(Some(client_user(client_id, Some("cus_1")))) }));

        let mut payment_gateway = MockPaymentGateway::new();
        payment_gateway
            .expect_create_subscription()
            .with(eq("cus_1"), eq("price_123"), eq("pm_card_visa"))
            .returning(move |_, _, _| {
                Box::pin(async move {
                    Ok(GatewaySubscription {
                        id: "sub_1".to_string(),
                        status: "active".to_string(),
                        period_start,
                        period_end,
                    })
                })
            });

        let usecase = usecase(
            subscription_repository,
            plan_repository_with(paid),
            user_repository,
            payment_gateway,
        );

        let response = usecase
            .subscribe(
                client_id,
                InsertSubscriptionModel {
                    plan_id: paid_id,
                    payment_method_id: Some("pm_card_visa".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(response.subscription.starts_at, period_start);
        assert_eq!(response.subscription.ends_at, period_end);
        assert_eq!(response.subscription.provider_subscription_id.as_deref(), Some("sub_1"));
    }

    #[tokio::test]
    async fn unpaid_gateway_subscription_is_not_stored() {
        let client_id = Uuid::new_v4();
        let paid = plan(3, 10, 5);
        let paid_id = paid.id;

        let mut subscription_repository = MockSubscriptionRepository::new();
        not_subscribed(&mut subscription_repository);
        subscription_repository.expect_create_exclusive().never();

        let mut user_repository = MockUserRepository::new();
        user_repository
            .expect_find_by_id()
            .returning(move |_| Box::pin(async move { Ok(Some(client_user(client_id, Some("cus_1")))) }));

        let mut payment_gateway = MockPaymentGateway::new();
        payment_gateway.expect_create_subscription().returning(|_, _, _| {
            Box::pin(async {
                let now = Utc::now();
                Ok(GatewaySubscription {
                    id: "sub_2".to_string(),
                    status: "incomplete".to_string(),
                    period_start: now,
                    period_end: now,
                })
            })
        });
        payment_gateway
            .expect_cancel_subscription()
            .with(eq("sub_2"))
            .times(1)
            .returning(|_| Box::pin(async { Ok(()) }));

        let usecase = usecase(
            subscription_repository,
            plan_repository_with(paid),
            user_repository,
            payment_gateway,
        );

        let result = usecase
            .subscribe(
                client_id,
                InsertSubscriptionModel {
                    plan_id: paid_id,
                    payment_method_id: Some("pm_card_visa".to_string()),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(message)) if message == "Payment was not completed"));
    }

    fn paying_gateway(provider_subscription_id: &'static str) -> MockPaymentGateway {
        let mut payment_gateway = MockPaymentGateway::new();
        payment_gateway.expect_create_subscription().returning(move |_, _, _| {
            Box::pin(async move {
                let now = Utc::now();
                Ok(GatewaySubscription {
                    id: provider_subscription_id.to_string(),
                    status: "active".to_string(),
                    period_start: now,
                    period_end: now + Duration::days(30),
                })
            })
        });
        payment_gateway
            .expect_cancel_subscription()
            .with(eq(provider_subscription_id))
            .times(1)
            .returning(|_| Box::pin(async { Ok(()) }));
        payment_gateway
    }

    fn customer_on_file(client_id: Uuid) -> MockUserRepository {
        let mut user_repository = MockUserRepository::new();
        user_repository
            .expect_find_by_id()
            .returning(move |_| Box::pin(async move { Ok(Some(client_user(client_id, Some("cus_1")))) }));
        user_repository
    }

    #[tokio::test]
    async fn storage_failure_releases_gateway_subscription() {
        let client_id = Uuid::new_v4();
        let paid = plan(3, 10, 5);
        let paid_id = paid.id;

        let mut subscription_repository = MockSubscriptionRepository::new();
        not_subscribed(&mut subscription_repository);
        subscription_repository
            .expect_create_exclusive()
            .times(1)
            .returning(|_, _| Box::pin(async { Err(anyhow::anyhow!("deadlock detected")) }));

        let usecase = usecase(
            subscription_repository,
            plan_repository_with(paid),
            customer_on_file(client_id),
            paying_gateway("sub_3"),
        );

        let result = usecase
            .subscribe(
                client_id,
                InsertSubscriptionModel {
                    plan_id: paid_id,
                    payment_method_id: Some("pm_card_visa".to_string()),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[tokio::test]
    async fn lost_subscribe_race_releases_gateway_subscription() {
        let client_id = Uuid::new_v4();
        let paid = plan(3, 10, 5);
        let paid_id = paid.id;

        let mut subscription_repository = MockSubscriptionRepository::new();
        not_subscribed(&mut subscription_repository);
        subscription_repository
            .expect_create_exclusive()
            .times(1)
            .returning(|_, _| Box::pin(async { Ok(None) }));

        let usecase = usecase(
            subscription_repository,
            plan_repository_with(paid),
            customer_on_file(client_id),
            paying_gateway("sub_4"),
        );

        let result = usecase
            .subscribe(
                client_id,
                InsertSubscriptionModel {
                    plan_id: paid_id,
                    payment_method_id: Some("pm_card_visa".to_string()),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Conflict(message)) if message == "Client already has an active subscription"));
    }

    #[tokio::test]
    async fn declined_card_surfaces_gateway_message() {
        let client_id = Uuid::new_v4();
        let paid = plan(3, 10, 5);
        let paid_id = paid.id;

        let mut subscription_repository = MockSubscriptionRepository::new();
        not_subscribed(&mut subscription_repository);

        let mut user_repository = MockUserRepository::new();
        user_repository
            .expect_find_by_id()
            .returning(move |_| Box::pin(async move { Ok(Some(client_user(client_id, Some("cus_1")))) }));

        let mut payment_gateway = MockPaymentGateway::new();
        payment_gateway.expect_create_subscription().returning(|_, _, _| {
            Box::pin(async { Err(GatewayError::Rejected("Your card was declined.".to_string())) })
        });

        let usecase = usecase(
            subscription_repository,
            plan_repository_with(paid),
            user_repository,
            payment_gateway,
        );

        let result = usecase
            .subscribe(
                client_id,
                InsertSubscriptionModel {
                    plan_id: paid_id,
                    payment_method_id: Some("pm_card_chargeDeclined".to_string()),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(message)) if message == "Your card was declined."));
    }

    #[tokio::test]
    async fn paid_plan_requires_payment_method() {
        let client_id = Uuid::new_v4();
        let paid = plan(3, 10, 5);
        let paid_id = paid.id;

        let mut subscription_repository = MockSubscriptionRepository::new();
        not_subscribed(&mut subscription_repository);

        let usecase = usecase(
            subscription_repository,
            plan_repository_with(paid),
            MockUserRepository::new(),
            MockPaymentGateway::new(),
        );

        let result = usecase
            .subscribe(
                client_id,
                InsertSubscriptionModel {
                    plan_id: paid_id,
                    payment_method_id: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn cancel_by_other_client_is_forbidden() {
        let owner_id = Uuid::new_v4();
        let owned_plan = plan(1, 1, 1);
        let subscription = active_subscription(owner_id, &owned_plan);
        let subscription_id = subscription.id;

        let mut subscription_repository = MockSubscriptionRepository::new();
        subscription_repository
            .expect_find_by_id()
            .returning(move |_| {
                let subscription = subscription.clone();
                Box::pin(async move { Ok(Some(subscription)) })
            });
        subscription_repository.expect_cancel().never();

        let usecase = usecase(
            subscription_repository,
            MockPlanRepository::new(),
            MockUserRepository::new(),
            MockPaymentGateway::new(),
        );

        let result = usecase
            .cancel_subscription(&client(Uuid::new_v4()), subscription_id)
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn cancel_calls_gateway_then_stores_cancelled() {
        let owner_id = Uuid::new_v4();
        let owned_plan = plan(1, 1, 1);
        let mut subscription = active_subscription(owner_id, &owned_plan);
        subscription.provider_subscription_id = Some("sub_9".to_string());
        let subscription_id = subscription.id;
        let mut cancelled = subscription.clone();
        cancelled.status = SubscriptionStatus::Cancelled.to_string();

        let mut subscription_repository = MockSubscriptionRepository::new();
        subscription_repository
            .expect_find_by_id()
            .returning(move |_| {
                let subscription = subscription.clone();
                Box::pin(async move { Ok(Some(subscription)) })
            });
        subscription_repository
            .expect_cancel()
            .with(eq(subscription_id))
            .times(1)
            .returning(move |_| {
                let cancelled = cancelled.clone();
                Box::pin(async move { Ok(Some(cancelled)) })
            });

        let mut payment_gateway = MockPaymentGateway::new();
        payment_gateway
            .expect_cancel_subscription()
            .with(eq("sub_9"))
            .times(1)
            .returning(|_| Box::pin(async { Ok(()) }));

        let usecase = usecase(
            subscription_repository,
            MockPlanRepository::new(),
            MockUserRepository::new(),
            payment_gateway,
        );

        let result = usecase
            .cancel_subscription(&client(owner_id), subscription_id)
            .await
            .unwrap();

        assert_eq!(result.status, SubscriptionStatus::Cancelled);
    }

    #[tokio::test]
    async fn cancel_of_lapsed_subscription_conflicts() {
        let owner_id = Uuid::new_v4();
        let owned_plan = plan(1, 1, 1);
        let now = Utc::now();
        let lapsed = subscription_with_window(
            owner_id,
            &owned_plan,
            now - Duration::days(40),
            now - Duration::days(10),
        );
        let subscription_id = lapsed.id;

        let mut subscription_repository = MockSubscriptionRepository::new();
        subscription_repository
            .expect_find_by_id()
            .returning(move |_| {
                let lapsed = lapsed.clone();
                Box::pin(async move { Ok(Some(lapsed)) })
            });

        let admin = AuthUser {
            user_id: Uuid::new_v4(),
            role: UserRole::Admin,
        };
        let usecase = usecase(
            subscription_repository,
            MockPlanRepository::new(),
            MockUserRepository::new(),
            MockPaymentGateway::new(),
        );

        let result = usecase.cancel_subscription(&admin, subscription_id).await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }
}
