use crates::{
    domain::{
        entities::payments::{InsertPaymentEntity, PaymentEntity},
        repositories::{
            payments::PaymentRepository, subscriptions::SubscriptionRepository,
            users::UserRepository,
        },
        value_objects::{
            enums::payment_statuses::PaymentStatus,
            ownership::is_owner_or_admin,
            pagination::{PageQuery, Paginated},
            payments::{InsertPaymentModel, PaymentModel},
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

pub struct PaymentUseCase<P, S, U, G>
where
    P: PaymentRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    G: PaymentGateway + Send + Sync + 'static,
{
    payment_repository: Arc<P>,
    subscription_repository: Arc<S>,
    user_repository: Arc<U>,
    payment_gateway: Arc<G>,
    currency: String,
}

impl<P, S, U, G> PaymentUseCase<P, S, U, G>
where
    P: PaymentRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    G: PaymentGateway + Send + Sync + 'static,
{
    pub fn new(
        payment_repository: Arc<P>,
        subscription_repository: Arc<S>,
        user_repository: Arc<U>,
        payment_gateway: Arc<G>,
        currency: String,
    ) -> Self {
        Self {
            payment_repository,
            subscription_repository,
            user_repository,
            payment_gateway,
            currency,
        }
    }

    pub async fn create_payment(
        &self,
        auth: &AuthUser,
        insert_payment_model: InsertPaymentModel,
    ) -> AppResult<PaymentModel> {
        auth.require_client()?;
        let client_id = auth.user_id;

        if insert_payment_model.amount_minor <= 0 {
            return Err(AppError::BadRequest("amount_minor must be > 0".to_string()));
        }
        if insert_payment_model.payment_method_id.trim().is_empty() {
            return Err(AppError::BadRequest("payment_method_id is required".to_string()));
        }

        if let Some(subscription_id) = insert_payment_model.subscription_id {
            let subscription = self
                .subscription_repository
                .find_by_id(subscription_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Subscription not found".to_string()))?;

            if subscription.client_id != client_id {
                return Err(AppError::Forbidden("Access denied".to_string()));
            }
        }

        let (_, customer_id) = ensure_gateway_customer(
            self.user_repository.as_ref(),
            self.payment_gateway.as_ref(),
            client_id,
        )
        .await?;

        let intent = self
            .payment_gateway
            .create_payment_intent(
                insert_payment_model.amount_minor,
                &self.currency,
                &customer_id,
                &insert_payment_model.payment_method_id,
            )
            .await
            .map_err(|err| {
                error!(%client_id, gateway_error = %err, "payments: payment intent failed");
                err
            })?;

        if !intent.is_succeeded() {
            warn!(
                %client_id,
                provider_payment_id = %intent.id,
                provider_status = %intent.status,
                "payments: payment intent not completed"
            );
            return Err(AppError::BadRequest("Payment was not completed".to_string()));
        }

        let insert_payment_entity = InsertPaymentEntity {
            client_id,
            subscription_id: insert_payment_model.subscription_id,
            amount_minor: insert_payment_model.amount_minor,
            currency: self.currency.clone(),
            status: PaymentStatus::Completed.to_string(),
            provider_payment_id: intent.id,
            card_last4: intent.card_last4,
            card_brand: intent.card_brand,
        };

        let payment = self
            .payment_repository
            .record_payment(insert_payment_entity)
            .await
            .map_err(|err| {
                // The charge went through; keep enough context to reconcile by hand.
                error!(%client_id, db_error = ?err, "payments: failed to record completed payment");
                err
            })?;

        info!(
            %client_id,
            payment_id = %payment.id,
            amount_minor = payment.amount_minor,
            "payments: recorded"
        );

        Ok(payment.into())
    }

    pub async fn list_payments(
        &self,
        auth: &AuthUser,
        query: &PageQuery,
    ) -> AppResult<Paginated<PaymentModel>> {
        let filter = query.to_filter(auth.owner_scope());
        let (payments, total) = self.payment_repository.list_payments(&filter).await?;

        Ok(Paginated::new(
            payments.into_iter().map(PaymentModel::from).collect(),
            total,
            query,
        ))
    }

    pub async fn get_payment(&self, auth: &AuthUser, payment_id: Uuid) -> AppResult<PaymentModel> {
        let payment: PaymentEntity = self
            .payment_repository
            .find_by_id(payment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Payment not found".to_string()))?;

        if !is_owner_or_admin(auth.role, auth.user_id, payment.client_id) {
            return Err(AppError::Forbidden("Access denied".to_string()));
        }

        Ok(payment.into())
    }
}
