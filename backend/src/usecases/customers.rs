use crates::{
    domain::{entities::users::UserEntity, repositories::users::UserRepository},
    payments::gateway::PaymentGateway,
};
use tracing::{error, info};
use uuid::Uuid;

use crate::axum_http::error_responses::{AppError, AppResult};

/// Returns the user with a gateway customer id, creating and storing the customer on first use.
pub async fn ensure_gateway_customer<U, G>(
    user_repository: &U,
    payment_gateway: &G,
    user_id: Uuid,
) -> AppResult<(UserEntity, String)>
where
    U: UserRepository + Send + Sync + 'static,
    G: PaymentGateway + Send + Sync + 'static,
{
    let user = user_repository
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User no longer exists".to_string()))?;

    if let Some(customer_id) = user.stripe_customer_id.clone() {
        return Ok((user, customer_id));
    }

    let customer_id = payment_gateway
        .create_customer(&user.email, &user.username, user.id)
        .await
        .map_err(|err| {
            error!(%user_id, gateway_error = %err, "payments: failed to create gateway customer");
            err
        })?;

    user_repository
        .set_stripe_customer_id(user_id, &customer_id)
        .await
        .map_err(|err| {
            error!(%user_id, db_error = ?err, "payments: failed to store gateway customer");
            err
        })?;

    info!(%user_id, "payments: gateway customer created");

    Ok((user, customer_id))
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::Utc;
    use crates::domain::entities::users::UserEntity;
    use uuid::Uuid;

    pub fn client_user(user_id: Uuid, stripe_customer_id: Option<&str>) -> UserEntity {
        let now = Utc::now();
        UserEntity {
            id: user_id,
            email: "client@example.com".to_string(),
            password_hash: "$argon2id$stub".to_string(),
            username: "client".to_string(),
            phone: None,
            address: None,
            role: "client".to_string(),
            stripe_customer_id: stripe_customer_id.map(str::to_string),
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::client_user;
    use super::*;
    use crates::{
        domain::repositories::users::MockUserRepository, payments::gateway::MockPaymentGateway,
    };
    use mockall::predicate::eq;

    #[tokio::test]
    async fn reuses_stored_customer() {
        let user_id = Uuid::new_v4();
        let mut user_repository = MockUserRepository::new();
        user_repository
            .expect_find_by_id()
            .with(eq(user_id))
            .returning(move |_| Box::pin(async move { Ok(Some(client_user(user_id, Some("cus_1")))) }));
        let mut payment_gateway = MockPaymentGateway::new();
        payment_gateway.expect_create_customer().never();

        let (_, customer_id) = ensure_gateway_customer(&user_repository, &payment_gateway, user_id)
            .await
            .unwrap();

        assert_eq!(customer_id, "cus_1");
    }

    #[tokio::test]
    async fn creates_and_persists_missing_customer() {
        let user_id = Uuid::new_v4();
        let mut user_repository = MockUserRepository::new();
        user_repository
            .expect_find_by_id()
            .returning(move |_| Box::pin(async move { Ok(Some(client_user(user_id, None))) }));
        user_repository
            .expect_set_stripe_customer_id()
            .with(eq(user_id), eq("cus_new"))
            .times(1)
            .returning(|_, _| Box::pin(async { Ok(()) }));

        let mut payment_gateway = MockPaymentGateway::new();
        payment_gateway
            .expect_create_customer()
            .times(1)
            .returning(|_, _, _| Box::pin(async { Ok("cus_new".to_string()) }));

        let (_, customer_id) = ensure_gateway_customer(&user_repository, &payment_gateway, user_id)
            .await
            .unwrap();

        assert_eq!(customer_id, "cus_new");
    }
}
