use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// The provider refused the request for a reason the client can fix (declined card, bad
    /// payment method). The message is safe to show.
    #[error("{0}")]
    Rejected(String),
    #[error("payment gateway unavailable: {0}")]
    Unavailable(#[from] anyhow::Error),
}

pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

#[derive(Debug, Clone, PartialEq)]
pub struct GatewaySubscription {
    pub id: String,
    pub status: String,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
}

impl GatewaySubscription {
    /// Only these provider states count as paid.
    pub fn is_paid(&self) -> bool {
        matches!(self.status.as_str(), "active" | "trialing")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GatewayPaymentIntent {
    pub id: String,
    pub status: String,
    pub card_last4: Option<String>,
    pub card_brand: Option<String>,
}

impl GatewayPaymentIntent {
    pub fn is_succeeded(&self) -> bool {
        self.status == "succeeded"
    }
}

#[async_trait]
#[automock]
pub trait PaymentGateway {
    async fn create_customer(
        &self,
        email: &str,
        name: &str,
        user_id: Uuid,
    ) -> GatewayResult<String>;

    async fn create_subscription(
        &self,
        customer_id: &str,
        price_id: &str,
        payment_method_id: &str,
    ) -> GatewayResult<GatewaySubscription>;

    async fn cancel_subscription(&self, provider_subscription_id: &str) -> GatewayResult<()>;

    async fn create_payment_intent(
        &self,
        amount_minor: i64,
        currency: &str,
        customer_id: &str,
        payment_method_id: &str,
    ) -> GatewayResult<GatewayPaymentIntent>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_active_and_trialing_are_paid() {
        let now = Utc::now();
        let subscription = |status: &str| GatewaySubscription {
            id: "sub_123".to_string(),
            status: status.to_string(),
            period_start: now,
            period_end: now,
        };

        assert!(subscription("active").is_paid());
        assert!(subscription("trialing").is_paid());
        assert!(!subscription("incomplete").is_paid());
        assert!(!subscription("past_due").is_paid());
    }
}
