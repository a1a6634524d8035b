use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{
    StatusCode,
    header::{AUTHORIZATION, CONTENT_TYPE},
};
use serde::Deserialize;
use tracing::error;
use uuid::Uuid;

use super::gateway::{
    GatewayError, GatewayPaymentIntent, GatewayResult, GatewaySubscription, PaymentGateway,
};

const STRIPE_API_BASE: &str = "https://api.stripe.com/v1";
const STRIPE_TIMEOUT: Duration = Duration::from_secs(30);

/// Minimal Stripe client built on reqwest.
pub struct StripeClient {
    http: reqwest::Client,
    secret_key: String,
}

#[derive(Debug, Deserialize)]
struct StripeErrorEnvelope {
    error: StripeErrorDetails,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetails {
    #[serde(rename = "type")]
    type_: Option<String>,
    code: Option<String>,
    message: Option<String>,
    decline_code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeSubscription {
    id: String,
    status: String,
    current_period_start: Option<i64>,
    current_period_end: Option<i64>,
    #[serde(default)]
    items: StripeSubscriptionItems,
}

#[derive(Debug, Deserialize, Default)]
struct StripeSubscriptionItems {
    data: Vec<StripeSubscriptionItem>,
}

#[derive(Debug, Deserialize)]
struct StripeSubscriptionItem {
    current_period_start: Option<i64>,
    current_period_end: Option<i64>,
}

impl StripeSubscription {
    /// Newer API versions only report the period on the subscription items.
    fn period_start(&self) -> Option<i64> {
        self.current_period_start.or_else(|| {
            self.items
                .data
                .first()
                .and_then(|item| item.current_period_start)
        })
    }

    fn period_end(&self) -> Option<i64> {
        self.current_period_end.or_else(|| {
            self.items
                .data
                .first()
                .and_then(|item| item.current_period_end)
        })
    }
}

#[derive(Debug, Deserialize)]
struct StripePaymentIntent {
    id: String,
    status: String,
    latest_charge: Option<StripeCharge>,
}

#[derive(Debug, Deserialize)]
struct StripeCharge {
    payment_method_details: Option<StripePaymentMethodDetails>,
}

#[derive(Debug, Deserialize)]
struct StripePaymentMethodDetails {
    card: Option<StripeCard>,
}

#[derive(Debug, Deserialize)]
struct StripeCard {
    last4: Option<String>,
    brand: Option<String>,
}

fn timestamp(secs: Option<i64>, field: &str) -> GatewayResult<DateTime<Utc>> {
    secs.and_then(|secs| DateTime::from_timestamp(secs, 0))
        .ok_or_else(|| GatewayError::Unavailable(anyhow!("stripe subscription missing {}", field)))
}

impl StripeClient {
    pub fn new(secret_key: String) -> Self {
        let http = reqwest::Client::builder()
            .timeout(STRIPE_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self { http, secret_key }
    }

    async fn post_form<T>(&self, path: &str, body: &[(&str, String)], context: &str) -> GatewayResult<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let resp = self
            .http
            .post(format!("{}{}", STRIPE_API_BASE, path))
            .header(AUTHORIZATION, format!("Bearer {}", self.secret_key))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .form(body)
            .send()
            .await
            .map_err(|err| GatewayError::Unavailable(err.into()))?;

        let resp = Self::ensure_success(resp, context).await?;

        resp.json::<T>()
            .await
            .map_err(|err| GatewayError::Unavailable(err.into()))
    }

    /// Card and request errors become `Rejected` with Stripe's message; everything else is
    /// logged and reported as `Unavailable`.
    async fn ensure_success(
        resp: reqwest::Response,
        context: &str,
    ) -> GatewayResult<reqwest::Response> {
        if resp.status().is_success() {
            return Ok(resp);
        }

        let status = resp.status();
        let request_id = resp
            .headers()
            .get("request-id")
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let body = match resp.text().await {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => "<empty response body>".to_string(),
            Err(err) => format!("<failed to read response body: {err}>"),
        };

        let details = serde_json::from_str::<StripeErrorEnvelope>(&body)
            .ok()
            .map(|envelope| envelope.error);

        error!(
            status = %status,
            stripe_request_id = ?request_id,
            stripe_error_type = ?details.as_ref().and_then(|d| d.type_.clone()),
            stripe_error_code = ?details.as_ref().and_then(|d| d.code.clone()),
            stripe_decline_code = ?details.as_ref().and_then(|d| d.decline_code.clone()),
            context = %context,
            "stripe: api request failed"
        );

        let client_caused = matches!(status, StatusCode::BAD_REQUEST | StatusCode::PAYMENT_REQUIRED);
        match details.and_then(|d| d.message) {
            Some(message) if client_caused => Err(GatewayError::Rejected(message)),
            _ => Err(GatewayError::Unavailable(anyhow!(
                "Stripe API request failed: {} (status {}, request_id={:?})",
                context,
                status,
                request_id
            ))),
        }
    }
}

#[async_trait]
impl PaymentGateway for StripeClient {
    async fn create_customer(
        &self,
        email: &str,
        name: &str,
        user_id: Uuid,
    ) -> GatewayResult<String> {
        #[derive(Deserialize)]
        struct CustomerResp {
            id: String,
        }

        let body = [
            ("email", email.to_string()),
            ("name", name.to_string()),
            ("metadata[user_id]", user_id.to_string()),
        ];
        let customer: CustomerResp = self.post_form("/customers", &body, "create customer").await?;

        Ok(customer.id)
    }

    async fn create_subscription(
        &self,
        customer_id: &str,
        price_id: &str,
        payment_method_id: &str,
    ) -> GatewayResult<GatewaySubscription> {
        #[derive(Deserialize)]
        struct PaymentMethodResp {
            #[allow(dead_code)]
            id: String,
        }

        // The method must belong to the customer before it can be the default.
        let attach = [("customer", customer_id.to_string())];
        let _: PaymentMethodResp = self
            .post_form(
                &format!("/payment_methods/{}/attach", payment_method_id),
                &attach,
                "attach payment method",
            )
            .await?;

        let body = [
            ("customer", customer_id.to_string()),
            ("items[0][price]", price_id.to_string()),
            ("default_payment_method", payment_method_id.to_string()),
            ("expand[]", "latest_invoice.payment_intent".to_string()),
        ];
        let subscription: StripeSubscription = self
            .post_form("/subscriptions", &body, "create subscription")
            .await?;

        Ok(GatewaySubscription {
            period_start: timestamp(subscription.period_start(), "current_period_start")?,
            period_end: timestamp(subscription.period_end(), "current_period_end")?,
            id: subscription.id,
            status: subscription.status,
        })
    }

    async fn cancel_subscription(&self, provider_subscription_id: &str) -> GatewayResult<()> {
        let resp = self
            .http
            .delete(format!(
                "{}/subscriptions/{}",
                STRIPE_API_BASE, provider_subscription_id
            ))
            .header(AUTHORIZATION, format!("Bearer {}", self.secret_key))
            .send()
            .await
            .map_err(|err| GatewayError::Unavailable(err.into()))?;
        Self::ensure_success(resp, "cancel subscription").await?;

        Ok(())
    }

    async fn create_payment_intent(
        &self,
        amount_minor: i64,
        currency: &str,
        customer_id: &str,
        payment_method_id: &str,
    ) -> GatewayResult<GatewayPaymentIntent> {
        let body = [
            ("amount", amount_minor.to_string()),
            ("currency", currency.to_string()),
            ("customer", customer_id.to_string()),
            ("payment_method", payment_method_id.to_string()),
            ("off_session", "true".to_string()),
            ("confirm", "true".to_string()),
            ("expand[]", "latest_charge".to_string()),
        ];
        let intent: StripePaymentIntent = self
            .post_form("/payment_intents", &body, "create payment intent")
            .await?;

        let card = intent
            .latest_charge
            .and_then(|charge| charge.payment_method_details)
            .and_then(|details| details.card);

        Ok(GatewayPaymentIntent {
            id: intent.id,
            status: intent.status,
            card_last4: card.as_ref().and_then(|card| card.last4.clone()),
            card_brand: card.and_then(|card| card.brand),
        })
    }
}
