use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;

use crate::config::GatewayConfig;
use crate::domain::{RefundRequest, TransactionRequest};
use crate::error::GatewayError;
use crate::payload::{PaymentPayload, RefundPayload};
use crate::utils::sanitize::sanitize_json;
use crate::{render, signature};

/// Result of preparing one checkout: the signed field set and the HTML
/// document whose form the customer's browser submits to the gateway.
#[derive(Debug, Clone)]
pub struct CheckoutPage {
    pub payload: PaymentPayload,
    pub html: String,
}

/// Client for the JazzCash hosted-checkout gateway. Built explicitly
/// from a [`GatewayConfig`]; holds no state beyond the configuration
/// and a connection pool, so one instance can be shared freely.
#[derive(Clone)]
pub struct GatewayClient {
    client: Client,
    config: GatewayConfig,
}

impl GatewayClient {
    /// Validates the configuration up front; a client is never
    /// constructed over an incomplete one.
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        config.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(GatewayClient { client, config })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Builds, signs and renders one checkout attempt.
    pub fn checkout(&self, request: &TransactionRequest) -> Result<CheckoutPage, GatewayError> {
        let mut payload = PaymentPayload::build(request, &self.config)?;
        payload.secure_hash = signature::sign_payment(&payload, &self.config.hash_key)?;

        tracing::info!(
            "Prepared checkout {} for {} minor units",
            payload.txn_ref_no,
            payload.amount
        );

        let html = render::checkout_page(&payload, self.config.endpoint()).into_string();
        Ok(CheckoutPage { payload, html })
    }

    /// Verifies an inbound gateway callback (return-URL post or status
    /// notification). Rejects on any mismatch; never fails open.
    pub fn verify_callback(&self, fields: &HashMap<String, String>) -> Result<(), GatewayError> {
        let result = signature::verify_callback(fields, &self.config.hash_key);
        if result.is_err() {
            tracing::warn!(
                "Callback verification failed for {}",
                fields
                    .get("pp_TxnRefNo")
                    .map(String::as_str)
                    .unwrap_or("<unknown txn>")
            );
        }
        result
    }

    /// Issues a refund against the original transaction reference and
    /// passes the gateway's raw JSON response through unmodified. Not
    /// retried here; transport failures are the caller's to retry.
    pub async fn refund(&self, request: &RefundRequest) -> Result<serde_json::Value, GatewayError> {
        let mut payload = RefundPayload::build(request, &self.config)?;
        payload.secure_hash = signature::sign_refund(&payload, &self.config.hash_key)?;

        let url = self.config.refund_endpoint();
        if url.trim().is_empty() {
            return Err(GatewayError::Configuration {
                field: "refund_api_url",
            });
        }

        if let Ok(body) = serde_json::to_value(&payload) {
            tracing::debug!("Sending refund request: {}", sanitize_json(&body));
        }

        let response = self.client.post(url).json(&payload).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!("Refund for {} rejected with status {}", payload.txn_ref_no, status);
            return Err(GatewayError::Gateway {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|_| GatewayError::Gateway {
            status: status.as_u16(),
            body,
        })
    }
}
