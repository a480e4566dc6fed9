use dotenvy::dotenv;
use serde::Deserialize;
use std::env;
use url::Url;

use crate::error::GatewayError;
use crate::payload::{DEFAULT_EXPIRY_DAYS, DEFAULT_TIMEZONE};

/// Gateway environment selector. Anything that is not `production`
/// resolves to the sandbox, matching the gateway's onboarding default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiMode {
    Sandbox,
    Production,
}

impl ApiMode {
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("production") {
            ApiMode::Production
        } else {
            ApiMode::Sandbox
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct GatewayConfig {
    pub mode: ApiMode,
    pub api_url: String,
    pub sandbox_api_url: String,
    pub refund_api_url: String,
    pub sandbox_refund_api_url: String,
    pub merchant_id: String,
    pub password: String,
    pub hash_key: String,
    pub mpin: String,
    pub return_url: String,
    pub timezone: String,
    pub txn_expiry_days: i64,
}

impl GatewayConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok(); // Load .env file if present

        Ok(GatewayConfig {
            mode: ApiMode::parse(
                &env::var("JAZZCASH_PAYMENTMODE").unwrap_or_else(|_| "sandbox".to_string()),
            ),
            api_url: env::var("JAZZCASH_PRODUCTION_URL").unwrap_or_default(),
            sandbox_api_url: env::var("JAZZCASH_SANDBOX_URL").unwrap_or_default(),
            refund_api_url: env::var("JAZZCASH_REFUND_URL").unwrap_or_default(),
            sandbox_refund_api_url: env::var("JAZZCASH_SANDBOX_REFUND_URL").unwrap_or_default(),
            merchant_id: env::var("JAZZCASH_MERCHANTID").unwrap_or_default(),
            password: env::var("JAZZCASH_PASSWORD").unwrap_or_default(),
            hash_key: env::var("JAZZCASH_HASHKEY").unwrap_or_default(),
            mpin: env::var("JAZZCASH_MPIN").unwrap_or_default(),
            return_url: env::var("JAZZCASH_RETURNURL").unwrap_or_default(),
            timezone: env::var("JAZZCASH_TIMEZONE")
                .unwrap_or_else(|_| DEFAULT_TIMEZONE.to_string()),
            txn_expiry_days: DEFAULT_EXPIRY_DAYS,
        })
    }

    /// Checks that every value a payment request depends on is present.
    /// The first missing one is reported; nothing is built on top of an
    /// incomplete configuration.
    pub fn validate(&self) -> Result<(), GatewayError> {
        let required = [
            ("merchant_id", &self.merchant_id),
            ("password", &self.password),
            ("hash_key", &self.hash_key),
            ("return_url", &self.return_url),
        ];

        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(GatewayError::Configuration { field });
            }
        }

        if self.endpoint().trim().is_empty() {
            return Err(GatewayError::Configuration { field: "api_url" });
        }

        // The gateway redirects the customer's browser back here, so a
        // relative or malformed URL would strand the customer.
        if Url::parse(&self.return_url).is_err() {
            return Err(GatewayError::Configuration {
                field: "return_url",
            });
        }

        Ok(())
    }

    /// Checkout endpoint for the configured mode.
    pub fn endpoint(&self) -> &str {
        match self.mode {
            ApiMode::Sandbox => &self.sandbox_api_url,
            ApiMode::Production => &self.api_url,
        }
    }

    /// Refund API endpoint for the configured mode.
    pub fn refund_endpoint(&self) -> &str {
        match self.mode {
            ApiMode::Sandbox => &self.sandbox_refund_api_url,
            ApiMode::Production => &self.refund_api_url,
        }
    }

    pub fn timezone(&self) -> Result<chrono_tz::Tz, GatewayError> {
        self.timezone
            .parse()
            .map_err(|_| GatewayError::Configuration { field: "timezone" })
    }
}
