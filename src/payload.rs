//! Gateway payload assembly: the exact field sets, names and generated
//! values the hosted-checkout and refund endpoints expect.

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use rand::Rng;
use serde::Serialize;

use crate::config::GatewayConfig;
use crate::domain::{minor_units, RefundRequest, TransactionRequest};
use crate::error::GatewayError;
use crate::validation::{
    strip_wrapping_quotes, validate_max_len, validate_positive_amount, validate_required,
    ValidationError, TXN_REF_NO_MAX_LEN,
};

pub const VERSION: &str = "2.0";
pub const LANGUAGE: &str = "EN";
pub const CURRENCY: &str = "PKR";
pub const IS_REGISTERED_CUSTOMER: &str = "No";
pub const DEFAULT_EXPIRY_DAYS: i64 = 1;
pub const DEFAULT_TIMEZONE: &str = "Asia/Karachi";

/// 14-digit local wall-clock format the gateway parses, YYYYMMDDHHmmss.
pub const DATE_TIME_FORMAT: &str = "%Y%m%d%H%M%S";

/// The complete field set of one checkout request. Every field is
/// always transmitted; optional business fields stay as empty strings
/// because dropping a key would shift the signed order on the gateway
/// side.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentPayload {
    #[serde(rename = "pp_Version")]
    pub version: String,
    #[serde(rename = "pp_TxnType")]
    pub txn_type: String,
    #[serde(rename = "pp_Language")]
    pub language: String,
    #[serde(rename = "pp_MerchantID")]
    pub merchant_id: String,
    #[serde(rename = "pp_SubMerchantID")]
    pub sub_merchant_id: String,
    #[serde(rename = "pp_Password")]
    pub password: String,
    #[serde(rename = "pp_TxnRefNo")]
    pub txn_ref_no: String,
    #[serde(rename = "pp_Amount")]
    pub amount: String,
    #[serde(rename = "pp_TxnCurrency")]
    pub currency: String,
    #[serde(rename = "pp_TxnDateTime")]
    pub txn_date_time: String,
    #[serde(rename = "pp_BillReference")]
    pub bill_reference: String,
    #[serde(rename = "pp_Description")]
    pub description: String,
    #[serde(rename = "pp_IsRegisteredCustomer")]
    pub is_registered_customer: String,
    #[serde(rename = "pp_BankID")]
    pub bank_id: String,
    #[serde(rename = "pp_ProductID")]
    pub product_id: String,
    #[serde(rename = "pp_TxnExpiryDateTime")]
    pub txn_expiry_date_time: String,
    #[serde(rename = "pp_ReturnURL")]
    pub return_url: String,
    #[serde(rename = "ppmpf_1")]
    pub ppmpf_1: String,
    #[serde(rename = "ppmpf_2")]
    pub ppmpf_2: String,
    #[serde(rename = "ppmpf_3")]
    pub ppmpf_3: String,
    #[serde(rename = "ppmpf_4")]
    pub ppmpf_4: String,
    #[serde(rename = "ppmpf_5")]
    pub ppmpf_5: String,
    /// Filled by the signer after assembly; empty until then.
    #[serde(rename = "pp_SecureHash")]
    pub secure_hash: String,
}

impl PaymentPayload {
    /// Assembles the outgoing field set for one checkout attempt.
    /// Fails fast on any precondition violation; no partial payload is
    /// ever returned.
    pub fn build(
        request: &TransactionRequest,
        config: &GatewayConfig,
    ) -> Result<Self, GatewayError> {
        config.validate()?;
        validate_positive_amount(&request.amount)?;
        validate_required("bill_reference", &request.bill_reference)?;
        validate_required("description", &request.description)?;

        let amount = minor_units(&request.amount)
            .ok_or_else(|| ValidationError::new("amount", "does not fit in minor units"))?;

        let tz = config.timezone()?;
        let now = Utc::now().with_timezone(&tz);
        let expiry = now + Duration::days(config.txn_expiry_days);
        let txn_date_time = now.format(DATE_TIME_FORMAT).to_string();

        let [p1, p2, p3, p4, p5] = request.passthrough.clone();

        Ok(PaymentPayload {
            version: VERSION.to_string(),
            txn_type: String::new(),
            language: LANGUAGE.to_string(),
            merchant_id: config.merchant_id.clone(),
            sub_merchant_id: String::new(),
            password: config.password.clone(),
            txn_ref_no: generate_txn_ref_no(&now),
            amount: amount.to_string(),
            currency: CURRENCY.to_string(),
            txn_date_time,
            bill_reference: request.bill_reference.clone(),
            description: strip_wrapping_quotes(&request.description).to_string(),
            is_registered_customer: IS_REGISTERED_CUSTOMER.to_string(),
            bank_id: String::new(),
            product_id: String::new(),
            txn_expiry_date_time: expiry.format(DATE_TIME_FORMAT).to_string(),
            return_url: config.return_url.clone(),
            ppmpf_1: p1,
            ppmpf_2: p2,
            ppmpf_3: p3,
            ppmpf_4: p4,
            ppmpf_5: p5,
            secure_hash: String::new(),
        })
    }

    /// Values covered by the secure hash, in the gateway's fixed signing
    /// order. `pp_SecureHash` itself is never an input. See
    /// [`crate::signature::SIGNED_FIELD_ORDER`] for the matching names.
    pub fn signed_values(&self) -> [&str; 21] {
        [
            &self.amount,
            &self.bank_id,
            &self.bill_reference,
            &self.description,
            &self.is_registered_customer,
            &self.language,
            &self.merchant_id,
            &self.password,
            &self.product_id,
            &self.return_url,
            &self.currency,
            &self.txn_date_time,
            &self.txn_expiry_date_time,
            &self.txn_ref_no,
            &self.txn_type,
            &self.version,
            &self.ppmpf_1,
            &self.ppmpf_2,
            &self.ppmpf_3,
            &self.ppmpf_4,
            &self.ppmpf_5,
        ]
    }

    /// Name/value pairs in the declared payload order, used for form
    /// rendering. `pp_SecureHash` comes last.
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("pp_Version", &self.version),
            ("pp_TxnType", &self.txn_type),
            ("pp_Language", &self.language),
            ("pp_MerchantID", &self.merchant_id),
            ("pp_SubMerchantID", &self.sub_merchant_id),
            ("pp_Password", &self.password),
            ("pp_TxnRefNo", &self.txn_ref_no),
            ("pp_Amount", &self.amount),
            ("pp_TxnCurrency", &self.currency),
            ("pp_TxnDateTime", &self.txn_date_time),
            ("pp_BillReference", &self.bill_reference),
            ("pp_Description", &self.description),
            ("pp_IsRegisteredCustomer", &self.is_registered_customer),
            ("pp_BankID", &self.bank_id),
            ("pp_ProductID", &self.product_id),
            ("pp_TxnExpiryDateTime", &self.txn_expiry_date_time),
            ("pp_ReturnURL", &self.return_url),
            ("ppmpf_1", &self.ppmpf_1),
            ("ppmpf_2", &self.ppmpf_2),
            ("ppmpf_3", &self.ppmpf_3),
            ("ppmpf_4", &self.ppmpf_4),
            ("ppmpf_5", &self.ppmpf_5),
            ("pp_SecureHash", &self.secure_hash),
        ]
    }
}

/// Refund field set. Disjoint from the checkout payload; the struct
/// declaration order is also the signing order.
#[derive(Debug, Clone, Serialize)]
pub struct RefundPayload {
    #[serde(rename = "pp_TxnRefNo")]
    pub txn_ref_no: String,
    #[serde(rename = "pp_Amount")]
    pub amount: String,
    #[serde(rename = "pp_TxnCurrency")]
    pub currency: String,
    #[serde(rename = "pp_MerchantID")]
    pub merchant_id: String,
    #[serde(rename = "pp_MerchantMPIN")]
    pub mpin: String,
    #[serde(rename = "pp_Password")]
    pub password: String,
    #[serde(rename = "pp_SecureHash")]
    pub secure_hash: String,
}

impl RefundPayload {
    pub fn build(request: &RefundRequest, config: &GatewayConfig) -> Result<Self, GatewayError> {
        config.validate()?;
        if config.mpin.trim().is_empty() {
            return Err(GatewayError::Configuration { field: "mpin" });
        }
        validate_required("txn_ref_no", &request.txn_ref_no)?;
        validate_max_len("txn_ref_no", &request.txn_ref_no, TXN_REF_NO_MAX_LEN)?;
        validate_positive_amount(&request.amount)?;

        let amount = minor_units(&request.amount)
            .ok_or_else(|| ValidationError::new("amount", "does not fit in minor units"))?;

        Ok(RefundPayload {
            txn_ref_no: request.txn_ref_no.clone(),
            amount: amount.to_string(),
            currency: CURRENCY.to_string(),
            merchant_id: config.merchant_id.clone(),
            mpin: config.mpin.clone(),
            password: config.password.clone(),
            secure_hash: String::new(),
        })
    }

    /// Values in declared order, excluding the hash itself.
    pub fn signed_values(&self) -> [&str; 6] {
        [
            &self.txn_ref_no,
            &self.amount,
            &self.currency,
            &self.merchant_id,
            &self.mpin,
            &self.password,
        ]
    }
}

/// Transaction references are `TR` + local timestamp + a short random
/// suffix: unique per attempt, alphanumeric, never longer than 20
/// characters.
fn generate_txn_ref_no(now: &DateTime<Tz>) -> String {
    let suffix: u8 = rand::thread_rng().gen_range(10..=100);
    format!("TR{}{}", now.format(DATE_TIME_FORMAT), suffix)
}
