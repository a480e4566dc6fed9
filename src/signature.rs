//! Canonical-order HMAC-SHA256 signing for outbound payloads and
//! constant-time verification of inbound gateway callbacks.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::collections::HashMap;

use crate::error::GatewayError;
use crate::payload::{PaymentPayload, RefundPayload};

type HmacSha256 = Hmac<Sha256>;

/// Field names covered by the checkout secure hash, in the exact order
/// the gateway recomputes it. This order is part of the wire contract
/// and is not the payload's declared order.
pub const SIGNED_FIELD_ORDER: [&str; 21] = [
    "pp_Amount",
    "pp_BankID",
    "pp_BillReference",
    "pp_Description",
    "pp_IsRegisteredCustomer",
    "pp_Language",
    "pp_MerchantID",
    "pp_Password",
    "pp_ProductID",
    "pp_ReturnURL",
    "pp_TxnCurrency",
    "pp_TxnDateTime",
    "pp_TxnExpiryDateTime",
    "pp_TxnRefNo",
    "pp_TxnType",
    "pp_Version",
    "ppmpf_1",
    "ppmpf_2",
    "ppmpf_3",
    "ppmpf_4",
    "ppmpf_5",
];

pub const SECURE_HASH_FIELD: &str = "pp_SecureHash";

/// Values the gateway leaves out of the signed string. The "undefined"
/// literal is inherited from the upstream wire contract and must keep
/// skipping, or sparse payloads hash differently on the two sides.
fn is_skipped(value: &str) -> bool {
    value.is_empty() || value == "undefined"
}

/// The signed message starts with the hash key itself; every kept value
/// follows, each preceded by a literal `&`.
fn assemble_message<'a>(hash_key: &str, values: impl IntoIterator<Item = &'a str>) -> String {
    let mut message = String::from(hash_key);
    for value in values {
        if !is_skipped(value) {
            message.push('&');
            message.push_str(value);
        }
    }
    message
}

fn hmac_hex(key: &str, message: &str) -> Result<String, GatewayError> {
    let mut mac = HmacSha256::new_from_slice(key.as_bytes())
        .map_err(|_| GatewayError::Configuration { field: "hash_key" })?;
    mac.update(message.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Computes `pp_SecureHash` for a checkout payload: HMAC-SHA256 over
/// the canonical message, keyed by the shared hash key, lowercase hex.
/// Deterministic for fixed inputs.
pub fn sign_payment(payload: &PaymentPayload, hash_key: &str) -> Result<String, GatewayError> {
    let message = assemble_message(hash_key, payload.signed_values());
    hmac_hex(hash_key, &message)
}

/// Validates an inbound callback's `pp_SecureHash` claim against the
/// recomputed value. Absent fields count as empty (and are skipped),
/// and the comparison is constant-time. Any mismatch, malformed claim,
/// or missing claim rejects.
pub fn verify_callback(
    fields: &HashMap<String, String>,
    hash_key: &str,
) -> Result<(), GatewayError> {
    let claimed = fields
        .get(SECURE_HASH_FIELD)
        .map(String::as_str)
        .unwrap_or_default();
    if claimed.is_empty() {
        return Err(GatewayError::SignatureMismatch);
    }
    let claimed = hex::decode(claimed).map_err(|_| GatewayError::SignatureMismatch)?;

    let values = SIGNED_FIELD_ORDER
        .iter()
        .map(|name| fields.get(*name).map(String::as_str).unwrap_or_default());
    let message = assemble_message(hash_key, values);

    let mut mac = HmacSha256::new_from_slice(hash_key.as_bytes())
        .map_err(|_| GatewayError::Configuration { field: "hash_key" })?;
    mac.update(message.as_bytes());
    mac.verify_slice(&claimed)
        .map_err(|_| GatewayError::SignatureMismatch)
}

/// Computes `pp_SecureHash` for a refund payload. The message has the
/// same shape as the checkout one, but the HMAC key is the
/// concatenation of the kept field values themselves, not the shared
/// hash key. The refund endpoint accepts exactly this scheme, so it is
/// reproduced as-is rather than aligned with [`sign_payment`].
pub fn sign_refund(payload: &RefundPayload, hash_key: &str) -> Result<String, GatewayError> {
    let kept: Vec<&str> = payload
        .signed_values()
        .into_iter()
        .filter(|value| !is_skipped(value))
        .collect();
    let message = assemble_message(hash_key, kept.iter().copied());
    hmac_hex(&kept.concat(), &message)
}
