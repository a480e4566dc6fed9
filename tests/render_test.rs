use bigdecimal::BigDecimal;

use jazzcash_gateway::payload::{DEFAULT_EXPIRY_DAYS, DEFAULT_TIMEZONE};
use jazzcash_gateway::render::{checkout_form, checkout_page};
use jazzcash_gateway::{ApiMode, GatewayConfig, PaymentPayload, TransactionRequest};

fn sandbox_config() -> GatewayConfig {
    GatewayConfig {
        mode: ApiMode::Sandbox,
        api_url: String::new(),
        sandbox_api_url:
            "https://sandbox.jazzcash.com.pk/CustomerPortal/transactionmanagement/merchantform"
                .to_string(),
        refund_api_url: String::new(),
        sandbox_refund_api_url: String::new(),
        merchant_id: "MC10001".to_string(),
        password: "t4d2s0e9h1".to_string(),
        hash_key: "z9s8t7u6v5".to_string(),
        mpin: String::new(),
        return_url: "https://merchant.example.com/payment/return".to_string(),
        timezone: DEFAULT_TIMEZONE.to_string(),
        txn_expiry_days: DEFAULT_EXPIRY_DAYS,
    }
}

fn build_payload(description: &str) -> PaymentPayload {
    let request = TransactionRequest::new(BigDecimal::from(100), "BILL-123", description);
    PaymentPayload::build(&request, &sandbox_config()).unwrap()
}

#[test]
fn form_posts_every_field_to_the_endpoint() {
    let payload = build_payload("Test Product");
    let html = checkout_form(&payload, sandbox_config().endpoint()).into_string();

    assert!(html.contains(r#"form id="jc-params""#));
    assert!(html.contains(r#"method="post""#));
    assert!(html.contains("https://sandbox.jazzcash.com.pk"));
    assert_eq!(html.matches(r#"type="hidden""#).count(), payload.fields().len());
    assert!(html.contains(r#"name="pp_Amount" id="pp_Amount" value="10000""#));
}

#[test]
fn form_submits_itself_on_load() {
    let payload = build_payload("Test Product");
    let html = checkout_form(&payload, sandbox_config().endpoint()).into_string();

    assert!(html.contains("DOMContentLoaded"));
    assert!(html.contains(r#"document.getElementById("jc-params").submit()"#));
}

#[test]
fn markup_escapes_special_characters_in_values() {
    let payload = build_payload(r#"Tom & "Jerry" <evil> it's fine"#);
    let html = checkout_form(&payload, sandbox_config().endpoint()).into_string();

    assert!(html.contains("Tom &amp; &quot;Jerry&quot; &lt;evil&gt; it&#x27;s fine"));
    assert!(!html.contains("<evil>"));
    assert!(!html.contains(r#""Jerry""#));
}

#[test]
fn page_is_a_complete_html_document() {
    let payload = build_payload("Test Product");
    let html = checkout_page(&payload, sandbox_config().endpoint()).into_string();

    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<body>"));
    assert!(html.contains(r#"form id="jc-params""#));
}

#[test]
fn endpoint_url_is_escaped_in_the_action_attribute() {
    let payload = build_payload("Test Product");
    let html = checkout_form(&payload, "https://gateway.example.com/pay?a=1&b=2").into_string();

    assert!(html.contains("https://gateway.example.com/pay?a=1&amp;b=2"));
}
