//! Renders a signed payload as the auto-submitting form the customer's
//! browser posts to the gateway.

use maud::{html, Markup, PreEscaped, DOCTYPE};

use crate::payload::PaymentPayload;

const FORM_ID: &str = "jc-params";

/// Submits the form as soon as the document has loaded.
const AUTO_SUBMIT_SCRIPT: &str = r#"<script> window.addEventListener("DOMContentLoaded", function() { document.getElementById("jc-params").submit(); });</script>"#;

/// Escapes `&`, `<`, `>`, `"` and `'` in attribute values. Both quote
/// styles are escaped, as the gateway's own sample forms do.
fn attr(value: &str) -> PreEscaped<String> {
    PreEscaped(html_escape::encode_quoted_attribute(value).into_owned())
}

/// The gateway form fragment: one hidden input per payload field, in
/// the payload's declared order, plus a hidden submit control. Field
/// names and values match what the secure hash covers.
pub fn checkout_form(payload: &PaymentPayload, endpoint: &str) -> Markup {
    html! {
        div id="header" {
            form id=(FORM_ID) action=(attr(endpoint)) method="post" {
                @for (name, value) in payload.fields() {
                    input type="hidden" name=(name) id=(name) value=(attr(value));
                }
                input style="display:none;" type="submit" class="button jazzcash-submit" value="Submit";
                (PreEscaped(AUTO_SUBMIT_SCRIPT))
            }
        }
    }
}

/// Full HTML document wrapping [`checkout_form`], suitable for serving
/// directly as the checkout response body.
pub fn checkout_page(payload: &PaymentPayload, endpoint: &str) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { "Redirecting to JazzCash" }
            }
            body {
                (checkout_form(payload, endpoint))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_attribute_values() {
        let escaped = attr(r#"a & b <c> "d" 'e'"#).into_string();
        assert_eq!(escaped, "a &amp; b &lt;c&gt; &quot;d&quot; &#x27;e&#x27;");
    }

    #[test]
    fn leaves_plain_values_alone() {
        assert_eq!(attr("BILL-123").into_string(), "BILL-123");
    }
}
