use serde_json::Value;

/// Sanitizes credential fields in gateway payloads for logging
pub fn sanitize_json(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut sanitized = serde_json::Map::new();
            for (key, val) in map {
                let sanitized_val = if is_sensitive_field(key) {
                    mask_value(val)
                } else {
                    sanitize_json(val)
                };
                sanitized.insert(key.clone(), sanitized_val);
            }
            Value::Object(sanitized)
        }
        Value::Array(arr) => Value::Array(arr.iter().map(sanitize_json).collect()),
        _ => value.clone(),
    }
}

fn is_sensitive_field(key: &str) -> bool {
    matches!(
        key.to_lowercase().as_str(),
        "pp_password" | "pp_merchantmpin" | "pp_securehash" | "password" | "mpin" | "hash_key" | "secret"
    )
}

fn mask_value(value: &Value) -> Value {
    match value {
        Value::String(s) if s.len() > 8 => {
            let visible = &s[..4];
            let masked = "****";
            let end = &s[s.len() - 4..];
            Value::String(format!("{}{}{}", visible, masked, end))
        }
        _ => Value::String("****".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sanitize_gateway_credentials() {
        let input = json!({
            "pp_Password": "t4d2s0e9h1",
            "pp_Amount": "10000"
        });

        let sanitized = sanitize_json(&input);
        let password = sanitized["pp_Password"].as_str().unwrap();

        assert!(password.contains("****"));
        assert_eq!(sanitized["pp_Amount"], "10000");
    }

    #[test]
    fn test_short_secrets_are_fully_masked() {
        let input = json!({ "pp_MerchantMPIN": "1234" });
        let sanitized = sanitize_json(&input);
        assert_eq!(sanitized["pp_MerchantMPIN"], "****");
    }

    #[test]
    fn test_sanitize_nested() {
        let input = json!({
            "refund": {
                "pp_SecureHash": "3a7bd3e2360a3d29eea436fcfb7e44c735d117c42d1c1835420b6b9942dd4f1b",
                "pp_TxnRefNo": "TR2025011512000042"
            }
        });

        let sanitized = sanitize_json(&input);
        assert!(sanitized["refund"]["pp_SecureHash"]
            .as_str()
            .unwrap()
            .contains("****"));
        assert_eq!(sanitized["refund"]["pp_TxnRefNo"], "TR2025011512000042");
    }
}
