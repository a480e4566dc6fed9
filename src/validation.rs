use bigdecimal::BigDecimal;
use std::fmt;

pub const TXN_REF_NO_MAX_LEN: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

pub type ValidationResult = Result<(), ValidationError>;

pub fn validate_required(field: &'static str, value: &str) -> ValidationResult {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }

    Ok(())
}

pub fn validate_max_len(field: &'static str, value: &str, max_len: usize) -> ValidationResult {
    if value.len() > max_len {
        return Err(ValidationError::new(
            field,
            format!("must be at most {} characters", max_len),
        ));
    }

    Ok(())
}

pub fn validate_positive_amount(amount: &BigDecimal) -> ValidationResult {
    if amount <= &BigDecimal::from(0) {
        return Err(ValidationError::new("amount", "must be greater than zero"));
    }

    Ok(())
}

/// Strips single quotes wrapping a description. Legacy behavior carried
/// over from older merchant integrations that stored descriptions with
/// literal quote characters around them.
pub fn strip_wrapping_quotes(value: &str) -> &str {
    value.trim_matches('\'')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn validates_required_field() {
        assert!(validate_required("field", "value").is_ok());
        assert!(validate_required("field", "   ").is_err());
        assert!(validate_required("field", "").is_err());
    }

    #[test]
    fn validates_max_len() {
        assert!(validate_max_len("field", "abc", 3).is_ok());
        assert!(validate_max_len("field", "abcd", 3).is_err());
    }

    #[test]
    fn validates_positive_amount() {
        let positive = BigDecimal::from_str("1.23").expect("valid decimal");
        let zero = BigDecimal::from(0);
        let negative = BigDecimal::from(-1);

        assert!(validate_positive_amount(&positive).is_ok());
        assert!(validate_positive_amount(&zero).is_err());
        assert!(validate_positive_amount(&negative).is_err());
    }

    #[test]
    fn validation_error_names_the_field() {
        let err = validate_required("bill_reference", "").unwrap_err();
        assert_eq!(err.field, "bill_reference");
        assert_eq!(err.to_string(), "bill_reference: must not be empty");
    }

    #[test]
    fn strips_wrapping_quotes() {
        assert_eq!(strip_wrapping_quotes("'Test Product'"), "Test Product");
        assert_eq!(strip_wrapping_quotes("''already''"), "already");
        assert_eq!(strip_wrapping_quotes("no quotes"), "no quotes");
        assert_eq!(strip_wrapping_quotes("it's fine"), "it's fine");
    }
}
