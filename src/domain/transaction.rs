//! Checkout and refund request entities.
//! Framework-agnostic representation of one payment attempt.

use bigdecimal::{BigDecimal, ToPrimitive};

/// One hosted-checkout attempt. Constructed fresh per request and
/// discarded after the form is rendered; nothing is shared or cached
/// across attempts.
#[derive(Debug, Clone)]
pub struct TransactionRequest {
    /// Amount in major units; converted to minor units at build time.
    pub amount: BigDecimal,
    /// Merchant-assigned order identifier.
    pub bill_reference: String,
    pub description: String,
    /// Reserved pass-through slots, transmitted as ppmpf_1..ppmpf_5.
    /// Always sent, empty unless filled here.
    pub passthrough: [String; 5],
}

impl TransactionRequest {
    pub fn new(
        amount: BigDecimal,
        bill_reference: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            amount,
            bill_reference: bill_reference.into(),
            description: description.into(),
            passthrough: std::array::from_fn(|_| String::new()),
        }
    }
}

/// Refund of a previously completed transaction, addressed by the
/// original transaction reference number.
#[derive(Debug, Clone)]
pub struct RefundRequest {
    pub txn_ref_no: String,
    pub amount: BigDecimal,
}

impl RefundRequest {
    pub fn new(txn_ref_no: impl Into<String>, amount: BigDecimal) -> Self {
        Self {
            txn_ref_no: txn_ref_no.into(),
            amount,
        }
    }
}

/// Converts a major-unit amount to the gateway's integer minor units.
/// The last two decimal places are kept; anything past them is
/// truncated, never rounded.
pub fn minor_units(amount: &BigDecimal) -> Option<u64> {
    (amount * BigDecimal::from(100)).to_u64()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn converts_to_minor_units() {
        let amount = BigDecimal::from_str("1000.50").unwrap();
        assert_eq!(minor_units(&amount), Some(100050));
    }

    #[test]
    fn truncates_past_two_decimal_places() {
        let amount = BigDecimal::from_str("1000.509").unwrap();
        assert_eq!(minor_units(&amount), Some(100050));

        let amount = BigDecimal::from_str("999.999").unwrap();
        assert_eq!(minor_units(&amount), Some(99999));
    }

    #[test]
    fn whole_amounts_scale_by_one_hundred() {
        assert_eq!(minor_units(&BigDecimal::from(100)), Some(10000));
    }

    #[test]
    fn negative_amounts_do_not_convert() {
        assert_eq!(minor_units(&BigDecimal::from(-5)), None);
    }

    #[test]
    fn passthrough_slots_default_to_empty() {
        let request = TransactionRequest::new(BigDecimal::from(1), "BILL-1", "desc");
        assert!(request.passthrough.iter().all(String::is_empty));
    }
}
