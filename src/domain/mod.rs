pub mod transaction;

pub use transaction::{minor_units, RefundRequest, TransactionRequest};
