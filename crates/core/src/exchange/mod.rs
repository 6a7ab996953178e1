//! Exchange quote math.
//!
//! Everything here is pure: the processor resolves a rate, computes a quote
//! with these functions, and only then enters the database transaction.

pub mod conversion;
pub mod quote;

pub use conversion::convert_amount;
pub use quote::{ExchangeQuote, QuoteError};
