//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the
//! application. Mutating helpers take any `ConnectionTrait` so they
//! compose into a caller-owned database transaction.

pub mod account;
pub mod exchange;
pub mod transaction;
pub mod user;
pub mod wallet;

pub use account::{AccountError, AccountRepository, ProvisionInput, ProvisionOutcome};
pub use exchange::{ExchangeError, ExchangeRepository};
pub use transaction::{CreateTransactionInput, TransactionRepository};
pub use user::UserRepository;
pub use wallet::{WalletError, WalletRepository};
