//! Typed entity views.
//!
//! Each type here is a thin adapter over [`Resource`](crate::Resource):
//! typed accessors for the fields the API documents, plus the domain
//! operations that type supports (debiting a card, verifying a bank
//! account). Persistence, reloading, and deletion come from the blanket
//! [`EntityOps`](crate::EntityOps) impl.

pub mod bank_account;
pub mod card;
pub mod customer;
pub mod debit;
pub mod refund;
pub mod verification;

pub use bank_account::BankAccount;
pub use card::Card;
pub use customer::Customer;
pub use debit::Debit;
pub use refund::Refund;
pub use verification::{BankAccountVerification, MAX_ATTEMPTS, VerificationState};
