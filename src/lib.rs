//! Payrail: a typed client for a marketplace payments REST API.
//!
//! This crate maps remote payment entities — customers, cards, bank
//! accounts, debits, refunds, verifications — onto local typed objects,
//! and gives every remote collection a fluent, lazily-evaluated query
//! builder. The heavy lifting lives in a generic core that works for any
//! resource schema; the typed entity views on top add no persistence
//! logic of their own.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │  resources: Customer, Card, BankAccount, ...  │  typed views
//! ├───────────────────────────────────────────────┤
//! │  core: Resource · Collection · ResourceQuery  │  generic mapping
//! ├───────────────────────────────────────────────┤
//! │  transport: Transport trait · HttpTransport   │  one request in,
//! └───────────────────────────────────────────────┘  raw response out
//! ```
//!
//! - [`Resource`] holds a server address (`href`) and a schema-less
//!   attribute bag, and drives the create/reload/delete lifecycle.
//! - [`Collection`] addresses a parent-owned sub-resource set and hands
//!   out queries.
//! - [`ResourceQuery`] is an immutable builder: every `filter` /
//!   `order_by` call returns a new value, so queries can be branched and
//!   shared; nothing executes until `total`, `first`, `all`, or
//!   `unique`.
//! - [`transport::Transport`] is the seam to the wire; tests swap in an
//!   in-memory fake.
//!
//! # Quick start
//!
//! ```no_run
//! use payrail::{Client, Customer, EntityOps, SortDirection};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> payrail::Result<()> {
//!     // Reads PAYRAIL_API_KEY (and optionally PAYRAIL_API_URL).
//!     let client = Client::from_env()?;
//!
//!     let mut customer = Customer::new(&client);
//!     customer.set_name("Ada Lovelace");
//!     customer.save().await?;
//!
//!     let mut card = payrail::Card::new(&client);
//!     card.set_number("4111111111111111");
//!     card.set_expiration_month(12);
//!     card.set_expiration_year(2030);
//!     card.save().await?;
//!     card.associate_to_customer(&customer).await?;
//!
//!     let debit = card.debit(json!({ "amount": 10_000 })).await?;
//!     println!("charged {:?}", debit.amount());
//!
//!     // Queries are immutable specifications; branch them freely.
//!     let small = card
//!         .debits()?
//!         .query()
//!         .filter_op("amount", payrail::FilterOp::Lt, 800)
//!         .order_by("created_at", SortDirection::Ascending);
//!     for debit in small.all().await? {
//!         println!("{:?} {:?}", debit.id(), debit.amount());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Error handling
//!
//! Every operation returns [`Result`]. The [`ApiError`] taxonomy keeps
//! actionable failures apart: a rejected create payload
//! ([`ApiError::CannotCreate`]) is not a transient HTTP failure
//! ([`ApiError::Http`]), and a unique lookup that matches nothing
//! ([`ApiError::NoResultsFound`]) is not one that matches too much
//! ([`ApiError::MultipleResultsFound`]). Expected business outcomes —
//! a mismatched micro-deposit confirmation — are recorded state, not
//! errors.
//!
//! # Concurrency
//!
//! Operations are single awaited round trips; the crate spawns no
//! background work and performs no hidden retries. Queries are immutable
//! and freely shareable. A single resource instance must not be mutated
//! from two tasks at once — give each in-flight mutation one owner.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod client;
pub mod config;
pub mod core;
pub mod error;
pub mod resources;
pub mod transport;

pub use client::Client;
pub use config::ApiConfig;
pub use core::{Collection, Entity, EntityOps, FilterOp, Resource, ResourceQuery, SortDirection};
pub use error::{ApiError, Result};
pub use resources::{
    BankAccount, BankAccountVerification, Card, Customer, Debit, Refund, VerificationState,
};
