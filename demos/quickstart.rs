//! Minimal end-to-end flow: create a customer, tokenize a card, charge
//! it, and query the card's debits.
//!
//! Requires `PAYRAIL_API_KEY` (and optionally `PAYRAIL_API_URL`):
//!
//! ```bash
//! PAYRAIL_API_KEY=sk_test_... cargo run --example quickstart
//! ```

use payrail::{Card, Client, Customer, EntityOps, FilterOp, SortDirection};
use serde_json::json;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> payrail::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let client = Client::from_env()?;

    let mut customer = Customer::new(&client);
    customer.set_name("Ada Lovelace");
    customer.set_email("ada@example.com");
    customer.save().await?;
    println!("customer: {:?}", customer.href());

    let mut card = Card::new(&client);
    card.set_number("4111111111111111");
    card.set_expiration_month(12);
    card.set_expiration_year(2030);
    card.set_cvv("123");
    card.save().await?;
    card.associate_to_customer(&customer).await?;

    let debit = card
        .debit(json!({ "amount": 10_000, "description": "quickstart charge" }))
        .await?;
    println!("debit: {:?} amount={:?} status={:?}", debit.id(), debit.amount(), debit.status());

    let small_charges = card
        .debits()?
        .query()
        .filter_op("amount", FilterOp::Lt, 50_000)
        .order_by("created_at", SortDirection::Descending);
    println!("{} matching charges:", small_charges.total().await?);
    for debit in small_charges.all().await? {
        println!("  {:?} {:?}", debit.id(), debit.amount());
    }

    Ok(())
}
