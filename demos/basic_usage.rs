//! Basic TreasuryKit usage example
//!
//! This example demonstrates the simplest way to use TreasuryKit:
//! - Initialize the client
//! - Look up a single bill by CUSIP and issue date
//! - List announced bills and read their typed fields
//!
//! Run with: `cargo run --example basic_usage`
//! Set `RUST_LOG=treasurykit=debug` to see the requested URLs.

use std::error::Error;
use tracing_subscriber::EnvFilter;
use treasurykit::{AnnouncedSecuritiesOptions, SecurityOperations, SecurityType, TreasuryDirect};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let client = TreasuryDirect::new()?;

    println!("=== TreasuryKit Basic Usage Example ===\n");

    println!("Looking up CUSIP 912796CJ6 issued 2014-02-11...");
    let bill = client.security("912796CJ6", "2", "11", "2014").await?;
    println!(
        "✓ {} {} issued {}, matures {}\n",
        bill.security_term()?,
        bill.security_type()?,
        bill.issue_date()?.date_naive(),
        bill.maturity_date()?.date_naive()
    );

    println!("Fetching announced bills...");
    let options = AnnouncedSecuritiesOptions::new()
        .with_type(SecurityType::Bill)
        .with_page_size(5)?;
    let announced = client.announced_securities(Some(options)).await?;
    for security in &announced {
        println!(
            "- {} {} auction {}",
            security.cusip()?,
            security.security_term()?,
            security.auction_date()?.date_naive()
        );
    }

    println!("\n✓ Basic usage example completed successfully!");

    Ok(())
}
