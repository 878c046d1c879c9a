//! # TreasuryKit - A Rust client for the TreasuryDirect securities service
//!
//! TreasuryKit wraps the TreasuryDirect web service (`TA_WS`), which publishes
//! announcement, auction, and issue data for marketable US Treasury securities.
//!
//! ## Features
//!
//! - **Security lookup** - Fetch a single security by CUSIP and issue date
//! - **Announced and auctioned lists** - Filter by type, page size, days, and reopening
//! - **Search** - Free-form filters with `today` and `notNull` helpers
//! - **Typed records** - Dates and numbers are parsed on demand with descriptive errors
//! - **Pluggable transport** - Swap the HTTP layer for a test double or a custom stack
//!
//! ## Requirements
//!
//! TreasuryKit is async and requires an async runtime such as [tokio](https://tokio.rs).
//!
//! ## Basic Usage
//!
//! ```ignore
//! use treasurykit::{SecurityOperations, TreasuryDirect};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = TreasuryDirect::new()?;
//!
//!     let bill = client.security("912796CJ6", "2", "11", "2014").await?;
//!     println!("{} {} issued {}", bill.security_term()?, bill.security_type()?, bill.issue_date()?);
//!
//!     Ok(())
//! }
//! ```

mod config;
mod core;
mod error;
mod options;
mod securities;
mod security;
mod traits;
mod transport;

pub use config::{DEFAULT_BASE_URL, TreasuryDirectConfig};
pub use self::core::TreasuryDirect;
pub use error::{Result, TreasuryError};
pub use options::{
    AnnouncedSecuritiesOptions, AuctionedSecuritiesOptions, NOT_NULL, SearchSecuritiesOptions,
    SecurityListOptions, TODAY, format_date,
};
pub use security::{Security, SecurityType};
pub use traits::SecurityOperations;
pub use transport::{HttpTransport, ReqwestTransport};

/// Property names used by the service's security records.
pub mod fields {
    pub use super::security::{
        ANNOUNCEMENT_DATE, AUCTION_DATE, AUCTION_DATE_YEAR, CUSIP, INTEREST_RATE, ISSUE_DATE,
        MATURITY_DATE, SECURITY_TERM, SECURITY_TYPE,
    };
}

/// Current crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
