//! The operation surface of the TreasuryDirect client.
//!
//! Every request the service supports is declared on [`SecurityOperations`],
//! which `TreasuryDirect` implements. Code that only needs to read securities
//! can depend on the trait instead of the concrete client and swap in an
//! alternative implementation for tests.

use super::error::Result;
use super::options::{AnnouncedSecuritiesOptions, AuctionedSecuritiesOptions, SearchSecuritiesOptions};
use super::security::{Security, SecurityType};
use async_trait::async_trait;
use chrono::NaiveDate;

/// Operations for retrieving marketable Treasury securities.
///
/// Single-security lookups are keyed by CUSIP plus issue date. List
/// operations return records in the order the service sent them; array
/// elements that are not JSON objects are skipped. None of the operations
/// retry, and transport failures are returned unchanged.
#[async_trait]
pub trait SecurityOperations {
    /// Retrieves one security by CUSIP and issue date components.
    ///
    /// Fails with `TreasuryError::NotFound` when the service answers `No data`.
    async fn security(
        &self,
        cusip: &str,
        issue_month: &str,
        issue_day_of_month: &str,
        issue_year: &str,
    ) -> Result<Security>;
    /// Retrieves one security by CUSIP and issue date.
    async fn security_by_date(&self, cusip: &str, issue_date: NaiveDate) -> Result<Security>;
    /// Retrieves announced securities that have not yet been auctioned.
    async fn announced_securities(
        &self,
        opts: Option<AnnouncedSecuritiesOptions>,
    ) -> Result<Vec<Security>>;
    /// Retrieves recently auctioned securities.
    async fn auctioned_securities(
        &self,
        opts: Option<AuctionedSecuritiesOptions>,
    ) -> Result<Vec<Security>>;
    /// Retrieves securities of one type.
    async fn securities_by_type(&self, security_type: SecurityType) -> Result<Vec<Security>>;
    /// Retrieves securities matching every filter in `options`.
    async fn search_securities(&self, options: &SearchSecuritiesOptions) -> Result<Vec<Security>>;
}
