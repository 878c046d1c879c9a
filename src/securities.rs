//! Security lookups against the TreasuryDirect web service.
//!
//! # Examples
//!
//! ```rust,no_run
//! use treasurykit::{AnnouncedSecuritiesOptions, SecurityOperations, SecurityType, TreasuryDirect};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = TreasuryDirect::new()?;
//!
//!     let options = AnnouncedSecuritiesOptions::new()
//!         .with_type(SecurityType::Bill)
//!         .with_page_size(10)?;
//!
//!     for security in client.announced_securities(Some(options)).await? {
//!         println!("{} matures {}", security.cusip()?, security.maturity_date()?);
//!     }
//!     Ok(())
//! }
//! ```

use super::TreasuryDirect;
use super::error::{Result, TreasuryError, ensure_not_empty};
use super::options::{
    AnnouncedSecuritiesOptions, AuctionedSecuritiesOptions, SearchSecuritiesOptions,
};
use super::security::{Security, SecurityType};
use super::traits::SecurityOperations;
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use serde_json::Value;

/// Body the single-security endpoint returns instead of a 404.
const NO_DATA: &str = "No data";

/// Decodes a list response, keeping only object elements in response order.
fn parse_security_list(body: &str) -> Result<Vec<Security>> {
    let elements = match serde_json::from_str::<Value>(body)? {
        Value::Array(elements) => elements,
        other => {
            return Err(TreasuryError::InvalidResponse(format!(
                "Expected a JSON array of securities, got: {}",
                truncate(&other.to_string())
            )));
        }
    };

    let total = elements.len();
    let securities: Vec<Security> = elements
        .into_iter()
        .filter_map(|element| match element {
            Value::Object(json) => Some(Security::new(json)),
            other => {
                tracing::trace!("Skipping non-object element: {}", other);
                None
            }
        })
        .collect();

    tracing::debug!(
        "Decoded {} securities from {} elements",
        securities.len(),
        total
    );

    Ok(securities)
}

fn truncate(text: &str) -> String {
    text.chars().take(200).collect()
}

impl TreasuryDirect {
    async fn fetch_security_list(
        &self,
        segments: &[&str],
        params: Vec<(String, String)>,
    ) -> Result<Vec<Security>> {
        let url = self.url(segments, params);
        let body = self.get(&url).await?;
        parse_security_list(&body)
    }
}

#[async_trait]
impl SecurityOperations for TreasuryDirect {
    /// Retrieves one security by CUSIP and issue date components.
    ///
    /// Each component becomes one percent-encoded path segment, so `"2"` and
    /// `"02"` are both accepted and a stray `?` or `#` cannot leak into the
    /// query.
    ///
    /// # Errors
    ///
    /// * `TreasuryError::PreCondition` - any argument is empty (no request is made)
    /// * `TreasuryError::NotFound` - the service answered `No data`
    /// * `TreasuryError::JsonError` - the body was not JSON
    /// * `TreasuryError::InvalidResponse` - the body was JSON but not an object
    async fn security(
        &self,
        cusip: &str,
        issue_month: &str,
        issue_day_of_month: &str,
        issue_year: &str,
    ) -> Result<Security> {
        ensure_not_empty(cusip, "cusip")?;
        ensure_not_empty(issue_month, "issueMonth")?;
        ensure_not_empty(issue_day_of_month, "issueDayOfMonth")?;
        ensure_not_empty(issue_year, "issueYear")?;

        let url = self.url(
            &["securities", cusip, issue_month, issue_day_of_month, issue_year],
            Vec::new(),
        );
        let body = self.get(&url).await?;

        if body.eq_ignore_ascii_case(NO_DATA) {
            return Err(TreasuryError::NotFound {
                cusip: cusip.to_string(),
                issue_month: issue_month.to_string(),
                issue_day_of_month: issue_day_of_month.to_string(),
                issue_year: issue_year.to_string(),
            });
        }

        serde_json::from_str::<Value>(&body)?.try_into()
    }

    async fn security_by_date(&self, cusip: &str, issue_date: NaiveDate) -> Result<Security> {
        self.security(
            cusip,
            &issue_date.month().to_string(),
            &issue_date.day().to_string(),
            &issue_date.year().to_string(),
        )
        .await
    }

    async fn announced_securities(
        &self,
        opts: Option<AnnouncedSecuritiesOptions>,
    ) -> Result<Vec<Security>> {
        let params = opts.unwrap_or_default().to_query_params();
        self.fetch_security_list(&["securities", "announced"], params)
            .await
    }

    async fn auctioned_securities(
        &self,
        opts: Option<AuctionedSecuritiesOptions>,
    ) -> Result<Vec<Security>> {
        let params = opts.unwrap_or_default().to_query_params();
        self.fetch_security_list(&["securities", "auctioned"], params)
            .await
    }

    async fn securities_by_type(&self, security_type: SecurityType) -> Result<Vec<Security>> {
        self.fetch_security_list(&["securities", security_type.as_str()], Vec::new())
            .await
    }

    async fn search_securities(&self, options: &SearchSecuritiesOptions) -> Result<Vec<Security>> {
        self.fetch_security_list(&["securities", "search"], options.to_query_params())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::HttpTransport;
    use std::sync::{Arc, Mutex};

    /// Replays one canned body and remembers every requested URL.
    #[derive(Debug)]
    struct CannedTransport {
        body: String,
        requests: Mutex<Vec<String>>,
    }

    impl CannedTransport {
        fn new(body: &str) -> Arc<Self> {
            Arc::new(Self {
                body: body.to_string(),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HttpTransport for CannedTransport {
        async fn get(&self, url: &str) -> Result<String> {
            self.requests.lock().unwrap().push(url.to_string());
            Ok(self.body.clone())
        }
    }

    #[derive(Debug)]
    struct FailingTransport;

    #[async_trait]
    impl HttpTransport for FailingTransport {
        async fn get(&self, _url: &str) -> Result<String> {
            Err(TreasuryError::InvalidResponse("connection reset".to_string()))
        }
    }

    const BASE: &str = "https://td.test/TA_WS/";

    fn client(transport: Arc<CannedTransport>) -> TreasuryDirect {
        TreasuryDirect::with_transport(transport, BASE).unwrap()
    }

    #[test]
    fn test_parse_security_list_skips_non_objects() {
        let body = r#"[{"cusip":"A"}, 1, "text", null, [], {"cusip":"B"}, true]"#;
        let securities = parse_security_list(body).unwrap();
        let cusips: Vec<&str> = securities.iter().map(|s| s.cusip().unwrap()).collect();
        assert_eq!(cusips, ["A", "B"]);
    }

    #[test]
    fn test_parse_security_list_rejects_non_array() {
        assert!(matches!(
            parse_security_list(r#"{"cusip":"A"}"#),
            Err(TreasuryError::InvalidResponse(_))
        ));
        assert!(matches!(
            parse_security_list("not json"),
            Err(TreasuryError::JsonError(_))
        ));
    }

    #[tokio::test]
    async fn test_security_builds_identity_path() {
        let transport = CannedTransport::new(r#"{"cusip":"912796CJ6","securityType":"Bill"}"#);
        let security = client(transport.clone())
            .security("912796CJ6", "2", "11", "2014")
            .await
            .unwrap();

        assert_eq!(security.security_type().unwrap(), "Bill");
        assert_eq!(
            transport.requests(),
            ["https://td.test/TA_WS/securities/912796CJ6/2/11/2014?format=json"]
        );
    }

    #[tokio::test]
    async fn test_security_keeps_reserved_characters_in_path() {
        for cusip in ["912796CJ6#frag", "912796CJ6?a=b", "912796/CJ6"] {
            let transport = CannedTransport::new(r#"{"cusip":"912796CJ6"}"#);
            client(transport.clone())
                .security(cusip, "2", "11", "2014")
                .await
                .unwrap();

            let requests = transport.requests();
            let url = reqwest::Url::parse(&requests[0]).unwrap();
            let segments: Vec<String> = url
                .path_segments()
                .unwrap()
                .map(str::to_string)
                .collect();
            let query: Vec<(String, String)> = url.query_pairs().into_owned().collect();

            assert_eq!(segments.len(), 6, "{url}");
            assert_eq!(segments[5], "2014", "{url}");
            assert_eq!(url.fragment(), None, "{url}");
            assert_eq!(query, [("format".to_string(), "json".to_string())], "{url}");
        }
    }

    #[tokio::test]
    async fn test_security_no_data_is_not_found() {
        for body in ["No data", "no data", "NO DATA"] {
            let error = client(CannedTransport::new(body))
                .security("952796CJ6", "2", "11", "2014")
                .await
                .unwrap_err();
            assert_eq!(
                error.to_string(),
                "No TreasuryDirect security found for CUSIP: 952796CJ6, IssueMonth: 2, IssueDayOfMonth: 11, and IssueYear: 2014."
            );
        }
    }

    #[tokio::test]
    async fn test_security_preconditions_skip_network() {
        let transport = CannedTransport::new("No data");
        let client = client(transport.clone());

        let cases = [
            (["", "2", "11", "2014"], "cusip cannot be empty."),
            (["912796CJ6", "", "11", "2014"], "issueMonth cannot be empty."),
            (["912796CJ6", "2", "", "2014"], "issueDayOfMonth cannot be empty."),
            (["912796CJ6", "2", "11", ""], "issueYear cannot be empty."),
        ];
        for ([cusip, month, day, year], expected) in cases {
            let error = client.security(cusip, month, day, year).await.unwrap_err();
            assert!(matches!(error, TreasuryError::PreCondition(_)));
            assert_eq!(error.to_string(), expected);
        }

        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_security_by_date_drops_padding() {
        let transport = CannedTransport::new(r#"{"cusip":"912796CJ6"}"#);
        client(transport.clone())
            .security_by_date("912796CJ6", NaiveDate::from_ymd_opt(2014, 2, 11).unwrap())
            .await
            .unwrap();

        assert_eq!(
            transport.requests(),
            ["https://td.test/TA_WS/securities/912796CJ6/2/11/2014?format=json"]
        );
    }

    #[tokio::test]
    async fn test_announced_securities_query() {
        let transport = CannedTransport::new("[]");
        let options = AnnouncedSecuritiesOptions::new()
            .with_page_size(10)
            .unwrap()
            .with_type(SecurityType::Bill)
            .with_reopening(false);

        let securities = client(transport.clone())
            .announced_securities(Some(options))
            .await
            .unwrap();

        assert!(securities.is_empty());
        assert_eq!(
            transport.requests(),
            ["https://td.test/TA_WS/securities/announced?format=json&pagesize=10&type=Bill&reopening=No"]
        );
    }

    #[tokio::test]
    async fn test_auctioned_securities_without_options() {
        let transport = CannedTransport::new(r#"[{"cusip":"A"},{"cusip":"B"}]"#);
        let securities = client(transport.clone())
            .auctioned_securities(None)
            .await
            .unwrap();

        assert_eq!(securities.len(), 2);
        assert_eq!(
            transport.requests(),
            ["https://td.test/TA_WS/securities/auctioned?format=json"]
        );
    }

    #[tokio::test]
    async fn test_securities_by_type_path() {
        let transport = CannedTransport::new(r#"[{"securityType":"Bill"}]"#);
        let securities = client(transport.clone())
            .securities_by_type(SecurityType::Cmb)
            .await
            .unwrap();

        assert_eq!(securities[0].security_type().unwrap(), "Bill");
        assert_eq!(
            transport.requests(),
            ["https://td.test/TA_WS/securities/CMB?format=json"]
        );
    }

    #[tokio::test]
    async fn test_search_securities_query() {
        let transport = CannedTransport::new("[]");
        let mut options = SearchSecuritiesOptions::new();
        options
            .set_cusip("912796CJ6")
            .unwrap()
            .set_issue_date_on(NaiveDate::from_ymd_opt(2014, 2, 11).unwrap())
            .unwrap();

        client(transport.clone())
            .search_securities(&options)
            .await
            .unwrap();

        assert_eq!(
            transport.requests(),
            ["https://td.test/TA_WS/securities/search?format=json&cusip=912796CJ6&issueDate=2014-2-11"]
        );
    }

    #[tokio::test]
    async fn test_transport_error_is_propagated_unchanged() {
        let client = TreasuryDirect::with_transport(Arc::new(FailingTransport), BASE).unwrap();

        let error = client.securities_by_type(SecurityType::Bond).await.unwrap_err();
        assert!(matches!(error, TreasuryError::InvalidResponse(ref m) if m == "connection reset"));

        let error = client.security("912796CJ6", "2", "11", "2014").await.unwrap_err();
        assert!(matches!(error, TreasuryError::InvalidResponse(ref m) if m == "connection reset"));
    }
}
