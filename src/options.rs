use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;
use std::fmt;

use super::error::{Result, ensure_at_least, ensure_not_empty};
use super::security::{
    ANNOUNCEMENT_DATE, AUCTION_DATE, AUCTION_DATE_YEAR, CUSIP, INTEREST_RATE, ISSUE_DATE,
    MATURITY_DATE, SECURITY_TERM, SECURITY_TYPE, SecurityType,
};

/// Value the service replaces with the current date.
pub const TODAY: &str = "today";
/// Value that matches any record where the field is present.
pub const NOT_NULL: &str = "notNull";

/// Formats a date the way the search endpoint expects: `{year}-{month}-{day}`
/// with no zero padding, e.g. `2014-2-11`.
pub fn format_date(date: NaiveDate) -> String {
    format!("{}-{}-{}", date.year(), date.month(), date.day())
}

/// Options for filtering the announced and auctioned security lists
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecurityListOptions {
    page_size: Option<u32>,
    security_type: Option<SecurityType>,
    days: Option<u32>,
    reopening: Option<bool>,
}

/// Options for `announced_securities`.
pub type AnnouncedSecuritiesOptions = SecurityListOptions;
/// Options for `auctioned_securities`.
pub type AuctionedSecuritiesOptions = SecurityListOptions;

impl SecurityListOptions {
    /// Creates options with nothing set, which sends no filters at all.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of records to return. The service caps this at 250.
    ///
    /// # Errors
    ///
    /// Returns `TreasuryError::PreCondition` if `page_size` is zero.
    pub fn with_page_size(mut self, page_size: u32) -> Result<Self> {
        ensure_at_least(page_size, 1, "pageSize")?;
        self.page_size = Some(page_size);
        Ok(self)
    }

    /// Restricts the list to one kind of security.
    ///
    /// # Arguments
    ///
    /// * `security_type` - Sent as the service's name, e.g. `CMB` for [`SecurityType::Cmb`]
    pub fn with_type(mut self, security_type: SecurityType) -> Self {
        self.security_type = Some(security_type);
        self
    }

    /// Sets how many previous days of results to return. 0 returns today only.
    pub fn with_days(mut self, days: u32) -> Self {
        self.days = Some(days);
        self
    }

    /// Filters by reopening status.
    pub fn with_reopening(mut self, reopening: bool) -> Self {
        self.reopening = Some(reopening);
        self
    }

    /// Page size, if one was set.
    pub fn page_size(&self) -> Option<u32> {
        self.page_size
    }

    /// Security type filter, if one was set.
    pub fn security_type(&self) -> Option<SecurityType> {
        self.security_type
    }

    /// Day window, if one was set.
    pub fn days(&self) -> Option<u32> {
        self.days
    }

    /// Reopening filter, if one was set.
    pub fn reopening(&self) -> Option<bool> {
        self.reopening
    }

    /// Serializes the options that were set. Reopening is sent as `Yes`/`No`.
    pub fn to_query_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();

        if let Some(page_size) = self.page_size {
            params.push(("pagesize".to_string(), page_size.to_string()));
        }

        if let Some(security_type) = self.security_type {
            params.push(("type".to_string(), security_type.to_string()));
        }

        if let Some(days) = self.days {
            params.push(("days".to_string(), days.to_string()));
        }

        if let Some(reopening) = self.reopening {
            params.push((
                "reopening".to_string(),
                if reopening { "Yes" } else { "No" }.to_string(),
            ));
        }

        params
    }

    /// Returns the options that were set as a JSON object. Page size and days
    /// are numbers and reopening is a boolean.
    pub fn to_json(&self) -> Value {
        let mut result = Map::new();
        if let Some(page_size) = self.page_size {
            result.insert("pagesize".to_string(), json!(page_size));
        }
        if let Some(security_type) = self.security_type {
            result.insert("type".to_string(), json!(security_type.as_str()));
        }
        if let Some(days) = self.days {
            result.insert("days".to_string(), json!(days));
        }
        if let Some(reopening) = self.reopening {
            result.insert("reopening".to_string(), json!(reopening));
        }
        Value::Object(result)
    }
}

impl fmt::Display for SecurityListOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

/// Free-form filters for the security search endpoint.
///
/// Keys are security property names (`cusip`, `issueDate`, ...) and values
/// are sent as-is. Setters take `&mut self` and refuse empty keys or values
/// without touching the existing filters, so they can be chained with `?`.
///
/// # Examples
///
/// ```rust
/// use chrono::NaiveDate;
/// use treasurykit::{SearchSecuritiesOptions, SecurityType};
///
/// let mut options = SearchSecuritiesOptions::new();
/// options
///     .set_security_type(SecurityType::Bill)?
///     .set_issue_date_on(NaiveDate::from_ymd_opt(2014, 2, 11).unwrap())?
///     .set_not_null("interestRate")?;
///
/// assert_eq!(options.get("issueDate"), Some("2014-2-11"));
/// assert_eq!(options.len(), 3);
/// # Ok::<(), treasurykit::TreasuryError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchSecuritiesOptions {
    #[serde(flatten)]
    params: BTreeMap<String, String>,
}

impl SearchSecuritiesOptions {
    /// Creates an empty set of filters. Searching with it matches everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name` to `value`, replacing any earlier value.
    ///
    /// # Arguments
    ///
    /// * `name` - Security property name, e.g. `securityTerm`
    /// * `value` - Filter value, or one of [`TODAY`] and [`NOT_NULL`]
    ///
    /// # Errors
    ///
    /// Returns `TreasuryError::PreCondition` if `name` or `value` is empty.
    /// The existing filters are left untouched.
    pub fn set(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<&mut Self> {
        let name = name.into();
        let value = value.into();
        ensure_not_empty(&name, "propertyName")?;
        ensure_not_empty(&value, "propertyValue")?;

        self.params.insert(name, value);
        Ok(self)
    }

    /// Sets `name` to `date` in the unpadded form produced by [`format_date`].
    pub fn set_date(&mut self, name: impl Into<String>, date: NaiveDate) -> Result<&mut Self> {
        self.set(name, format_date(date))
    }

    /// Matches records where `name` has any value.
    pub fn set_not_null(&mut self, name: impl Into<String>) -> Result<&mut Self> {
        self.set(name, NOT_NULL)
    }

    /// Matches records where `name` is the service's current date.
    pub fn set_today(&mut self, name: impl Into<String>) -> Result<&mut Self> {
        self.set(name, TODAY)
    }

    /// Filters on `announcementDate` using a value the service understands,
    /// such as `2014-2-6`, [`TODAY`] or [`NOT_NULL`].
    ///
    /// # Errors
    ///
    /// Returns `TreasuryError::PreCondition` naming `announcementDate` if `date` is empty.
    pub fn set_announcement_date(&mut self, date: impl Into<String>) -> Result<&mut Self> {
        self.set_field(ANNOUNCEMENT_DATE, date)
    }

    /// Filters on `announcementDate` being `date`.
    pub fn set_announcement_date_on(&mut self, date: NaiveDate) -> Result<&mut Self> {
        self.set_date(ANNOUNCEMENT_DATE, date)
    }

    /// Filters on securities announced today.
    pub fn set_announcement_date_to_today(&mut self) -> Result<&mut Self> {
        self.set_today(ANNOUNCEMENT_DATE)
    }

    /// Filters on `auctionDate`. See [`set_announcement_date`](Self::set_announcement_date).
    pub fn set_auction_date(&mut self, date: impl Into<String>) -> Result<&mut Self> {
        self.set_field(AUCTION_DATE, date)
    }

    /// Filters on `auctionDate` being `date`.
    pub fn set_auction_date_on(&mut self, date: NaiveDate) -> Result<&mut Self> {
        self.set_date(AUCTION_DATE, date)
    }

    /// Filters on securities auctioned today.
    pub fn set_auction_date_to_today(&mut self) -> Result<&mut Self> {
        self.set_today(AUCTION_DATE)
    }

    /// Filters on the calendar year of the auction.
    ///
    /// # Errors
    ///
    /// Returns `TreasuryError::PreCondition` if `year` is negative.
    pub fn set_auction_date_year(&mut self, year: i32) -> Result<&mut Self> {
        ensure_at_least(year, 0, AUCTION_DATE_YEAR)?;
        self.set(AUCTION_DATE_YEAR, year.to_string())
    }

    /// Filters on a CUSIP. A CUSIP can be reissued, so several records may match.
    pub fn set_cusip(&mut self, cusip: impl Into<String>) -> Result<&mut Self> {
        self.set_field(CUSIP, cusip)
    }

    /// Filters on the interest rate exactly as the service formats it.
    pub fn set_interest_rate(&mut self, rate: impl Into<String>) -> Result<&mut Self> {
        self.set_field(INTEREST_RATE, rate)
    }

    /// Filters on a numeric interest rate.
    ///
    /// The rate always carries a fractional part, so `1.0` is sent as `1.0`
    /// rather than `1`.
    pub fn set_interest_rate_value(&mut self, rate: f64) -> Result<&mut Self> {
        self.set(INTEREST_RATE, format!("{rate:?}"))
    }

    /// Filters on `issueDate`. See [`set_announcement_date`](Self::set_announcement_date).
    pub fn set_issue_date(&mut self, date: impl Into<String>) -> Result<&mut Self> {
        self.set_field(ISSUE_DATE, date)
    }

    /// Filters on `issueDate` being `date`.
    pub fn set_issue_date_on(&mut self, date: NaiveDate) -> Result<&mut Self> {
        self.set_date(ISSUE_DATE, date)
    }

    /// Filters on securities issued today.
    pub fn set_issue_date_to_today(&mut self) -> Result<&mut Self> {
        self.set_today(ISSUE_DATE)
    }

    /// Filters on `maturityDate`. See [`set_announcement_date`](Self::set_announcement_date).
    pub fn set_maturity_date(&mut self, date: impl Into<String>) -> Result<&mut Self> {
        self.set_field(MATURITY_DATE, date)
    }

    /// Filters on `maturityDate` being `date`.
    pub fn set_maturity_date_on(&mut self, date: NaiveDate) -> Result<&mut Self> {
        self.set_date(MATURITY_DATE, date)
    }

    /// Filters on securities maturing today.
    pub fn set_maturity_date_to_today(&mut self) -> Result<&mut Self> {
        self.set_today(MATURITY_DATE)
    }

    /// Accepts either a [`SecurityType`] or the service's raw name for one.
    pub fn set_security_type(&mut self, security_type: impl Into<String>) -> Result<&mut Self> {
        self.set_field(SECURITY_TYPE, security_type)
    }

    /// Filters on the stated term, e.g. `4-Week` or `10-Year`.
    pub fn set_security_term(&mut self, term: impl Into<String>) -> Result<&mut Self> {
        self.set_field(SECURITY_TERM, term)
    }

    /// Like `set`, but an empty value is reported under the field's own name.
    fn set_field(&mut self, name: &'static str, value: impl Into<String>) -> Result<&mut Self> {
        let value = value.into();
        ensure_not_empty(&value, name)?;
        self.set(name, value)
    }

    /// Returns the filter value for `name`, if set.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Removes the filter for `name` and returns its value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.params.remove(name)
    }

    /// Returns `true` if a filter is set for `name`.
    pub fn contains_key(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    /// Removes every filter.
    pub fn clear(&mut self) -> &mut Self {
        self.params.clear();
        self
    }

    /// Number of filters set.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Returns `true` if no filter is set.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Iterates over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Filter names in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.params.keys().map(String::as_str)
    }

    /// Filter values in name order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.params.values().map(String::as_str)
    }

    /// Returns the filters as query parameters in name order.
    pub fn to_query_params(&self) -> Vec<(String, String)> {
        self.params
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Returns the filters as a JSON object of strings.
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.params
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect(),
        )
    }
}

impl fmt::Display for SearchSecuritiesOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}
