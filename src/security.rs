//! Security records returned by the TreasuryDirect web service.
//!
//! The service delivers each security as a flat JSON object whose values are
//! almost all strings, including dates (`"2014-02-11T00:00:00"`) and numbers
//! (`"0.125000"`). Rather than deserializing eagerly into a fixed struct, a
//! [`Security`] keeps the parsed object and converts individual fields on
//! demand. A malformed field therefore only fails the accessor that reads it,
//! never the whole response.
//!
//! # Examples
//!
//! ```rust
//! use treasurykit::Security;
//!
//! let security: Security = serde_json::json!({
//!     "cusip": "912796CJ6",
//!     "issueDate": "2014-02-11T00:00:00",
//!     "securityType": "Bill",
//!     "securityTerm": "72-Day",
//! })
//! .try_into()?;
//!
//! assert_eq!(security.cusip()?, "912796CJ6");
//! assert_eq!(security.issue_date()?.to_rfc3339(), "2014-02-11T00:00:00+00:00");
//! # Ok::<(), treasurykit::TreasuryError>(())
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use super::error::{Result, TreasuryError, ensure_not_empty};

pub const ANNOUNCEMENT_DATE: &str = "announcementDate";
pub const AUCTION_DATE: &str = "auctionDate";
pub const AUCTION_DATE_YEAR: &str = "auctionDateYear";
pub const CUSIP: &str = "cusip";
pub const INTEREST_RATE: &str = "interestRate";
pub const ISSUE_DATE: &str = "issueDate";
pub const MATURITY_DATE: &str = "maturityDate";
pub const SECURITY_TYPE: &str = "securityType";
pub const SECURITY_TERM: &str = "securityTerm";

/// Kinds of marketable securities the service can filter by.
///
/// When used as a filter, the service reports some kinds under a broader
/// name: CMB records come back with a `securityType` of `"Bill"`, FRN records
/// as `"Note"`, and TIPS records as either `"Bond"` or `"Note"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SecurityType {
    Bill,
    Note,
    Bond,
    #[serde(rename = "CMB")]
    Cmb,
    #[serde(rename = "TIPS")]
    Tips,
    #[serde(rename = "FRN")]
    Frn,
}

impl SecurityType {
    /// Every kind, in the order the service documents them.
    pub const ALL: [SecurityType; 6] = [
        SecurityType::Bill,
        SecurityType::Note,
        SecurityType::Bond,
        SecurityType::Cmb,
        SecurityType::Tips,
        SecurityType::Frn,
    ];

    /// Returns the name the service uses in URLs and query strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            SecurityType::Bill => "Bill",
            SecurityType::Note => "Note",
            SecurityType::Bond => "Bond",
            SecurityType::Cmb => "CMB",
            SecurityType::Tips => "TIPS",
            SecurityType::Frn => "FRN",
        }
    }
}

impl fmt::Display for SecurityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<SecurityType> for String {
    fn from(security_type: SecurityType) -> Self {
        security_type.as_str().to_string()
    }
}

impl FromStr for SecurityType {
    type Err = TreasuryError;

    fn from_str(s: &str) -> Result<Self> {
        SecurityType::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| TreasuryError::Parse {
                field: SECURITY_TYPE.to_string(),
                value: Some(s.to_string()),
                target: "SecurityType",
            })
    }
}

/// A read-only view over one security object from the service.
///
/// Accessors are pure: the backing object is never modified, so calling the
/// same accessor twice always yields the same result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Security {
    json: Map<String, Value>,
}

impl Security {
    /// Wraps a security object as returned by the service.
    ///
    /// Nothing is validated here; each accessor checks its own field.
    pub fn new(json: Map<String, Value>) -> Self {
        Self { json }
    }

    /// Returns the underlying JSON object.
    pub fn as_json(&self) -> &Map<String, Value> {
        &self.json
    }

    /// Consumes the view and returns the underlying JSON object.
    pub fn into_json(self) -> Map<String, Value> {
        self.json
    }

    /// Returns when the auction was announced.
    ///
    /// # Errors
    ///
    /// `TreasuryError::Parse` if `announcementDate` is absent, empty, or not a timestamp.
    pub fn announcement_date(&self) -> Result<DateTime<Utc>> {
        self.get_date_time(ANNOUNCEMENT_DATE)
    }

    /// Returns when the auction was held. Same errors as [`announcement_date`](Self::announcement_date).
    pub fn auction_date(&self) -> Result<DateTime<Utc>> {
        self.get_date_time(AUCTION_DATE)
    }

    /// Returns the auction year as reported by the service.
    ///
    /// # Errors
    ///
    /// `TreasuryError::Parse` if `auctionDateYear` is absent, empty, or not a number.
    pub fn auction_date_year(&self) -> Result<f64> {
        self.get_number(AUCTION_DATE_YEAR)
    }

    /// Returns the nine-character CUSIP.
    ///
    /// # Errors
    ///
    /// `TreasuryError::MissingField` if `cusip` is absent or empty.
    pub fn cusip(&self) -> Result<&str> {
        self.get_string(CUSIP)
    }

    /// Returns the coupon rate in percent.
    ///
    /// Bills carry no coupon, so the service sends an empty string and this
    /// returns `TreasuryError::Parse`.
    pub fn interest_rate(&self) -> Result<f64> {
        self.get_number(INTEREST_RATE)
    }

    /// Returns the issue date as a UTC timestamp.
    pub fn issue_date(&self) -> Result<DateTime<Utc>> {
        self.get_date_time(ISSUE_DATE)
    }

    /// Returns the maturity date as a UTC timestamp.
    pub fn maturity_date(&self) -> Result<DateTime<Utc>> {
        self.get_date_time(MATURITY_DATE)
    }

    /// Returns the service's name for the security's kind, e.g. `"Bill"`.
    ///
    /// This is kept as a string because the service reports some filter
    /// types under a broader name (see [`SecurityType`]).
    pub fn security_type(&self) -> Result<&str> {
        self.get_string(SECURITY_TYPE)
    }

    /// Returns the stated term, e.g. `"72-Day"` or `"10-Year"`.
    pub fn security_term(&self) -> Result<&str> {
        self.get_string(SECURITY_TERM)
    }

    /// Returns the string value of `name`.
    ///
    /// # Errors
    ///
    /// `TreasuryError::MissingField` if the property is absent, not a string,
    /// or empty.
    pub fn get_string(&self, name: &str) -> Result<&str> {
        ensure_not_empty(name, "propertyName")?;

        match self.json.get(name) {
            Some(Value::String(value)) if !value.is_empty() => Ok(value),
            _ => Err(TreasuryError::MissingField(name.to_string())),
        }
    }

    /// Parses `name` as a UTC timestamp.
    ///
    /// The service omits the offset (`"2014-02-11T00:00:00"`), so a `Z` is
    /// appended before parsing unless one is already present.
    ///
    /// # Errors
    ///
    /// `TreasuryError::Parse` with target `DateTime` if the value is absent,
    /// empty, or not an RFC 3339 timestamp once the `Z` is added.
    pub fn get_date_time(&self, name: &str) -> Result<DateTime<Utc>> {
        ensure_not_empty(name, "propertyName")?;

        let value = self.raw(name).map(|value| {
            if !value.is_empty() && !value.ends_with('Z') {
                Cow::Owned(format!("{value}Z"))
            } else {
                value
            }
        });

        parse_field(name, value.as_deref(), "DateTime", |value| {
            DateTime::parse_from_rfc3339(value).map(|parsed| parsed.with_timezone(&Utc))
        })
    }

    /// Parses `name` as a timestamp and keeps only the calendar date.
    ///
    /// # Errors
    ///
    /// Same as [`get_date_time`](Self::get_date_time).
    pub fn get_date(&self, name: &str) -> Result<NaiveDate> {
        self.get_date_time(name).map(|parsed| parsed.date_naive())
    }

    /// Parses `name` as a double-precision number.
    ///
    /// # Errors
    ///
    /// `TreasuryError::Parse` with target `number` if the value is absent,
    /// empty, or not a finite number.
    pub fn get_number(&self, name: &str) -> Result<f64> {
        ensure_not_empty(name, "propertyName")?;

        let value = self.raw(name);
        parse_field(name, value.as_deref(), "number", |value| {
            value
                .parse::<f64>()
                .map_err(|e| e.to_string())
                .and_then(|parsed| {
                    if parsed.is_finite() {
                        Ok(parsed)
                    } else {
                        Err(format!("{parsed} is not finite"))
                    }
                })
        })
    }

    /// Raw text of a property. Numbers and booleans are rendered as JSON;
    /// `null` counts as absent.
    fn raw(&self, name: &str) -> Option<Cow<'_, str>> {
        match self.json.get(name)? {
            Value::Null => None,
            Value::String(value) => Some(Cow::Borrowed(value.as_str())),
            other => Some(Cow::Owned(other.to_string())),
        }
    }
}

impl From<Map<String, Value>> for Security {
    fn from(json: Map<String, Value>) -> Self {
        Self::new(json)
    }
}

impl TryFrom<Value> for Security {
    type Error = TreasuryError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(json) => Ok(Self::new(json)),
            other => Err(TreasuryError::InvalidResponse(format!(
                "Expected a JSON object, got: {}",
                other
            ))),
        }
    }
}

/// Runs `parse` over a raw field value, reporting every failure in the same
/// shape.
///
/// An absent or empty value fails without calling `parse`. Errors from
/// `parse` are replaced by a `Parse` error that only names the field, the raw
/// value, and `target`.
pub(crate) fn parse_field<T, E, F>(
    name: &str,
    value: Option<&str>,
    target: &'static str,
    parse: F,
) -> Result<T>
where
    F: FnOnce(&str) -> std::result::Result<T, E>,
{
    let invalid = || TreasuryError::Parse {
        field: name.to_string(),
        value: value.map(str::to_string),
        target,
    };

    match value {
        Some(value) if !value.is_empty() => parse(value).map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use chrono::NaiveDateTime;
    use proptest::prelude::*;

    fn record(name: &str, value: &str) -> Security {
        let mut json = Map::new();
        json.insert(name.to_string(), Value::String(value.to_string()));
        Security::new(json)
    }

    fn arb_field_name() -> impl Strategy<Value = String> {
        "[a-zA-Z]{1,16}"
    }

    fn arb_naive_date_time() -> impl Strategy<Value = NaiveDateTime> {
        (1i32..=9999, 1u32..=12, 1u32..=31, 0u32..24, 0u32..60, 0u32..60).prop_filter_map(
            "day outside month",
            |(year, month, day, hour, minute, second)| {
                NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)
            },
        )
    }

    /// Text that never parses as a finite number and needs no escaping.
    fn arb_non_number() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9 .,%+-]{1,12}".prop_filter("parses as a finite number", |value| {
            value.parse::<f64>().map_or(true, |parsed| !parsed.is_finite())
        })
    }

    fn assert_parse_error(result: Result<impl fmt::Debug>, name: &str, expected: &str) {
        match result {
            Err(TreasuryError::Parse { field, target, .. }) => {
                assert_eq!(field, name);
                assert_eq!(target, expected);
            }
            other => panic!("expected parse error for {name:?}, got {other:?}"),
        }
    }

    proptest! {
        #[test]
        fn absent_field_fails_every_typed_getter(name in arb_field_name()) {
            let security = Security::default();

            assert_parse_error(security.get_date_time(&name), &name, "DateTime");
            assert_parse_error(security.get_date(&name), &name, "DateTime");
            assert_parse_error(security.get_number(&name), &name, "number");
        }

        #[test]
        fn empty_field_fails_every_typed_getter(name in arb_field_name()) {
            let security = record(&name, "");

            assert_parse_error(security.get_date_time(&name), &name, "DateTime");
            assert_parse_error(security.get_date(&name), &name, "DateTime");
            assert_parse_error(security.get_number(&name), &name, "number");
        }

        #[test]
        fn get_date_is_get_date_time_without_time(
            name in arb_field_name(),
            moment in arb_naive_date_time(),
        ) {
            let raw = moment.format("%Y-%m-%dT%H:%M:%S").to_string();
            let security = record(&name, &raw);

            let date_time = security.get_date_time(&name).unwrap();
            prop_assert_eq!(date_time.naive_utc(), moment);
            prop_assert_eq!(security.get_date(&name).unwrap(), date_time.date_naive());
        }

        #[test]
        fn unparseable_number_uses_fixed_message(
            name in arb_field_name(),
            value in arb_non_number(),
        ) {
            let security = record(&name, &value);

            let error = security.get_number(&name).unwrap_err();
            prop_assert_eq!(
                error.to_string(),
                format!("\"{name}\" value (\"{value}\") is not a valid number.")
            );
        }
    }
}
