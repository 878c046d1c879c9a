mod common;

use chrono::NaiveDate;
use common::read_fixture;
use treasurykit::{Security, TreasuryError, fields};

#[test]
fn parse_single_security() {
    let content = read_fixture("security.json");
    let value: serde_json::Value = serde_json::from_str(&content).unwrap();
    let security = Security::try_from(value).unwrap();

    assert_eq!(security.cusip().unwrap(), "912796CJ6");
    assert_eq!(security.security_type().unwrap(), "Bill");
    assert_eq!(security.security_term().unwrap(), "72-Day");
    assert_eq!(
        security.issue_date().unwrap().date_naive(),
        NaiveDate::from_ymd_opt(2014, 2, 11).unwrap()
    );
    assert_eq!(
        security.get_date(fields::MATURITY_DATE).unwrap(),
        NaiveDate::from_ymd_opt(2014, 4, 24).unwrap()
    );
    assert_eq!(security.auction_date_year().unwrap(), 2014.0);
    assert_eq!(security.get_number("highDiscountRate").unwrap(), 0.09);
}

#[test]
fn bill_has_no_interest_rate() {
    let content = read_fixture("security.json");
    let security: Security = serde_json::from_str(&content).unwrap();

    match security.interest_rate() {
        Err(TreasuryError::Parse {
            field,
            value,
            target,
        }) => {
            assert_eq!(field, "interestRate");
            assert_eq!(value.as_deref(), Some(""));
            assert_eq!(target, "number");
        }
        other => panic!("expected a parse error, got {other:?}"),
    }
}

#[test]
fn auction_year_matches_auction_date() {
    let content = read_fixture("announced.json");
    let securities: Vec<serde_json::Value> = serde_json::from_str(&content).unwrap();

    for value in securities.into_iter().filter(|v| v.is_object()) {
        let security = Security::try_from(value).unwrap();
        let auction_date = security.auction_date().unwrap();
        assert_eq!(
            security.auction_date_year().unwrap(),
            f64::from(chrono::Datelike::year(&auction_date))
        );
        assert!(security.maturity_date().unwrap() > security.issue_date().unwrap());
    }
}
