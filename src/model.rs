use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Client credentials typed in by the user. Never written anywhere.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

/// Opaque bearer token. Expiry is left to the API.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken([REDACTED])")
    }
}

/// Everything one report generation needs, passed explicitly into the workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequest {
    pub credentials: Credentials,
    pub property_id: String,
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonetaryValue {
    pub amount: Decimal,
}

/// One element of the `businessDays` array of the property-performance report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessDayRecord {
    pub business_day: NaiveDate,
    pub sold_count: i64,
    pub no_shows_count: i64,
    pub net_accommodation_revenue: MonetaryValue,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RevenueSample {
    pub net: Decimal,
    pub gross: Decimal,
}

impl RevenueSample {
    pub const ZERO: RevenueSample = RevenueSample {
        net: Decimal::ZERO,
        gross: Decimal::ZERO,
    };
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub business_day: NaiveDate,
    pub sold_count: i64,
    pub no_shows_count: i64,
    pub net_accommodation_revenue: Decimal,
    pub net_revenue: Decimal,
    pub gross_revenue: Decimal,
}

impl ReportRow {
    pub fn merge(day: &BusinessDayRecord, revenue: RevenueSample) -> Self {
        Self {
            business_day: day.business_day,
            sold_count: day.sold_count,
            no_shows_count: day.no_shows_count,
            net_accommodation_revenue: day.net_accommodation_revenue.amount,
            net_revenue: revenue.net,
            gross_revenue: revenue.gross,
        }
    }
}

/// Rows ordered ascending by business day. Only constructible through
/// `from_rows`, which sorts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportTable {
    rows: Vec<ReportRow>,
}

impl ReportTable {
    pub fn from_rows(mut rows: Vec<ReportRow>) -> Self {
        rows.sort_by_key(|r| r.business_day);
        Self { rows }
    }

    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A business day whose revenue could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayFailure {
    pub business_day: NaiveDate,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn row(day: &str) -> ReportRow {
        ReportRow {
            business_day: day.parse().unwrap(),
            sold_count: 1,
            no_shows_count: 0,
            net_accommodation_revenue: dec!(1),
            net_revenue: dec!(1),
            gross_revenue: dec!(1),
        }
    }

    #[test]
    fn table_sorts_rows_by_day() {
        let table = ReportTable::from_rows(vec![
            row("2024-01-03"),
            row("2024-01-01"),
            row("2024-01-02"),
        ]);
        let days: Vec<String> = table
            .rows()
            .iter()
            .map(|r| r.business_day.to_string())
            .collect();
        assert_eq!(days, vec!["2024-01-01", "2024-01-02", "2024-01-03"]);
    }

    #[test]
    fn business_day_deserializes_from_api_shape() {
        let raw = r#"{
            "businessDay": "2024-02-29",
            "soldCount": 12,
            "noShowsCount": 2,
            "netAccommodationRevenue": { "amount": 1234.56, "currency": "EUR" },
            "occupancy": 80.5
        }"#;
        let day: BusinessDayRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(day.business_day, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(day.sold_count, 12);
        assert_eq!(day.no_shows_count, 2);
        assert_eq!(day.net_accommodation_revenue.amount, dec!(1234.56));
    }

    #[test]
    fn secrets_are_redacted_in_debug() {
        let creds = Credentials::new("id", "hunter2");
        let token = AccessToken::new("eyJ-secret");
        assert!(!format!("{creds:?}").contains("hunter2"));
        assert!(!format!("{token:?}").contains("eyJ"));
    }
}
