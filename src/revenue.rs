//! Per-day accommodation revenue.
use chrono::NaiveDate;
use tracing::debug;

use crate::apaleo::model::RevenuesReport;
use crate::apaleo::ApaleoService;
use crate::error::{ReportError, Result};
use crate::model::{AccessToken, RevenueSample};

pub const ACCOMMODATION_ACCOUNT: &str = "Revenues Accommodation";

/// Fetch net and gross accommodation revenue for `day`. Days after `today`
/// have no bookings posted yet and resolve to zero without a request.
pub async fn fetch_revenue(
    api: &dyn ApaleoService,
    token: &AccessToken,
    property_id: &str,
    day: NaiveDate,
    today: NaiveDate,
) -> Result<RevenueSample> {
    if day > today {
        debug!(%day, "future business day, skipping revenues request");
        return Ok(RevenueSample::ZERO);
    }
    let report = api.fetch_revenues(token, property_id, day).await?;
    accommodation_revenue(&report)
}

/// First top-level line booked on the accommodation account, or zero when
/// the report has none.
pub fn accommodation_revenue(report: &RevenuesReport) -> Result<RevenueSample> {
    let line = report.children.iter().find(|line| {
        line.account
            .as_ref()
            .is_some_and(|a| a.name.as_deref() == Some(ACCOMMODATION_ACCOUNT))
    });
    let Some(line) = line else {
        return Ok(RevenueSample::ZERO);
    };
    match (line.net_amount, line.gross_amount) {
        (Some(net), Some(gross)) => Ok(RevenueSample {
            net: net.amount,
            gross: gross.amount,
        }),
        _ => Err(ReportError::Schema(format!(
            "'{ACCOMMODATION_ACCOUNT}' line lacks netAmount or grossAmount"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn report(raw: &str) -> RevenuesReport {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn picks_accommodation_line() {
        let r = report(
            r#"{"children":[
                {"account":{"name":"Revenues Food"},"netAmount":{"amount":5.0},"grossAmount":{"amount":6.0}},
                {"account":{"name":"Revenues Accommodation"},"netAmount":{"amount":90.0},"grossAmount":{"amount":99.0}},
                {"account":{"name":"Revenues Accommodation"},"netAmount":{"amount":1.0},"grossAmount":{"amount":1.0}}
            ]}"#,
        );
        let sample = accommodation_revenue(&r).unwrap();
        assert_eq!(sample.net, dec!(90));
        assert_eq!(sample.gross, dec!(99));
    }

    #[test]
    fn missing_line_is_zero() {
        let r = report(
            r#"{"children":[{"account":{"name":"Revenues Food"},"netAmount":{"amount":5.0},"grossAmount":{"amount":6.0}}]}"#,
        );
        assert_eq!(accommodation_revenue(&r).unwrap(), RevenueSample::ZERO);
    }

    #[test]
    fn missing_children_is_zero() {
        assert_eq!(accommodation_revenue(&report("{}")).unwrap(), RevenueSample::ZERO);
    }

    #[test]
    fn account_name_must_match_exactly() {
        let r = report(
            r#"{"children":[{"account":{"name":"revenues accommodation"},"netAmount":{"amount":5.0},"grossAmount":{"amount":6.0}}]}"#,
        );
        assert_eq!(accommodation_revenue(&r).unwrap(), RevenueSample::ZERO);
    }

    #[test]
    fn lines_without_account_name_are_skipped() {
        let r = report(
            r#"{"children":[
                {"account":{"number":"4000"},"netAmount":{"amount":1.0},"grossAmount":{"amount":1.0}},
                {"account":{"name":"Revenues Accommodation"},"netAmount":{"amount":90.0},"grossAmount":{"amount":99.0}},
                {"account":{"number":"4100"}}
            ]}"#,
        );
        let sample = accommodation_revenue(&r).unwrap();
        assert_eq!(sample.net, dec!(90));
        assert_eq!(sample.gross, dec!(99));
    }

    #[test]
    fn matched_line_without_amounts_is_schema_error() {
        let r = report(r#"{"children":[{"account":{"name":"Revenues Accommodation"}}]}"#);
        assert!(matches!(
            accommodation_revenue(&r),
            Err(ReportError::Schema(_))
        ));
    }
}
