//! CSV export of a finished report.
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::model::ReportTable;

pub const FILE_NAME: &str = "property_performance_report.csv";
pub const MIME_TYPE: &str = "text/csv";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The downloadable CSV: name, media type and UTF-8 bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportArtifact {
    pub file_name: &'static str,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl ReportArtifact {
    pub fn from_table(table: &ReportTable) -> Result<Self, ExportError> {
        Ok(Self {
            file_name: FILE_NAME,
            mime: MIME_TYPE,
            bytes: to_csv(table)?,
        })
    }

    /// Write the artifact into `dir`, creating the directory if needed.
    pub async fn write_to_dir(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(self.file_name);
        tokio::fs::write(&path, &self.bytes).await?;
        Ok(path)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CsvOutRow {
    business_day: String,
    sold_count: i64,
    no_shows_count: i64,
    net_accommodation_revenue: String,
    net_revenue: String,
    gross_revenue: String,
}

pub fn to_csv(table: &ReportTable) -> Result<Vec<u8>, ExportError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    // Written explicitly so an empty table still gets a header line.
    wtr.write_record([
        "businessDay",
        "soldCount",
        "noShowsCount",
        "netAccommodationRevenue",
        "netRevenue",
        "grossRevenue",
    ])?;
    for row in table.rows() {
        wtr.serialize(CsvOutRow {
            business_day: row.business_day.format("%Y-%m-%d").to_string(),
            sold_count: row.sold_count,
            no_shows_count: row.no_shows_count,
            net_accommodation_revenue: format_amount(row.net_accommodation_revenue),
            net_revenue: format_amount(row.net_revenue),
            gross_revenue: format_amount(row.gross_revenue),
        })?;
    }
    wtr.into_inner().map_err(|e| ExportError::Io(e.into_error()))
}

/// Normalized decimal with at least one fractional digit: 100 -> "100.0".
fn format_amount(amount: Decimal) -> String {
    let n = amount.normalize();
    if n.scale() == 0 {
        format!("{n}.0")
    } else {
        n.to_string()
    }
}
