use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use property_report::aggregate::Progress;
use property_report::apaleo::ApaleoClient;
use property_report::cli;
use property_report::export::ReportArtifact;
use property_report::model::{Credentials, ReportRequest};
use property_report::report;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Build a per-day property performance report with accommodation revenue and save it as CSV"
)]
struct Args {
    /// apaleo client id
    #[arg(long)]
    client_id: String,

    /// apaleo client secret; prompted for without echo when omitted
    #[arg(long)]
    client_secret: Option<String>,

    /// Property to report on (e.g. MUC)
    #[arg(long)]
    property_id: String,

    /// First business day, YYYY-MM-DD (default: today)
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Last business day, YYYY-MM-DD (default: today)
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Directory to write property_performance_report.csv into (overrides config)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Optional YAML config file; built-in defaults apply without it
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    let cfg = cli::load_config(args.config.as_deref())?;
    let client_secret = cli::client_secret(args.client_secret)?;

    let today = Local::now().date_naive();
    let request = ReportRequest {
        credentials: Credentials::new(args.client_id, client_secret),
        property_id: args.property_id,
        from: args.from.unwrap_or(today),
        to: args.to.unwrap_or(today),
    };
    let output_dir = args
        .output_dir
        .unwrap_or_else(|| PathBuf::from(&cfg.app.output_dir));

    let api = ApaleoClient::from_config(&cfg).context("failed to build apaleo client")?;
    info!(property_id = %request.property_id, from = %request.from, to = %request.to, "generating report");

    let outcome = report::generate(&api, &request, cfg.app.workers, today, |p: Progress| {
        info!(
            completed = p.completed,
            total = p.total,
            "progress {:.0}%",
            p.fraction() * 100.0
        );
    })
    .await
    .context("report generation did not proceed")?;

    for failure in &outcome.failures {
        eprintln!(
            "error: revenue for {} could not be fetched: {}",
            failure.business_day, failure.message
        );
    }

    let artifact = ReportArtifact::from_table(&outcome.table).context("failed to encode CSV")?;
    let path = artifact
        .write_to_dir(&output_dir)
        .await
        .with_context(|| format!("failed to write report into {}", output_dir.display()))?;

    println!(
        "Wrote {} ({} rows, {} days skipped)",
        path.display(),
        outcome.table.len(),
        outcome.failures.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_secret_flag_is_optional() {
        let args = Args::try_parse_from([
            "property-report",
            "--client-id",
            "client",
            "--property-id",
            "MUC",
        ])
        .unwrap();
        assert_eq!(args.client_secret, None);
        assert_eq!(args.from, None);
    }

    #[test]
    fn client_secret_flag_is_still_accepted() {
        let args = Args::try_parse_from([
            "property-report",
            "--client-id",
            "client",
            "--client-secret",
            "secret",
            "--property-id",
            "MUC",
            "--from",
            "2024-01-01",
        ])
        .unwrap();
        assert_eq!(args.client_secret.as_deref(), Some("secret"));
        assert_eq!(args.from, NaiveDate::from_ymd_opt(2024, 1, 1));
    }
}
