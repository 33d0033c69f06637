use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use property_report::apaleo::{ApaleoClient, ApaleoService};
use property_report::cli;
use property_report::model::Credentials;
use property_report::report::fetch_business_days;

#[derive(Parser, Debug)]
#[command(about = "Print the business days apaleo reports for a property, without revenue lookups")]
struct Args {
    #[arg(long)]
    client_id: String,

    /// Prompted for without echo when omitted
    #[arg(long)]
    client_secret: Option<String>,

    #[arg(long)]
    property_id: String,

    #[arg(long)]
    from: Option<NaiveDate>,

    #[arg(long)]
    to: Option<NaiveDate>,

    /// Optional YAML config
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let cfg = cli::load_config(args.config.as_deref())?;
    let client_secret = cli::client_secret(args.client_secret)?;
    let client = ApaleoClient::from_config(&cfg).context("failed to build apaleo client")?;

    let today = Local::now().date_naive();
    let from = args.from.unwrap_or(today);
    let to = args.to.unwrap_or(today);

    let token = client
        .fetch_token(&Credentials::new(args.client_id, client_secret))
        .await
        .context("token exchange failed")?;
    let days = fetch_business_days(&client, &token, &args.property_id, from, to)
        .await
        .context("property-performance report could not be read")?;

    println!("Property: {}  ({} .. {})", args.property_id, from, to);
    println!("Business days: {}", days.len());
    for day in days {
        println!(
            "  {} -> {{ sold: {}, no-shows: {}, net accommodation: {} }}",
            day.business_day, day.sold_count, day.no_shows_count, day.net_accommodation_revenue.amount
        );
    }
    Ok(())
}
