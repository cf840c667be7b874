use neis_meal_rs::constants::{DEFAULT_API_URL, DEFAULT_REGION_CODE, DEFAULT_SCHOOL_CODE};
use neis_meal_rs::data_types::SchoolConfig;
use neis_meal_rs::presenter::{OutputFormat, Region, TerminalSink};
use neis_meal_rs::shared_main::{logger_init, MealLookup};

use anyhow::Context;
use clap::Parser;
use log::log_enabled;
use tokio::io::{AsyncBufReadExt, BufReader};

/// School meal plans (조식/중식/석식) from the NEIS open data API.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Date to look up, YYYY-MM-DD{n}[default: today]
    date: Option<String>,
    /// Office of education code (ATPT_OFCDC_SC_CODE)
    #[arg(long, env = "NEIS_REGION_CODE", default_value = DEFAULT_REGION_CODE)]
    region_code: String,
    /// School code (SD_SCHUL_CODE)
    #[arg(long, env = "NEIS_SCHOOL_CODE", default_value = DEFAULT_SCHOOL_CODE)]
    school_code: String,
    #[arg(long, env = "NEIS_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,
    /// Pass-through relay, gets the NEIS url as its `url` parameter{n}Example: <https://api.allorigins.win/raw>
    #[arg(long, env = "NEIS_RELAY_URL")]
    relay: Option<String>,
    /// NEIS open API key (optional, unkeyed requests are rate limited)
    #[arg(long, env = "NEIS_API_KEY")]
    api_key: Option<String>,
    /// Print the menu as JSON
    #[arg(long)]
    json: bool,
    /// Keep reading dates from stdin, one per line
    #[arg(short, long)]
    interactive: bool,
    /// Enable verbose logging (request timings){n}[SETS env: RUST_LOG=debug]
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.verbose {
        std::env::set_var("RUST_LOG", "debug");
    }

    logger_init(module_path!());
    if !log_enabled!(log::Level::Debug) {
        log::info!("Enable verbose logging for request timings");
    }

    let config = SchoolConfig::new(
        args.region_code,
        args.school_code,
        &args.api_url,
        args.relay.as_deref(),
        args.api_key,
    )
    .context("invalid NEIS or relay url")?;
    log::info!(
        "Looking up meals for school {}/{}",
        config.region_code,
        config.school_code
    );

    let client = reqwest::Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("could not build http client")?;

    let format = if args.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    let mut lookup = MealLookup::new(client, config, TerminalSink::new(std::io::stdout(), format));

    // same as opening the page: today's plan right away
    let date = args
        .date
        .unwrap_or_else(|| chrono::Local::now().format("%Y-%m-%d").to_string());
    lookup.search(&date).await;

    if args.interactive {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            lookup.search(&line).await;
        }
    } else if !lookup.presenter().is_visible(Region::Result) {
        std::process::exit(1);
    }

    Ok(())
}
