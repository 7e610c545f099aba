mod config;
mod fetch;
mod normalizer;
mod output;
mod parsers;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;

use output::Presenter;
use parsers::Extraction;

/// Today's relevant NOTAMs over Slovenian airspace.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Also write every printed NOTAM as a JSON file
    #[arg(long)]
    save_json: bool,

    /// Directory for the JSON files written by --save-json
    #[arg(long, default_value = config::DEFAULT_OUT_DIR)]
    out_dir: PathBuf,

    /// Read a saved copy of the summary page instead of fetching it
    #[arg(long, value_name = "FILE")]
    html: Option<PathBuf>,

    /// Report for this day instead of today (Europe/Ljubljana)
    #[arg(long, value_name = "YYYY-MM-DD")]
    date: Option<NaiveDate>,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let html = match &args.html {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => fetch::fetch_page(config::PAGE_URL)?,
    };

    let today = args.date.unwrap_or_else(normalizer::today);
    let json_dir = args.save_json.then(|| args.out_dir.clone());

    let mut presenter = Presenter::new(io::stdout().lock(), json_dir);
    run(&html, today, &mut presenter)?;
    presenter.finish()?;
    Ok(())
}

/// Parse, filter and present one page.
fn run<W: Write>(html: &str, today: NaiveDate, presenter: &mut Presenter<W>) -> Result<()> {
    match parsers::parse(html)? {
        Extraction::NoData => presenter.no_data(),
        Extraction::Notices(notices) => {
            let total = notices.len();
            let todays = normalizer::normalize(notices, today);
            info!("{} of {} notices apply on {}", todays.len(), total, today);
            presenter.present(today, &todays)
        }
    }
}
