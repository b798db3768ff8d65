use std::io::Write as _;
use std::sync::Arc;

use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand};

use weatherboard_core::{
    BmkgSource, Config, DashboardSnapshot, DisplayRecord, ForecastSource, scheduler,
    select_display_records,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherboard", version, about = "Regional weather dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the live dashboard.
    Run {
        /// BMKG administrative area (adm1) code.
        #[arg(long)]
        area: Option<String>,

        /// Number of regions shown at once.
        #[arg(long)]
        sample_size: Option<usize>,

        /// Seconds between data refreshes.
        #[arg(long)]
        refresh_secs: Option<u64>,

        /// Forecast endpoint override, mainly for testing.
        #[arg(long)]
        endpoint: Option<String>,

        /// Show English condition descriptions.
        #[arg(long)]
        english: bool,

        /// Fetch and print one set of cards, then exit.
        #[arg(long)]
        once: bool,
    },

    /// Interactively set and save dashboard defaults.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Run {
                area,
                sample_size,
                refresh_secs,
                endpoint,
                english,
                once,
            } => {
                let mut config = Config::load()?;
                if let Some(area) = area {
                    config.area = area;
                }
                if let Some(sample_size) = sample_size {
                    config.sample_size = sample_size;
                }
                if let Some(refresh_secs) = refresh_secs {
                    config.refresh_secs = refresh_secs;
                }
                if let Some(endpoint) = endpoint {
                    config.endpoint = endpoint;
                }
                if english {
                    config.english_descriptions = true;
                }

                if once {
                    run_once(&config).await
                } else {
                    run_dashboard(&config).await
                }
            }
            Command::Configure => configure(),
        }
    }
}

fn build_source(config: &Config) -> anyhow::Result<BmkgSource> {
    let source = BmkgSource::new(config.endpoint.clone(), config.area.clone())
        .context("Failed to build forecast client")?
        .with_english_descriptions(config.english_descriptions);
    Ok(source)
}

/// Single fetch-and-select pass printed once, without timers.
async fn run_once(config: &Config) -> anyhow::Result<()> {
    let source = build_source(config)?;
    let series = source
        .fetch()
        .await
        .context("Failed to fetch forecast data")?;
    let records = select_display_records(&series, Local::now().naive_local(), config.sample_size);

    if records.is_empty() {
        println!("No forecast data available.");
        return Ok(());
    }
    for record in &records {
        println!("{}", card_line(record));
    }
    Ok(())
}

/// Full dashboard: scheduler in the background, a one-second render loop in
/// the foreground, ctrl-c to tear both down.
async fn run_dashboard(config: &Config) -> anyhow::Result<()> {
    let source = Arc::new(build_source(config)?);
    let handle = scheduler::start(source, config);

    let mut frame = tokio::time::interval(std::time::Duration::from_secs(1));
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = frame.tick() => render(&handle.snapshot().await)?,
            res = &mut ctrl_c => {
                res.context("Failed to listen for ctrl-c")?;
                break;
            }
        }
    }

    handle.shutdown().await;
    println!("\nStopped.");
    Ok(())
}

fn render(snapshot: &DashboardSnapshot) -> anyhow::Result<()> {
    let mut out = std::io::stdout().lock();

    // Clear screen, cursor home.
    write!(out, "\x1b[2J\x1b[H")?;
    writeln!(out, "Regional Weather Forecast")?;
    writeln!(out, "{}", snapshot.clock.now.format("%A, %d %B %Y %H:%M:%S"))?;
    writeln!(out, "Next update in: {} seconds", snapshot.clock.countdown)?;
    writeln!(out)?;

    if snapshot.records.is_empty() {
        writeln!(out, "Waiting for the first forecast...")?;
    } else {
        for record in &snapshot.records {
            writeln!(out, "{}", card_line(record))?;
        }
    }

    out.flush()?;
    Ok(())
}

fn card_line(record: &DisplayRecord) -> String {
    format!(
        "{:<24} {:>5.1}°C  {:<24} humidity {:>3.0}%  at {}",
        record.region,
        record.temperature_c,
        record.description,
        record.humidity_pct,
        record.local_time.format("%H:%M"),
    )
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    config.area = inquire::Text::new("BMKG area (adm1) code:")
        .with_default(&config.area)
        .prompt()?;
    config.sample_size = inquire::CustomType::<usize>::new("Regions per refresh:")
        .with_default(config.sample_size)
        .prompt()?;
    config.refresh_secs = inquire::CustomType::<u64>::new("Refresh interval in seconds:")
        .with_default(config.refresh_secs)
        .prompt()?;

    config.save()?;
    println!(
        "Saved configuration to {}",
        Config::config_file_path()?.display()
    );
    Ok(())
}
