//! Vitiscan command-line entry point
//!
//! Scans photos for EXIF location and capture time, and optionally prints
//! the treatment-plan request each photo would produce.

use anyhow::Result;
use clap::Parser;
use std::path::Path;
use tracing::{Level, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use vitiscan::{Cli, Config, OutputFormat, ScanRecord, Scanner, TreatmentRequest};

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.sample_config {
        print!("{}", Config::sample_config());
        return Ok(());
    }

    let config = load_config(&cli)?;
    let _guard = setup_logging(&cli, &config)?;

    info!(version = env!("CARGO_PKG_VERSION"), "Vitiscan starting");
    if let Some(ref config_path) = cli.config {
        info!(config_file = %config_path.display(), "Configuration loaded from file");
    }
    info!(
        diagnosis_url = %config.diagnosis_url(),
        diseases_url = %config.diseases_url(),
        solutions_url = %config.solutions_url(),
        debug = config.debug,
        hemisphere = ?config.hemisphere,
        "Configuration loaded"
    );

    if cli.inputs.is_empty() {
        anyhow::bail!("No input files or directories given");
    }
    let area_ha = cli.treatment_area()?;

    let solutions_url = config.debug.then(|| config.solutions_url());
    let scanner = Scanner::new(config);
    let records = scanner.run(&cli.inputs)?;

    match (&cli.label, area_ha) {
        (Some(label), Some(area_ha)) => {
            print_requests(&cli, label, area_ha, &records, solutions_url.as_deref())?
        }
        _ => print_records(cli.format, &records)?,
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<Config> {
    let config = match cli.config {
        Some(ref config_path) => {
            let file_config = Config::load_from_file(config_path)?;
            cli.merge_with_config(file_config)
        }
        None => cli.to_config(),
    };
    Ok(config)
}

fn print_records(format: OutputFormat, records: &[ScanRecord]) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(records)?),
        OutputFormat::Text => {
            for record in records {
                let source = record.source.display();
                let Some(ref geo) = record.metadata else {
                    println!("{source}\tunreadable\t{}", record.issues.join("; "));
                    continue;
                };
                let location = if geo.has_location() {
                    format!("{:.6}\t{:.6}", geo.longitude, geo.latitude)
                } else {
                    "-\t-".to_string()
                };
                println!("{source}\t{location}\t{}", geo.captured_at);
            }
        }
    }
    Ok(())
}

/// Print one treatment request per readable photo.
/// With `solutions_url` set (debug mode) each payload is echoed to stderr.
fn print_requests(
    cli: &Cli,
    label: &str,
    area_ha: f64,
    records: &[ScanRecord],
    solutions_url: Option<&str>,
) -> Result<()> {
    let mut requests = Vec::with_capacity(records.len());

    for record in records {
        let source = record.source.display();
        let Some(ref geo) = record.metadata else {
            warn!(%source, "Skipping unreadable file");
            continue;
        };
        if !geo.has_location() {
            warn!(%source, "No GPS location in photo, map unavailable");
        }
        let request = TreatmentRequest::new(label, cli.mode, cli.severity, area_ha, geo)?;
        if let Some(url) = solutions_url {
            eprintln!("DEBUG POST {url} ({source}):");
            eprintln!("{}", request.to_json_pretty()?);
        }
        requests.push(request);
    }

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&requests)?),
        OutputFormat::Text => {
            for request in &requests {
                println!("{}", serde_json::to_string(request)?);
            }
        }
    }
    Ok(())
}

fn setup_logging(cli: &Cli, config: &Config) -> Result<Option<WorkerGuard>> {
    let level = if config.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };

    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let subscriber = tracing_subscriber::registry().with(env_filter);

    let Some(ref log_path) = cli.log_file else {
        if cli.json_log {
            subscriber
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        } else {
            subscriber.with(fmt::layer().with_writer(std::io::stderr)).init();
        }
        return Ok(None);
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(open_log_file(log_path)?);

    if cli.json_log {
        subscriber
            .with(fmt::layer().json().with_ansi(false).with_writer(non_blocking))
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    Ok(Some(guard))
}

fn open_log_file(log_path: &Path) -> Result<std::fs::File> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    Ok(std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(log_path)?)
}
