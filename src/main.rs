//! EA Flood Monitoring Service - Main Daemon
//!
//! A daemon that continuously:
//! 1. Polls the EA Flood Monitoring API for the configured river gauge stations
//! 2. Projects each station into sensor readouts and a High/Normal/Low status
//! 3. Flags stale readings and repeated poll failures
//! 4. Provides an HTTP endpoint for querying current state
//!
//! Usage:
//!   cargo run --release                    # Start daemon without HTTP endpoint
//!   cargo run --release -- --endpoint 8080 # Start with HTTP endpoint on port 8080
//!   cargo run --release -- --list-stations --river "River Thames"
//!                                          # One-shot station discovery, no daemon
//!
//! Environment:
//!   EAFM_BASE_URL - override the API root (e.g. a stub server in tests)

use eafm_service::config;
use eafm_service::daemon::Daemon;
use eafm_service::endpoint;
use eafm_service::ingest::eafm::{self, StationFilters};
use eafm_service::logging::{self, LogLevel};
use std::env;
use std::time::Duration;

struct CliOptions {
    endpoint_port: Option<u16>,
    list_stations: bool,
    filters: StationFilters,
    log_file: Option<String>,
}

fn parse_args(args: &[String]) -> Result<CliOptions, String> {
    let mut options = CliOptions {
        endpoint_port: None,
        list_stations: false,
        filters: StationFilters::default(),
        log_file: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--endpoint" => {
                let port = args
                    .get(i + 1)
                    .ok_or("--endpoint requires a port number")?
                    .parse()
                    .map_err(|_| "--endpoint requires a numeric port")?;
                options.endpoint_port = Some(port);
                i += 2;
            }
            "--list-stations" => {
                options.list_stations = true;
                i += 1;
            }
            "--river" => {
                let name = args.get(i + 1).ok_or("--river requires a river name")?;
                options.filters.river_name = Some(name.clone());
                i += 2;
            }
            "--town" => {
                let name = args.get(i + 1).ok_or("--town requires a town name")?;
                options.filters.town = Some(name.clone());
                i += 2;
            }
            "--label" => {
                let text = args.get(i + 1).ok_or("--label requires a station label")?;
                options.filters.label = Some(text.clone());
                i += 2;
            }
            "--log-file" => {
                let path = args.get(i + 1).ok_or("--log-file requires a path")?;
                options.log_file = Some(path.clone());
                i += 2;
            }
            other => {
                return Err(format!(
                    "Unknown argument: {}\nUsage: {} [--endpoint PORT] [--log-file PATH] \
                     [--list-stations [--river NAME] [--town NAME] [--label TEXT]]",
                    other, args[0]
                ));
            }
        }
    }

    Ok(options)
}

/// One-shot discovery mode: print the filtered station list the way an
/// operator would pick entries for stations.toml.
fn list_stations(filters: &StationFilters) -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()?;
    let stations = eafm::fetch_stations(&client, &config::base_url(), filters)?;

    if stations.is_empty() {
        println!("No stations matched the given filters.");
        return Ok(());
    }

    // "{label}, {catchment} ({rloi_id})" keyed by reference, sorted by the
    // display name for scanning.
    let mut rows: Vec<(String, String)> = stations
        .iter()
        .map(|station| {
            let mut display = format!(
                "{}, {}",
                station.display_label(),
                station.display_catchment()
            );
            if let Some(rloi_id) = &station.rloi_id {
                display.push_str(&format!(" ({})", rloi_id));
            }
            (display, station.station_reference.clone())
        })
        .collect();
    rows.sort();

    println!("{} stations:", rows.len());
    for (display, reference) in rows {
        println!("   {:<12} {}", reference, display);
    }

    Ok(())
}

fn main() {
    println!("🌊 EA Flood Monitoring Service");
    println!("==============================\n");

    let args: Vec<String> = env::args().collect();
    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{}", message);
            std::process::exit(1);
        }
    };

    logging::init_logger(LogLevel::Info, options.log_file.as_deref());

    // Discovery mode runs once and exits without starting the daemon.
    if options.list_stations {
        if let Err(e) = list_stations(&options.filters) {
            eprintln!("\n❌ Station listing failed: {}\n", e);
            std::process::exit(1);
        }
        return;
    }

    // Create daemon with default configuration (stations.toml overrides)
    let mut daemon = Daemon::new();

    println!("📊 Initializing daemon...");
    if let Err(e) = daemon.initialize() {
        eprintln!("\n❌ Initialization failed: {}\n", e);
        eprintln!("Check stations.toml in the working directory.\n");
        std::process::exit(1);
    }
    println!("✓ Daemon initialized\n");

    println!("📋 Monitored stations:");
    for station in daemon.get_stations() {
        match &station.description {
            Some(description) => println!("   {:<12} {}", station.reference, description),
            None => println!("   {}", station.reference),
        }
    }
    println!();

    // Start HTTP endpoint if requested (in background thread)
    if let Some(port) = options.endpoint_port {
        println!("🚀 Starting HTTP endpoint server...");
        let cache = daemon.cache();
        std::thread::spawn(move || {
            if let Err(e) = endpoint::start_endpoint_server(port, cache) {
                eprintln!("❌ Endpoint server error: {}", e);
            }
        });
        println!("   Endpoint running on http://0.0.0.0:{}\n", port);
    }

    // Run the main monitoring loop
    println!("🔄 Starting continuous monitoring loop...");
    println!(
        "   Poll interval: {} minutes",
        daemon.config().poll_interval_minutes
    );
    println!("   Monitoring {} stations", daemon.get_stations().len());
    println!("   Press Ctrl+C to stop\n");

    if let Err(e) = daemon.run() {
        eprintln!("\n❌ Daemon error: {}", e);
        std::process::exit(1);
    }
}
