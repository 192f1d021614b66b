mod config;
mod constellation;
mod czml;
mod propagate;
mod sampler;
mod web;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use crate::config::Config;
use crate::constellation::Constellation;
use crate::propagate::Sgp4Propagator;
use crate::sampler::FixedClock;

#[derive(Parser)]
#[command(name = "sat-czml")]
#[command(about = "Satellite ground tracks as CZML documents")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a constellation config file
    Validate { config: PathBuf },
    /// Render CZML for the configured constellation
    Render {
        config: PathBuf,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Render only this satellite's document
        #[arg(short, long)]
        satellite: Option<String>,
        /// Write the documents that succeeded even if some satellites failed
        #[arg(long)]
        partial: bool,
        /// Start the window at this RFC 3339 instant instead of now
        #[arg(long)]
        start: Option<DateTime<Utc>>,
    },
    /// Serve CZML over HTTP
    Serve { config: PathBuf },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { config } => validate(&config),
        Commands::Render {
            config,
            output,
            satellite,
            partial,
            start,
        } => render(
            &config,
            RenderOptions {
                output,
                satellite,
                partial,
                start,
            },
        ),
        Commands::Serve { config } => serve(&config),
    }
}

fn validate(path: &Path) -> ExitCode {
    let (constellation, propagator) = match load_config(path).and_then(|c| build(&c)) {
        Ok(built) => built,
        Err(code) => return code,
    };

    let settings = constellation.settings();
    println!(
        "Constellation is valid ({} satellites, {} steps, timeout {:?})",
        constellation.satellites().len(),
        settings.num_steps,
        settings.worker_timeout
    );

    let mut missing = 0;
    for (i, descriptor) in constellation.satellites().iter().enumerate() {
        let status = match propagator.catalog().get(&descriptor.name) {
            Ok(entry) => format!("NORAD {} ({})", entry.info.norad_id, entry.info.tle_source),
            Err(_) => {
                missing += 1;
                "not in TLE catalog".to_string()
            }
        };
        println!(
            "  {}: {} x{} orbit(s) @ {}x: {}",
            i + 1,
            descriptor.name,
            descriptor.orbit_count,
            descriptor.speed,
            status
        );
    }

    if missing > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

struct RenderOptions {
    output: Option<PathBuf>,
    satellite: Option<String>,
    partial: bool,
    start: Option<DateTime<Utc>>,
}

fn render(path: &Path, options: RenderOptions) -> ExitCode {
    let mut constellation = match load_config(path).and_then(|c| build(&c)) {
        Ok((constellation, _)) => constellation,
        Err(code) => return code,
    };
    if let Some(start) = options.start {
        constellation = constellation.with_clock(Arc::new(FixedClock(start)));
    }

    let (json, failed) = match options.satellite.as_deref() {
        Some(name) => match constellation.execute_one(name) {
            None => {
                eprintln!("Satellite not configured: {}", name);
                return ExitCode::FAILURE;
            }
            Some(Err(e)) => {
                eprintln!("{}: {}", name, e);
                return ExitCode::FAILURE;
            }
            Some(Ok(document)) => (serde_json::to_string_pretty(&document), false),
        },
        None => {
            let report = constellation.execute_all();
            for (name, failure) in &report.failures {
                eprintln!("{} [{}]: {}", name, failure.kind(), failure);
            }
            if !report.is_complete() && !options.partial {
                return ExitCode::FAILURE;
            }
            (
                serde_json::to_string_pretty(&report.documents),
                !report.is_complete(),
            )
        }
    };

    let json = match json {
        Ok(j) => j,
        Err(e) => {
            eprintln!("Serialization error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match options.output {
        Some(file) => {
            if let Err(e) = fs::write(&file, json) {
                eprintln!("Error writing {}: {}", file.display(), e);
                return ExitCode::FAILURE;
            }
            log::info!("Wrote {}", file.display());
        }
        None => println!("{}", json),
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn serve(path: &Path) -> ExitCode {
    let config = match load_config(path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let (constellation, propagator) = match build(&config) {
        Ok(built) => built,
        Err(code) => return code,
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let state = web::AppState {
        constellation: Arc::new(constellation),
        propagator,
    };

    match runtime.block_on(web::run_server(&config.web.bind, state)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: &Path) -> Result<Config, ExitCode> {
    Config::from_file(path).map_err(|e| {
        eprintln!("Config error: {}", e);
        ExitCode::FAILURE
    })
}

fn build(config: &Config) -> Result<(Constellation, Arc<Sgp4Propagator>), ExitCode> {
    let catalog = config.load_catalog().map_err(|e| {
        eprintln!("Error loading TLEs: {}", e);
        ExitCode::FAILURE
    })?;

    let propagator = Arc::new(Sgp4Propagator::new(catalog));
    let constellation = config.constellation(propagator.clone()).map_err(|e| {
        eprintln!("Invalid constellation: {}", e);
        ExitCode::FAILURE
    })?;

    Ok((constellation, propagator))
}
