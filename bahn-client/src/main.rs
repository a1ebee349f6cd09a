//! `bahn` - query the timetable services from the command line.
//!
//! Prints each decoded result as pretty JSON on stdout.

use std::path::PathBuf;
use std::process;

use chrono::{Local, NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use bahn_client::api::{ApiClient, ApiConfig, ApiError};
use bahn_client::cache::CacheConfig;
use bahn_client::domain::EvaId;

#[derive(Parser)]
#[command(name = "bahn")]
#[command(about = "Query Deutsche Bahn timetable services", long_about = None)]
struct Args {
    /// Also cache responses on disk in this directory
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Station metadata
    Station {
        /// EVA number, e.g. 8000105
        eva: EvaId,
    },
    /// Planned timetable for one hour
    Plan {
        eva: EvaId,
        /// Any time within the hour (YYYY-MM-DDTHH:MM, default: now)
        #[arg(long, value_parser = parse_at)]
        at: Option<NaiveDateTime>,
    },
    /// Real-time changes for a station
    Changes {
        eva: EvaId,
        /// Only changes from the last two minutes
        #[arg(long)]
        recent: bool,
    },
    /// Wing train definition
    Wings {
        /// Trip id of the parent train
        parent: String,
        /// Trip id of the wing train
        wing: String,
    },
    /// Coach sequence for a train
    Coaches {
        /// Train number, e.g. 1095
        line: String,
        /// Departure time (YYYY-MM-DDTHH:MM, default: now)
        #[arg(long, value_parser = parse_at)]
        at: Option<NaiveDateTime>,
    },
    /// Journey search by train name
    Suggest {
        /// Train name, e.g. "ICE 1095"
        line: String,
        /// Travel date (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// HAFAS disruption messages for a journey
    Messages {
        /// Train link from a suggestion
        train_link: String,
    },
}

fn parse_at(s: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|e| format!("expected YYYY-MM-DDTHH:MM: {e}"))
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("Error formatting result: {}", e),
    }
}

async fn run(client: &ApiClient, command: Command) -> Result<(), ApiError> {
    let now = Local::now().naive_local();
    match command {
        Command::Station { eva } => print_json(&client.station(eva).await?),
        Command::Plan { eva, at } => print_json(&client.timetable(eva, at.unwrap_or(now)).await?),
        Command::Changes { eva, recent: true } => {
            print_json(&client.realtime_recent(eva, now).await?)
        }
        Command::Changes { eva, recent: false } => {
            print_json(&client.realtime_all(eva, now).await?)
        }
        Command::Wings { parent, wing } => {
            print_json(&client.wing_definition(&parent, &wing).await?)
        }
        Command::Coaches { line, at } => {
            print_json(&client.coach_sequence(&line, at.unwrap_or(now)).await?)
        }
        Command::Suggest { line, date } => {
            let date = date.unwrap_or(now.date());
            print_json(&client.suggestions(&line, date).await?)
        }
        Command::Messages { train_link } => print_json(&client.hafas_messages(&train_link).await?),
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let mut cache_config = CacheConfig::default();
    if let Some(dir) = args.cache_dir {
        cache_config = cache_config.with_disk_dir(dir);
    }

    let client = match ApiClient::new(ApiConfig::from_env(), &cache_config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error creating API client: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run(&client, args.command).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
