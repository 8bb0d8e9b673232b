//! `slots` CLI: compute bookable appointment slots from a JSON request.
//!
//! ## Usage
//!
//! ```sh
//! # Compute slots (stdin → stdout)
//! slots compute < request.json
//!
//! # From file to file, only offering free slots
//! slots compute -i request.json -o slots.json --available-only
//!
//! # Pin the clock (slots at or before this instant are not offered)
//! slots compute -i request.json --now 2026-03-16T08:00:00Z
//!
//! # Check a request without computing anything
//! slots validate -i request.json
//!
//! # Show engine decisions on stderr
//! slots --verbose compute -i request.json
//! ```
//!
//! ## Request format
//!
//! ```json
//! {
//!   "startDate": "2026-03-16",
//!   "endDate": "2026-03-17",
//!   "durationMinutes": 60,
//!   "granularityMinutes": 15,
//!   "bufferMinutes": 15,
//!   "workingHours": { "mode": "simple", "startHour": 9, "endHour": 17, "workDays": [1, 2, 3, 4, 5] },
//!   "calendars": [
//!     { "id": "office", "role": "blocking", "busy": [{ "start": "2026-03-16T10:00:00Z", "end": "2026-03-16T10:30:00Z" }] }
//!   ]
//! }
//! ```

use std::io::{self, Read};

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use slot_engine::{
    collect_blocking_busy, compute_availability, LocalCalendar, SlotQuery, SlotsResponse,
    WorkingHoursSpec,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "slots",
    version,
    about = "Bookable appointment slots from working hours and calendar busy time"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log engine decisions to stderr (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute slots and their availability
    Compute {
        /// Request file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// RFC 3339 instant to treat as "now" (defaults to the system clock)
        #[arg(long)]
        now: Option<String>,
        /// Drop unavailable slots from the output
        #[arg(long)]
        available_only: bool,
    },
    /// Validate a request without computing slots
    Validate {
        /// Request file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

/// One availability query as the booking page sends it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SlotRequest {
    #[serde(flatten)]
    query: SlotQuery,
    /// Overrides the buffer carried by a simple working-hours spec.
    buffer_minutes: Option<u32>,
    working_hours: WorkingHoursSpec,
    #[serde(default)]
    calendars: Vec<LocalCalendar>,
}

impl SlotRequest {
    fn buffer_minutes(&self) -> u32 {
        self.buffer_minutes
            .or_else(|| self.working_hours.buffer_minutes())
            .unwrap_or(0)
    }

    /// Range to fetch busy time for. Starts one buffer early so an interval
    /// ending just before the first day still blocks its trailing buffer.
    fn busy_window(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let midnight = |date: NaiveDate| date.and_time(NaiveTime::MIN).and_utc();
        let from = midnight(self.query.start_date)
            - Duration::minutes(i64::from(self.buffer_minutes()));
        (from, midnight(self.query.end_date))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Compute {
            input,
            output,
            now,
            available_only,
        } => {
            let request = read_request(input.as_deref())?;
            let now = match now.as_deref() {
                Some(text) => parse_instant(text)?,
                None => Utc::now(),
            };

            request.query.validate().context("Invalid slot request")?;

            let buffer = request.buffer_minutes();
            let (from, to) = request.busy_window();
            let busy = collect_blocking_busy(&request.calendars, from, to)
                .context("Failed to collect busy intervals")?;

            let mut slots =
                compute_availability(&request.query, &request.working_hours, &busy, buffer, now)
                    .context("Failed to compute slots")?;

            let total = slots.len();
            if available_only {
                slots.retain(|slot| slot.available);
            }
            info!(
                total,
                returned = slots.len(),
                busy = busy.len(),
                buffer_minutes = buffer,
                "computed slots"
            );

            let json = SlotsResponse::from(slots)
                .to_json_pretty()
                .context("Failed to serialize slots")?;
            write_output(output.as_deref(), &json)?;
        }
        Commands::Validate { input } => {
            let request = read_request(input.as_deref())?;
            request.query.validate().context("Invalid slot request")?;
            let schedule = request
                .working_hours
                .resolve()
                .context("Invalid slot request")?;

            println!(
                "valid: {} working windows per week, {} calendars, buffer {} minutes",
                schedule.window_count(),
                request.calendars.len(),
                request.buffer_minutes()
            );
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn parse_instant(text: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("Invalid --now instant '{}' (expected RFC 3339)", text))
}

fn read_request(path: Option<&str>) -> Result<SlotRequest> {
    let text = read_input(path)?;
    serde_json::from_str(&text).context("Failed to parse slot request JSON")
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
