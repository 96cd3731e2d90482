//! `freeslots` CLI — compute free calendar slots and convert them between timezones.
//!
//! ## Usage
//!
//! ```sh
//! # Free slots for a work week, busy times from two calendars
//! freeslots slots --from 2024-06-03 --to 2024-06-07 \
//!   --work-start 09:00 --work-end 17:00 \
//!   --busy work.json --busy personal.json
//!
//! # Busy times on stdin, slots shown in Tokyo time
//! cat busy.json | freeslots slots --from 2024-06-03 --to 2024-06-03 \
//!   --timezone America/New_York --display-timezone Asia/Tokyo --busy -
//!
//! # Options from a TOML file (flags override it)
//! freeslots slots --config availability.toml --from 2024-06-03 --to 2024-06-07
//!
//! # Convert an existing slot list
//! freeslots convert --from-timezone America/New_York --to-timezone Europe/Berlin -i slots.json
//! ```
//!
//! Busy files are JSON arrays of `{"date": "YYYY-MM-DD", "start": "HH:MM", "end": "HH:MM"}`.

use std::io::{self, Read};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use slot_engine::{
    collect_busy, find_availability, AvailabilityConfig, AvailabilityRequest, BusyInterval,
    BusySource, BusyStream, FreeSlot, Timezone, WorkingWindow,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "freeslots",
    version,
    about = "Find free calendar slots across timezones"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute free slots from busy intervals
    Slots {
        /// First date of the range (YYYY-MM-DD, inclusive)
        #[arg(long)]
        from: String,
        /// Last date of the range (YYYY-MM-DD, inclusive)
        #[arg(long)]
        to: String,
        /// IANA timezone the busy intervals are expressed in
        #[arg(long)]
        timezone: Option<String>,
        /// Start of the daily working window (HH:MM)
        #[arg(long, requires = "work_end")]
        work_start: Option<String>,
        /// End of the daily working window (HH:MM, 24:00 allowed)
        #[arg(long, requires = "work_start")]
        work_end: Option<String>,
        /// Include Saturdays and Sundays
        #[arg(long, overrides_with = "no_weekends")]
        weekends: bool,
        /// Skip Saturdays and Sundays, even if the config file includes them
        #[arg(long, overrides_with = "weekends")]
        no_weekends: bool,
        /// Drop free slots shorter than this many minutes
        #[arg(long)]
        min_slot: Option<u16>,
        /// JSON file of busy intervals for one calendar ("-" for stdin); repeatable
        #[arg(long)]
        busy: Vec<String>,
        /// TOML file with default options
        #[arg(long)]
        config: Option<String>,
        /// Re-express the resulting slots in this IANA timezone
        #[arg(long)]
        display_timezone: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Convert a JSON list of free slots between timezones
    Convert {
        /// IANA timezone the slots are expressed in
        #[arg(long)]
        from_timezone: String,
        /// IANA timezone to express the slots in
        #[arg(long)]
        to_timezone: String,
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match cli.command {
        Commands::Slots {
            from,
            to,
            timezone,
            work_start,
            work_end,
            weekends,
            no_weekends,
            min_slot,
            busy,
            config,
            display_timezone,
            output,
        } => {
            let mut config = match config {
                Some(path) => {
                    let raw = std::fs::read_to_string(&path)
                        .with_context(|| format!("Failed to read config file: {}", path))?;
                    AvailabilityConfig::from_toml_str(&raw)
                        .with_context(|| format!("Failed to parse config file: {}", path))?
                }
                None => AvailabilityConfig::default(),
            };
            if let Some(tz) = timezone {
                config.timezone = Timezone::parse(&tz)?;
            }
            if let (Some(start), Some(end)) = (work_start, work_end) {
                config.working_hours = Some(WorkingWindow::parse(&start, &end)?);
            }
            if weekends {
                config.include_weekends = true;
            } else if no_weekends {
                config.include_weekends = false;
            }
            if let Some(minutes) = min_slot {
                config.min_slot_minutes = minutes;
            }
            let display_timezone = display_timezone
                .map(|tz| Timezone::parse(&tz))
                .transpose()?;

            let request = AvailabilityRequest::parse(&from, &to, config)?;
            let sources = load_busy_sources(&busy)?;
            let intervals = collect_busy(&sources, &request.range, &request.config.timezone);

            let mut availability = find_availability(&intervals, &request);
            if let Some(target) = display_timezone {
                availability = availability.in_timezone(&target);
            }

            let json = serde_json::to_string_pretty(&availability)?;
            write_output(output.as_deref(), &json)?;
        }
        Commands::Convert {
            from_timezone,
            to_timezone,
            input,
            output,
        } => {
            let source = Timezone::parse(&from_timezone)?;
            let target = Timezone::parse(&to_timezone)?;
            let raw = read_input(input.as_deref())?;
            let slots: Vec<FreeSlot> =
                serde_json::from_str(&raw).context("Failed to parse free slots JSON")?;

            let converted = slot_engine::convert_slots(&slots, &source, &target);
            let json = serde_json::to_string_pretty(&converted)?;
            write_output(output.as_deref(), &json)?;
        }
    }

    Ok(())
}

/// Load one busy source per `--busy` argument.
///
/// A file that cannot be read is skipped with a warning, the same way an
/// unreachable calendar contributes no busy time. A file that reads but holds
/// malformed intervals is an error.
fn load_busy_sources(paths: &[String]) -> Result<Vec<Box<dyn BusySource>>> {
    let mut sources: Vec<Box<dyn BusySource>> = Vec::new();
    for path in paths {
        let raw = match read_input(Some(path.as_str()).filter(|p| *p != "-")) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(source = %path, error = %e, "skipping unreadable busy source");
                continue;
            }
        };
        let intervals: Vec<BusyInterval> = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid busy intervals in {}", path))?;
        sources.push(Box::new(BusyStream::new(path.clone(), intervals)));
    }
    Ok(sources)
}

fn init_logger(verbose: bool) {
    let default_filter = if verbose {
        "slot_engine=debug,slot_engine_cli=debug,warn"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
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
