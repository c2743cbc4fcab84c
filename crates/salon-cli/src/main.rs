//! `salon` CLI: query availability and create online bookings against a
//! salon snapshot file.
//!
//! ## Usage
//!
//! ```sh
//! # Free slots for every active professional on one date
//! salon slots --data salon.json --service <uuid> --date 2026-03-16
//!
//! # A week of slots for two professionals, evaluated at a fixed instant
//! salon slots --data salon.json --service <uuid> --date 2026-03-16 --days 7 \
//!     --professional <uuid> --professional <uuid> --now 2026-03-16T08:00:00Z
//!
//! # Active appointments overlapping a range
//! salon check --data salon.json --professional <uuid> \
//!     --start 2026-03-16T10:00:00Z --end 2026-03-16T11:00:00Z
//!
//! # Book, writing the updated snapshot back to salon.json
//! salon book --data salon.json --service <uuid> --professional <uuid> \
//!     --start 2026-03-16T10:00:00Z --name "Marta Gomez" --phone 1166667777
//! ```

mod logging;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use salon_booking::{
    AvailabilityService, BookingRequest, BookingService, Clock, DayAvailability, FixedClock,
    InMemorySalon, SalonSettings, SystemClock,
};
use serde::Serialize;
use slot_engine::{Slot, TimeRange};
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "salon", version, about = "Salon availability and booking CLI")]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every subcommand.
#[derive(Args)]
struct StoreArgs {
    /// Salon snapshot (JSON)
    #[arg(long)]
    data: PathBuf,
    /// Salon settings (TOML); defaults apply when omitted
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List bookable slots for a service
    Slots {
        #[command(flatten)]
        store: StoreArgs,
        /// Service id
        #[arg(long)]
        service: Uuid,
        /// First date (YYYY-MM-DD, salon wall clock); defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Professional id; repeat for several. Omit for every active professional
        #[arg(long = "professional")]
        professionals: Vec<Uuid>,
        /// Number of consecutive dates to query
        #[arg(long, default_value_t = 1)]
        days: u32,
        /// Evaluate as of this instant (RFC 3339) instead of the system clock
        #[arg(long)]
        now: Option<DateTime<Utc>>,
    },
    /// List active appointments overlapping a time range
    Check {
        #[command(flatten)]
        store: StoreArgs,
        /// Professional id
        #[arg(long)]
        professional: Uuid,
        /// Range start (RFC 3339)
        #[arg(long)]
        start: DateTime<Utc>,
        /// Range end (RFC 3339)
        #[arg(long)]
        end: DateTime<Utc>,
    },
    /// Create an online booking
    Book {
        #[command(flatten)]
        store: StoreArgs,
        /// Service id
        #[arg(long)]
        service: Uuid,
        /// Professional id
        #[arg(long)]
        professional: Uuid,
        /// Appointment start (RFC 3339)
        #[arg(long)]
        start: DateTime<Utc>,
        /// Expected end (RFC 3339); rejected unless it matches the service duration
        #[arg(long)]
        end: Option<DateTime<Utc>>,
        /// Client name
        #[arg(long)]
        name: String,
        /// Client phone
        #[arg(long)]
        phone: String,
        #[arg(long)]
        notes: Option<String>,
        /// Where to write the updated snapshot (defaults to --data)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Booking instant (RFC 3339) instead of the system clock
        #[arg(long)]
        now: Option<DateTime<Utc>>,
    },
}

#[derive(Serialize)]
struct SlotsOutput {
    availability: Vec<ProfessionalDay>,
    failures: Vec<FailureOutput>,
}

#[derive(Serialize)]
struct ProfessionalDay {
    professional_id: Uuid,
    date: NaiveDate,
    slots: Vec<Slot>,
}

#[derive(Serialize)]
struct FailureOutput {
    professional_id: Uuid,
    date: NaiveDate,
    reason: String,
}

impl SlotsOutput {
    fn from_days(days: Vec<DayAvailability>) -> Self {
        let mut output = Self {
            availability: Vec::new(),
            failures: Vec::new(),
        };
        for day in days {
            let date = day.date;
            output
                .availability
                .extend(day.professionals.into_iter().map(|p| ProfessionalDay {
                    professional_id: p.professional_id,
                    date,
                    slots: p.slots,
                }));
            output
                .failures
                .extend(day.failures.into_iter().map(|f| FailureOutput {
                    professional_id: f.professional_id,
                    date,
                    reason: f.reason,
                }));
        }
        output
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Commands::Slots {
            store,
            service,
            date,
            professionals,
            days,
            now,
        } => {
            let (salon, settings) = open(&store)?;
            let clock = FixedClock(now.unwrap_or_else(Utc::now));
            let first = date.unwrap_or_else(|| clock.today(settings.utc_offset));
            let availability = AvailabilityService::new(&salon, &clock, &settings);

            let mut results = Vec::new();
            for date in first.iter_days().take(days as usize) {
                let day = availability
                    .slots_for_professionals(service, date, &professionals)
                    .with_context(|| format!("Failed to compute availability for {date}"))?;
                results.push(day);
            }
            print_json(&SlotsOutput::from_days(results))?;
        }
        Commands::Check {
            store,
            professional,
            start,
            end,
        } => {
            let (salon, settings) = open(&store)?;
            let booking = BookingService::new(&salon, &SystemClock, &settings);
            let conflicts = booking
                .conflicts(professional, &TimeRange::new(start, end))
                .context("Failed to check conflicts")?;
            debug!(conflicts = conflicts.len(), "conflict check done");
            print_json(&conflicts)?;
        }
        Commands::Book {
            store,
            service,
            professional,
            start,
            end,
            name,
            phone,
            notes,
            output,
            now,
        } => {
            let (salon, settings) = open(&store)?;
            let clock = FixedClock(now.unwrap_or_else(Utc::now));
            let booking = BookingService::new(&salon, &clock, &settings);

            let request = BookingRequest {
                client_name: name,
                client_phone: phone,
                service_id: service,
                professional_id: professional,
                start,
                end,
                notes,
            };
            let appointment = match booking.book(request) {
                Ok(appointment) => appointment,
                Err(err) => {
                    debug!(error = %err, "booking rejected");
                    bail!("{}", err.user_message())
                }
            };

            let target = output.as_deref().unwrap_or(store.data.as_path());
            save(&salon, target)?;
            info!(path = %target.display(), "snapshot saved");
            print_json(&appointment)?;
        }
    }

    Ok(())
}

fn open(args: &StoreArgs) -> Result<(InMemorySalon, SalonSettings)> {
    let settings = match &args.config {
        Some(path) => SalonSettings::load(path)
            .with_context(|| format!("Failed to load settings: {}", path.display()))?,
        None => SalonSettings::default(),
    };
    let raw = std::fs::read_to_string(&args.data)
        .with_context(|| format!("Failed to read file: {}", args.data.display()))?;
    let salon = InMemorySalon::from_json(&raw)
        .with_context(|| format!("Failed to parse snapshot: {}", args.data.display()))?;
    Ok((salon, settings))
}

fn save(salon: &InMemorySalon, path: &Path) -> Result<()> {
    let json = salon.to_json_pretty().context("Failed to serialize snapshot")?;
    std::fs::write(path, json).with_context(|| format!("Failed to write file: {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
