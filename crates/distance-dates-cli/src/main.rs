//! `distance-dates`: compute how far apart two dates are and build calendar
//! reminders from the command line.
//!
//! The range is described the way the web page receives it, as a query
//! string (`--query "?min=2020-01-01&max=2020-06-01&unit=weeks"`).

use std::borrow::Cow;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use distance_dates::{
    validate_relative_date_range_payload, DistanceDates, DistanceDatesOptions, LoggingOptions,
    RelativeRangePayload, TracingSink,
};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "distance-dates", version, about = "Distance between two dates, in a chosen unit")]
struct Cli {
    /// TOML options file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Range as a query string, e.g. "?min=2020-01-01&max=2020-06-01&unit=weeks"
    #[arg(long, global = true, default_value = "")]
    query: String,

    /// Pretend the current instant is this RFC 3339 timestamp
    #[arg(long, global = true)]
    now: Option<DateTime<Utc>>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the range and its duration (default)
    Show {
        /// Print a JSON snapshot instead
        #[arg(long)]
        json: bool,
    },
    /// List candidate dates inside the range
    Sequence {
        /// Units between two dates
        #[arg(long, default_value_t = 1)]
        count: u32,
        /// Days added to the first date
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        offset: i64,
        /// Stop after this many dates
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Resolve "COUNT UNIT in DIRECTION" from now
    Relative {
        #[arg(long, allow_negative_numbers = true)]
        count: f64,
        #[arg(long)]
        unit: String,
        #[arg(long)]
        direction: String,
    },
    /// Build the calendar reminder for a date
    Link {
        #[arg(long)]
        date: NaiveDate,
        /// Print the event text instead of the URL
        #[arg(long)]
        text: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let options = match &cli.config {
        Some(path) => DistanceDatesOptions::load(path)
            .with_context(|| format!("failed to load options from {}", path.display()))?,
        None => DistanceDatesOptions::default(),
    };
    init_tracing(&options.logging)?;

    let now = cli.now.unwrap_or_else(Utc::now);
    let mut session = DistanceDates::with_sink(options, now, Box::new(TracingSink))
        .context("failed to start session")?;

    session.mutate(parse_query(&cli.query));

    match cli.command.unwrap_or(Command::Show { json: false }) {
        Command::Show { json } => show(&session, json),
        Command::Sequence {
            count,
            offset,
            limit,
        } => {
            let dates = session.date_sequence(count, offset)?;
            for date in dates.take(limit.unwrap_or(usize::MAX)) {
                println!(
                    "{}\t{}",
                    date.to_iso_date(),
                    date.format_long(&session.options().locale)
                );
            }
            Ok(())
        }
        Command::Relative {
            count,
            unit,
            direction,
        } => {
            let payload = RelativeRangePayload::new(count, direction, unit);
            let calculate = validate_relative_date_range_payload(&payload)?;
            let date = session.relative_date(now, &calculate)?;
            println!(
                "{}\t{}",
                date.value.format("%Y-%m-%dT%H:%M:%S"),
                date.format_long(&session.options().locale)
            );
            Ok(())
        }
        Command::Link { date, text } => {
            if text {
                println!("{}", session.calendar_event_text(date)?);
            } else {
                println!("{}", session.calendar_link(date)?);
            }
            Ok(())
        }
    }
}

fn show(session: &DistanceDates, json: bool) -> Result<()> {
    let duration = session.duration()?;
    let state = session.state();
    if json {
        let mut snapshot = state.snapshot();
        snapshot["duration"] = duration.into();
        snapshot["today"] = session.today().to_string().into();
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        println!("direction: {}", state.direction());
        println!("min:       {}", state.min());
        println!("max:       {}", state.max());
        println!("anchor:    {}", state.anchor());
        println!("locale:    {}", state.locale());
        println!("duration:  {duration} {}", state.unit());
    }
    Ok(())
}

/// Decode `?key=value&...` into pairs, leaving field filtering to the session.
fn parse_query(query: &str) -> Vec<(Cow<'_, str>, Cow<'_, str>)> {
    let query = query.trim().trim_start_matches('?');
    url::form_urlencoded::parse(query.as_bytes()).collect()
}

/// Logs go to stderr; `RUST_LOG` overrides the configured level.
fn init_tracing(logging: &LoggingOptions) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .with_context(|| format!("invalid log level '{}'", logging.level))?;

    let builder = fmt().with_env_filter(filter).with_writer(std::io::stderr);
    let result = match logging.format.as_str() {
        "json" => builder.json().try_init(),
        _ => builder.try_init(),
    };
    if let Err(err) = result {
        tracing::debug!(error = %err, "tracing subscriber already set, continuing");
    }
    Ok(())
}
