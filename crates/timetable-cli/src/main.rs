//! `timetable` CLI — lay out, query and export a planner snapshot.
//!
//! ## Usage
//!
//! ```sh
//! # Render the active schedule as a text grid
//! timetable grid -i planner.json
//!
//! # Same, with a custom grid shape
//! timetable grid -i planner.json --config grid.json
//!
//! # Resolved blocks (and dropped conflicts) as JSON
//! timetable blocks -i planner.json -o blocks.json
//!
//! # Does subject 3 meet on a given date?
//! timetable occurs -i planner.json --subject 3 --date 2025-10-13
//!
//! # Days with activities in a month, and one week's activities
//! timetable calendar -i planner.json --month 2025-10
//! timetable week -i planner.json --date 2025-10-15
//!
//! # Row labels, and a portable copy of a schedule
//! timetable labels
//! timetable export -i planner.json --schedule 1
//! ```

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, Read};
use timetable_engine::calendar::{self, WeekRange};
use timetable_engine::render::render_grid;
use timetable_engine::{slots, GridConfig, OccurrencePolicy, Planner, Schedule, WeekDay};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "timetable",
    version,
    about = "Weekly timetable layout and calendar CLI"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Grid configuration JSON file (defaults: 08:00 start, 45-minute slots,
    /// Monday-Friday, 12 rows)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Log more (-v debug, -vv trace). RUST_LOG overrides per target.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a schedule as a text grid
    Grid {
        /// Planner snapshot (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Schedule id (defaults to the active schedule)
        #[arg(long)]
        schedule: Option<String>,
    },
    /// Print resolved blocks and dropped conflicts as JSON
    Blocks {
        /// Planner snapshot (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Schedule id (defaults to the active schedule)
        #[arg(long)]
        schedule: Option<String>,
    },
    /// Check whether a subject meets on a date, and when
    Occurs {
        /// Planner snapshot (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Subject id
        #[arg(long)]
        subject: String,
        /// Calendar date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
        /// How to pick among several meetings on the same weekday
        #[arg(long, value_enum, default_value_t = PolicyArg::Earliest)]
        policy: PolicyArg,
        /// Schedule id (defaults to the active schedule)
        #[arg(long)]
        schedule: Option<String>,
    },
    /// List the days of a month that have activities
    Calendar {
        /// Planner snapshot (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Month (YYYY-MM)
        #[arg(long)]
        month: String,
    },
    /// List the activities of the week containing a date
    Week {
        /// Planner snapshot (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Any date in the week (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Print the grid's row labels
    Labels,
    /// Export a schedule as JSON
    Export {
        /// Planner snapshot (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Schedule id (defaults to the active schedule)
        #[arg(long)]
        schedule: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    /// Earliest start wins
    Earliest,
    /// First meeting in the subject's list wins
    First,
    /// Fail when more than one meeting matches
    Reject,
}

impl From<PolicyArg> for OccurrencePolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Earliest => OccurrencePolicy::EarliestStart,
            PolicyArg::First => OccurrencePolicy::FirstListed,
            PolicyArg::Reject => OccurrencePolicy::RejectAmbiguous,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Grid {
            input,
            output,
            schedule,
        } => {
            let planner = read_planner(input.as_deref())?;
            let schedule = select_schedule(&planner, schedule.as_deref())?;
            let layout = timetable_engine::layout_subjects(&schedule.subjects, &config)
                .with_context(|| format!("Failed to lay out schedule '{}'", schedule.name))?;
            write_output(output.as_deref(), &render_grid(&layout, &config))?;
        }
        Commands::Blocks {
            input,
            output,
            schedule,
        } => {
            let planner = read_planner(input.as_deref())?;
            let schedule = select_schedule(&planner, schedule.as_deref())?;
            let layout = timetable_engine::layout_subjects(&schedule.subjects, &config)
                .with_context(|| format!("Failed to lay out schedule '{}'", schedule.name))?;
            let json = serde_json::to_string_pretty(&layout)?;
            write_output(output.as_deref(), &format!("{}\n", json))?;
        }
        Commands::Occurs {
            input,
            subject,
            date,
            policy,
            schedule,
        } => {
            let planner = read_planner(input.as_deref())?;
            let schedule = select_schedule(&planner, schedule.as_deref())?;
            let found = schedule.subject(&subject).with_context(|| {
                format!("Unknown subject '{}' in schedule '{}'", subject, schedule.name)
            })?;
            let day = WeekDay::of_date(date);
            match timetable_engine::occurs_on(found, date, policy.into())? {
                Some(window) => println!("{} meets on {} ({}) {}", found.title, date, day, window),
                None => println!("{} does not meet on {} ({})", found.title, date, day),
            }
        }
        Commands::Calendar { input, month } => {
            let planner = read_planner(input.as_deref())?;
            let (first, last) = parse_month(&month)?;
            let marked = calendar::days_with_activities(planner.activities(), first, last);
            if marked.is_empty() {
                println!("No activities in {}", month);
            }
            for date in marked {
                let count = calendar::activities_on(planner.activities(), date).len();
                let noun = if count == 1 { "activity" } else { "activities" };
                println!("{}  {} {}", date, count, noun);
            }
        }
        Commands::Week { input, date } => {
            let planner = read_planner(input.as_deref())?;
            let week = WeekRange::containing(date.unwrap_or_else(|| Local::now().date_naive()));
            println!("Week of {}", week);
            for activity in calendar::activities_in_week(planner.activities(), week) {
                let time = activity
                    .time
                    .map(|w| w.to_string())
                    .unwrap_or_else(|| "-".to_string());
                let mut line = format!(
                    "{}  {:<11}  {}",
                    activity.date.format("%a %-d %b"),
                    time,
                    activity.title
                );
                if !activity.description.is_empty() {
                    line.push_str(&format!(" ({})", activity.description));
                }
                println!("{}", line);
            }
        }
        Commands::Labels => {
            for label in slots::labels(&config) {
                println!("{}", label);
            }
        }
        Commands::Export {
            input,
            output,
            schedule,
        } => {
            let planner = read_planner(input.as_deref())?;
            let id = select_schedule(&planner, schedule.as_deref())?.id.clone();
            let export = planner.export_schedule(&id, Utc::now())?;
            let json = serde_json::to_string_pretty(&export)?;
            write_output(output.as_deref(), &format!("{}\n", json))?;
        }
    }

    Ok(())
}

/// Log to stderr so stdout stays clean for JSON output.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(io::stderr)
        .init();
}

fn load_config(path: Option<&str>) -> Result<GridConfig> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path))?;
            GridConfig::from_json(&json).with_context(|| format!("Invalid grid config: {}", path))
        }
        None => Ok(GridConfig::default()),
    }
}

fn read_planner(path: Option<&str>) -> Result<Planner> {
    let json = read_input(path)?;
    Planner::from_json(&json).context("Failed to load planner snapshot")
}

fn select_schedule<'a>(planner: &'a Planner, id: Option<&str>) -> Result<&'a Schedule> {
    match id {
        Some(id) => Ok(planner.schedule(id)?),
        None => planner
            .active_schedule()
            .context("Planner snapshot has no schedules"),
    }
}

/// Parse `YYYY-MM` into the month's first and last day.
fn parse_month(month: &str) -> Result<(NaiveDate, NaiveDate)> {
    let (year, month_number) = month
        .split_once('-')
        .with_context(|| format!("Expected YYYY-MM, got '{}'", month))?;
    let year: i32 = year
        .parse()
        .with_context(|| format!("Invalid year in '{}'", month))?;
    let month_number: u32 = month_number
        .parse()
        .with_context(|| format!("Invalid month in '{}'", month))?;
    calendar::month_range(year, month_number)
        .with_context(|| format!("No such month: '{}'", month))
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
            print!("{}", content);
        }
    }
    Ok(())
}
