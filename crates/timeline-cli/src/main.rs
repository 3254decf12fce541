//! `timeline` CLI — build stream viewing timelines from candidate files.
//!
//! ## Usage
//!
//! ```sh
//! # Build the schedule (stdin → stdout)
//! cat data.json | timeline schedule
//!
//! # From file to file, rendered in a local zone
//! timeline schedule -i data.json -o schedule.json --tz America/Los_Angeles
//!
//! # Override the switch policy
//! timeline schedule -i data.json --margin 2 --warm-up-minutes 5
//!
//! # What is on the air at an instant, best first
//! timeline eligible -i data.json --at 2019-01-17T19:00:00Z
//!
//! # Coverage summary
//! timeline stats -i data.json
//! ```

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use chrono_tz::Tz;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::io::{self, Read};
use timeline_engine::{
    covered_minutes, find_gaps, loader, parse_candidates, window, Candidate, ScheduleBuilder,
    Segment, SwitchPolicy,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "timeline",
    version,
    about = "Build a single viewing timeline from prioritized candidate streams"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the schedule and write it as JSON
    Schedule {
        /// Input candidate file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// IANA time zone for rendered instants (e.g., "America/Los_Angeles")
        #[arg(long)]
        tz: Option<String>,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
        #[command(flatten)]
        policy: PolicyArgs,
    },
    /// List the candidates eligible at an instant, best first
    Eligible {
        /// Input candidate file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Instant to inspect (RFC 3339 or "Thu Jan 17 10:12:00 PST 2019")
        #[arg(long)]
        at: String,
    },
    /// Show coverage statistics for the built schedule
    Stats {
        /// Input candidate file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        #[command(flatten)]
        policy: PolicyArgs,
    },
}

/// Overrides for the switch policy constants.
#[derive(Args)]
struct PolicyArgs {
    /// Minutes an estimated stream must run before it can be picked
    #[arg(long)]
    warm_up_minutes: Option<u32>,
    /// Priority gap a challenger must exceed to preempt the current stream
    #[arg(long, allow_negative_numbers = true)]
    margin: Option<i32>,
    /// Priority that is never interrupted
    #[arg(long, allow_negative_numbers = true)]
    pinned_priority: Option<i32>,
}

impl PolicyArgs {
    fn to_builder(&self) -> Result<ScheduleBuilder> {
        let mut policy = SwitchPolicy::default();
        if let Some(minutes) = self.warm_up_minutes {
            policy = policy.with_warm_up_minutes(minutes);
        }
        if let Some(margin) = self.margin {
            policy = policy.with_hysteresis_margin(margin);
        }
        if let Some(priority) = self.pinned_priority {
            policy = policy.with_pinned_priority(priority);
        }
        ScheduleBuilder::new(policy).context("Invalid policy options")
    }
}

/// A segment as written by the CLI, with instants rendered in the chosen zone.
#[derive(Serialize)]
struct SegmentView {
    channel: String,
    #[serde(rename = "streamId")]
    stream_id: u64,
    #[serde(rename = "startsAt")]
    starts_at: String,
    #[serde(rename = "endsAt")]
    ends_at: String,
}

impl SegmentView {
    fn render(segment: &Segment, tz: Option<Tz>) -> Self {
        Self {
            channel: segment.label.clone(),
            stream_id: segment.candidate_id,
            starts_at: format_instant(segment.starts_at, tz),
            ends_at: format_instant(segment.ends_at, tz),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Schedule {
            input,
            output,
            tz,
            pretty,
            policy,
        } => {
            let builder = policy.to_builder()?;
            let tz = parse_zone(tz.as_deref())?;
            let candidates = load_candidates(input.as_deref())?;

            let segments = builder.build(&candidates);
            info!(
                candidates = candidates.len(),
                segments = segments.len(),
                "schedule built"
            );

            let views: Vec<SegmentView> = segments
                .iter()
                .map(|s| SegmentView::render(s, tz))
                .collect();
            let json = if pretty {
                serde_json::to_string_pretty(&views)?
            } else {
                serde_json::to_string(&views)?
            };
            write_output(output.as_deref(), &json)?;
        }
        Commands::Eligible { input, at } => {
            let t = loader::parse_instant(&at)
                .with_context(|| format!("Failed to parse --at instant: {}", at))?;
            let candidates = load_candidates(input.as_deref())?;
            for c in window::eligible(t, &candidates) {
                println!("{}\t{}\t{}\t{}", c.id, c.priority, c.kind, c.label);
            }
        }
        Commands::Stats { input, policy } => {
            let builder = policy.to_builder()?;
            let candidates = load_candidates(input.as_deref())?;
            print_stats(&candidates, &builder);
        }
    }

    Ok(())
}

/// Install the stderr subscriber. `RUST_LOG` wins over `-v` flags.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(io::stderr)
        .init();
}

fn print_stats(candidates: &[Candidate], builder: &ScheduleBuilder) {
    println!("Candidates: {}", candidates.len());
    let Some((span_start, span_end)) = window::span(candidates) else {
        println!("Segments:   0");
        return;
    };

    let segments = builder.build(candidates);
    let gaps = find_gaps(&segments, span_start, span_end);
    let gap_minutes: i64 = gaps.iter().map(|g| g.duration_minutes).sum();

    println!(
        "Span:       {} to {}",
        format_instant(span_start, None),
        format_instant(span_end, None)
    );
    println!("Segments:   {}", segments.len());
    println!("Covered:    {} min", covered_minutes(&segments));
    println!("Gaps:       {} ({} min)", gaps.len(), gap_minutes);
}

fn parse_zone(tz: Option<&str>) -> Result<Option<Tz>> {
    tz.map(|name| {
        name.parse::<Tz>()
            .map_err(|_| anyhow::anyhow!("Unknown time zone: '{}'", name))
    })
    .transpose()
}

fn format_instant(t: DateTime<Utc>, tz: Option<Tz>) -> String {
    match tz {
        Some(tz) => tz
            .from_utc_datetime(&t.naive_utc())
            .to_rfc3339_opts(SecondsFormat::Secs, true),
        None => t.to_rfc3339_opts(SecondsFormat::Secs, true),
    }
}

fn load_candidates(path: Option<&str>) -> Result<Vec<Candidate>> {
    let json = read_input(path)?;
    parse_candidates(&json).context("Failed to parse candidate file")
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
