use std::path::PathBuf;

use clap::Args;
use playout_core::timeline::{self, Timeline};
use playout_core::{format_duration, Config, NowPlaying};

use crate::common::{clock_arg, load_program, print_json};

#[derive(Args)]
pub struct TimelineArgs {
    /// Program JSON file
    pub program: PathBuf,
    /// Broadcast day start (HH:MM[:SS]); defaults to the configured offset
    #[arg(long)]
    pub offset: Option<String>,
    /// Show only what is on air at this time (HH:MM[:SS])
    #[arg(long)]
    pub at: Option<String>,
    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: TimelineArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let program = load_program(&args.program)?;
    let offset = match &args.offset {
        Some(clock) => clock_arg(clock)?,
        None => config.timeline.day_start_offset_secs,
    };
    let timeline = timeline::resolve(&program, offset);

    if let Some(at) = &args.at {
        let now = timeline.now_playing(clock_arg(at)?);
        if args.json {
            return print_json(&now);
        }
        print_now_playing(now.as_ref(), at);
        return Ok(());
    }

    if args.json {
        return print_json(&timeline);
    }
    print_timeline(&timeline);
    Ok(())
}

pub fn print_now_playing(now: Option<&NowPlaying>, at: &str) {
    match now {
        Some(now) => {
            println!(
                "{at}  #{} {} [{} - {}]",
                now.entry.index,
                now.entry.name,
                now.entry.start_clock(),
                now.entry.end_clock()
            );
            println!(
                "  elapsed {}, remaining {}",
                format_duration(now.elapsed),
                format_duration(now.remaining)
            );
        }
        None => println!("{at}  nothing on air"),
    }
}

pub fn print_timeline(timeline: &Timeline) {
    for entry in &timeline.entries {
        let marker = if entry.is_filler { " (filler)" } else { "" };
        let wrap = if entry.spans_midnight { " +1d" } else { "" };
        println!(
            "{} - {}{wrap}  #{:<3} {}{marker}",
            entry.start_clock(),
            entry.end_clock(),
            entry.index,
            entry.name
        );
    }
    for gap in timeline.coverage_gaps() {
        println!("gap {} ({})", gap.label(), format_duration(gap.duration()));
    }
    for warning in &timeline.warnings {
        eprintln!(
            "warning: segment #{} ({}) skipped: {}",
            warning.index, warning.segment_id, warning.reason
        );
    }
    println!("total: {}", format_duration(timeline.total_duration()));
}
