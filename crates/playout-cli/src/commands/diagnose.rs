use std::path::PathBuf;

use clap::Args;
use playout_core::diagnostics::{diagnose, path_exists};
use playout_core::{Config, DayPlanner};

use crate::common::{date_arg, load_library, print_json};

#[derive(Args)]
pub struct DiagnoseArgs {
    /// Library snapshot JSON file
    #[arg(long)]
    pub library: PathBuf,
    /// Calendar date (YYYY-MM-DD)
    #[arg(long)]
    pub date: String,
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: DiagnoseArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let library = load_library(&args.library)?;
    let date = date_arg(&args.date)?;

    let planner = DayPlanner::from_config(&library, &config);
    let report = diagnose(&planner, date, path_exists)?;

    if args.json {
        return print_json(&report);
    }

    println!("date:            {}", report.date);
    println!(
        "schedule entry:  {}",
        report.schedule_entry_id.as_deref().unwrap_or("-")
    );
    println!("program:         {}", report.program_id.as_deref().unwrap_or("-"));
    println!("segments:        {}", report.segment_count);
    for path in &report.missing_media {
        println!("missing:         {path}");
    }
    for warning in &report.warnings {
        println!("warning:         {warning}");
    }
    if report.is_healthy() {
        println!("ok");
    }
    Ok(())
}
