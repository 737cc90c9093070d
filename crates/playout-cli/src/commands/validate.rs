use std::path::PathBuf;

use clap::Args;
use playout_core::{format_duration, Config, DurationStatus, DurationValidator};

use crate::common::{load_program, print_json};

#[derive(Args)]
pub struct ValidateArgs {
    /// Program JSON file
    pub program: PathBuf,
    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: ValidateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let program = load_program(&args.program)?;
    let report = DurationValidator::with_target(config.day_target()).validate(&program);

    if args.json {
        return print_json(&report);
    }

    let verdict = match report.status {
        DurationStatus::Valid => "valid",
        DurationStatus::Under => "under target",
        DurationStatus::Over => "over target",
    };
    println!("{}: {verdict}", program.name);
    println!("  total:     {}", format_duration(report.total));
    println!("  target:    {}", format_duration(report.target));
    println!("  deviation: {}", report.deviation_formatted());
    if report.needs_filler() {
        println!("  filler needed");
    }
    Ok(())
}
