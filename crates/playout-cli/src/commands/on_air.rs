use std::path::PathBuf;

use clap::Args;
use playout_core::{Config, DayPlanner};

use super::timeline::print_now_playing;
use crate::common::{clock_arg, date_arg, load_library, print_json};

#[derive(Args)]
pub struct OnAirArgs {
    /// Library snapshot JSON file
    #[arg(long)]
    pub library: PathBuf,
    /// Calendar date (YYYY-MM-DD)
    #[arg(long)]
    pub date: String,
    /// Wall-clock time (HH:MM[:SS])
    #[arg(long)]
    pub at: String,
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: OnAirArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let library = load_library(&args.library)?;
    let date = date_arg(&args.date)?;
    let t = clock_arg(&args.at)?;

    let now = DayPlanner::from_config(&library, &config).on_air(date, t)?;
    if args.json {
        return print_json(&now);
    }
    print_now_playing(now.as_ref(), &args.at);
    Ok(())
}
