use std::path::PathBuf;

use clap::Subcommand;
use playout_core::{Config, DayPlanner, ScheduleStore};

use crate::common::{date_arg, load_library, print_json};

#[derive(Subcommand)]
pub enum ScheduleAction {
    /// Show the schedule entries that apply to a date
    Active {
        /// Library snapshot JSON file
        #[arg(long)]
        library: PathBuf,
        /// Calendar date (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        /// Print the day plan as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: ScheduleAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ScheduleAction::Active {
            library,
            date,
            json,
        } => {
            let config = Config::load_or_default();
            let library = load_library(&library)?;
            let date = date_arg(&date)?;
            let plan = DayPlanner::from_config(&library, &config).plan(date)?;

            if json {
                return print_json(&plan);
            }

            for record in library.rejected()? {
                println!(
                    "ignored record {}: {}",
                    record.id.as_deref().unwrap_or("(no id)"),
                    record.reason
                );
            }

            if plan.active_entries.is_empty() {
                println!("{date}: no schedule");
                return Ok(());
            }
            let governing = plan.scheduled.as_ref().map(|s| s.entry.id.as_str());
            for entry in &plan.active_entries {
                let marker = if Some(entry.id.as_str()) == governing { "*" } else { " " };
                println!(
                    "{marker} {}  {}  {:<7}  {}",
                    entry.start_time.format("%H:%M:%S"),
                    entry.id,
                    entry.repeat_pattern.as_str(),
                    entry.playlist_id
                );
            }
            if let Some(scheduled) = &plan.scheduled {
                println!(
                    "governing: {} ({} segments, {})",
                    scheduled.program.name,
                    scheduled.program.len(),
                    scheduled.validation.deviation_formatted()
                );
            }
        }
    }
    Ok(())
}
