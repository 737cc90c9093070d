use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod common;

#[derive(Parser)]
#[command(name = "playout-cli", version, about = "Playout day planner CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a program's total against the broadcast day
    Validate(commands::validate::ValidateArgs),
    /// Pack filler media into a program's remaining time
    Fill(commands::fill::FillArgs),
    /// Lay a program out across the broadcast day
    Timeline(commands::timeline::TimelineArgs),
    /// Schedule queries
    Schedule {
        #[command(subcommand)]
        action: commands::schedule::ScheduleAction,
    },
    /// Show what is on air at a date and time
    OnAir(commands::on_air::OnAirArgs),
    /// Report problems with a date's playout
    Diagnose(commands::diagnose::DiagnoseArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    // Logs go to stderr; stdout carries command output.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Validate(args) => commands::validate::run(args),
        Commands::Fill(args) => commands::fill::run(args),
        Commands::Timeline(args) => commands::timeline::run(args),
        Commands::Schedule { action } => commands::schedule::run(action),
        Commands::OnAir(args) => commands::on_air::run(args),
        Commands::Diagnose(args) => commands::diagnose::run(args),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
