use std::path::PathBuf;

use clap::Args;
use playout_core::{format_duration, Config, FillOutcome, GapFillEngine, MediaCatalog};
use rand::SeedableRng;
use rand_pcg::Mcg128Xsl64;
use tracing::debug;

use crate::common::{load_library, load_program, print_json};

#[derive(Args)]
pub struct FillArgs {
    /// Program JSON file
    pub program: PathBuf,
    /// Library snapshot providing the filler pool
    #[arg(long)]
    pub library: PathBuf,
    /// Seed for a reproducible fill
    #[arg(long)]
    pub seed: Option<u64>,
    /// Write the filled program content here
    #[arg(long, short)]
    pub output: Option<PathBuf>,
    /// Print the fill result as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: FillArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let program = load_program(&args.program)?;
    let pool = load_library(&args.library)?.fillers()?;

    let mut rng = match args.seed {
        Some(seed) => Mcg128Xsl64::seed_from_u64(seed),
        None => Mcg128Xsl64::from_entropy(),
    };
    debug!(seed = ?args.seed, pool = pool.len(), "filling program");
    let engine = GapFillEngine::with_config(config.day_target(), config.fill_policy());
    let result = engine.fill(&program, &pool, &mut rng);

    if let Some(path) = &args.output {
        let filled = result.applied_to(&program);
        let content = filled.to_content(config.channel.clone());
        std::fs::write(path, serde_json::to_string_pretty(&content)?)?;
    }

    if args.json {
        return print_json(&result);
    }

    let outcome = match result.outcome {
        FillOutcome::Filled => "filled",
        FillOutcome::Partial => "partially filled",
        FillOutcome::NoFit => "no filler fits",
        FillOutcome::AlreadyAtOrOverTarget => "already at or over target",
        FillOutcome::NoFillersAvailable => "no fillers available",
    };
    println!("{}: {outcome}", program.name);
    println!("  appended:  {} segment(s)", result.appended.len());
    println!("  new total: {}", format_duration(result.new_total));
    println!("  remaining: {}", format_duration(result.remaining_gap));
    if let Some(path) = &args.output {
        println!("  written:   {}", path.display());
    }
    Ok(())
}
