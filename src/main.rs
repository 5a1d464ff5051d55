use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use template_generator::config::{AiPlacementMode, GenerationConfig, MapStyle, SizeRange};
use template_generator::export::{write_template, write_world_json};
use template_generator::generation::{generate_world, zone_counts};

#[derive(Parser, Debug)]
#[command(name = "template_generator")]
#[command(about = "Generate random map templates with balanced player areas")]
struct Args {
    /// TOML file with generation settings; flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of human players (1-8)
    #[arg(short = 'H', long)]
    humans: Option<usize>,

    /// Number of AI players
    #[arg(short = 'A', long)]
    ai: Option<usize>,

    /// Map style: random or balanced
    #[arg(long)]
    style: Option<MapStyle>,

    /// Main area size, e.g. "12" or "8-16"
    #[arg(long)]
    main_size: Option<SizeRange>,

    /// Starting area size, e.g. "3-4"
    #[arg(long)]
    start_size: Option<SizeRange>,

    /// Average links per main-area region
    #[arg(long)]
    avg_links_main: Option<f64>,

    /// Average links per starting-area region
    #[arg(long)]
    avg_links_player: Option<f64>,

    /// Starting-area towns of the player's faction
    #[arg(long)]
    same_towns: Option<usize>,

    /// Starting-area towns of a different faction
    #[arg(long)]
    diff_towns: Option<usize>,

    /// Where balanced maps place AI starts: main, start, both or random
    #[arg(long)]
    ai_placement: Option<AiPlacementMode>,

    /// Fixed monster disposition for every zone
    #[arg(long)]
    monster_disposition: Option<i64>,

    /// Fixed monster joining percentage for every zone
    #[arg(long)]
    joining_percent: Option<i64>,

    /// Monsters join only for money in every zone
    #[arg(long)]
    join_only_for_money: Option<bool>,

    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Output template path (default: dated name in the current directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Header file copied verbatim ahead of the generated rows
    #[arg(long)]
    header: Option<PathBuf>,

    /// Also dump the world graph as JSON to this path
    #[arg(long)]
    dump_json: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn apply(&self, config: &mut GenerationConfig) {
        if let Some(humans) = self.humans {
            config.human_players = humans;
        }
        if let Some(ai) = self.ai {
            config.ai_players = ai;
        }
        if let Some(style) = self.style {
            config.map_style = style;
        }
        if let Some(range) = self.main_size {
            config.main_area_size = range;
        }
        if let Some(range) = self.start_size {
            config.start_area_size = range;
        }
        if let Some(links) = self.avg_links_main {
            config.avg_links_main = links;
        }
        if let Some(links) = self.avg_links_player {
            config.avg_links_player = links;
        }
        if let Some(n) = self.same_towns {
            config.same_faction_towns = n;
        }
        if let Some(n) = self.diff_towns {
            config.different_faction_towns = n;
        }
        if let Some(mode) = self.ai_placement {
            config.ai_placement = mode;
        }
        if self.monster_disposition.is_some() {
            config.overrides.monster_disposition = self.monster_disposition;
        }
        if self.joining_percent.is_some() {
            config.overrides.joining_percent = self.joining_percent;
        }
        if self.join_only_for_money.is_some() {
            config.overrides.join_only_for_money = self.join_only_for_money;
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => GenerationConfig::load(path)?,
        None => GenerationConfig::default(),
    };
    args.apply(&mut config);

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    info!("Generating template with seed: {}", seed);

    let world = generate_world(&config, &mut rng)?;
    for (zone, count) in zone_counts(&world) {
        info!("  {:<14} {}", zone.to_string(), count);
    }

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(config.default_output_name()));
    let stats = write_template(&world, &output, args.header.as_deref())?;
    println!(
        "Wrote {} ({} zones, {} connections, seed {})",
        output.display(),
        stats.zones,
        stats.connections,
        seed
    );

    if let Some(path) = &args.dump_json {
        write_world_json(&world, &config, seed, path)?;
        info!("World graph written to {}", path.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time().with_writer(std::io::stderr))
        .init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("Generation failed: {}", err);
            ExitCode::FAILURE
        }
    }
}
