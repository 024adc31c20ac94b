//! cache-planner CLI - Inspect prompt-cache plans and call costs

use anyhow::Result;
use cache_planner::{
    cache::CachePlanner,
    config::Config,
    metrics::{account_call, format_cost, log_cache_usage, pricing_table},
    models::{capabilities_of, normalize, registered_models},
    RequestParts, UsageCounters,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "cache-planner")]
#[command(about = "Plan prompt-cache boundaries and account for cached model calls")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level (defaults to the configured level)
    #[arg(short, long)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Annotate a request with cache boundaries
    Plan {
        /// JSON file with messages, system and toolConfig
        #[arg(short, long)]
        request: PathBuf,

        /// Model to plan for (default: configured model)
        #[arg(short, long)]
        model: Option<String>,

        /// Boundary index from the previous turn
        #[arg(short, long)]
        prior: Option<usize>,
    },

    /// Compute cost and cache verdict for reported usage
    Cost {
        /// Model the call was made with
        #[arg(short, long)]
        model: Option<String>,

        /// Uncached input tokens
        #[arg(short, long, default_value = "0")]
        input: u64,

        /// Output tokens
        #[arg(short, long, default_value = "0")]
        output: u64,

        /// Input tokens read from the cache
        #[arg(long, default_value = "0")]
        cache_read: u64,

        /// Input tokens written to the cache
        #[arg(long, default_value = "0")]
        cache_write: u64,
    },

    /// List cache-capable models and pricing families
    Models,

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Initialize configuration file with defaults
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },

    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., cache.tools, model.default_model)
        key: String,

        /// Value to set
        value: String,
    },

    /// Show configuration file path
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;
    // `config set` must still be able to repair invalid values
    if !matches!(cli.command, Commands::Config(_)) {
        config.validate()?;
    }

    // Setup logging
    let level_name = cli.log_level.unwrap_or_else(|| config.logging.level.clone());
    let log_level = match level_name.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Plan {
            request,
            model,
            prior,
        } => {
            let model = model.unwrap_or_else(|| config.model.default_model.clone());
            run_plan(&config, request, &model, prior).await?;
        }
        Commands::Cost {
            model,
            input,
            output,
            cache_read,
            cache_write,
        } => {
            let model = model.unwrap_or_else(|| config.model.default_model.clone());
            let usage = UsageCounters::new(input, output).with_cache(cache_read, cache_write);
            run_cost(&model, &usage);
        }
        Commands::Models => {
            show_models();
        }
        Commands::Config(cmd) => {
            run_config_command(cmd, config)?;
        }
    }

    Ok(())
}

async fn run_plan(
    config: &Config,
    request_file: PathBuf,
    model: &str,
    prior: Option<usize>,
) -> Result<()> {
    info!("Planning cache boundaries for {}", model);

    let content = tokio::fs::read_to_string(&request_file).await?;
    let parts: RequestParts = serde_json::from_str(&content)?;

    let planner = CachePlanner::new(config.cache_config());
    let planned = planner.plan(&parts, model, prior);

    println!("{}", serde_json::to_string_pretty(&planned)?);

    eprintln!("\nModel: {} (canonical: {})", model, normalize(model));
    eprintln!("Cacheable fields: {}", capabilities_of(model));
    eprintln!("Boundaries: {:?}", planned.boundaries());
    match planned.next_boundary_index {
        Some(idx) => eprintln!("Next turn: --prior {}", idx),
        None => eprintln!("Next turn: no boundary to carry"),
    }

    Ok(())
}

fn run_cost(model: &str, usage: &UsageCounters) {
    let accounting = account_call(model, usage);
    log_cache_usage(model, &accounting);

    println!("Model: {}", model);
    println!("Cost: {}", format_cost(accounting.cost));
    println!("Est. savings: {}", format_cost(accounting.savings));
    println!(
        "Cache hit ratio: {:.1}%",
        accounting.classification.ratio * 100.0
    );
    println!("Verdict: {}", accounting.classification.verdict);
}

fn show_models() {
    println!("=== Prompt-cache capable models ===");
    for (model, caps) in registered_models() {
        println!("  {:<45} {}", model, caps);
    }

    println!("\n=== Pricing families ($ per 1K tokens) ===");
    println!(
        "  {:<14} {:>10} {:>10} {:>12} {:>12}",
        "family", "input", "output", "cache read", "cache write"
    );
    for (family, entry) in pricing_table() {
        println!(
            "  {:<14} {:>10} {:>10} {:>12} {:>12}",
            family, entry.input, entry.output, entry.cache_read, entry.cache_write
        );
    }
}

fn run_config_command(cmd: ConfigCommands, config: Config) -> Result<()> {
    match cmd {
        ConfigCommands::Init { force } => {
            let path = Config::default_path();
            if path.exists() && !force {
                println!("Config already exists at {} (use --force to overwrite)", path.display());
                return Ok(());
            }
            Config::default().save_to(path.clone())?;
            println!("Wrote default config to {}", path.display());
        }
        ConfigCommands::Show => {
            println!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigCommands::Set { key, value } => {
            let mut stored = Config::read_from(Config::default_path())?;
            stored.set(&key, &value)?;
            stored.save()?;
            println!("Set {} = {}", key, value);
        }
        ConfigCommands::Path => {
            println!("{}", Config::default_path().display());
        }
    }

    Ok(())
}
