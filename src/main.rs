use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use keepbest::config::AppConfig;
use keepbest::monitor::Monitor;
use keepbest::selector::BestSelector;
use keepbest::store::FsStore;

/// Keep only the best checkpoint of a training run.
#[derive(Parser)]
#[command(name = "keepbest", about = "Keep only the best checkpoint of a training run")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "keepbest.toml")]
    config: PathBuf,

    /// Override the checkpoint directory
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Override the checkpoint name prefix
    #[arg(long)]
    prefix: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Follow a stream of epoch records (one JSON object per line) and save
    /// each new best checkpoint
    Watch {
        /// Record file to read; reads stdin when omitted
        #[arg(long)]
        records: Option<PathBuf>,

        /// Keep checkpoints that a later best supersedes
        #[arg(long)]
        keep_superseded: bool,
    },
    /// List stored checkpoints
    List,
    /// Print the currently retained best checkpoint
    Best,
    /// Write a config file with default values
    InitConfig {
        #[arg(long, default_value = "keepbest.toml")]
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if let Command::InitConfig { path } = &cli.command {
        if path.exists() {
            bail!("refusing to overwrite existing config {}", path.display());
        }
        std::fs::write(path, AppConfig::default_toml())
            .with_context(|| format!("writing config to {}", path.display()))?;
        println!("Wrote default config to {}", path.display());
        return Ok(());
    }

    // Load configuration
    let mut app_config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    // Apply CLI overrides
    if let Some(dir) = cli.dir {
        app_config.store.dir = dir;
    }
    if let Some(prefix) = cli.prefix {
        app_config.store.prefix = prefix;
    }
    app_config.validate().context("validating configuration")?;

    match cli.command {
        Command::Watch {
            records,
            keep_superseded,
        } => {
            if keep_superseded {
                app_config.selector.keep_superseded = true;
            }
            run_watch(app_config, records)
        }
        Command::List => run_list(app_config),
        Command::Best => run_best(app_config),
        Command::InitConfig { .. } => unreachable!(),
    }
}

fn run_watch(config: AppConfig, records: Option<PathBuf>) -> Result<()> {
    let store = FsStore::new(config.store);
    let selector = BestSelector::new(store, config.selector);
    let mut monitor = Monitor::new(config.monitor, selector);

    let summary = match records {
        Some(path) => {
            let file =
                File::open(&path).with_context(|| format!("opening {}", path.display()))?;
            monitor.run(BufReader::new(file))
        }
        None => monitor.run(io::stdin().lock()),
    }
    .context("consuming record stream")?;

    println!("-------------------------------------------");
    println!(
        "Run complete: {} records, {} saved, {} skipped",
        summary.records, summary.saves, summary.skips
    );
    match summary.best {
        Some(best) => println!(
            "Best: epoch {} (score {:.4}) at {}",
            best.epoch,
            best.score,
            best.path.display()
        ),
        None => println!("No checkpoint saved"),
    }
    Ok(())
}

fn run_list(config: AppConfig) -> Result<()> {
    let store = FsStore::new(config.store);
    let checkpoints = store.list().context("listing checkpoints")?;
    if checkpoints.is_empty() {
        println!("No checkpoints found");
        return Ok(());
    }
    for (path, meta) in checkpoints {
        println!(
            "epoch {:>6}  score {:.4}  {}",
            meta.epoch,
            meta.score,
            path.display()
        );
    }
    Ok(())
}

fn run_best(config: AppConfig) -> Result<()> {
    let store = FsStore::new(config.store);
    let (path, meta) = store.load_best().context("resolving best checkpoint")?;
    println!(
        "epoch {:>6}  score {:.4}  {}",
        meta.epoch,
        meta.score,
        path.display()
    );
    Ok(())
}
