use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use prnn::{data::load_mnist, run_experiment, ExperimentConfig};

/// Drives a randomly wired propagation graph as an MNIST classifier.
///
/// Flags override the config file, which overrides the built-in defaults.
#[derive(Parser, Debug)]
#[command(name = "prnn", version, about)]
struct Cli {
    /// Directory holding the four uncompressed MNIST IDX files
    #[arg(short, long)]
    data_dir: PathBuf,

    /// JSON experiment config
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long)]
    num_cells: Option<usize>,

    #[arg(long)]
    epochs: Option<usize>,

    /// Seed for the random wiring pass
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    train_limit: Option<usize>,

    #[arg(long)]
    test_limit: Option<usize>,

    /// Write the full run report as JSON
    #[arg(long)]
    report: Option<PathBuf>,
}

impl Cli {
    fn experiment_config(&self) -> Result<ExperimentConfig> {
        let mut config = match &self.config {
            Some(path) => ExperimentConfig::load_json(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => ExperimentConfig::default(),
        };
        if let Some(n) = self.num_cells {
            config.num_cells = n;
        }
        if let Some(n) = self.epochs {
            config.epochs = n;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(n) = self.train_limit {
            config.train_limit = n;
        }
        if let Some(n) = self.test_limit {
            config.test_limit = n;
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = cli.experiment_config()?;

    let (train, test) = load_mnist(&cli.data_dir)
        .with_context(|| format!("loading MNIST from {}", cli.data_dir.display()))?;

    let report = run_experiment(&config, &train, &test)?;
    println!("Test Accuracy: {:.2}%", report.evaluation.accuracy * 100.0);

    if let Some(path) = &cli.report {
        report
            .save_json(path)
            .with_context(|| format!("writing report {}", path.display()))?;
        println!("Report written to {}", path.display());
    }

    Ok(())
}
