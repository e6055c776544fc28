//! VQA Dataset Builder CLI
//!
//! This binary loads a dataset through the builder registry and prints the
//! sizes the model configuration needs.
//!
//! # Usage
//!
//! ```bash
//! # Load the split named in the configuration file
//! vqa-builder --config vqa2.toml
//!
//! # Load the dev split from another data root
//! vqa-builder --config vqa2.toml --dataset-type dev --data-root-dir /mnt/data
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use builder_core::{DataConfig, Runtime, VqaDataset};

/// VQA Dataset Builder
#[derive(Parser, Debug)]
#[command(name = "vqa-builder")]
#[command(about = "Load VQA datasets and report model sizing")]
struct Args {
    /// Configuration file path (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Registered builder to load
    #[arg(short, long, default_value = "vqa2")]
    builder: String,

    /// Split to load (train, dev, test); overrides the configuration file
    #[arg(long)]
    dataset_type: Option<String>,

    /// Root directory for data; overrides the configuration file
    #[arg(long)]
    data_root_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Initialize logging
    let filter = tracing_subscriber::filter::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::filter::EnvFilter::new(&args.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let apply_flags = |config: &mut DataConfig| {
        if let Some(dataset_type) = &args.dataset_type {
            config.dataset_type = Some(dataset_type.clone());
        }
        if let Some(data_root_dir) = &args.data_root_dir {
            config.data_root_dir = data_root_dir.clone();
        }
    };

    let runtime = match &args.config {
        Some(path) => Runtime::from_config_file_with(path, apply_flags)?,
        None => {
            let mut config = DataConfig::default().with_env_overrides();
            apply_flags(&mut config);
            Runtime::from_config(config)?
        }
    };
    let builder = runtime.load(&args.builder)?;

    if let Some(dataset) = builder.dataset() {
        for (index, shard) in dataset.shards().enumerate() {
            tracing::info!("  Shard {}: {} samples", index, shard.len());
        }
        tracing::info!("Total: {} samples", dataset.len());
    }

    let mut model_config = toml::Table::new();
    builder.update_config_for_model(&mut model_config)?;
    print!("{}", toml::to_string(&model_config)?);

    Ok(())
}
