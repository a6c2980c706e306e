//! `standoff-export`: renders items files to standoff markup.
//!
//! Usage:
//!   standoff-export render items.toml [more.toml ...] [--config path] [--output dir]
//!   standoff-export render items.toml --stdout
//!   standoff-export init-config [--config path] [--force]

mod input;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use standoff_export_config::Config;
use standoff_export_engine::{Item, ItemComposition};
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "standoff-export")]
#[command(about = "Export layered texts to character-exact standoff markup")]
struct Cli {
    /// Config file (defaults to ~/.config/standoff-export/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render every item of the given files
    Render {
        /// TOML files with `[[items]]` tables
        #[arg(required = true)]
        items: Vec<PathBuf>,

        /// Output directory, overriding the configured one
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print flows to stdout instead of writing files
        #[arg(long, conflicts_with = "output")]
        stdout: bool,
    },
    /// Write a config file with default settings
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);

    match cli.command {
        Command::Render {
            items,
            output,
            stdout,
        } => {
            let config = load_config(&config_path, cli.config.is_some())?;
            render(&config, &items, output.as_deref(), stdout)
        }
        Command::InitConfig { force } => init_config(&config_path, force),
    }
}

fn load_config(path: &Path, explicit: bool) -> Result<Config> {
    log::info!("Config path: {}", path.display());
    match Config::load_from_path(path)? {
        Some(config) => Ok(config),
        None if explicit => Err(anyhow!("Config file not found: {}", path.display())),
        None => {
            log::info!("No config file found, using defaults");
            Ok(Config::default())
        }
    }
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "Config file already exists at {} (use --force to overwrite)",
            path.display()
        );
    }
    Config::default()
        .save_to_path(path)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    log::info!("Wrote default config to {}", path.display());
    Ok(())
}

fn render(config: &Config, files: &[PathBuf], output: Option<&Path>, stdout: bool) -> Result<()> {
    let mut items: Vec<Item> = Vec::new();
    for file in files {
        let loaded = input::load_items(file)?;
        log::info!("Loaded {} items from {}", loaded.len(), file.display());
        items.extend(loaded);
    }

    let mut failed = 0;
    if stdout {
        let composer = config.composer();
        for (index, item) in items.iter().enumerate() {
            match composer.compose(item, index + 1) {
                Ok(composition) => print_flows(item, &composition),
                Err(err) => {
                    log::error!("Item {} failed: {err}", item.id);
                    failed += 1;
                }
            }
        }
    } else {
        let mut composer = config.fs_composer(output);
        for (index, item) in items.iter().enumerate() {
            match composer.compose(item, index + 1) {
                Ok(composition) => {
                    log::debug!("Item {} wrote {} flows", item.id, composition.flows.len());
                }
                Err(err) => {
                    log::error!("Item {} failed: {err}", item.id);
                    failed += 1;
                }
            }
        }
        composer.close()?;
        log::info!("Output written to {}", composer.output_dir().display());
    }

    log::info!("Rendered {} of {} items", items.len() - failed, items.len());
    if failed > 0 {
        bail!("{failed} of {} items failed", items.len());
    }
    Ok(())
}

fn print_flows(item: &Item, composition: &ItemComposition) {
    for (key, flow) in &composition.flows {
        println!("<!-- {} {key} -->", item.id);
        println!("{flow}");
    }
}
