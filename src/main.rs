use anyhow::{Context, Result};
use arcade_snake::game::{GameConfig, ModeId};
use arcade_snake::modes::HumanMode;
use clap::{Parser, ValueEnum};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "arcade_snake")]
#[command(version, about = "Real-time snake with several play modes")]
struct Cli {
    /// Game mode to start in
    #[arg(long, value_enum, default_value = "classic")]
    mode: ModeArg,

    /// Grid width (overrides the config file)
    #[arg(long)]
    width: Option<usize>,

    /// Grid height (overrides the config file)
    #[arg(long)]
    height: Option<usize>,

    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write logs to this file; nothing is logged without it
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    /// Endless play, wrapping edges
    Classic,
    /// Score as much as possible before the clock runs out
    TimeTrial,
    /// Walls and scattered obstacles
    Obstacle,
    /// Walls, and the snake speeds up over time
    Survival,
}

impl From<ModeArg> for ModeId {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Classic => ModeId::Classic,
            ModeArg::TimeTrial => ModeId::TimeTrial,
            ModeArg::Obstacle => ModeId::Obstacle,
            ModeArg::Survival => ModeId::Survival,
        }
    }
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(width) = cli.width {
        config.grid_width = width;
    }
    if let Some(height) = cli.height {
        config.grid_height = height;
    }
    config.validate()?;

    let mut human_mode = HumanMode::new(config, cli.mode.into());
    human_mode.run().await?;

    Ok(())
}
