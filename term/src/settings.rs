use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use kioku_core::{Coord, GameConfig, ScorePolicy};

#[derive(Parser, Debug)]
#[command(version, about = "Match pairs of hidden tiles", long_about = None)]
pub struct Args {
    /// What log level to use
    #[command(flatten)]
    pub verbose: clap_verbosity_flag::Verbosity,

    /// Write logs to this file instead of stderr, which shares the screen with the board
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// TOML file with a game configuration, flags override it
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Board width in tiles
    #[arg(long)]
    pub width: Option<Coord>,

    /// Board height in tiles
    #[arg(long)]
    pub height: Option<Coord>,

    /// Force a seed instead of random
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Skip the board preview at the start of each round
    #[arg(long)]
    pub no_preview: bool,

    /// Keep the score when a new round starts
    #[arg(long)]
    pub carry_score: bool,
}

impl Args {
    /// Defaults, then the config file, then flags.
    pub fn game_config(&self) -> anyhow::Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                parse_config(&text).with_context(|| format!("parsing config {}", path.display()))?
            }
            None => GameConfig::default(),
        };

        if let Some(width) = self.width {
            config.size.0 = width;
        }
        if let Some(height) = self.height {
            config.size.1 = height;
        }
        if self.no_preview {
            config.preview = false;
        }
        if self.carry_score {
            config.score_policy = ScorePolicy::CarryOver;
        }

        config.validate()?;
        Ok(config)
    }
}

pub fn parse_config(text: &str) -> Result<GameConfig, toml::de::Error> {
    toml::from_str(text)
}
