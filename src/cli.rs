// Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

use crate::api::endpoints::DEFAULT_BASE_URL;
use crate::fields::Field;

#[derive(Debug, Parser)]
#[command(name = "pokefetch")]
#[command(about = "Fetch Pokemon data from PokéAPI and save it to CSV", long_about = None)]
#[command(version)]
pub struct Args {
    /// Force refresh of cached data
    #[arg(long)]
    pub force_refresh: bool,

    /// Limit the number of Pokemon to process
    #[arg(long)]
    pub limit: Option<usize>,

    /// Output CSV file
    #[arg(long, default_value = "pokemon_data.csv")]
    pub output: PathBuf,

    /// Comma-separated fields: name, id, height, weight, hp, attack, defense,
    /// special-attack, special-defense, speed, types, sprite
    #[arg(long, value_delimiter = ',', default_values_t = Field::default_selection())]
    pub fields: Vec<Field>,

    /// Name, id, all six stats, and sprite
    #[arg(long, conflicts_with_all = ["fields", "all_fields"])]
    pub all_stats: bool,

    /// Every available field
    #[arg(long, conflicts_with = "fields")]
    pub all_fields: bool,

    /// Download sprite images (default)
    #[arg(long, overrides_with = "no_download_images")]
    pub download_images: bool,

    /// Do not download sprite images, just save URLs
    #[arg(long, overrides_with = "download_images")]
    pub no_download_images: bool,

    /// Collect evolution pairs instead of individual Pokemon
    #[arg(long)]
    pub evolutions: bool,

    /// Output CSV file for evolution pairs
    #[arg(long, default_value = "evolution_pairs.csv")]
    pub evolution_output: PathBuf,

    /// Limit the number of evolution chains to process
    #[arg(long)]
    pub evolution_limit: Option<usize>,

    /// Cache directory [default: platform cache dir]
    #[arg(long, env = "POKEFETCH_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Directory for downloaded sprites
    #[arg(long, default_value = "sprites")]
    pub sprites_dir: PathBuf,

    /// PokéAPI base URL
    #[arg(long, env = "POKEFETCH_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Pause after each uncached request, in milliseconds
    #[arg(long, default_value_t = 100)]
    pub request_delay_ms: u64,

    /// Attempts per record before skipping it
    #[arg(long, default_value_t = 3)]
    pub max_attempts: u32,
}

impl Args {
    /// Selected fields after applying the presets.
    pub fn selected_fields(&self) -> Vec<Field> {
        if self.all_fields {
            Field::ALL.to_vec()
        } else if self.all_stats {
            Field::all_stats_preset()
        } else {
            self.fields.clone()
        }
    }

    pub fn download_images(&self) -> bool {
        !self.no_download_images
    }
}
