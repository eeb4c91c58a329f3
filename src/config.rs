// Run configuration.
// Resolves parsed arguments into the paths and policies a run uses.

use std::path::PathBuf;
use std::time::Duration;

use crate::cache::default_cache_dir;
use crate::cli::Args;
use crate::fetch::RetryPolicy;
use crate::fields::Field;

/// Which collection to run and where to write it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// One row per creature; `limit` caps creatures.
    Flat {
        output: PathBuf,
        limit: Option<usize>,
    },
    /// One row per evolution pair; `limit` caps chains.
    Evolutions {
        output: PathBuf,
        limit: Option<usize>,
    },
}

impl Mode {
    pub fn output(&self) -> &PathBuf {
        match self {
            Mode::Flat { output, .. } | Mode::Evolutions { output, .. } => output,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub mode: Mode,
    pub fields: Vec<Field>,
    pub force_refresh: bool,
    pub download_images: bool,
    pub base_url: String,
    pub cache_dir: PathBuf,
    pub sprites_dir: PathBuf,
    pub request_delay: Duration,
    pub retry: RetryPolicy,
}

impl Config {
    pub fn from_args(args: &Args) -> Self {
        let mode = if args.evolutions {
            Mode::Evolutions {
                output: args.evolution_output.clone(),
                limit: positive(args.evolution_limit),
            }
        } else {
            Mode::Flat {
                output: args.output.clone(),
                limit: positive(args.limit),
            }
        };

        let cache_dir = args
            .cache_dir
            .clone()
            .or_else(default_cache_dir)
            .unwrap_or_else(|| PathBuf::from("cache"));

        Self {
            mode,
            fields: args.selected_fields(),
            force_refresh: args.force_refresh,
            download_images: args.download_images(),
            base_url: args.base_url.clone(),
            cache_dir,
            sprites_dir: args.sprites_dir.clone(),
            request_delay: Duration::from_millis(args.request_delay_ms),
            retry: RetryPolicy {
                max_attempts: args.max_attempts.max(1),
                ..RetryPolicy::default()
            },
        }
    }

    /// Whether this run writes sprite files.
    pub fn downloads_sprites(&self) -> bool {
        self.download_images && self.fields.contains(&Field::Sprite)
    }
}

/// A limit of zero means no limit.
fn positive(limit: Option<usize>) -> Option<usize> {
    limit.filter(|&n| n > 0)
}
