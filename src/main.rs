// pokefetch: collect PokéAPI creature records and evolution pairs into CSV.

use std::error::Error as _;
use std::fs;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use tracing::{info, warn};

use pokefetch::api::PokeApiClient;
use pokefetch::cache::{CacheLayout, CacheStore};
use pokefetch::config::{Config, Mode};
use pokefetch::error::Result;
use pokefetch::fetch::{Fetcher, TokioSleep};
use pokefetch::fields::ImagePolicy;
use pokefetch::output::CsvSink;
use pokefetch::run::Session;
use pokefetch::sprites::SpriteStore;
use pokefetch::{cli, logging, output};

/// Lines shown from the finished CSV, header included.
const PREVIEW_LINES: usize = 6;

#[tokio::main]
async fn main() -> ExitCode {
    logging::setup_tracing();
    let args = cli::Args::parse();
    let config = Config::from_args(&args);

    let task = run(&config);
    tokio::pin!(task);

    let result = tokio::select! {
        result = &mut task => result,
        signal = tokio::signal::ctrl_c() => match signal {
            Ok(()) => {
                eprintln!("\nProcess interrupted by user");
                return ExitCode::from(130);
            }
            Err(err) => {
                warn!(error = %err, "Unable to listen for Ctrl-C, continuing without it");
                task.await
            }
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("\nError in main process: {}", err);
            let mut source = err.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {}", cause);
                source = cause.source();
            }
            eprintln!("{:?}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: &Config) -> Result<()> {
    let field_names: Vec<&str> = config.fields.iter().map(|f| f.as_str()).collect();
    info!("Starting Pokemon data fetcher");
    info!("Force refresh: {}", config.force_refresh);
    info!("Fields to fetch: {}", field_names.join(", "));
    info!("Download images: {}", config.download_images);
    match &config.mode {
        Mode::Flat { limit: Some(limit), .. } => info!("Processing limit: {} Pokemon", limit),
        Mode::Evolutions { limit: Some(limit), .. } => {
            info!("Processing limit: {} evolution chains", limit)
        }
        _ => {}
    }

    let layout = CacheLayout::new(&config.cache_dir);
    fs::create_dir_all(layout.root())?;
    info!(path = %layout.root().display(), "Using cache directory");

    let images = if config.download_images {
        ImagePolicy::Download(SpriteStore::new(&config.sprites_dir))
    } else {
        ImagePolicy::Link
    };

    let fetcher = Fetcher::new(PokeApiClient::new()?, TokioSleep, CacheStore::new(layout))
        .with_retry(config.retry.clone())
        .with_request_delay(config.request_delay);
    let session = Session {
        fetcher,
        images,
        base_url: config.base_url.clone(),
        force_refresh: config.force_refresh,
    };

    let output_path = config.mode.output();
    let mut sink = CsvSink::create(output_path)?;
    let started = Instant::now();

    let stats = match &config.mode {
        Mode::Flat { limit, .. } => session.run_flat(&config.fields, *limit, &mut sink).await?,
        Mode::Evolutions { limit, .. } => {
            session
                .run_evolutions(&config.fields, *limit, &mut sink)
                .await?
        }
    };
    drop(sink);

    info!(
        "Done! Processed {}, skipped {} ({} fetch failures, {} missing fields, {} other errors).",
        stats.processed,
        stats.skipped(),
        stats.skipped_fetch,
        stats.skipped_missing,
        stats.skipped_error
    );
    info!("Total time: {:.1} seconds", started.elapsed().as_secs_f64());
    info!("Data saved to {}", output_path.display());
    if config.downloads_sprites() {
        info!("Sprite images saved to {}/", config.sprites_dir.display());
    }

    match output::preview(output_path, PREVIEW_LINES.min(stats.processed + 1)) {
        Ok(lines) => {
            info!("Sample of the CSV data:");
            for line in lines {
                info!("{}", line);
            }
        }
        Err(err) => warn!(error = %err, "Could not read sample data"),
    }

    Ok(())
}
