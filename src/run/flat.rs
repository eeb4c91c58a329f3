// Flat mode: one CSV row per creature.

use std::io::Write;

use tracing::{debug, info, warn};

use crate::api::{Pokemon, Remote, ResourceRef, endpoints};
use crate::cache::CacheKey;
use crate::error::Result;
use crate::fetch::Sleep;
use crate::fields::Field;
use crate::output::{CsvSink, flat_header};

use super::{Progress, RunStats, Session};

impl<R: Remote, S: Sleep> Session<R, S> {
    /// Write the header and one row per creature that has every field.
    ///
    /// Only a failure to write the header is returned; per-item problems are
    /// logged and counted.
    pub async fn run_flat<W: Write>(
        &self,
        fields: &[Field],
        limit: Option<usize>,
        sink: &mut CsvSink<W>,
    ) -> Result<RunStats> {
        sink.write_row(flat_header(fields))?;

        info!("Fetching complete Pokemon list (this may take a while)...");
        let pokemon = self
            .fetcher
            .load_or_collect(
                &CacheKey::PokemonList,
                &endpoints::pokemon_list_url(&self.base_url),
                limit,
                self.force_refresh,
            )
            .await;
        info!("Found {} Pokemon to process", pokemon.len());

        let progress = Progress::new(pokemon.len());
        let mut stats = RunStats::default();

        for (index, item) in pokemon.iter().enumerate() {
            progress.report(index, &item.name, &stats);
            self.process_one(item, fields, sink, &mut stats).await;
        }

        Ok(stats)
    }

    async fn process_one<W: Write>(
        &self,
        item: &ResourceRef,
        fields: &[Field],
        sink: &mut CsvSink<W>,
        stats: &mut RunStats,
    ) {
        let key = pokemon_key(item);
        let record = match self
            .fetcher
            .fetch::<Pokemon>(&key, &item.url, self.force_refresh)
            .await
        {
            Ok(fetched) => {
                debug!(pokemon = %item.name, cache_hit = fetched.cache_hit, "Fetched details");
                fetched.record
            }
            Err(err) => {
                warn!(pokemon = %item.name, error = %err, "Failed to fetch Pokemon details");
                stats.skipped_fetch += 1;
                return;
            }
        };

        let row = match self.extract_row(&record, fields, &item.name).await {
            Ok(row) => row,
            Err(field) => {
                info!("No {} data found for {}", field, item.name);
                stats.skipped_missing += 1;
                return;
            }
        };

        match sink.write_row(row.iter().map(|value| value.to_string())) {
            Ok(()) => stats.processed += 1,
            Err(err) => {
                warn!(pokemon = %item.name, error = %err, "Error writing row");
                stats.skipped_error += 1;
            }
        }
    }
}

/// Detail records are keyed by creature name so both modes share them.
fn pokemon_key(item: &ResourceRef) -> CacheKey {
    if item.name.is_empty() {
        CacheKey::pokemon_from_url(&item.url)
    } else {
        CacheKey::Pokemon(item.name.clone())
    }
}
