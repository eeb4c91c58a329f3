// Evolution mode: one CSV row per pre-evolution/evolution pair.

use std::io::Write;

use tracing::{info, warn};

use crate::api::{EvolutionChain, EvolutionPair, Pokemon, Remote, endpoints};
use crate::cache::{CacheKey, paths::key_from_url};
use crate::error::Result;
use crate::evolution::flatten;
use crate::fetch::Sleep;
use crate::fields::{Field, FieldValue};
use crate::output::{CsvSink, evolution_header};

use super::{Progress, RunStats, Session};

enum PairOutcome {
    Row(Vec<String>),
    FetchFailed,
    Missing(Field, String),
}

impl<R: Remote, S: Sleep> Session<R, S> {
    /// Write the header and one row per evolution pair found in up to
    /// `limit` chains.
    pub async fn run_evolutions<W: Write>(
        &self,
        fields: &[Field],
        limit: Option<usize>,
        sink: &mut CsvSink<W>,
    ) -> Result<RunStats> {
        sink.write_row(evolution_header(fields))?;

        info!("Fetching evolution chain list...");
        let chains = self
            .fetcher
            .load_or_collect(
                &CacheKey::EvolutionChainList,
                &endpoints::evolution_chain_list_url(&self.base_url),
                limit,
                self.force_refresh,
            )
            .await;
        info!("Found {} evolution chains to process", chains.len());

        let progress = Progress::new(chains.len());
        let mut stats = RunStats::default();

        for (index, chain_ref) in chains.iter().enumerate() {
            let label = format!("evolution chain {}", key_from_url(&chain_ref.url));
            progress.report(index, &label, &stats);

            let chain = match self
                .fetcher
                .fetch::<EvolutionChain>(
                    &CacheKey::chain_from_url(&chain_ref.url),
                    &chain_ref.url,
                    self.force_refresh,
                )
                .await
            {
                Ok(fetched) => fetched.record,
                Err(err) => {
                    warn!(chain = %chain_ref.url, error = %err, "Failed to fetch evolution chain");
                    stats.skipped_fetch += 1;
                    continue;
                }
            };

            for pair in flatten(&chain) {
                match self.pair_row(&pair, fields).await {
                    PairOutcome::Row(row) => match sink.write_row(&row) {
                        Ok(()) => stats.processed += 1,
                        Err(err) => {
                            warn!(error = %err, "Error writing row");
                            stats.skipped_error += 1;
                        }
                    },
                    PairOutcome::FetchFailed => stats.skipped_fetch += 1,
                    PairOutcome::Missing(field, name) => {
                        info!(
                            "No {} data found for {}, skipping {} -> {}",
                            field, name, pair.pre_evolution.name, pair.evolution.name
                        );
                        stats.skipped_missing += 1;
                    }
                }
            }
        }

        Ok(stats)
    }

    async fn species_record(&self, name: &str) -> Option<Pokemon> {
        let url = endpoints::pokemon_url(&self.base_url, name);
        let key = CacheKey::Pokemon(name.to_string());
        match self.fetcher.fetch::<Pokemon>(&key, &url, self.force_refresh).await {
            Ok(fetched) => Some(fetched.record),
            Err(err) => {
                warn!(pokemon = %name, error = %err, "Failed to fetch Pokemon details");
                None
            }
        }
    }

    async fn pair_row(&self, pair: &EvolutionPair, fields: &[Field]) -> PairOutcome {
        let pre_name = pair.pre_evolution.name.as_str();
        let evo_name = pair.evolution.name.as_str();

        let Some(pre) = self.species_record(pre_name).await else {
            return PairOutcome::FetchFailed;
        };
        let Some(evo) = self.species_record(evo_name).await else {
            return PairOutcome::FetchFailed;
        };

        let pre_values = match self.extract_row(&pre, fields, pre_name).await {
            Ok(values) => values,
            Err(field) => return PairOutcome::Missing(field, pre_name.to_string()),
        };
        let evo_values = match self.extract_row(&evo, fields, evo_name).await {
            Ok(values) => values,
            Err(field) => return PairOutcome::Missing(field, evo_name.to_string()),
        };

        PairOutcome::Row(pair_cells(fields, &pre_values, &evo_values))
    }
}

/// Interleave both sides per field, then append stat deltas.
fn pair_cells(fields: &[Field], pre: &[FieldValue], evo: &[FieldValue]) -> Vec<String> {
    let mut row: Vec<String> = pre
        .iter()
        .zip(evo)
        .flat_map(|(p, e)| [p.to_string(), e.to_string()])
        .collect();

    for (index, field) in fields.iter().enumerate() {
        if !field.is_stat() {
            continue;
        }
        let delta = match (pre[index].as_int(), evo[index].as_int()) {
            (Some(p), Some(e)) => (e as i64 - p as i64).to_string(),
            _ => String::new(),
        };
        row.push(delta);
    }
    row
}
