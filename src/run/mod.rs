// Collection runs.
// Drives the fetch pipeline item by item and assembles output rows.

pub mod chains;
pub mod flat;

use std::time::Instant;

use tracing::info;

use crate::api::{Pokemon, Remote};
use crate::fetch::{Fetcher, Sleep};
use crate::fields::{Field, FieldValue, ImagePolicy, extract_field};

/// Counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Rows written.
    pub processed: usize,
    /// Items whose records could not be fetched.
    pub skipped_fetch: usize,
    /// Items lacking a requested field.
    pub skipped_missing: usize,
    /// Items that failed for any other reason.
    pub skipped_error: usize,
}

impl RunStats {
    pub fn skipped(&self) -> usize {
        self.skipped_fetch + self.skipped_missing + self.skipped_error
    }
}

/// Everything a run needs, constructed once by the caller.
pub struct Session<R, S> {
    pub fetcher: Fetcher<R, S>,
    pub images: ImagePolicy,
    pub base_url: String,
    pub force_refresh: bool,
}

impl<R: Remote, S: Sleep> Session<R, S> {
    /// Extract `fields` in order, or report the first one the record lacks.
    async fn extract_row(
        &self,
        record: &Pokemon,
        fields: &[Field],
        display_name: &str,
    ) -> Result<Vec<FieldValue>, Field> {
        let mut row = Vec::with_capacity(fields.len());
        for &field in fields {
            let value = extract_field(record, field, display_name, &self.images, &self.fetcher)
                .await
                .ok_or(field)?;
            row.push(value);
        }
        Ok(row)
    }
}

/// Periodic progress lines with a time estimate.
struct Progress {
    total: usize,
    started: Instant,
}

impl Progress {
    fn new(total: usize) -> Self {
        Self {
            total,
            started: Instant::now(),
        }
    }

    /// Log item `index` (0-based); only the first few and every tenth.
    fn report(&self, index: usize, item: &str, stats: &RunStats) {
        if index >= 5 && index % 10 != 0 {
            return;
        }

        let eta = if index > 0 {
            let per_item = self.started.elapsed().as_secs_f64() / index as f64;
            format!(", Est. remaining: {:.1}s", per_item * (self.total - index) as f64)
        } else {
            String::new()
        };

        info!(
            "Processing {}/{}: {} (Processed: {}, Skipped: {}{})",
            index + 1,
            self.total,
            item,
            stats.processed,
            stats.skipped(),
            eta
        );
    }
}
