// Fetch module.
// Layers retry/backoff, cache-first lookup, and pagination over a `Remote`.

pub mod fetcher;
pub mod paginate;
pub mod retry;

pub use fetcher::{DEFAULT_REQUEST_DELAY, Fetched, Fetcher};
pub use paginate::Collected;
pub use retry::{RetryPolicy, Sleep, TokioSleep, with_backoff};
