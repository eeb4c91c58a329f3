//! Batch collector for PokéAPI creature records and evolution chains.
//!
//! Raw responses are cached on disk and never expire until force-refreshed,
//! so repeated runs only touch the network for records they have not seen.

pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod evolution;
pub mod fetch;
pub mod fields;
pub mod logging;
pub mod output;
pub mod run;
pub mod sprites;

#[cfg(test)]
mod testing;

pub use error::{Error, Result};
