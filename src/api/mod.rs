// PokéAPI module.
// Provides the HTTP client, endpoint URLs, and response types.

pub mod client;
pub mod endpoints;
pub mod types;

pub use client::{PokeApiClient, Remote};
pub use types::*;
