// PokéAPI endpoint URLs.

/// Public PokéAPI v2 base URL.
pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// First page of the creature list.
pub fn pokemon_list_url(base_url: &str) -> String {
    format!("{}/pokemon", base_url.trim_end_matches('/'))
}

/// First page of the evolution-chain list.
pub fn evolution_chain_list_url(base_url: &str) -> String {
    format!("{}/evolution-chain", base_url.trim_end_matches('/'))
}

/// Detail record for a creature by name.
pub fn pokemon_url(base_url: &str, name: &str) -> String {
    format!("{}/pokemon/{}/", base_url.trim_end_matches('/'), name)
}
