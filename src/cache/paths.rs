// Cache path utilities.
// Maps cache keys onto the on-disk layout under an explicit cache root.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

/// Default cache root (~/.cache/pokefetch on Linux), if a home directory is known.
pub fn default_cache_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "pokefetch").map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Identifies one cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Snapshot of the full creature list.
    PokemonList,
    /// Snapshot of the full evolution-chain list.
    EvolutionChainList,
    /// Detail record for one creature, keyed by name.
    Pokemon(String),
    /// One evolution chain, keyed by chain id.
    EvolutionChain(String),
}

impl CacheKey {
    /// Key for a creature detail record reachable at `url`.
    pub fn pokemon_from_url(url: &str) -> Self {
        CacheKey::Pokemon(key_from_url(url).to_string())
    }

    /// Key for an evolution chain reachable at `url`.
    pub fn chain_from_url(url: &str) -> Self {
        CacheKey::EvolutionChain(key_from_url(url).to_string())
    }

    /// Short label for log output.
    pub fn label(&self) -> String {
        match self {
            CacheKey::PokemonList => "pokemon list".to_string(),
            CacheKey::EvolutionChainList => "evolution chain list".to_string(),
            CacheKey::Pokemon(name) => name.clone(),
            CacheKey::EvolutionChain(id) => format!("evolution chain {}", id),
        }
    }
}

/// Filesystem layout of the cache.
#[derive(Debug, Clone)]
pub struct CacheLayout {
    root: PathBuf,
}

impl CacheLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to the full creature-list snapshot.
    pub fn pokemon_list_path(&self) -> PathBuf {
        self.root.join("pokemon_list.json")
    }

    /// Path to the full evolution-chain-list snapshot.
    pub fn evolution_chain_list_path(&self) -> PathBuf {
        self.root.join("evolution_chain_list.json")
    }

    /// Directory holding one file per creature detail record.
    pub fn pokemon_details_dir(&self) -> PathBuf {
        self.root.join("pokemon_details")
    }

    /// Directory holding one file per evolution chain.
    pub fn evolution_chains_dir(&self) -> PathBuf {
        self.root.join("evolution_chains")
    }

    /// Path to a creature's detail record.
    pub fn pokemon_path(&self, name: &str) -> PathBuf {
        self.pokemon_details_dir()
            .join(format!("{}.json", sanitize_name(name)))
    }

    /// Path to an evolution chain record.
    pub fn evolution_chain_path(&self, id: &str) -> PathBuf {
        self.evolution_chains_dir()
            .join(format!("{}.json", sanitize_name(id)))
    }

    /// Resolve the file backing `key`.
    pub fn path_for(&self, key: &CacheKey) -> PathBuf {
        match key {
            CacheKey::PokemonList => self.pokemon_list_path(),
            CacheKey::EvolutionChainList => self.evolution_chain_list_path(),
            CacheKey::Pokemon(name) => self.pokemon_path(name),
            CacheKey::EvolutionChain(id) => self.evolution_chain_path(id),
        }
    }
}

/// Trailing path segment of a resource URL, ignoring a trailing slash.
pub fn key_from_url(url: &str) -> &str {
    url.trim_end_matches('/').rsplit('/').next().unwrap_or(url)
}

/// Sanitize a name for use in filesystem paths.
/// Replaces problematic characters with underscores.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("bulbasaur"), "bulbasaur");
        assert_eq!(sanitize_name("type:null"), "type_null");
        assert_eq!(sanitize_name("a/b"), "a_b");
    }

    #[test]
    fn test_key_from_url() {
        assert_eq!(
            key_from_url("https://pokeapi.co/api/v2/pokemon/bulbasaur/"),
            "bulbasaur"
        );
        assert_eq!(
            key_from_url("https://pokeapi.co/api/v2/pokemon/bulbasaur"),
            "bulbasaur"
        );
        assert_eq!(
            key_from_url("https://pokeapi.co/api/v2/evolution-chain/67/"),
            "67"
        );
    }

    #[test]
    fn test_same_resource_maps_to_same_key() {
        let a = CacheKey::pokemon_from_url("https://pokeapi.co/api/v2/pokemon/ivysaur/");
        let b = CacheKey::pokemon_from_url("http://localhost:8080/pokemon/ivysaur");
        assert_eq!(a, b);
    }

    #[test]
    fn test_cache_paths() {
        let layout = CacheLayout::new("/tmp/pf");

        assert!(layout.pokemon_list_path().ends_with("pf/pokemon_list.json"));
        assert!(
            layout
                .evolution_chain_list_path()
                .ends_with("pf/evolution_chain_list.json")
        );
        assert!(
            layout
                .path_for(&CacheKey::Pokemon("pikachu".to_string()))
                .ends_with("pokemon_details/pikachu.json")
        );
        assert!(
            layout
                .path_for(&CacheKey::EvolutionChain("10".to_string()))
                .ends_with("evolution_chains/10.json")
        );
    }
}
