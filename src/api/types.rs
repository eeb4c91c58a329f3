// PokéAPI response types.
// Defines structs for deserializing list pages, creature records, and evolution chains.

use serde::{Deserialize, Serialize};

/// Name and URL pointer to a remote resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRef {
    /// Absent for unnamed resources such as evolution chains.
    #[serde(default)]
    pub name: String,
    pub url: String,
}

impl ResourceRef {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// One page of a paginated list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub count: Option<u64>,
    pub next: Option<String>,
    #[serde(default)]
    pub results: Vec<ResourceRef>,
}

/// Creature detail record from `/pokemon/{name}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Pokemon {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub height: Option<u64>,
    #[serde(default)]
    pub weight: Option<u64>,
    #[serde(default)]
    pub stats: Vec<StatEntry>,
    #[serde(default)]
    pub types: Vec<TypeSlot>,
    #[serde(default)]
    pub sprites: Sprites,
}

impl Pokemon {
    /// Base value of the named stat, if the record lists it.
    pub fn stat(&self, stat_name: &str) -> Option<u64> {
        self.stats
            .iter()
            .find(|entry| entry.stat.name == stat_name)
            .map(|entry| entry.base_stat)
    }

    /// Type names in slot order.
    pub fn type_names(&self) -> Vec<&str> {
        self.types.iter().map(|t| t.type_ref.name.as_str()).collect()
    }
}

/// A base stat entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatEntry {
    pub base_stat: u64,
    pub stat: NamedRef,
}

/// A type entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeSlot {
    #[serde(default)]
    pub slot: Option<u32>,
    #[serde(rename = "type")]
    pub type_ref: NamedRef,
}

/// Named reference whose URL is not needed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedRef {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// Sprite URLs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sprites {
    #[serde(default)]
    pub front_default: Option<String>,
}

/// Evolution chain record from `/evolution-chain/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvolutionChain {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub chain: Option<ChainLink>,
}

/// A node of an evolution chain tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainLink {
    pub species: ResourceRef,
    #[serde(default)]
    pub evolves_to: Vec<ChainLink>,
}

impl ChainLink {
    pub fn new(species: ResourceRef, evolves_to: Vec<ChainLink>) -> Self {
        Self {
            species,
            evolves_to,
        }
    }
}

/// One parent to child edge of an evolution chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvolutionPair {
    pub pre_evolution: ResourceRef,
    pub evolution: ResourceRef,
}
