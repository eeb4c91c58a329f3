// Output fields and their extraction from creature records.

use std::fmt;
use std::str::FromStr;

use crate::api::{Pokemon, Remote};
use crate::error::Error;
use crate::fetch::{Fetcher, Sleep};
use crate::sprites::SpriteStore;

/// One selectable output column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Id,
    Height,
    Weight,
    Hp,
    Attack,
    Defense,
    SpecialAttack,
    SpecialDefense,
    Speed,
    Types,
    Sprite,
}

impl Field {
    /// Every field, in `--all-fields` column order.
    pub const ALL: [Field; 12] = [
        Field::Name,
        Field::Id,
        Field::Height,
        Field::Weight,
        Field::Hp,
        Field::Attack,
        Field::Defense,
        Field::SpecialAttack,
        Field::SpecialDefense,
        Field::Speed,
        Field::Types,
        Field::Sprite,
    ];

    /// The six base stats.
    pub const STATS: [Field; 6] = [
        Field::Hp,
        Field::Attack,
        Field::Defense,
        Field::SpecialAttack,
        Field::SpecialDefense,
        Field::Speed,
    ];

    /// Columns selected by `--all-stats`.
    pub fn all_stats_preset() -> Vec<Field> {
        let mut fields = vec![Field::Name, Field::Id];
        fields.extend(Field::STATS);
        fields.push(Field::Sprite);
        fields
    }

    /// Default column selection.
    pub fn default_selection() -> Vec<Field> {
        vec![Field::Name, Field::Speed, Field::Sprite]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Id => "id",
            Field::Height => "height",
            Field::Weight => "weight",
            Field::Hp => "hp",
            Field::Attack => "attack",
            Field::Defense => "defense",
            Field::SpecialAttack => "special-attack",
            Field::SpecialDefense => "special-defense",
            Field::Speed => "speed",
            Field::Types => "types",
            Field::Sprite => "sprite",
        }
    }

    /// API stat name, for the six stat fields.
    pub fn stat_name(&self) -> Option<&'static str> {
        match self {
            Field::Hp
            | Field::Attack
            | Field::Defense
            | Field::SpecialAttack
            | Field::SpecialDefense
            | Field::Speed => Some(self.as_str()),
            Field::Name
            | Field::Id
            | Field::Height
            | Field::Weight
            | Field::Types
            | Field::Sprite => None,
        }
    }

    pub fn is_stat(&self) -> bool {
        self.stat_name().is_some()
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Field::ALL
            .into_iter()
            .find(|field| field.as_str() == name)
            .ok_or_else(|| Error::UnknownField(name.to_string()))
    }
}

/// A single extracted cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Int(u64),
    Text(String),
}

impl FieldValue {
    pub fn as_int(&self) -> Option<u64> {
        match self {
            FieldValue::Int(value) => Some(*value),
            FieldValue::Text(_) => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Int(value) => write!(f, "{}", value),
            FieldValue::Text(text) => f.write_str(text),
        }
    }
}

/// What to put in the `sprite` column.
#[derive(Debug, Clone)]
pub enum ImagePolicy {
    /// The remote sprite URL, unchanged.
    Link,
    /// Download into the store and use the local path.
    Download(SpriteStore),
}

/// Value of `field` for `record`, or `None` when the record lacks it.
///
/// `name` always comes from `display_name`. Only `sprite` under
/// [`ImagePolicy::Download`] touches the network, through `fetcher`.
pub async fn extract_field<R: Remote, S: Sleep>(
    record: &Pokemon,
    field: Field,
    display_name: &str,
    images: &ImagePolicy,
    fetcher: &Fetcher<R, S>,
) -> Option<FieldValue> {
    match field {
        Field::Name => Some(FieldValue::Text(display_name.to_string())),
        Field::Id => record.id.map(FieldValue::Int),
        Field::Height => record.height.map(FieldValue::Int),
        Field::Weight => record.weight.map(FieldValue::Int),
        Field::Hp
        | Field::Attack
        | Field::Defense
        | Field::SpecialAttack
        | Field::SpecialDefense
        | Field::Speed => record.stat(field.as_str()).map(FieldValue::Int),
        Field::Types => Some(FieldValue::Text(record.type_names().join(", "))),
        Field::Sprite => {
            let url = record.sprites.front_default.as_deref()?;
            match images {
                ImagePolicy::Link => Some(FieldValue::Text(url.to_string())),
                ImagePolicy::Download(sprites) => sprites
                    .fetch(fetcher, url, display_name)
                    .await
                    .map(|path| FieldValue::Text(path.display().to_string())),
            }
        }
    }
}
