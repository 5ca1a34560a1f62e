use serde::{Deserialize, Serialize};
use util::IndexMap;

/// A single layer cell's sprite binding.
#[derive(Clone, Default, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Tile {
    /// Id of the tilesheet the sprite is drawn from.
    pub sheet: String,
    /// Sprite index in the tilesheet.
    pub index: u32,
    /// Per-tile properties, eg. `Action` triggers.
    pub properties: IndexMap<String, String>,
}

impl Tile {
    pub fn new(sheet: impl Into<String>, index: u32) -> Self {
        Tile {
            sheet: sheet.into(),
            index,
            properties: Default::default(),
        }
    }

    pub fn with_property(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }
}
