use glam::{IVec2, ivec2};
use gfx::SpriteMap;
use serde::{Deserialize, Serialize};
use util::IndexMap;
use world::{MapLayer, TileSheet};

use crate::{Error, Result, TileOverride};

/// Patch data for one map.
#[derive(Clone, Default, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Data {
    /// Symbolic tilesheet names to tilesheet ids, must contain `default`.
    pub tilesheets: IndexMap<String, String>,
    /// Sheets to attach to the map before any layout runs.
    pub add_tilesheets: Vec<TileSheet>,
    /// Layout lists by variant name.
    pub layouts: IndexMap<String, Vec<Layout>>,
    pub reskins: Vec<Reskin>,
}

/// A group of tile changes that is applied as a unit.
#[derive(Clone, Default, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Layout {
    pub name: String,
    /// Settings flag that must be set for the layout to apply.
    pub flag: Option<String>,
    /// Shift applied to every cell position in the layout.
    pub offset: IVec2,
    pub grow: Vec<SheetGrowth>,
    pub tiles: Vec<TileOverride>,
    pub tile_properties: Vec<TileProperty>,
    pub sheet_properties: Vec<SheetProperty>,
}

/// Make a tilesheet at least `rows` cells tall.
#[derive(Clone, Default, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SheetGrowth {
    pub tilesheet: Option<String>,
    pub rows: i32,
}

#[derive(Clone, Default, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TileProperty {
    pub layer: Option<MapLayer>,
    pub x: i32,
    pub y: i32,
    pub key: String,
    pub value: String,
}

impl TileProperty {
    pub fn layer(&self) -> MapLayer {
        self.layer.unwrap_or_default()
    }
}

/// Property of every tile that draws sprite `index`.
#[derive(Clone, Default, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SheetProperty {
    pub tilesheet: Option<String>,
    pub index: u32,
    pub key: String,
    pub value: String,
}

/// Sprites from an override image appended to a tilesheet atlas.
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Reskin {
    pub tilesheet: Option<String>,
    /// Override image path relative to the asset directory.
    pub source: String,
    /// Atlas index that the first override sprite lands on.
    pub offset: u32,
    /// Number of sprites taken from the start of the override image.
    pub count: u32,
    /// Sprite cell size in pixels.
    pub cell: IVec2,
}

impl Default for Reskin {
    fn default() -> Self {
        Reskin {
            tilesheet: None,
            source: Default::default(),
            offset: 0,
            count: 0,
            cell: ivec2(16, 16),
        }
    }
}

impl Reskin {
    /// Override sprite to atlas index map.
    pub fn sprites(&self) -> Result<SpriteMap> {
        SpriteMap::shifted(0..self.count, self.offset).ok_or_else(|| {
            Error::config(format!(
                "re-skin {:?} of {} sprites at #{} is past the largest sprite index",
                self.source, self.count, self.offset
            ))
        })
    }
}
