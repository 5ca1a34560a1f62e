use glam::IVec2;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use util::Grid;

use crate::Tile;

/// The standard layer stack of a map, bottom to top.
///
/// Discriminants are the layer positions in a map built with
/// `Location::with_standard_layers`.
#[derive(
    Copy,
    Clone,
    Default,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Debug,
    Display,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "kebab-case")]
#[strum(ascii_case_insensitive)]
pub enum MapLayer {
    /// Ground the player walks on.
    #[default]
    Back = 0,
    /// Walls, fences and other obstacles.
    Buildings = 1,
    Paths = 2,
    /// Drawn over the player.
    Front = 3,
    AlwaysFront = 4,
}

impl MapLayer {
    /// Layer id as it appears in map files.
    pub fn id(self) -> String {
        self.to_string()
    }
}

/// One plane of tiles.
#[derive(Clone, Default, Eq, PartialEq, Debug)]
pub struct Layer {
    pub id: String,
    tiles: Grid<Option<Tile>>,
}

impl Layer {
    pub fn new(id: impl Into<String>, dim: impl Into<[i32; 2]>) -> Self {
        Layer {
            id: id.into(),
            tiles: Grid::with_default(dim),
        }
    }

    pub fn dim(&self) -> IVec2 {
        self.tiles.dim()
    }

    pub fn get(&self, pos: IVec2) -> Option<&Tile> {
        self.tiles.get(pos).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, pos: IVec2) -> Option<&mut Tile> {
        self.tiles.get_mut(pos).and_then(Option::as_mut)
    }

    /// Put a tile in a cell, returns the tile that was there before.
    ///
    /// Positions outside the layer are ignored.
    pub fn insert(&mut self, pos: IVec2, tile: Tile) -> Option<Tile> {
        self.tiles.get_mut(pos).and_then(|t| t.replace(tile))
    }

    pub fn remove(&mut self, pos: IVec2) -> Option<Tile> {
        self.tiles.get_mut(pos).and_then(Option::take)
    }

    /// Iterate occupied cells.
    pub fn tiles(&self) -> impl Iterator<Item = (IVec2, &Tile)> + '_ {
        self.tiles
            .iter()
            .filter_map(|(p, t)| t.as_ref().map(|t| (p, t)))
    }
}
