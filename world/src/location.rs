use anyhow::bail;
use glam::IVec2;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use util::{Grid, IndexMap};

use crate::{
    FeatureIndex, LargeFeature, Layer, MapLayer, MapSurface, Tile, TileSheet,
};

/// Serialized form of `Location`, stores only occupied cells.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
struct SerLocation {
    name: String,
    size: IVec2,
    tile_sheets: Vec<TileSheet>,
    layers: Vec<SerLayer>,
    /// Water cells.
    water: Vec<IVec2>,
    features: Vec<LargeFeature>,
}

#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
struct SerLayer {
    id: String,
    tiles: Vec<SerTile>,
}

#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
struct SerTile {
    pos: IVec2,
    sheet: String,
    index: u32,
    properties: IndexMap<String, String>,
}

/// In-memory tile map.
#[derive(Clone, Default, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(try_from = "SerLocation", into = "SerLocation")]
pub struct Location {
    pub name: String,
    size: IVec2,
    layers: Vec<Layer>,
    tile_sheets: IndexMap<String, TileSheet>,
    water: Grid<bool>,
    features: FeatureIndex,
}

impl Location {
    /// Create an empty map with the given layers, bottom to top.
    pub fn new<S: Into<String>>(
        name: impl Into<String>,
        size: impl Into<IVec2>,
        layer_ids: impl IntoIterator<Item = S>,
    ) -> Self {
        let size = size.into();
        Location {
            name: name.into(),
            size,
            layers: layer_ids
                .into_iter()
                .map(|id| Layer::new(id, size))
                .collect(),
            tile_sheets: Default::default(),
            water: Grid::new(size, false),
            features: Default::default(),
        }
    }

    /// Create an empty map with the `MapLayer` layer stack.
    pub fn with_standard_layers(
        name: impl Into<String>,
        size: impl Into<IVec2>,
    ) -> Self {
        Location::new(name, size, MapLayer::iter().map(MapLayer::id))
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn tile_sheets(&self) -> impl Iterator<Item = &TileSheet> {
        self.tile_sheets.values()
    }

    pub fn features(&self) -> &FeatureIndex {
        &self.features
    }

    pub fn add_feature(&mut self, feature: LargeFeature) {
        self.features.insert(feature);
    }

    /// Iterate cells flagged as water.
    pub fn water_cells(&self) -> impl Iterator<Item = IVec2> + '_ {
        self.water.iter().filter(|(_, w)| **w).map(|(p, _)| p)
    }
}

impl MapSurface for Location {
    fn dim(&self) -> IVec2 {
        self.size
    }

    fn layer_count(&self) -> usize {
        self.layers.len()
    }

    fn layer_index(&self, id: &str) -> Option<usize> {
        self.layers.iter().position(|l| l.id == id)
    }

    fn layer_id(&self, layer: usize) -> Option<&str> {
        self.layers.get(layer).map(|l| l.id.as_str())
    }

    fn tile(&self, layer: usize, pos: IVec2) -> Option<&Tile> {
        self.layers.get(layer)?.get(pos)
    }

    fn tile_mut(&mut self, layer: usize, pos: IVec2) -> Option<&mut Tile> {
        self.layers.get_mut(layer)?.get_mut(pos)
    }

    fn remove_tile(&mut self, layer: usize, pos: IVec2) -> Option<Tile> {
        self.layers.get_mut(layer)?.remove(pos)
    }

    fn insert_tile(
        &mut self,
        layer: usize,
        pos: IVec2,
        tile: Tile,
    ) -> Option<Tile> {
        debug_assert!(
            self.tile_sheets.contains_key(&tile.sheet),
            "inserting tile with unknown tilesheet {:?}",
            tile.sheet
        );
        self.layers.get_mut(layer)?.insert(pos, tile)
    }

    fn tile_sheet(&self, id: &str) -> Option<&TileSheet> {
        self.tile_sheets.get(id)
    }

    fn tile_sheet_mut(&mut self, id: &str) -> Option<&mut TileSheet> {
        self.tile_sheets.get_mut(id)
    }

    fn add_tile_sheet(&mut self, sheet: TileSheet) -> bool {
        if self.tile_sheets.contains_key(&sheet.id) {
            return false;
        }
        self.tile_sheets.insert(sheet.id.clone(), sheet);
        true
    }

    fn is_water(&self, pos: IVec2) -> bool {
        self.water.get(pos).copied().unwrap_or(false)
    }

    fn set_water(&mut self, pos: IVec2, is_water: bool) {
        if let Some(w) = self.water.get_mut(pos) {
            *w = is_water;
        }
    }

    fn features_at(&self, pos: IVec2) -> &[LargeFeature] {
        self.features.at(pos)
    }

    fn remove_features_at(&mut self, pos: IVec2) -> Vec<LargeFeature> {
        self.features.remove_at(pos)
    }
}

impl TryFrom<SerLocation> for Location {
    type Error = anyhow::Error;

    fn try_from(value: SerLocation) -> Result<Self, Self::Error> {
        let size = value.size;
        if size.x < 0 || size.y < 0 {
            bail!("{}: negative map size {size}", value.name);
        }

        let mut ret = Location::new(
            value.name,
            size,
            value.layers.iter().map(|l| l.id.clone()),
        );

        for sheet in value.tile_sheets {
            let id = sheet.id.clone();
            if !ret.add_tile_sheet(sheet) {
                bail!("{}: duplicate tilesheet {id:?}", ret.name);
            }
        }

        for (i, layer) in value.layers.into_iter().enumerate() {
            for SerTile {
                pos,
                sheet,
                index,
                properties,
            } in layer.tiles
            {
                let tile = Tile {
                    sheet,
                    index,
                    properties,
                };
                if !ret.contains(pos) {
                    bail!("{}: tile at {pos} is outside the map", ret.name);
                }
                if !ret.tile_sheets.contains_key(&tile.sheet) {
                    bail!(
                        "{}: tile at {pos} uses unknown tilesheet {:?}",
                        ret.name,
                        tile.sheet
                    );
                }
                ret.layers[i].insert(pos, tile);
            }
        }

        for pos in value.water {
            if !ret.contains(pos) {
                bail!("{}: water at {pos} is outside the map", ret.name);
            }
            ret.set_water(pos, true);
        }

        for feature in value.features {
            ret.features.insert(feature);
        }

        Ok(ret)
    }
}

impl From<Location> for SerLocation {
    fn from(value: Location) -> Self {
        SerLocation {
            size: value.size,
            tile_sheets: value.tile_sheets.values().cloned().collect(),
            layers: value
                .layers
                .iter()
                .map(|l| SerLayer {
                    id: l.id.clone(),
                    tiles: l
                        .tiles()
                        .map(|(pos, t)| SerTile {
                            pos,
                            sheet: t.sheet.clone(),
                            index: t.index,
                            properties: t.properties.clone(),
                        })
                        .collect(),
                })
                .collect(),
            water: value.water_cells().collect(),
            features: value.features.iter().cloned().collect(),
            name: value.name,
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tiles: usize = self.layers.iter().map(|l| l.tiles().count()).sum();
        write!(
            f,
            "{} ({}x{}, {} layers, {tiles} tiles, {} features)",
            self.name,
            self.size.x,
            self.size.y,
            self.layers.len(),
            self.features.len()
        )
    }
}
