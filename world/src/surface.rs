use glam::IVec2;

use crate::{LargeFeature, Tile, TileSheet};

/// Mutation interface of a live tile map.
///
/// Layers are addressed by position in the layer stack, `layer_index` and
/// `layer_id` translate between positions and layer ids. Cell positions are
/// expected to be within `dim`, implementations ignore writes outside it.
pub trait MapSurface {
    /// Size of the map in cells.
    fn dim(&self) -> IVec2;

    fn contains(&self, pos: IVec2) -> bool {
        let dim = self.dim();
        (0..dim.x).contains(&pos.x) && (0..dim.y).contains(&pos.y)
    }

    fn layer_count(&self) -> usize;

    fn layer_index(&self, id: &str) -> Option<usize>;

    fn layer_id(&self, layer: usize) -> Option<&str>;

    fn tile(&self, layer: usize, pos: IVec2) -> Option<&Tile>;

    fn tile_mut(&mut self, layer: usize, pos: IVec2) -> Option<&mut Tile>;

    /// Change the sprite index of an existing tile in place.
    ///
    /// Returns false if there was no tile at the position.
    fn set_tile_index(&mut self, layer: usize, pos: IVec2, index: u32) -> bool {
        match self.tile_mut(layer, pos) {
            Some(tile) => {
                tile.index = index;
                true
            }
            None => false,
        }
    }

    fn remove_tile(&mut self, layer: usize, pos: IVec2) -> Option<Tile>;

    /// Bind a new tile to a cell, replacing whatever was there.
    fn insert_tile(
        &mut self,
        layer: usize,
        pos: IVec2,
        tile: Tile,
    ) -> Option<Tile>;

    fn tile_sheet(&self, id: &str) -> Option<&TileSheet>;

    fn tile_sheet_mut(&mut self, id: &str) -> Option<&mut TileSheet>;

    /// Attach a tilesheet to the map.
    ///
    /// Returns false and leaves the map unchanged if a sheet with the same id
    /// is already attached.
    fn add_tile_sheet(&mut self, sheet: TileSheet) -> bool;

    fn is_water(&self, pos: IVec2) -> bool;

    fn set_water(&mut self, pos: IVec2, is_water: bool);

    fn features_at(&self, pos: IVec2) -> &[LargeFeature];

    /// Remove all large features anchored at `pos`.
    fn remove_features_at(&mut self, pos: IVec2) -> Vec<LargeFeature>;
}
