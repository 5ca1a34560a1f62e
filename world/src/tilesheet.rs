use glam::{IVec2, ivec2};
use serde::{Deserialize, Serialize};
use util::IndexMap;

/// Named sprite atlas attached to a map.
#[derive(Clone, Default, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TileSheet {
    pub id: String,
    /// Asset path of the atlas image.
    pub image_source: String,
    /// Size of the sheet in sprite cells.
    pub sheet_size: IVec2,
    /// Size of one sprite cell in pixels.
    pub tile_size: IVec2,
    pub properties: IndexMap<String, String>,
}

impl TileSheet {
    pub fn new(
        id: impl Into<String>,
        image_source: impl Into<String>,
        sheet_size: impl Into<IVec2>,
        tile_size: impl Into<IVec2>,
    ) -> Self {
        TileSheet {
            id: id.into(),
            image_source: image_source.into(),
            sheet_size: sheet_size.into(),
            tile_size: tile_size.into(),
            properties: Default::default(),
        }
    }

    /// Number of sprite cells on the sheet.
    pub fn tile_count(&self) -> u32 {
        (self.sheet_size.x.max(0) * self.sheet_size.y.max(0)) as u32
    }

    /// Grow the sheet to at least `rows` rows of cells.
    ///
    /// Never shrinks the sheet, so asking for the same height twice is a
    /// no-op. Returns whether the sheet grew.
    pub fn grow_rows_to(&mut self, rows: i32) -> bool {
        if rows <= self.sheet_size.y {
            return false;
        }
        self.sheet_size = ivec2(self.sheet_size.x, rows);
        true
    }

    /// Set a property that applies to every tile drawing sprite `index`.
    pub fn set_index_property(
        &mut self,
        index: u32,
        key: &str,
        value: impl Into<String>,
    ) -> Option<String> {
        self.properties
            .insert(index_property_key(index, key), value.into())
    }

    pub fn index_property(&self, index: u32, key: &str) -> Option<&str> {
        self.properties
            .get(&index_property_key(index, key))
            .map(String::as_str)
    }
}

/// Sheet-level property key for per-sprite properties.
fn index_property_key(index: u32, key: &str) -> String {
    format!("@TileIndex@{index}@{key}")
}
