use std::fmt;

use derive_more::From;
use glam::{IVec2, ivec2};
use world::{MapLayer, MapSurface};

use crate::{Error, Result};

/// Layer address, either by position in the layer stack or by layer id.
#[derive(Clone, Eq, PartialEq, Hash, Debug, From)]
pub enum LayerRef {
    Index(usize),
    Name(String),
}

impl LayerRef {
    /// Find the layer position on a map.
    pub fn resolve<S: MapSurface + ?Sized>(&self, surface: &S) -> Option<usize> {
        match self {
            LayerRef::Index(i) => (*i < surface.layer_count()).then_some(*i),
            LayerRef::Name(id) => surface.layer_index(id),
        }
    }
}

impl From<&str> for LayerRef {
    fn from(value: &str) -> Self {
        LayerRef::Name(value.to_owned())
    }
}

impl From<MapLayer> for LayerRef {
    fn from(value: MapLayer) -> Self {
        LayerRef::Name(value.id())
    }
}

impl fmt::Display for LayerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerRef::Index(i) => write!(f, "#{i}"),
            LayerRef::Name(id) => write!(f, "{id}"),
        }
    }
}

/// What to do to a cell.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Change {
    /// Clear the cell back to dry, empty ground.
    Remove,
    /// Make the cell draw sprite `index` of tilesheet `sheet`.
    Set { sheet: String, index: u32 },
}

/// Desired state of a single layer cell.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct TileEdit {
    pub layer: LayerRef,
    pub pos: IVec2,
    pub change: Change,
}

impl TileEdit {
    pub fn remove(layer: impl Into<LayerRef>, pos: impl Into<IVec2>) -> Self {
        TileEdit {
            layer: layer.into(),
            pos: pos.into(),
            change: Change::Remove,
        }
    }

    pub fn set(
        layer: impl Into<LayerRef>,
        pos: impl Into<IVec2>,
        sheet: impl Into<String>,
        index: u32,
    ) -> Self {
        TileEdit {
            layer: layer.into(),
            pos: pos.into(),
            change: Change::Set {
                sheet: sheet.into(),
                index,
            },
        }
    }

    /// Build an edit from the compact form used in hand-written edit
    /// tables.
    ///
    /// A negative `tile_index` removes the tile and ignores `sheet`, other
    /// values need a sheet.
    ///
    /// ```
    /// # use engine::{Change, TileEdit};
    /// let edit = TileEdit::from_raw(0usize, 40, 48, -1, None).unwrap();
    /// assert_eq!(edit.change, Change::Remove);
    ///
    /// let edit = TileEdit::from_raw(1usize, 39, 48, 905, Some("Z")).unwrap();
    /// assert!(matches!(edit.change, Change::Set { index: 905, .. }));
    ///
    /// assert!(TileEdit::from_raw(1usize, 39, 48, 905, None).is_err());
    /// ```
    pub fn from_raw(
        layer: impl Into<LayerRef>,
        x: i32,
        y: i32,
        tile_index: i32,
        sheet: Option<&str>,
    ) -> Result<Self> {
        let layer = layer.into();
        if tile_index < 0 {
            return Ok(TileEdit::remove(layer, ivec2(x, y)));
        }

        let Some(sheet) = sheet else {
            return Err(Error::config(format!(
                "tile {tile_index} at ({x}, {y}) on layer {layer} has no tilesheet"
            )));
        };
        Ok(TileEdit::set(layer, ivec2(x, y), sheet, tile_index as u32))
    }
}
