//! Resolving declarative tile overrides into concrete edits.

use std::iter;

use glam::IVec2;
use serde::{Deserialize, Serialize};
use util::Rect;
use world::MapLayer;

use crate::{Change, Error, LayerRef, Result, TileEdit, TilesheetRegistry};

/// One record of a layout's tile table.
#[derive(Clone, Default, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TileOverride {
    /// Symbolic tilesheet name, the registry default if absent.
    pub tilesheet: Option<String>,
    /// Target layer, `Back` if absent.
    pub layer: Option<MapLayer>,
    pub x: i32,
    pub y: i32,
    /// Sprite index, an absent or negative index removes the tile.
    pub tile: Option<i32>,
    /// Repeat the override over a block of cells starting from `(x, y)`.
    pub area: Option<IVec2>,
}

impl TileOverride {
    pub fn layer(&self) -> MapLayer {
        self.layer.unwrap_or_default()
    }

    pub fn change(&self, registry: &TilesheetRegistry) -> Result<Change> {
        match self.tile {
            Some(index) if index >= 0 => Ok(Change::Set {
                sheet: registry.resolve(self.tilesheet.as_deref())?.to_owned(),
                index: index as u32,
            }),
            _ => Ok(Change::Remove),
        }
    }

    /// Cells covered by the override.
    pub fn cells(&self, offset: IVec2) -> Result<impl Iterator<Item = IVec2>> {
        let area = self.area.unwrap_or(IVec2::ONE);
        if area.x < 1 || area.y < 1 || area.x.checked_mul(area.y).is_none() {
            return Err(Error::config(format!(
                "override at ({}, {}) has bad area {area}",
                self.x, self.y
            )));
        }
        let origin = shift(self.x, self.y, offset)?;
        if shift(origin.x, origin.y, area).is_err() {
            return Err(Error::config(format!(
                "override area {area} at {origin} runs off the coordinate range"
            )));
        }
        Ok((Rect::sized(area) + origin).into_iter().map(IVec2::from))
    }
}

/// Offset a layout position.
pub(crate) fn shift(x: i32, y: i32, offset: IVec2) -> Result<IVec2> {
    match (x.checked_add(offset.x), y.checked_add(offset.y)) {
        (Some(x), Some(y)) => Ok(IVec2::new(x, y)),
        _ => Err(Error::config(format!(
            "position ({x}, {y}) can't be offset by {offset}"
        ))),
    }
}

/// Lazily expand overrides into tile edits, shifted by `offset`.
///
/// An override that can't be resolved yields an error in its place. The
/// input is only borrowed, so planning can be restarted at will.
pub fn plan<'a>(
    overrides: &'a [TileOverride],
    registry: &'a TilesheetRegistry,
    offset: IVec2,
) -> impl Iterator<Item = Result<TileEdit>> + 'a {
    overrides.iter().flat_map(
        move |o| -> Box<dyn Iterator<Item = Result<TileEdit>> + 'a> {
            let planned = o
                .change(registry)
                .and_then(|change| Ok((change, o.cells(offset)?)));
            match planned {
                Ok((change, cells)) => {
                    let layer = LayerRef::from(o.layer());
                    Box::new(cells.map(move |pos| {
                        Ok(TileEdit {
                            layer: layer.clone(),
                            pos,
                            change: change.clone(),
                        })
                    }))
                }
                Err(e) => Box::new(iter::once(Err(e))),
            }
        },
    )
}

/// Plan every override, stopping at the first error.
pub fn plan_all(
    overrides: &[TileOverride],
    registry: &TilesheetRegistry,
    offset: IVec2,
) -> Result<Vec<TileEdit>> {
    plan(overrides, registry, offset).collect()
}
