//! Stitching override sprites into tilesheet atlases.
//!
//! Sprites in an atlas are addressed by index, counting `gw x gh` cells in
//! row-major order across the atlas width.

use std::{collections::BTreeMap, ops::Range, path::Path};

use derive_more::Deref;
use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::{AssetLoadError, Buffer, Pixel, Rect, load_image};

/// Mapping from sprite index in an override image to the sprite index it
/// replaces in the target atlas.
#[derive(
    Clone, Default, Eq, PartialEq, Debug, Deref, Serialize, Deserialize,
)]
pub struct SpriteMap(BTreeMap<u32, u32>);

impl SpriteMap {
    /// Map every source index in `range` to the same index plus `offset`.
    ///
    /// Used for re-skins where a whole override sheet is appended past the
    /// end of the original atlas. Returns `None` if the shifted indices
    /// don't fit in `u32`.
    pub fn shifted(range: Range<u32>, offset: u32) -> Option<Self> {
        if !range.is_empty() {
            (range.end - 1).checked_add(offset)?;
        }
        Some(range.map(|i| (i, i + offset)).collect())
    }

    pub fn insert(&mut self, source: u32, target: u32) -> Option<u32> {
        self.0.insert(source, target)
    }

    /// Largest target index in the map.
    pub fn max_target(&self) -> Option<u32> {
        self.0.values().copied().max()
    }
}

impl FromIterator<(u32, u32)> for SpriteMap {
    fn from_iter<T: IntoIterator<Item = (u32, u32)>>(iter: T) -> Self {
        SpriteMap(iter.into_iter().collect())
    }
}

/// Number of cells in one atlas row.
fn pitch(sheet_width: i32, cell: IVec2) -> i64 {
    (sheet_width / cell.x).max(1) as i64
}

/// Pixel area of sprite `index` in an atlas that is `sheet_width` pixels
/// wide.
///
/// Returns `None` for an empty cell size or if the cell lies beyond `i32`
/// pixel coordinates.
pub fn cell_rect(index: u32, sheet_width: i32, cell: IVec2) -> Option<Rect> {
    if cell.x < 1 || cell.y < 1 {
        return None;
    }
    let pitch = pitch(sheet_width, cell);
    let (col, row) = (index as i64 % pitch, index as i64 / pitch);
    let x = i32::try_from(col * cell.x as i64).ok()?;
    let y = i32::try_from(row * cell.y as i64).ok()?;
    Some(Rect::new([x, y], [x.checked_add(cell.x)?, y.checked_add(cell.y)?]))
}

/// Minimum atlas height in pixels that has room for sprite `index`.
pub fn required_height(index: u32, sheet_width: i32, cell: IVec2) -> Option<i32> {
    cell_rect(index, sheet_width, cell).map(|r| r.max()[1])
}

/// Grow `atlas` so that every target sprite in `sprites` fits in it.
///
/// Returns whether the atlas had to grow. Fails without touching the atlas
/// if the grown atlas would have more than `i32::MAX` pixels.
pub fn grow_to_fit<P: Pixel>(
    atlas: &mut Buffer<P>,
    sprites: &SpriteMap,
    cell: IVec2,
) -> Result<bool, AssetLoadError> {
    let Some(max) = sprites.max_target() else {
        return Ok(false);
    };

    let width = atlas.width();
    let bottom = required_height(max, width, cell)
        .filter(|&h| width as i64 * h as i64 <= i32::MAX as i64)
        .ok_or(AssetLoadError::AtlasOverflow { index: max, width })?;

    if atlas.grow_height(bottom as u32) {
        log::info!("grew {width}px wide atlas to {bottom}px to fit sprite #{max}");
        Ok(true)
    } else {
        Ok(false)
    }
}

/// Copy the sprites listed in `sprites` from `source` into `atlas`, growing
/// the atlas first if needed.
///
/// Every sprite is checked before anything is written, so an error leaves
/// the atlas untouched.
pub fn patch_atlas<P: Pixel>(
    atlas: &mut Buffer<P>,
    source: &Buffer<P>,
    sprites: &SpriteMap,
    cell: IVec2,
) -> Result<(), AssetLoadError> {
    if cell.x < 1 || cell.y < 1 {
        return Err(AssetLoadError::BadCellSize(cell));
    }

    let mut blocks = Vec::with_capacity(sprites.len());
    for (&from, &to) in sprites.iter() {
        let src = cell_rect(from, source.width(), cell)
            .filter(|r| source.area().contains_other(r))
            .ok_or(AssetLoadError::MissingSprite {
                index: from,
                width: source.width(),
                height: source.height(),
            })?;
        let dst = cell_rect(to, atlas.width(), cell).ok_or(
            AssetLoadError::AtlasOverflow {
                index: to,
                width: atlas.width(),
            },
        )?;
        blocks.push((src, dst));
    }

    grow_to_fit(atlas, sprites, cell)?;

    for (src, dst) in blocks {
        atlas.copy_block(source, src, dst.min());
    }

    log::debug!("patched {} sprites into atlas", sprites.len());
    Ok(())
}

/// Load an override image from `path` and patch it into `atlas`.
pub fn patch_atlas_from(
    atlas: &mut Buffer<crate::Rgba>,
    path: impl AsRef<Path>,
    sprites: &SpriteMap,
    cell: IVec2,
) -> Result<(), AssetLoadError> {
    let source = load_image(path)?;
    patch_atlas(atlas, &source, sprites, cell)
}

#[cfg(test)]
mod test {
    use glam::ivec2;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::Rgba;

    const CELL: IVec2 = IVec2::new(16, 16);

    /// Sheet where every sprite cell is filled with a color derived from its
    /// index.
    fn sheet(width: u32, height: u32) -> Buffer<Rgba> {
        let pitch = width as i32 / CELL.x;
        Buffer::from_fn(width, height, |x, y| {
            let n = (x / CELL.x) + (y / CELL.y) * pitch;
            Rgba::new(n as u8, (n >> 8) as u8, 0x80, 0xff)
        })
    }

    fn sprite_color(buf: &Buffer<Rgba>, index: u32) -> Vec<Rgba> {
        let rect = cell_rect(index, buf.width(), CELL).unwrap();
        rect.into_iter().map(|p| buf.get(p)).collect()
    }

    #[test]
    fn cell_positions() {
        assert_eq!(cell_rect(0, 512, CELL), Some(Rect::sized([16, 16])));
        assert_eq!(cell_rect(33, 512, CELL).unwrap().min(), [16, 16]);
        assert_eq!(cell_rect(63, 512, CELL).unwrap().min(), [31 * 16, 16]);
        assert_eq!(required_height(31, 512, CELL), Some(16));
        assert_eq!(required_height(32, 512, CELL), Some(32));
        assert_eq!(cell_rect(0, 512, IVec2::ZERO), None);
        assert_eq!(cell_rect(u32::MAX, 16, CELL), None);
    }

    #[test]
    fn growth_to_row() {
        // 512 wide, 32 cells per row. Index 100 lands on row 3.
        let mut atlas = sheet(512, 32);
        let before = atlas.clone();

        let sprites = SpriteMap::from_iter([(0, 100)]);
        assert!(grow_to_fit(&mut atlas, &sprites, CELL).unwrap());
        assert_eq!(atlas.height(), (3 + 1) * 16);

        // Old rows are byte-identical.
        assert_eq!(&atlas.data()[..before.data().len()], before.data());
        for y in 32..64 {
            assert!(atlas.row(y).all(|p| p.is_transparent()));
        }
    }

    #[test]
    fn no_growth_when_tall_enough() {
        let mut atlas = sheet(512, 128);
        let sprites = SpriteMap::from_iter([(0, 100)]);
        assert!(!grow_to_fit(&mut atlas, &sprites, CELL).unwrap());
        assert_eq!(atlas.height(), 128);

        assert!(!grow_to_fit(&mut atlas, &SpriteMap::default(), CELL).unwrap());
    }

    #[test]
    fn sprites_land_at_new_indices() {
        let mut atlas = sheet(512, 16);
        // Source is narrower than the atlas so the index math differs.
        let source = sheet(64, 64);

        let sprites = SpriteMap::from_iter([(0, 40), (5, 33), (15, 32)]);
        patch_atlas(&mut atlas, &source, &sprites, CELL).unwrap();

        assert_eq!(atlas.height(), 32);
        for (&from, &to) in sprites.iter() {
            assert_eq!(sprite_color(&atlas, to), sprite_color(&source, from));
        }
        // Untouched sprite keeps its pixels.
        assert_eq!(sprite_color(&atlas, 7), sprite_color(&sheet(512, 16), 7));
        // Grown but unpatched cell is transparent.
        assert!(sprite_color(&atlas, 34).iter().all(|p| p.is_transparent()));
    }

    #[test]
    fn missing_source_sprite() {
        let mut atlas = sheet(512, 16);
        let before = atlas.clone();
        let source = sheet(64, 16);

        // Source only has sprites 0..4.
        let sprites = SpriteMap::from_iter([(1, 40), (4, 41)]);
        let err = patch_atlas(&mut atlas, &source, &sprites, CELL).unwrap_err();
        assert!(matches!(err, AssetLoadError::MissingSprite { index: 4, .. }));
        assert_eq!(atlas, before);
    }

    #[test]
    fn shifted_map() {
        let sprites = SpriteMap::shifted(0..1100, 1975).unwrap();
        assert_eq!(sprites.len(), 1100);
        assert_eq!(sprites.get(&0), Some(&1975));
        assert_eq!(sprites.max_target(), Some(1975 + 1099));

        // The whole-sheet re-skin from a 400px wide outdoor sheet.
        let bottom = required_height(1975 + 1099, 400, ivec2(16, 16));
        assert_eq!(bottom, Some((3074 / 25 + 1) * 16));

        assert!(SpriteMap::shifted(0..4, u32::MAX - 1).is_none());
        assert!(SpriteMap::shifted(0..2, u32::MAX - 1).is_some());
        assert_eq!(SpriteMap::shifted(0..0, u32::MAX), Some(SpriteMap::default()));
    }

    #[test]
    fn missing_override_file() {
        let mut atlas = sheet(512, 16);
        let err = patch_atlas_from(
            &mut atlas,
            "/nonexistent/fall_wonderful.png",
            &SpriteMap::shifted(0..4, 32).unwrap(),
            CELL,
        )
        .unwrap_err();
        assert!(matches!(err, AssetLoadError::NotFound(_)));
        assert_eq!(atlas.height(), 16);
    }

    #[test]
    fn target_out_of_pixel_range() {
        let mut atlas = sheet(512, 16);
        let before = atlas.clone();
        let source = sheet(64, 16);

        // Wraps around i32 pixel rows.
        let sprites = SpriteMap::from_iter([(0, 3_000_000_000)]);
        let err = patch_atlas(&mut atlas, &source, &sprites, CELL).unwrap_err();
        assert!(matches!(
            err,
            AssetLoadError::AtlasOverflow { index: 3_000_000_000, .. }
        ));

        // Row fits in i32 but the whole atlas would not.
        let sprites = SpriteMap::from_iter([(0, 10_000_000)]);
        let err = patch_atlas(&mut atlas, &source, &sprites, CELL).unwrap_err();
        assert!(matches!(err, AssetLoadError::AtlasOverflow { .. }));

        assert_eq!(atlas, before);
    }

    #[test]
    fn empty_cell_size() {
        let mut atlas = sheet(512, 16);
        let sprites = SpriteMap::from_iter([(0, 1)]);
        assert!(matches!(
            patch_atlas(&mut atlas, &sheet(64, 16), &sprites, IVec2::ZERO),
            Err(AssetLoadError::BadCellSize(_))
        ));
    }
}
