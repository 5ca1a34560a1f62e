use std::{borrow::Borrow, fmt, ops::AddAssign};

use glam::IVec2;
use world::{MapSurface, Tile};

use crate::{Change, Error, LayerRef, Result, TileEdit};

/// What a patch pass did to the map.
#[derive(Copy, Clone, Default, Eq, PartialEq, Debug)]
pub struct PassReport {
    pub edits: usize,
    pub removed: usize,
    pub inserted: usize,
    /// Existing tiles whose sprite index changed in place.
    pub reindexed: usize,
    pub features_removed: usize,
}

impl AddAssign for PassReport {
    fn add_assign(&mut self, rhs: Self) {
        self.edits += rhs.edits;
        self.removed += rhs.removed;
        self.inserted += rhs.inserted;
        self.reindexed += rhs.reindexed;
        self.features_removed += rhs.features_removed;
    }
}

impl fmt::Display for PassReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} edits: {} removed, {} inserted, {} reindexed, {} features removed",
            self.edits, self.removed, self.inserted, self.reindexed, self.features_removed
        )
    }
}

/// Apply edits to a map in order.
///
/// Later edits to the same cell overwrite earlier ones. The first edit that
/// can't be applied aborts the pass with an error, edits before it stay
/// applied.
pub fn apply<S, E>(
    surface: &mut S,
    edits: impl IntoIterator<Item = E>,
) -> Result<PassReport>
where
    S: MapSurface + ?Sized,
    E: Borrow<TileEdit>,
{
    let mut report = PassReport::default();
    for edit in edits {
        apply_edit(surface, edit.borrow(), &mut report)?;
    }
    log::debug!("applied {report}");
    Ok(report)
}

fn apply_edit<S: MapSurface + ?Sized>(
    surface: &mut S,
    edit: &TileEdit,
    report: &mut PassReport,
) -> Result<()> {
    let layer = locate(surface, &edit.layer, edit.pos)?;
    let pos = edit.pos;

    match &edit.change {
        Change::Remove => {
            if surface.remove_tile(layer, pos).is_some() {
                report.removed += 1;
            }
            // Removed ground is always dry.
            surface.set_water(pos, false);
            report.features_removed += surface.remove_features_at(pos).len();
        }
        Change::Set { sheet, index } => {
            if surface.tile_sheet(sheet).is_none() {
                return Err(Error::UnknownTilesheet(sheet.clone()));
            }

            let same_sheet = surface
                .tile(layer, pos)
                .is_some_and(|t| &t.sheet == sheet);
            if same_sheet {
                surface.set_tile_index(layer, pos, *index);
                report.reindexed += 1;
            } else {
                surface.insert_tile(layer, pos, Tile::new(sheet, *index));
                report.inserted += 1;
            }
        }
    }

    report.edits += 1;
    Ok(())
}

/// Resolve layer position and check that `pos` is on the map.
fn locate<S: MapSurface + ?Sized>(
    surface: &S,
    layer: &LayerRef,
    pos: IVec2,
) -> Result<usize> {
    let Some(idx) = layer.resolve(surface) else {
        return Err(Error::UnknownLayer(layer.clone()));
    };
    if !surface.contains(pos) {
        return Err(Error::OutOfBounds {
            pos,
            dim: surface.dim(),
        });
    }
    Ok(idx)
}

/// Set a property on an existing tile.
///
/// Returns the previous value of the property.
pub fn set_tile_property<S: MapSurface + ?Sized>(
    surface: &mut S,
    layer: &LayerRef,
    pos: IVec2,
    key: &str,
    value: impl Into<String>,
) -> Result<Option<String>> {
    let idx = locate(surface, layer, pos)?;
    let Some(tile) = surface.tile_mut(idx, pos) else {
        return Err(Error::EmptyCell {
            layer: layer.clone(),
            pos,
            key: key.to_owned(),
        });
    };
    Ok(tile.properties.insert(key.to_owned(), value.into()))
}

#[cfg(test)]
mod test {
    use glam::ivec2;
    use pretty_assertions::assert_eq;
    use quickcheck::{Arbitrary, Gen};
    use quickcheck_macros::quickcheck;
    use world::{LargeFeature, Location, MapLayer, TileSheet};

    use super::*;

    fn map() -> Location {
        let mut map = Location::with_standard_layers("Farm", [4, 4]);
        map.add_tile_sheet(TileSheet::new("a", "a.png", [32, 32], [16, 16]));
        map.add_tile_sheet(TileSheet::new("b", "b.png", [32, 32], [16, 16]));

        map.insert_tile(
            0,
            ivec2(1, 1),
            Tile::new("a", 10).with_property("Type", "Dirt"),
        );
        map.insert_tile(1, ivec2(2, 2), Tile::new("b", 20));
        map.insert_tile(
            2,
            ivec2(3, 0),
            Tile::new("a", 5).with_property("Action", "Warp 3 4 Cellar"),
        );
        map.set_water(ivec2(1, 1), true);
        map.set_water(ivec2(0, 3), true);
        map.add_feature(LargeFeature::new([1, 1], "bush"));
        map.add_feature(LargeFeature::new([1, 1], "bush"));
        map.add_feature(LargeFeature::new([3, 3], "log"));
        map
    }

    #[test]
    fn remove_clears_cell() {
        let mut map = map();
        let report =
            apply(&mut map, [TileEdit::remove(MapLayer::Back, [1, 1])]).unwrap();

        assert_eq!(map.tile(0, ivec2(1, 1)), None);
        assert!(!map.is_water(ivec2(1, 1)));
        assert!(map.features_at(ivec2(1, 1)).is_empty());
        assert_eq!(map.features().len(), 1);
        assert_eq!(
            report,
            PassReport {
                edits: 1,
                removed: 1,
                features_removed: 2,
                ..Default::default()
            }
        );
    }

    #[test]
    fn remove_empty_cell_still_dries() {
        let mut map = map();
        apply(&mut map, [TileEdit::remove(MapLayer::Back, [0, 3])]).unwrap();
        assert!(!map.is_water(ivec2(0, 3)));
    }

    #[test]
    fn same_sheet_keeps_tile() {
        let mut map = map();
        let report =
            apply(&mut map, [TileEdit::set(MapLayer::Paths, [3, 0], "a", 6)]).unwrap();

        assert_eq!(report.reindexed, 1);
        assert_eq!(
            map.tile(2, ivec2(3, 0)),
            Some(&Tile::new("a", 6).with_property("Action", "Warp 3 4 Cellar"))
        );
    }

    #[test]
    fn different_sheet_rebinds() {
        let mut map = map();
        let report =
            apply(&mut map, [TileEdit::set(MapLayer::Back, [1, 1], "b", 10)]).unwrap();

        assert_eq!(report.inserted, 1);
        assert_eq!(map.tile(0, ivec2(1, 1)), Some(&Tile::new("b", 10)));
        // Set edits leave water alone.
        assert!(map.is_water(ivec2(1, 1)));
    }

    #[test]
    fn insert_into_empty() {
        let mut map = map();
        apply(&mut map, [TileEdit::set(4usize, [0, 0], "b", 3)]).unwrap();
        assert_eq!(map.tile(4, ivec2(0, 0)), Some(&Tile::new("b", 3)));
    }

    #[test]
    fn fail_fast() {
        let mut map = map();
        let edits = [
            TileEdit::set(MapLayer::Back, [0, 0], "a", 1),
            TileEdit::set(MapLayer::Back, [0, 1], "missing", 1),
            TileEdit::set(MapLayer::Back, [0, 2], "a", 1),
        ];
        let err = apply(&mut map, &edits).unwrap_err();

        assert!(matches!(err, Error::UnknownTilesheet(ref s) if s == "missing"));
        assert_eq!(map.tile(0, ivec2(0, 0)), Some(&Tile::new("a", 1)));
        assert_eq!(map.tile(0, ivec2(0, 1)), None);
        assert_eq!(map.tile(0, ivec2(0, 2)), None);
    }

    #[test]
    fn bad_address() {
        let mut map = map();
        assert!(matches!(
            apply(&mut map, [TileEdit::remove("Ceiling", [0, 0])]),
            Err(Error::UnknownLayer(_))
        ));
        assert!(matches!(
            apply(&mut map, [TileEdit::set(MapLayer::Back, [4, 0], "a", 1)]),
            Err(Error::OutOfBounds { .. })
        ));
        assert!(matches!(
            apply(&mut map, [TileEdit::remove(MapLayer::Back, [-1, 0])]),
            Err(Error::OutOfBounds { .. })
        ));
        assert_eq!(map, self::map());
    }

    #[test]
    fn tile_properties() {
        let mut map = map();
        let back = LayerRef::from(MapLayer::Back);
        assert_eq!(
            set_tile_property(&mut map, &back, ivec2(1, 1), "Type", "Stone").unwrap(),
            Some("Dirt".into())
        );
        assert_eq!(map.tile(0, ivec2(1, 1)).unwrap().property("Type"), Some("Stone"));

        assert!(matches!(
            set_tile_property(&mut map, &back, ivec2(0, 0), "Type", "Stone"),
            Err(Error::EmptyCell { .. })
        ));
    }

    /// Edits confined to the lower three layers of the test map.
    impl Arbitrary for TileEdit {
        fn arbitrary(g: &mut Gen) -> Self {
            let layer = usize::arbitrary(g) % 3;
            let pos = ivec2((u8::arbitrary(g) % 4) as i32, (u8::arbitrary(g) % 4) as i32);
            match u8::arbitrary(g) % 3 {
                0 => TileEdit::remove(layer, pos),
                1 => TileEdit::set(layer, pos, "a", u32::arbitrary(g) % 8),
                _ => TileEdit::set(layer, pos, "b", u32::arbitrary(g) % 8),
            }
        }
    }

    #[quickcheck]
    fn passes_are_idempotent(edits: Vec<TileEdit>) -> bool {
        let mut once = map();
        apply(&mut once, &edits).unwrap();

        let mut twice = once.clone();
        apply(&mut twice, &edits).unwrap();

        once == twice
    }

    #[quickcheck]
    fn last_write_wins(edits: Vec<TileEdit>) -> bool {
        let Some(last) = edits.last() else {
            return true;
        };

        let mut map = map();
        apply(&mut map, &edits).unwrap();

        let layer = last.layer.resolve(&map).unwrap();
        let cell = map.tile(layer, last.pos).map(|t| (t.sheet.as_str(), t.index));
        match &last.change {
            Change::Remove => cell.is_none(),
            Change::Set { sheet, index } => cell == Some((sheet.as_str(), *index)),
        }
    }
}
