use std::{fmt, path::Path};

use gfx::{Buffer, Rgba};
use util::{FlagTable, IndexMap};
use world::MapSurface;

use crate::{
    Data, Error, LayerRef, Layout, PassReport, Result, TileEdit,
    TilesheetRegistry, apply, flags::flag_value, plan::shift, plan_all,
    set_tile_property,
};

/// Data-driven patching of maps.
///
/// All of the patch data is resolved when the patcher is built, so broken
/// data is caught before any map gets touched.
#[derive(Clone, Debug)]
pub struct Patcher {
    data: Data,
    registry: TilesheetRegistry,
    /// Planned edits for each layout, by variant.
    edits: IndexMap<String, Vec<Vec<TileEdit>>>,
}

/// Result of running a variant against a map.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum PatchOutcome {
    Applied(PatchReport),
    /// The data has no layouts for the variant, the map was not touched.
    Skipped { variant: String },
}

#[derive(Clone, Default, Eq, PartialEq, Debug)]
pub struct PatchReport {
    pub sheets_added: usize,
    pub sheets_grown: usize,
    pub layouts_applied: usize,
    pub layouts_skipped: usize,
    pub tile_properties: usize,
    pub sheet_properties: usize,
    pub pass: PassReport,
    /// Non-fatal problems with the settings.
    pub warnings: Vec<String>,
}

impl fmt::Display for PatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} layouts applied, {} skipped, {}",
            self.layouts_applied, self.layouts_skipped, self.pass
        )
    }
}

impl Patcher {
    pub fn new(data: Data) -> Result<Self> {
        let registry = TilesheetRegistry::new(data.tilesheets.clone())?;

        let mut edits = IndexMap::default();
        for (variant, layouts) in &data.layouts {
            let mut planned = Vec::with_capacity(layouts.len());
            for layout in layouts {
                check_layout(layout, &registry)?;
                planned.push(plan_all(&layout.tiles, &registry, layout.offset)?);
            }
            edits.insert(variant.clone(), planned);
        }

        for reskin in &data.reskins {
            registry.resolve(reskin.tilesheet.as_deref())?;
            reskin.sprites()?;
            if reskin.cell.x < 1 || reskin.cell.y < 1 {
                return Err(Error::config(format!(
                    "re-skin {:?} has bad cell size {}",
                    reskin.source, reskin.cell
                )));
            }
        }

        Ok(Patcher {
            data,
            registry,
            edits,
        })
    }

    pub fn variants(&self) -> impl Iterator<Item = &str> {
        self.edits.keys().map(String::as_str)
    }

    /// Patch `surface` with the layouts of `variant`.
    ///
    /// Layouts gated on a flag that isn't set in `settings` are skipped. An
    /// unknown variant is not an error, the map is left alone.
    pub fn patch<S: MapSurface + ?Sized>(
        &self,
        surface: &mut S,
        variant: &str,
        settings: &impl FlagTable,
    ) -> Result<PatchOutcome> {
        let (Some(layouts), Some(edits)) =
            (self.data.layouts.get(variant), self.edits.get(variant))
        else {
            log::warn!("unsupported variant {variant:?}, not patching");
            return Ok(PatchOutcome::Skipped {
                variant: variant.to_owned(),
            });
        };

        let mut report = PatchReport::default();

        for sheet in &self.data.add_tilesheets {
            if surface.add_tile_sheet(sheet.clone()) {
                log::info!("added tilesheet {:?}", sheet.id);
                report.sheets_added += 1;
            }
        }

        for (layout, edits) in layouts.iter().zip(edits) {
            if let Some(flag) = &layout.flag {
                match flag_value(settings, flag) {
                    Ok(true) => {}
                    Ok(false) => {
                        log::debug!("layout {:?} is switched off", layout.name);
                        report.layouts_skipped += 1;
                        continue;
                    }
                    Err(msg) => {
                        log::warn!("{msg}, skipping layout {:?}", layout.name);
                        report.warnings.push(msg);
                        report.layouts_skipped += 1;
                        continue;
                    }
                }
            }

            self.apply_layout(surface, layout, edits, &mut report)?;
            report.layouts_applied += 1;
        }

        log::info!("patched {variant:?}: {report}");
        Ok(PatchOutcome::Applied(report))
    }

    fn apply_layout<S: MapSurface + ?Sized>(
        &self,
        surface: &mut S,
        layout: &Layout,
        edits: &[TileEdit],
        report: &mut PatchReport,
    ) -> Result<()> {
        for growth in &layout.grow {
            let id = self.registry.resolve(growth.tilesheet.as_deref())?;
            let sheet = surface
                .tile_sheet_mut(id)
                .ok_or_else(|| Error::UnknownTilesheet(id.to_owned()))?;
            if sheet.grow_rows_to(growth.rows) {
                report.sheets_grown += 1;
            }
        }

        report.pass += apply(surface, edits)?;

        for prop in &layout.tile_properties {
            set_tile_property(
                surface,
                &LayerRef::from(prop.layer()),
                shift(prop.x, prop.y, layout.offset)?,
                &prop.key,
                prop.value.clone(),
            )?;
            report.tile_properties += 1;
        }

        for prop in &layout.sheet_properties {
            let id = self.registry.resolve(prop.tilesheet.as_deref())?;
            let sheet = surface
                .tile_sheet_mut(id)
                .ok_or_else(|| Error::UnknownTilesheet(id.to_owned()))?;
            sheet.set_index_property(prop.index, &prop.key, prop.value.clone());
            report.sheet_properties += 1;
        }

        Ok(())
    }

    /// Patch every re-skin of symbolic tilesheet `tilesheet` into `atlas`.
    ///
    /// Override images are looked up under `asset_dir`. On error `atlas` is
    /// left as it was. Returns the number of re-skins applied.
    pub fn reskin(
        &self,
        tilesheet: &str,
        atlas: &mut Buffer<Rgba>,
        asset_dir: impl AsRef<Path>,
    ) -> Result<usize> {
        let asset_dir = asset_dir.as_ref();
        let mut patched = atlas.clone();
        let mut count = 0;

        for reskin in self.data.reskins.iter().filter(|r| {
            r.tilesheet.as_deref().unwrap_or(TilesheetRegistry::DEFAULT)
                == tilesheet
        }) {
            gfx::patch_atlas_from(
                &mut patched,
                asset_dir.join(&reskin.source),
                &reskin.sprites()?,
                reskin.cell,
            )?;
            count += 1;
        }

        *atlas = patched;
        Ok(count)
    }
}

/// Check the parts of a layout that aren't covered by planning.
fn check_layout(layout: &Layout, registry: &TilesheetRegistry) -> Result<()> {
    for growth in &layout.grow {
        registry.resolve(growth.tilesheet.as_deref())?;
    }
    for prop in &layout.sheet_properties {
        registry.resolve(prop.tilesheet.as_deref())?;
    }
    for prop in &layout.tile_properties {
        shift(prop.x, prop.y, layout.offset)?;
    }
    if layout.flag.as_deref().is_some_and(|f| f.trim().is_empty()) {
        return Err(Error::config(format!(
            "layout {:?} has an empty flag name",
            layout.name
        )));
    }
    Ok(())
}
