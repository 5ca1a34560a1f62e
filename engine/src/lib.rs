//! Declarative tile patching.
//!
//! Patch data names tilesheets symbolically and groups tile overrides into
//! layouts. `plan` resolves overrides into concrete `TileEdit`s and `apply`
//! runs a list of edits against a live `MapSurface`. `Patcher` drives the
//! whole data-driven pipeline.

mod apply;
pub use apply::{PassReport, apply, set_tile_property};

mod data;
pub use data::{Data, Layout, Reskin, SheetGrowth, SheetProperty, TileProperty};

mod edit;
pub use edit::{Change, LayerRef, TileEdit};

mod error;
pub use error::{Error, Result};

mod flags;
pub use flags::config_flag;

mod patcher;
pub use patcher::{PatchOutcome, PatchReport, Patcher};

mod plan;
pub use plan::{TileOverride, plan, plan_all};

mod registry;
pub use registry::TilesheetRegistry;
