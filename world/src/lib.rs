//! Tile map data model.
//!
//! A map is a stack of named layers over a shared cell grid. Each layer cell
//! may hold a tile that draws one sprite from one of the map's tilesheets.
//! Maps also carry a water flag per cell and large terrain features anchored
//! at cells.

mod feature;
pub use feature::{FeatureIndex, LargeFeature};

mod layer;
pub use layer::{Layer, MapLayer};

mod location;
pub use location::Location;

mod surface;
pub use surface::MapSurface;

mod tile;
pub use tile::Tile;

mod tilesheet;
pub use tilesheet::TileSheet;
