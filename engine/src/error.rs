use glam::IVec2;
use thiserror::Error;

use crate::LayerRef;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Patch data is inconsistent, found when loading or planning.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// An edit refers to a tilesheet the map doesn't have.
    #[error("tilesheet {0:?} is not attached to the map")]
    UnknownTilesheet(String),

    #[error("map has no layer {0}")]
    UnknownLayer(LayerRef),

    #[error("cell {pos} is outside the {}x{} map", dim.x, dim.y)]
    OutOfBounds { pos: IVec2, dim: IVec2 },

    #[error("no tile at {pos} on layer {layer} to set {key:?} on")]
    EmptyCell {
        layer: LayerRef,
        pos: IVec2,
        key: String,
    },

    #[error(transparent)]
    AssetLoad(#[from] gfx::AssetLoadError),
}

impl Error {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Error::Configuration(msg.into())
    }
}
