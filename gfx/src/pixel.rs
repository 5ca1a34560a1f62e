use serde::{Deserialize, Serialize};

/// Trait for buffer cells.
///
/// Assumption: `<T: Pixel>::default().is_transparent()` is always true.
pub trait Pixel: Copy + Default + Eq + PartialEq + 'static {
    fn is_transparent(&self) -> bool;
}

/// 32-bit RGBA color value, laid out the same as the `image` crate's RGBA8
/// pixels.
#[derive(
    Copy, Clone, Default, Eq, PartialEq, Hash, Debug, Serialize, Deserialize,
)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 0xff);
    pub const WHITE: Rgba = Rgba::new(0xff, 0xff, 0xff, 0xff);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Rgba { r, g, b, a }
    }
}

impl Pixel for Rgba {
    fn is_transparent(&self) -> bool {
        self.a == 0x00
    }
}

impl From<image::Rgba<u8>> for Rgba {
    fn from(image::Rgba([r, g, b, a]): image::Rgba<u8>) -> Self {
        Rgba { r, g, b, a }
    }
}

impl From<Rgba> for image::Rgba<u8> {
    fn from(Rgba { r, g, b, a }: Rgba) -> Self {
        image::Rgba([r, g, b, a])
    }
}

impl From<[u8; 4]> for Rgba {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Rgba { r, g, b, a }
    }
}
