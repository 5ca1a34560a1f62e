use std::path::{Path, PathBuf};

use glam::{IVec2, ivec2};
use thiserror::Error;

use crate::{Pixel, Rect, Rgba};

/// Failure to get usable pixel data out of an image asset.
#[derive(Debug, Error)]
pub enum AssetLoadError {
    #[error("image asset {0:?} does not exist")]
    NotFound(PathBuf),

    #[error("failed to decode image asset {path:?}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("sprite #{index} is outside the {width}x{height} source image")]
    MissingSprite { index: u32, width: i32, height: i32 },

    #[error("sprite #{index} doesn't fit in a {width}px wide atlas")]
    AtlasOverflow { index: u32, width: i32 },

    #[error("bad sprite cell size {0}")]
    BadCellSize(IVec2),
}

/// Load an image file into an RGBA buffer.
pub fn load_image(path: impl AsRef<Path>) -> Result<Buffer<Rgba>, AssetLoadError> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(AssetLoadError::NotFound(path.to_owned()));
    }

    let image = image::open(path).map_err(|source| AssetLoadError::Decode {
        path: path.to_owned(),
        source,
    })?;
    log::debug!(
        "loaded {}x{} image {path:?}",
        image.width(),
        image.height()
    );
    Ok(image.into())
}

/// Owned rectangular pixel array.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Buffer<P> {
    width: u32,
    height: u32,
    data: Vec<P>,
}

impl From<image::DynamicImage> for Buffer<Rgba> {
    fn from(image: image::DynamicImage) -> Self {
        let image = image.to_rgba8();
        let (width, height) = (image.width(), image.height());
        let data = image.pixels().map(|&p| Rgba::from(p)).collect();

        Buffer {
            width,
            height,
            data,
        }
    }
}

impl Buffer<Rgba> {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, image::ImageError> {
        Ok(image::load_from_memory(bytes)?.into())
    }

    pub fn to_image(&self) -> image::RgbaImage {
        let bounds = self.area();
        image::RgbaImage::from_fn(self.width, self.height, |x, y| {
            self.data[bounds.idx([x as i32, y as i32])].into()
        })
    }

    /// Encode the buffer as PNG data.
    pub fn to_png(&self) -> Result<Vec<u8>, image::ImageError> {
        use image::ImageEncoder;

        let mut ret = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut ret);
        encoder.write_image(
            &self.to_image().into_raw(),
            self.width,
            self.height,
            image::ExtendedColorType::Rgba8,
        )?;

        Ok(ret)
    }
}

impl<P: Pixel> Buffer<P> {
    pub fn new(width: u32, height: u32) -> Self {
        Buffer {
            width,
            height,
            data: vec![Default::default(); width as usize * height as usize],
        }
    }

    pub fn from_fn(width: u32, height: u32, f: impl Fn(i32, i32) -> P) -> Self {
        let area = Rect::sized([width as i32, height as i32]);
        let data = (0..width as usize * height as usize)
            .map(|i| {
                let [x, y] = area.get(i);
                f(x, y)
            })
            .collect();
        Buffer {
            width,
            height,
            data,
        }
    }

    pub fn data(&self) -> &[P] {
        &self.data
    }

    pub fn dim(&self) -> IVec2 {
        ivec2(self.width as i32, self.height as i32)
    }

    pub fn width(&self) -> i32 {
        self.width as i32
    }

    pub fn height(&self) -> i32 {
        self.height as i32
    }

    pub fn area(&self) -> Rect {
        Rect::sized(self.dim())
    }

    /// Read a pixel, positions outside the buffer read as transparent.
    pub fn get(&self, pos: impl Into<[i32; 2]>) -> P {
        let pos = pos.into();
        let area = self.area();

        if area.contains(pos) {
            self.data[area.idx(pos)]
        } else {
            Default::default()
        }
    }

    /// Write a pixel, writes outside the buffer are dropped.
    pub fn set(&mut self, pos: impl Into<[i32; 2]>, p: P) {
        let pos = pos.into();
        let area = self.area();

        if area.contains(pos) {
            self.data[area.idx(pos)] = p;
        }
    }

    /// Grow the buffer down to `height` rows.
    ///
    /// Existing rows are kept as they are and the new rows are transparent.
    /// Does nothing if the buffer is already at least `height` tall. Returns
    /// whether the buffer grew.
    pub fn grow_height(&mut self, height: u32) -> bool {
        if height <= self.height {
            return false;
        }

        // Rows are contiguous, so growing downwards is a plain append.
        self.data
            .resize(self.width as usize * height as usize, Default::default());
        self.height = height;
        true
    }

    /// Copy the `src_rect` area of `src` so that its top left corner lands
    /// at `dst` in this buffer.
    ///
    /// Source pixels outside `src` read as transparent, destination pixels
    /// outside this buffer are clipped.
    pub fn copy_block(
        &mut self,
        src: &Buffer<P>,
        src_rect: Rect,
        dst: impl Into<[i32; 2]>,
    ) {
        let dst = IVec2::from(dst.into());
        let origin = IVec2::from(src_rect.min());
        for p in src_rect {
            let p = IVec2::from(p);
            self.set(p - origin + dst, src.get(p));
        }
    }

    /// Iterate the pixels of one row.
    pub fn row(&self, y: i32) -> impl Iterator<Item = P> + '_ {
        (0..self.width()).map(move |x| self.get([x, y]))
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    fn numbered(width: u32, height: u32) -> Buffer<Rgba> {
        Buffer::from_fn(width, height, |x, y| {
            Rgba::new(x as u8, y as u8, 0, 0xff)
        })
    }

    #[test]
    fn growing_keeps_rows() {
        let mut buf = numbered(4, 2);
        let before = buf.data().to_vec();

        assert!(!buf.grow_height(2));
        assert!(!buf.grow_height(1));
        assert_eq!(buf.height(), 2);

        assert!(buf.grow_height(5));
        assert_eq!(buf.dim(), ivec2(4, 5));
        assert_eq!(&buf.data()[..before.len()], &before[..]);
        assert!(buf.data()[before.len()..].iter().all(|p| p.is_transparent()));
    }

    #[test]
    fn block_copy() {
        let src = numbered(8, 8);
        let mut dst: Buffer<Rgba> = Buffer::new(4, 4);

        dst.copy_block(&src, Rect::sized([2, 2]) + [4, 6], [1, 1]);

        assert_eq!(dst.get([0, 0]), Rgba::TRANSPARENT);
        assert_eq!(dst.get([1, 1]), Rgba::new(4, 6, 0, 0xff));
        assert_eq!(dst.get([2, 2]), Rgba::new(5, 7, 0, 0xff));
        assert_eq!(dst.get([3, 3]), Rgba::TRANSPARENT);
    }

    #[test]
    fn block_copy_clips() {
        let src = numbered(4, 4);
        let mut dst: Buffer<Rgba> = Buffer::new(2, 2);

        // Only the top left pixel of the block fits in the destination.
        dst.copy_block(&src, Rect::sized([2, 2]), [1, 1]);
        assert_eq!(dst.get([1, 1]), Rgba::new(0, 0, 0, 0xff));
        assert_eq!(dst.data().iter().filter(|p| !p.is_transparent()).count(), 1);
    }

    #[test]
    fn png_roundtrip() {
        let buf = numbered(3, 5);
        let png = buf.to_png().unwrap();
        assert_eq!(Buffer::from_bytes(&png).unwrap(), buf);
    }

    #[test]
    fn missing_image() {
        let err = load_image("/nonexistent/summer_overrides.png").unwrap_err();
        assert!(matches!(err, AssetLoadError::NotFound(_)));
    }
}
