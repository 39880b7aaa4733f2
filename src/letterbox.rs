use ndarray::Array4;

use crate::bbox::{BBox, Ltrb};
use crate::error::Error;

/// Aspect-preserving mapping between a `(W, H)` source image and the fixed
/// `S x S` square the detector consumes.
///
/// The image is scaled with one factor on both axes, centered, and the
/// remaining border is black. The same transform inverts detector-space
/// coordinates back into source pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Letterbox {
    src_width: u32,
    src_height: u32,
    size: u32,
    scale: f32,
    pad_x: f32,
    pad_y: f32,
}

impl Letterbox {
    pub fn new(src_width: u32, src_height: u32, size: u32) -> Result<Self, Error> {
        if src_width == 0 || src_height == 0 {
            return Err(Error::DegenerateImage {
                width: src_width,
                height: src_height,
            });
        }

        let scale = (size as f32 / src_width as f32).min(size as f32 / src_height as f32);
        let pad_x = (size as f32 - src_width as f32 * scale) / 2.0;
        let pad_y = (size as f32 - src_height as f32 * scale) / 2.0;

        Ok(Self {
            src_width,
            src_height,
            size,
            scale,
            pad_x,
            pad_y,
        })
    }

    #[inline]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    #[inline]
    pub fn pad(&self) -> (f32, f32) {
        (self.pad_x, self.pad_y)
    }

    /// Source pixel coordinates to padded detector-space coordinates.
    #[inline]
    pub fn to_padded(&self, x: f32, y: f32) -> (f32, f32) {
        (x * self.scale + self.pad_x, y * self.scale + self.pad_y)
    }

    /// Padded detector-space coordinates back to source pixels, clamped to
    /// the image bounds.
    #[inline]
    pub fn to_source(&self, x: f32, y: f32) -> (f32, f32) {
        let sx = (x - self.pad_x) / self.scale;
        let sy = (y - self.pad_y) / self.scale;

        (
            sx.clamp(0.0, self.src_width as f32),
            sy.clamp(0.0, self.src_height as f32),
        )
    }

    /// Inverts a corner-format box from padded detector space into source
    /// pixels, each corner mapped independently.
    pub fn box_to_source(&self, padded: &BBox<Ltrb>) -> BBox<Ltrb> {
        let (left, top) = self.to_source(padded.left(), padded.top());
        let (right, bottom) = self.to_source(padded.right(), padded.bottom());

        BBox::ltrb(left, top, right, bottom)
    }

    /// Builds the normalized planar `[1, 3, S, S]` input tensor from packed
    /// RGB bytes, bilinear-resampled into the letterboxed region with the
    /// border left black.
    pub fn input_tensor(&self, rgb: &[u8]) -> Result<Array4<f32>, Error> {
        let expected = self.src_width as usize * self.src_height as usize * 3;
        if rgb.len() != expected {
            return Err(Error::FrameBufferSize {
                expected,
                got: rgb.len(),
            });
        }

        let size = self.size as usize;
        let src_w = self.src_width as usize;
        let src_h = self.src_height as usize;

        let scaled_w = (self.src_width as f32 * self.scale).round() as usize;
        let scaled_h = (self.src_height as f32 * self.scale).round() as usize;
        let off_x = self.pad_x.round() as usize;
        let off_y = self.pad_y.round() as usize;

        let mut tensor = Array4::<f32>::zeros((1, 3, size, size));

        for dy in 0..scaled_h.min(size) {
            for dx in 0..scaled_w.min(size) {
                let sx = dx as f32 / self.scale;
                let sy = dy as f32 / self.scale;

                let sx0 = (sx.floor() as usize).min(src_w - 1);
                let sy0 = (sy.floor() as usize).min(src_h - 1);
                let sx1 = (sx0 + 1).min(src_w - 1);
                let sy1 = (sy0 + 1).min(src_h - 1);

                let fx = sx - sx0 as f32;
                let fy = sy - sy0 as f32;

                for c in 0..3 {
                    let p00 = rgb[(sy0 * src_w + sx0) * 3 + c] as f32;
                    let p10 = rgb[(sy0 * src_w + sx1) * 3 + c] as f32;
                    let p01 = rgb[(sy1 * src_w + sx0) * 3 + c] as f32;
                    let p11 = rgb[(sy1 * src_w + sx1) * 3 + c] as f32;

                    let val = p00 * (1.0 - fx) * (1.0 - fy)
                        + p10 * fx * (1.0 - fy)
                        + p01 * (1.0 - fx) * fy
                        + p11 * fx * fy;

                    tensor[[0, c, off_y + dy, off_x + dx]] = val / 255.0;
                }
            }
        }

        Ok(tensor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nearly_eq::assert_nearly_eq;

    #[test]
    fn zero_sized_image_fails_fast() {
        assert!(Letterbox::new(0, 480, 640).is_err());
        assert!(Letterbox::new(640, 0, 640).is_err());
    }

    #[test]
    fn wide_image_pads_vertically() {
        let lb = Letterbox::new(1280, 720, 640).unwrap();

        assert_nearly_eq!(lb.scale(), 0.5, 1e-6);
        let (pad_x, pad_y) = lb.pad();
        assert_nearly_eq!(pad_x, 0.0, 1e-6);
        assert_nearly_eq!(pad_y, 140.0, 1e-6);
    }

    #[test]
    fn round_trip_preserves_box() {
        for &(w, h) in &[(1280u32, 720u32), (720, 1280), (640, 640), (333, 97)] {
            let lb = Letterbox::new(w, h, 640).unwrap();
            let src = BBox::ltrb(10.0, 20.0, 70.0, 60.0);

            let (l, t) = lb.to_padded(src.left(), src.top());
            let (r, b) = lb.to_padded(src.right(), src.bottom());
            let back = lb.box_to_source(&BBox::ltrb(l, t, r, b));

            assert_nearly_eq!(back.left(), src.left(), 1e-3);
            assert_nearly_eq!(back.top(), src.top(), 1e-3);
            assert_nearly_eq!(back.right(), src.right(), 1e-3);
            assert_nearly_eq!(back.bottom(), src.bottom(), 1e-3);
        }
    }

    #[test]
    fn inverse_clamps_to_image_bounds() {
        let lb = Letterbox::new(100, 100, 640).unwrap();

        let (x, y) = lb.to_source(-50.0, 700.0);
        assert_eq!(x, 0.0);
        assert_eq!(y, 100.0);
    }

    #[test]
    fn input_tensor_shape_and_padding() {
        let lb = Letterbox::new(4, 2, 8).unwrap();
        let rgb = vec![255u8; 4 * 2 * 3];

        let tensor = lb.input_tensor(&rgb).unwrap();
        assert_eq!(tensor.shape(), &[1, 3, 8, 8]);

        // scaled content occupies rows 2..6 at scale 2.0
        assert_nearly_eq!(tensor[[0, 0, 3, 0]], 1.0, 1e-6);
        assert_eq!(tensor[[0, 0, 0, 0]], 0.0);
        assert_eq!(tensor[[0, 0, 7, 7]], 0.0);
    }

    #[test]
    fn input_tensor_rejects_short_buffer() {
        let lb = Letterbox::new(4, 2, 8).unwrap();
        assert!(lb.input_tensor(&[0u8; 3]).is_err());
    }
}
