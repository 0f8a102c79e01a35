use crate::{
    compose::decode::PreparedImage,
    foundation::{
        core::{CanvasSize, Rect, Rgba8Premul},
        error::{MuseumError, MuseumResult},
        math::mul_div255_u8,
    },
};

/// One premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Source-over for premultiplied pixels.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    match src[3] {
        0 => return dst,
        255 => return src,
        _ => {}
    }
    let inv = 255u16 - u16::from(src[3]);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = src[i].saturating_add(mul_div255_u8(u16::from(dst[i]), inv));
    }
    out
}

/// Scratch canvas owned by a single composition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Raster {
    /// Canvas of `size` filled with `clear`.
    pub fn new(size: CanvasSize, clear: Rgba8Premul) -> MuseumResult<Self> {
        size.validate()?;
        let len = size.rgba8_len()?;
        let mut raster = Self {
            width: size.width,
            height: size.height,
            data: vec![0; len],
        };
        raster.clear(clear);
        Ok(raster)
    }

    pub fn clear(&mut self, color: Rgba8Premul) {
        let px = color.to_array();
        for d in self.data.chunks_exact_mut(4) {
            d.copy_from_slice(&px);
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Stretch `img` over `dest` (canvas pixels) with nearest-neighbor sampling.
    ///
    /// `dest` edges are rounded to whole pixels; the part outside the canvas is clipped.
    /// Returns whether any pixel was covered.
    pub fn draw_scaled(&mut self, img: &PreparedImage, dest: Rect) -> MuseumResult<bool> {
        let (sw, sh) = (i64::from(img.width), i64::from(img.height));
        let expected = (sw as usize)
            .checked_mul(sh as usize)
            .and_then(|v| v.checked_mul(4));
        if sw == 0 || sh == 0 || expected != Some(img.rgba8_premul.len()) {
            return Err(MuseumError::validation(
                "draw_scaled expects a non-empty width*height*4 image",
            ));
        }
        if ![dest.x0, dest.y0, dest.x1, dest.y1]
            .iter()
            .all(|v| v.is_finite())
        {
            return Ok(false);
        }

        let x0 = dest.x0.round() as i64;
        let y0 = dest.y0.round() as i64;
        let x1 = dest.x1.round() as i64;
        let y1 = dest.y1.round() as i64;
        let (dw, dh) = (x1 - x0, y1 - y0);
        if dw <= 0 || dh <= 0 {
            return Ok(false);
        }

        let cx0 = x0.clamp(0, i64::from(self.width));
        let cx1 = x1.clamp(0, i64::from(self.width));
        let cy0 = y0.clamp(0, i64::from(self.height));
        let cy1 = y1.clamp(0, i64::from(self.height));
        if cx0 >= cx1 || cy0 >= cy1 {
            return Ok(false);
        }

        let src = img.rgba8_premul.as_slice();
        let stride = self.width as usize * 4;
        for dy in cy0..cy1 {
            // Sample at the destination pixel center, in integer arithmetic.
            let sy = ((2 * (dy - y0) + 1) * sh / (2 * dh)).min(sh - 1);
            let src_row = sy as usize * sw as usize * 4;
            let dst_row = dy as usize * stride;
            for dx in cx0..cx1 {
                let sx = ((2 * (dx - x0) + 1) * sw / (2 * dw)).min(sw - 1);
                let si = src_row + sx as usize * 4;
                let di = dst_row + dx as usize * 4;
                let s = [src[si], src[si + 1], src[si + 2], src[si + 3]];
                let d = [
                    self.data[di],
                    self.data[di + 1],
                    self.data[di + 2],
                    self.data[di + 3],
                ];
                self.data[di..di + 4].copy_from_slice(&over(d, s));
            }
        }
        Ok(true)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/raster.rs"]
mod tests;
