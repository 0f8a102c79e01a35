use std::{io::Cursor, sync::Arc};

use anyhow::Context;

use crate::foundation::{
    error::{MuseumError, MuseumResult},
    math::unpremul_channel,
};

#[derive(Clone, Debug, PartialEq, Eq)]
/// Decoded raster image in premultiplied RGBA8 form.
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

const PLACEHOLDER_FILL: [u8; 4] = [0x99, 0x00, 0x00, 0xff];
const PLACEHOLDER_MARK: [u8; 4] = [0xff, 0xff, 0xff, 0xff];

/// Largest SVG edge, in pixels, that will be rasterized.
pub const MAX_SVG_DIMENSION: u32 = 8192;

/// Decode encoded image bytes (any format `image` understands, or SVG) to premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> MuseumResult<PreparedImage> {
    if looks_like_svg(bytes) {
        return rasterize_svg(bytes);
    }

    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| MuseumError::image_load(format!("decode image: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(MuseumError::image_load("decoded image is empty"));
    }

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(256)];
    let Ok(text) = std::str::from_utf8(head) else {
        return false;
    };
    let text = text.trim_start_matches('\u{feff}').trim_start();
    text.starts_with("<svg") || (text.starts_with("<?xml") && text.contains("<svg"))
}

fn rasterize_svg(bytes: &[u8]) -> MuseumResult<PreparedImage> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts)
        .map_err(|e| MuseumError::image_load(format!("parse svg: {e}")))?;

    let size = tree.size();
    let width = size.width().ceil() as u32;
    let height = size.height().ceil() as u32;
    if width > MAX_SVG_DIMENSION || height > MAX_SVG_DIMENSION {
        return Err(MuseumError::image_load(format!(
            "svg canvas {width}x{height} exceeds {MAX_SVG_DIMENSION}px"
        )));
    }
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| MuseumError::image_load("svg has an empty or oversized canvas"))?;
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::default(),
        &mut pixmap.as_mut(),
    );

    // tiny-skia pixmaps are already premultiplied RGBA8.
    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(pixmap.take()),
    })
}

/// Encode premultiplied RGBA8 pixels as PNG (straight alpha, as PNG requires).
pub fn encode_png(width: u32, height: u32, rgba8_premul: &[u8]) -> MuseumResult<Vec<u8>> {
    let mut straight = rgba8_premul.to_vec();
    for px in straight.chunks_exact_mut(4) {
        let a = px[3];
        if a == 255 {
            continue;
        }
        px[0] = unpremul_channel(px[0], a);
        px[1] = unpremul_channel(px[1], a);
        px[2] = unpremul_channel(px[2], a);
    }

    let img = image::RgbaImage::from_raw(width, height, straight)
        .ok_or_else(|| MuseumError::validation("png encode expects width*height*4 bytes"))?;
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .context("encode composite as png")?;
    Ok(buf)
}

/// Clearly-marked stand-in for an image that failed to load: dark red with a white cross.
pub fn placeholder_image(width: u32, height: u32) -> PreparedImage {
    let (w, h) = (i64::from(width.max(1)), i64::from(height.max(1)));
    let thickness = w.max(h);
    let mut data = Vec::with_capacity((w * h * 4) as usize);
    for y in 0..h {
        for x in 0..w {
            let on_main = (x * h - y * w).abs() < thickness;
            let on_anti = ((w - 1 - x) * h - y * w).abs() < thickness;
            let px = if on_main || on_anti {
                PLACEHOLDER_MARK
            } else {
                PLACEHOLDER_FILL
            };
            data.extend_from_slice(&px);
        }
    }
    PreparedImage {
        width: w as u32,
        height: h as u32,
        rgba8_premul: Arc::new(data),
    }
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/decode.rs"]
mod tests;
