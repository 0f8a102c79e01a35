//! Image loading, compositing and export.

pub(crate) mod compositor;
pub(crate) mod decode;
pub(crate) mod export;
pub(crate) mod raster;
pub(crate) mod source;
