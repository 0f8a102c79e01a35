//! Flatten a background and the placed artworks into one raster.
//!
//! Each [`Compositor::compose`] call takes a fresh generation token. Image loads run
//! concurrently; the finished image is published only while its token is still the
//! latest one issued, so a slow earlier request can never replace a newer result.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use futures::future::join_all;
use tokio::sync::watch;

use crate::{
    catalog::artwork::{ArtworkRef, BackgroundRef},
    compose::{
        decode::{PreparedImage, decode_image, encode_png, placeholder_image},
        raster::Raster,
        source::ImageLoader,
    },
    foundation::{
        core::{CanvasSize, Rect, Rgba8Premul},
        error::{MuseumError, MuseumResult},
    },
    layout::slots::{SlotId, SlotTable},
    placement::state::PlacementState,
};

const PLACEHOLDER_SIZE: u32 = 200;

/// How a background load failure is handled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ComposeMode {
    /// The result is written out; a missing background fails the composition.
    #[default]
    Export,
    /// On-screen preview; a missing background is replaced by a placeholder.
    Preview,
}

/// One artwork to draw.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerRequest {
    pub slot: SlotId,
    pub artwork: ArtworkRef,
    /// Destination in canvas pixels.
    pub rect: Rect,
}

/// Inputs of one composition.
#[derive(Clone, Debug, PartialEq)]
pub struct ComposeRequest {
    pub background: BackgroundRef,
    /// Layers in draw order.
    pub layers: Vec<LayerRequest>,
    pub canvas: CanvasSize,
    pub mode: ComposeMode,
}

impl ComposeRequest {
    /// Snapshot `state`: its background plus every occupied slot in slot declaration order.
    pub fn from_placements(
        state: &PlacementState,
        table: &SlotTable,
        canvas: CanvasSize,
        mode: ComposeMode,
    ) -> MuseumResult<Self> {
        canvas.validate()?;
        let mut layers = Vec::with_capacity(state.occupied_count());
        for (slot, occupant) in state.placements() {
            let Some(artwork) = occupant else {
                continue;
            };
            let rect = table.geometry_of(slot)?.pixel_rect(canvas);
            layers.push(LayerRequest {
                slot,
                artwork: artwork.clone(),
                rect,
            });
        }
        Ok(Self {
            background: state.background().clone(),
            layers,
            canvas,
            mode,
        })
    }
}

/// A layer that made it into the composite.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DrawnLayer {
    pub slot: SlotId,
    pub artwork_id: u64,
}

/// A layer left out because its image could not be loaded or decoded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedLayer {
    pub slot: SlotId,
    pub artwork_id: u64,
    pub source: String,
    pub reason: String,
}

/// Flattened result of one composition.
#[derive(Clone, Debug)]
pub struct CompositeImage {
    /// Generation token of the request that produced this image.
    pub token: u64,
    pub width: u32,
    pub height: u32,
    /// Premultiplied RGBA8 pixels.
    pub rgba8_premul: Vec<u8>,
    /// Encoded PNG payload.
    pub png: Vec<u8>,
    /// True when the background was replaced by the placeholder (preview only).
    pub background_placeholder: bool,
    pub drawn: Vec<DrawnLayer>,
    pub skipped: Vec<SkippedLayer>,
}

impl CompositeImage {
    /// Stable hash of the pixels.
    pub fn fingerprint(&self) -> u64 {
        xxhash_rust::xxh3::xxh3_64(&self.rgba8_premul)
    }
}

/// Result of [`Compositor::compose`].
#[derive(Clone, Debug)]
pub enum ComposeOutcome {
    /// The image became the compositor's current image.
    Published(Arc<CompositeImage>),
    /// A newer request was issued before this one finished; nothing was published.
    Superseded { token: u64, latest: u64 },
}

impl ComposeOutcome {
    pub fn published(&self) -> Option<&Arc<CompositeImage>> {
        match self {
            Self::Published(img) => Some(img),
            Self::Superseded { .. } => None,
        }
    }
}

pub struct Compositor {
    loader: Arc<dyn ImageLoader>,
    clear: Rgba8Premul,
    generation: AtomicU64,
    current: watch::Sender<Option<Arc<CompositeImage>>>,
}

impl Compositor {
    pub fn new(loader: Arc<dyn ImageLoader>) -> Self {
        Self::with_clear(loader, Rgba8Premul::transparent())
    }

    /// Compositor whose canvases start filled with `clear`.
    pub fn with_clear(loader: Arc<dyn ImageLoader>, clear: Rgba8Premul) -> Self {
        let (current, _) = watch::channel(None);
        Self {
            loader,
            clear,
            generation: AtomicU64::new(0),
            current,
        }
    }

    /// Last published image.
    pub fn current(&self) -> Option<Arc<CompositeImage>> {
        self.current.borrow().clone()
    }

    /// Receiver notified on every publish.
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<CompositeImage>>> {
        self.current.subscribe()
    }

    /// Most recently issued generation token (0 before the first request).
    pub fn latest_token(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Load every image, draw background then layers, encode, and publish if still current.
    ///
    /// Errors: in [`ComposeMode::Export`], a background that cannot be loaded is
    /// [`MuseumError::ImageLoad`]. Artwork failures are never errors; those layers are
    /// listed in [`CompositeImage::skipped`].
    #[tracing::instrument(
        skip(self, req),
        fields(token = tracing::field::Empty, layers = req.layers.len(), mode = ?req.mode)
    )]
    pub async fn compose(&self, req: ComposeRequest) -> MuseumResult<ComposeOutcome> {
        let token = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::Span::current().record("token", token);
        req.canvas.validate()?;

        let layer_loads = join_all(
            req.layers
                .iter()
                .map(|layer| self.fetch(&layer.artwork.image_source)),
        );
        let (background, layer_images) = futures::join!(
            self.fetch(&req.background.image_source),
            layer_loads
        );

        let (background, background_placeholder) = match (background, req.mode) {
            (Ok(img), _) => (img, false),
            (Err(err), ComposeMode::Export) => {
                return Err(MuseumError::image_load(format!(
                    "background \"{}\": {err}",
                    req.background.image_source
                )));
            }
            (Err(err), ComposeMode::Preview) => {
                tracing::warn!(source = %req.background.image_source, %err, "background replaced by placeholder");
                (placeholder_image(PLACEHOLDER_SIZE, PLACEHOLDER_SIZE), true)
            }
        };

        let mut raster = Raster::new(req.canvas, self.clear)?;
        raster.draw_scaled(&background, req.canvas.rect())?;

        let mut drawn = Vec::new();
        let mut skipped = Vec::new();
        for (layer, loaded) in req.layers.iter().zip(layer_images) {
            let result = loaded.and_then(|img| raster.draw_scaled(&img, layer.rect));
            match result {
                Ok(_) => drawn.push(DrawnLayer {
                    slot: layer.slot,
                    artwork_id: layer.artwork.id,
                }),
                Err(err) => {
                    tracing::warn!(
                        slot = %layer.slot,
                        artwork_id = layer.artwork.id,
                        %err,
                        "artwork layer skipped"
                    );
                    skipped.push(SkippedLayer {
                        slot: layer.slot,
                        artwork_id: layer.artwork.id,
                        source: layer.artwork.image_source.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        let (width, height) = (raster.width(), raster.height());
        let rgba8_premul = raster.into_data();
        let png = encode_png(width, height, &rgba8_premul)?;
        let image = Arc::new(CompositeImage {
            token,
            width,
            height,
            rgba8_premul,
            png,
            background_placeholder,
            drawn,
            skipped,
        });

        Ok(self.publish(image))
    }

    async fn fetch(&self, source: &str) -> MuseumResult<PreparedImage> {
        let bytes = self.loader.load(source).await?;
        decode_image(&bytes)
    }

    fn publish(&self, image: Arc<CompositeImage>) -> ComposeOutcome {
        let token = image.token;
        let latest = self.latest_token();
        if token != latest {
            tracing::warn!(token, latest, "stale composite dropped");
            return ComposeOutcome::Superseded { token, latest };
        }

        let stored = self.current.send_if_modified(|cur| {
            if cur.as_ref().is_some_and(|c| c.token > token) {
                return false;
            }
            *cur = Some(image.clone());
            true
        });
        if !stored {
            let latest = self.latest_token();
            tracing::warn!(token, latest, "stale composite dropped");
            return ComposeOutcome::Superseded { token, latest };
        }

        tracing::info!(
            token,
            drawn = image.drawn.len(),
            skipped = image.skipped.len(),
            "composite published"
        );
        ComposeOutcome::Published(image)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/compositor.rs"]
mod tests;
