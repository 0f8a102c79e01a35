//! Compose virtual museum rooms.
//!
//! A room is a background scene with a fixed set of slots. The user picks up an artwork,
//! clicks a slot to hang it there, and the room is flattened into one PNG that can be
//! exported and saved to the Museum Service.
//!
//! # Pieces
//!
//! - [`SlotTable`]: slot geometry as fractions of the canvas, resolved to pixels.
//! - [`PlacementState`]: which artwork hangs where, plus the pending selection.
//! - [`Compositor`]: loads every image concurrently, draws background then slots in
//!   declaration order, and publishes only the newest request's result.
//! - [`export_composite`]: writes `museum.png`.
//! - [`MuseumClient`]: REST client; every response is validated before use.
//! - [`ScreenController`]: the composition screen's gestures on top of all of the above.
//!
//! Pixels are premultiplied RGBA8 throughout; PNG output is converted to straight alpha.
#![forbid(unsafe_code)]

mod catalog;
mod compose;
mod config;
mod foundation;
mod layout;
mod placement;
mod screen;
mod service;

pub use catalog::artwork::{ArtworkCatalog, ArtworkRef, BackgroundCatalog, BackgroundRef};
pub use catalog::lobby::{DOORS_PER_PAGE, Door, DoorColor, Lobby};
pub use compose::compositor::{
    ComposeMode, ComposeOutcome, ComposeRequest, CompositeImage, Compositor, DrawnLayer,
    LayerRequest, SkippedLayer,
};
pub use compose::decode::{
    MAX_SVG_DIMENSION, PreparedImage, decode_image, encode_png, placeholder_image,
};
pub use compose::export::{EXPORT_FILE_NAME, export_composite};
pub use compose::raster::{PremulRgba8, Raster, over};
pub use compose::source::{
    FsImageLoader, HttpImageLoader, ImageLoader, RoutingImageLoader, normalize_rel_path,
};
pub use config::{API_BASE_URL_ENV, AppConfig, RoomSpec};
pub use foundation::core::{CanvasSize, Point, Rect, Rgba8Premul};
pub use foundation::error::{MuseumError, MuseumResult};
pub use layout::slots::{SlotGeometry, SlotId, SlotSpec, SlotTable};
pub use placement::state::{PlacementState, SlotActivation};
pub use screen::controller::{SavedRoom, ScreenController};
pub use screen::title::{TitleChange, TitleEditor};
pub use service::client::{DEFAULT_MUSEUM_LIMIT, MuseumClient, MuseumService, discover_artworks};
pub use service::schema::parse_json;
pub use service::types::{
    ArtworkSearchQuery, ArtworkSearchResponse, CreateMuseumRequest, HealthStatus, MetObject,
    Museum, UpdateTitleRequest, UpdateTitleResponse, Visibility,
};
