//! Application configuration and room documents.

use std::{
    collections::BTreeMap,
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{
    catalog::artwork::{ArtworkCatalog, BackgroundCatalog},
    foundation::{
        core::CanvasSize,
        error::{MuseumError, MuseumResult},
    },
    layout::slots::{SlotSpec, SlotTable},
    placement::state::PlacementState,
    service::client::MuseumClient,
};

/// Environment variable naming the Museum Service base URL.
pub const API_BASE_URL_ENV: &str = "MUSEUM_API_BASE_URL";

const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> MuseumResult<T> {
    let f = File::open(path).map_err(|e| {
        MuseumError::validation(format!("open {what} JSON '{}': {e}", path.display()))
    })?;
    serde_json::from_reader(BufReader::new(f))
        .map_err(|e| MuseumError::serde(format!("parse {what} JSON '{}': {e}", path.display())))
}

/// Everything a composition screen and its service client need.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub canvas: CanvasSize,
    pub slots: Vec<SlotSpec>,
    pub backgrounds: BackgroundCatalog,
    pub artworks: ArtworkCatalog,
    pub export_dir: PathBuf,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    /// Seed for lobby door colors.
    pub door_seed: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            canvas: CanvasSize::default(),
            slots: SlotTable::standard_specs(),
            backgrounds: BackgroundCatalog::builtin(),
            artworks: ArtworkCatalog::builtin(),
            export_dir: PathBuf::from("out"),
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
            door_seed: 0,
        }
    }
}

impl AppConfig {
    /// Parse a config from JSON; missing keys take their defaults.
    pub fn from_reader<R: std::io::Read>(r: R) -> MuseumResult<Self> {
        let mut cfg: Self = serde_json::from_reader(r)
            .map_err(|e| MuseumError::serde(format!("parse config JSON: {e}")))?;
        cfg.set_base_url(&cfg.api_base_url.clone());
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> MuseumResult<Self> {
        let mut cfg: Self = read_json(path.as_ref(), "config")?;
        cfg.set_base_url(&cfg.api_base_url.clone());
        Ok(cfg)
    }

    /// Override the base URL, trimming whitespace and trailing `/`.
    pub fn set_base_url(&mut self, url: &str) {
        self.api_base_url = url.trim().trim_end_matches('/').to_string();
    }

    pub fn validate(&self) -> MuseumResult<()> {
        if self.api_base_url.is_empty() {
            return Err(MuseumError::configuration("api_base_url must be non-empty"));
        }
        self.canvas
            .validate()
            .map_err(|e| MuseumError::configuration(e.to_string()))?;
        self.slot_table()?;
        self.backgrounds.validate()?;
        self.artworks.validate()?;
        if self.request_timeout_secs == 0 || self.connect_timeout_secs == 0 {
            return Err(MuseumError::configuration("timeouts must be > 0 seconds"));
        }
        Ok(())
    }

    pub fn slot_table(&self) -> MuseumResult<SlotTable> {
        SlotTable::new(&self.slots)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// HTTP client for the configured Museum Service.
    pub fn client(&self) -> MuseumResult<MuseumClient> {
        MuseumClient::with_timeouts(
            &self.api_base_url,
            self.request_timeout(),
            self.connect_timeout(),
        )
    }
}

/// One room as a document: title, background, and which artwork hangs in which slot.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RoomSpec {
    #[serde(default)]
    pub title: String,
    /// Background catalog id; the catalog's first background when absent.
    #[serde(default)]
    pub background: Option<u64>,
    /// Slot name to artwork id.
    #[serde(default)]
    pub placements: BTreeMap<String, u64>,
}

impl RoomSpec {
    pub fn from_path(path: impl AsRef<Path>) -> MuseumResult<Self> {
        read_json(path.as_ref(), "room")
    }

    /// Replace whatever `state` holds with this room, replayed through the ordinary
    /// gestures.
    ///
    /// Slots are filled in slot order; slots the room does not name end up empty and any
    /// pending selection is dropped. Unknown slot names or catalog ids are validation
    /// errors and leave `state` untouched.
    pub fn apply(
        &self,
        state: &mut PlacementState,
        table: &SlotTable,
        artworks: &ArtworkCatalog,
        backgrounds: &BackgroundCatalog,
    ) -> MuseumResult<()> {
        let background = match self.background {
            Some(id) => backgrounds.require(id)?,
            None => backgrounds.initial()?,
        };

        let mut planned = Vec::with_capacity(self.placements.len());
        for (name, artwork_id) in &self.placements {
            let slot = table.id_of(name).map_err(|_| {
                MuseumError::validation(format!("room places art in unknown slot '{name}'"))
            })?;
            planned.push((slot, artworks.require(*artwork_id)?.clone()));
        }
        planned.sort_by_key(|(slot, _)| *slot);

        state.reset_all();
        state.change_background(background.clone());
        for (slot, artwork) in planned {
            state.select_artwork(artwork);
            state.activate_slot(slot)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config/config.rs"]
mod tests;
