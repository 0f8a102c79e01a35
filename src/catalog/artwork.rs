use std::collections::HashSet;

use crate::{
    foundation::error::{MuseumError, MuseumResult},
    service::types::MetObject,
};

#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// A placeable artwork. Immutable once fetched; placements hold clones.
pub struct ArtworkRef {
    /// Catalog-unique id.
    pub id: u64,
    /// URL or relative path of the artwork image.
    pub image_source: String,
    /// Name shown in the artwork sidebar.
    pub display_name: String,
}

impl ArtworkRef {
    /// Convenience constructor.
    pub fn new(id: u64, image_source: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id,
            image_source: image_source.into(),
            display_name: display_name.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// A background scene the user can pick from the left sidebar.
pub struct BackgroundRef {
    /// Catalog-unique id.
    pub id: u64,
    /// URL or relative path of the background image.
    pub image_source: String,
    /// Name shown in the background sidebar.
    pub display_name: String,
}

impl BackgroundRef {
    /// Convenience constructor.
    pub fn new(id: u64, image_source: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id,
            image_source: image_source.into(),
            display_name: display_name.into(),
        }
    }
}

const MET_IMAGE_PREFIX: &str = "https://images.metmuseum.org/CRDImages/dp/web-large/DP";
const MET_BASE_OBJECT: u64 = 821_127;

/// Ordered collection of placeable artworks.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ArtworkCatalog {
    items: Vec<ArtworkRef>,
}

impl ArtworkCatalog {
    /// Build a catalog, rejecting duplicate ids.
    pub fn new(items: Vec<ArtworkRef>) -> MuseumResult<Self> {
        let catalog = Self { items };
        catalog.validate()?;
        Ok(catalog)
    }

    /// The built-in starter catalog: ten works, the first three sharing one image and the
    /// rest following consecutive object numbers.
    pub fn builtin() -> Self {
        let mut items = Vec::with_capacity(10);
        let shared = format!("{MET_IMAGE_PREFIX}{MET_BASE_OBJECT}.jpg");
        for id in 1..=3 {
            items.push(ArtworkRef::new(id, shared.clone(), format!("Artwork {id}")));
        }
        for i in 0..7u64 {
            let id = i + 4;
            let object = MET_BASE_OBJECT + i + 1;
            items.push(ArtworkRef::new(
                id,
                format!("{MET_IMAGE_PREFIX}{object}.jpg"),
                format!("Artwork {id}"),
            ));
        }
        Self { items }
    }

    /// Build a catalog from artwork-service objects.
    ///
    /// Objects without any image are skipped since there is nothing to place. Duplicate
    /// object ids keep their first occurrence.
    pub fn from_met_objects<'a>(objects: impl IntoIterator<Item = &'a MetObject>) -> Self {
        let mut seen = HashSet::new();
        let mut items = Vec::new();
        for obj in objects {
            let Some(image) = obj.display_image() else {
                tracing::debug!(object_id = obj.object_id, "artwork has no image; skipped");
                continue;
            };
            if !seen.insert(obj.object_id) {
                continue;
            }
            let name = obj
                .title
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map_or_else(|| format!("#{}", obj.object_id), str::to_string);
            items.push(ArtworkRef::new(obj.object_id, image, name));
        }
        Self { items }
    }

    /// Check id uniqueness and non-empty image sources.
    pub fn validate(&self) -> MuseumResult<()> {
        let mut seen = HashSet::new();
        for item in &self.items {
            if !seen.insert(item.id) {
                return Err(MuseumError::validation(format!(
                    "duplicate artwork id {}",
                    item.id
                )));
            }
            if item.image_source.trim().is_empty() {
                return Err(MuseumError::validation(format!(
                    "artwork {} has an empty image source",
                    item.id
                )));
            }
        }
        Ok(())
    }

    /// Lookup an artwork by id.
    pub fn get(&self, id: u64) -> Option<&ArtworkRef> {
        self.items.iter().find(|a| a.id == id)
    }

    /// Like [`Self::get`], but unknown ids are a validation error.
    pub fn require(&self, id: u64) -> MuseumResult<&ArtworkRef> {
        self.get(id)
            .ok_or_else(|| MuseumError::validation(format!("unknown artwork id {id}")))
    }

    /// Artworks in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &ArtworkRef> {
        self.items.iter()
    }

    /// Number of artworks.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Small list of selectable backgrounds.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct BackgroundCatalog {
    items: Vec<BackgroundRef>,
}

impl BackgroundCatalog {
    /// Build a catalog; it must hold at least one background and ids must be unique.
    pub fn new(items: Vec<BackgroundRef>) -> MuseumResult<Self> {
        let catalog = Self { items };
        catalog.validate()?;
        Ok(catalog)
    }

    /// The two built-in room backgrounds, resolved relative to the assets root.
    pub fn builtin() -> Self {
        Self {
            items: vec![
                BackgroundRef::new(1, "background/museum-back-1.jpg", "Background 1"),
                BackgroundRef::new(2, "background/museum-back-2.jpg", "Background 2"),
            ],
        }
    }

    pub fn validate(&self) -> MuseumResult<()> {
        if self.items.is_empty() {
            return Err(MuseumError::validation(
                "background catalog must not be empty",
            ));
        }
        let mut seen = HashSet::new();
        for item in &self.items {
            if !seen.insert(item.id) {
                return Err(MuseumError::validation(format!(
                    "duplicate background id {}",
                    item.id
                )));
            }
        }
        Ok(())
    }

    /// First background; the composition screen opens on it.
    pub fn initial(&self) -> MuseumResult<&BackgroundRef> {
        self.items
            .first()
            .ok_or_else(|| MuseumError::validation("background catalog must not be empty"))
    }

    pub fn get(&self, id: u64) -> Option<&BackgroundRef> {
        self.items.iter().find(|b| b.id == id)
    }

    pub fn require(&self, id: u64) -> MuseumResult<&BackgroundRef> {
        self.get(id)
            .ok_or_else(|| MuseumError::validation(format!("unknown background id {id}")))
    }

    pub fn iter(&self) -> impl Iterator<Item = &BackgroundRef> {
        self.items.iter()
    }
}

impl Default for BackgroundCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/artwork.rs"]
mod tests;
