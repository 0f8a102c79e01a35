//! The composition screen.
//!
//! [`ScreenController`] owns the placement state of one open screen and turns user
//! gestures into state changes, compositions, exports and service calls. Service failures
//! come back as errors; they never leave placement state half-applied.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{
    catalog::artwork::{ArtworkCatalog, ArtworkRef, BackgroundCatalog, BackgroundRef},
    compose::{
        compositor::{ComposeMode, ComposeOutcome, ComposeRequest, CompositeImage, Compositor},
        export::export_composite,
    },
    config::{AppConfig, RoomSpec},
    foundation::{
        core::{CanvasSize, Point},
        error::{MuseumError, MuseumResult},
    },
    layout::slots::{SlotId, SlotTable},
    placement::state::{PlacementState, SlotActivation},
    screen::title::TitleEditor,
    service::{
        client::MuseumService,
        types::{CreateMuseumRequest, Museum, Visibility},
    },
};

/// What [`ScreenController::save`] produced.
#[derive(Clone, Debug)]
pub struct SavedRoom {
    pub museum: Museum,
    pub export_path: PathBuf,
}

pub struct ScreenController {
    table: SlotTable,
    canvas: CanvasSize,
    artworks: ArtworkCatalog,
    backgrounds: BackgroundCatalog,
    state: PlacementState,
    title: TitleEditor,
    left_sidebar_open: bool,
    right_sidebar_open: bool,
    museum: Option<Museum>,
    compositor: Arc<Compositor>,
    /// Last preview and the placement revision it was composed from.
    preview_cache: Option<(u64, Arc<CompositeImage>)>,
}

impl ScreenController {
    /// Open a fresh screen: every slot empty, the first background, both sidebars open.
    pub fn new(
        table: SlotTable,
        canvas: CanvasSize,
        artworks: ArtworkCatalog,
        backgrounds: BackgroundCatalog,
        compositor: Arc<Compositor>,
    ) -> MuseumResult<Self> {
        canvas.validate()?;
        artworks.validate()?;
        let background = backgrounds.initial()?.clone();
        let state = PlacementState::new(&table, background);
        Ok(Self {
            table,
            canvas,
            artworks,
            backgrounds,
            state,
            title: TitleEditor::default(),
            left_sidebar_open: true,
            right_sidebar_open: true,
            museum: None,
            compositor,
            preview_cache: None,
        })
    }

    pub fn from_config(cfg: &AppConfig, compositor: Arc<Compositor>) -> MuseumResult<Self> {
        cfg.validate()?;
        Self::new(
            cfg.slot_table()?,
            cfg.canvas,
            cfg.artworks.clone(),
            cfg.backgrounds.clone(),
            compositor,
        )
    }

    /// Pick up artwork `id` from the right sidebar.
    pub fn select_artwork(&mut self, id: u64) -> MuseumResult<&ArtworkRef> {
        let artwork = self.artworks.require(id)?.clone();
        self.state.select_artwork(artwork);
        self.state
            .selection()
            .ok_or_else(|| MuseumError::validation("selection was not recorded"))
    }

    pub fn click_slot(&mut self, slot: SlotId) -> MuseumResult<SlotActivation> {
        self.state.activate_slot(slot)
    }

    /// Click at canvas pixel `point`; a click outside every slot does nothing.
    pub fn click_at(&mut self, point: Point) -> MuseumResult<Option<SlotActivation>> {
        match self.table.hit_test(self.canvas, point) {
            Some(slot) => self.click_slot(slot).map(Some),
            None => Ok(None),
        }
    }

    pub fn change_background(&mut self, id: u64) -> MuseumResult<&BackgroundRef> {
        let background = self.backgrounds.require(id)?.clone();
        self.state.change_background(background);
        Ok(self.state.background())
    }

    pub fn toggle_left_sidebar(&mut self) -> bool {
        self.left_sidebar_open = !self.left_sidebar_open;
        self.left_sidebar_open
    }

    pub fn toggle_right_sidebar(&mut self) -> bool {
        self.right_sidebar_open = !self.right_sidebar_open;
        self.right_sidebar_open
    }

    /// Empty the room and close any title edit; the saved museum link is kept.
    pub fn reset(&mut self) {
        self.state.reset_all();
        self.title.cancel_edit();
    }

    /// Load a room document onto this screen.
    pub fn apply_room(&mut self, room: &RoomSpec) -> MuseumResult<()> {
        room.apply(
            &mut self.state,
            &self.table,
            &self.artworks,
            &self.backgrounds,
        )?;
        self.title = TitleEditor::new(room.title.trim());
        Ok(())
    }

    pub fn begin_title_edit(&mut self) {
        self.title.begin_edit();
    }

    pub fn set_title_draft(&mut self, text: impl Into<String>) {
        self.title.set_draft(text);
    }

    /// Finish the title edit.
    ///
    /// An empty title is rejected and the previous one restored. Before the room is saved
    /// the title only changes locally. Once saved, the new title is sent to the service;
    /// if that fails the last known-good title is restored and the error returned.
    #[tracing::instrument(skip(self, service))]
    pub async fn commit_title(&mut self, service: &dyn MuseumService) -> MuseumResult<()> {
        let Some(change) = self.title.finish_edit() else {
            return Ok(());
        };
        if change.proposed.is_empty() {
            self.title.revert(change);
            return Err(MuseumError::validation("title must be non-empty"));
        }
        let Some(id) = self.museum_id() else {
            return Ok(());
        };
        match service.update_museum_title(id, &change.proposed).await {
            Ok(_) => {
                tracing::info!(museum_id = id, title = %change.proposed, "title updated");
                if let Some(museum) = self.museum.as_mut() {
                    museum.name = change.proposed;
                }
                Ok(())
            }
            Err(err) => {
                tracing::warn!(museum_id = id, %err, "title update failed; reverted");
                self.title.revert(change);
                Err(err)
            }
        }
    }

    /// Compose for on-screen display; a missing background shows the placeholder.
    ///
    /// While the placements and background are unchanged since the last published preview,
    /// that image is returned without recomposing.
    pub async fn preview(&mut self) -> MuseumResult<ComposeOutcome> {
        let revision = self.state.revision();
        if let Some((_, image)) = self
            .preview_cache
            .as_ref()
            .filter(|(seen, _)| *seen == revision)
        {
            return Ok(ComposeOutcome::Published(image.clone()));
        }
        let outcome = self.compose(ComposeMode::Preview).await?;
        if let ComposeOutcome::Published(image) = &outcome {
            self.preview_cache = Some((revision, image.clone()));
        }
        Ok(outcome)
    }

    /// Compose for export and write `dir/museum.png`.
    #[tracing::instrument(skip(self), fields(dir = %dir.display()))]
    pub async fn export(&self, dir: &Path) -> MuseumResult<PathBuf> {
        let image = self.compose_published().await?;
        export_composite(&image, dir).await
    }

    /// Export locally, then record the room with the service as a public museum named
    /// after the title.
    ///
    /// A room that is already saved is not created again: the export is refreshed and a
    /// title that differs from the recorded name is sent as a title update.
    #[tracing::instrument(skip(self, service), fields(dir = %dir.display()))]
    pub async fn save(
        &mut self,
        service: &dyn MuseumService,
        user_id: u64,
        dir: &Path,
    ) -> MuseumResult<SavedRoom> {
        if self.title.is_editing() {
            self.title.finish_edit();
        }
        let name = self.title.title().trim().to_string();
        if name.is_empty() {
            return Err(MuseumError::validation("title must be non-empty to save"));
        }

        let export_path = self.export(dir).await?;
        if let Some(museum) = self.museum.as_mut() {
            if museum.name != name {
                service.update_museum_title(museum.id, &name).await?;
                tracing::info!(museum_id = museum.id, title = %name, "saved title updated");
                museum.name = name;
            }
            return Ok(SavedRoom {
                museum: museum.clone(),
                export_path,
            });
        }

        let req = CreateMuseumRequest {
            visibility: Some(Visibility::Public),
            ..CreateMuseumRequest::new(user_id, name)
        };
        let museum = service.create_museum(&req).await?;
        tracing::info!(museum_id = museum.id, "museum created");
        self.museum = Some(museum.clone());
        Ok(SavedRoom {
            museum,
            export_path,
        })
    }

    async fn compose(&self, mode: ComposeMode) -> MuseumResult<ComposeOutcome> {
        let req = ComposeRequest::from_placements(&self.state, &self.table, self.canvas, mode)?;
        self.compositor.compose(req).await
    }

    async fn compose_published(&self) -> MuseumResult<Arc<CompositeImage>> {
        match self.compose(ComposeMode::Export).await? {
            ComposeOutcome::Published(image) => Ok(image),
            ComposeOutcome::Superseded { token, latest } => Err(MuseumError::Other(
                anyhow::anyhow!("composition {token} was superseded by {latest}"),
            )),
        }
    }

    pub fn state(&self) -> &PlacementState {
        &self.state
    }

    pub fn table(&self) -> &SlotTable {
        &self.table
    }

    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    pub fn artworks(&self) -> &ArtworkCatalog {
        &self.artworks
    }

    pub fn backgrounds(&self) -> &BackgroundCatalog {
        &self.backgrounds
    }

    /// Title as currently displayed.
    pub fn title(&self) -> &str {
        self.title.displayed()
    }

    pub fn is_editing_title(&self) -> bool {
        self.title.is_editing()
    }

    pub fn left_sidebar_open(&self) -> bool {
        self.left_sidebar_open
    }

    pub fn right_sidebar_open(&self) -> bool {
        self.right_sidebar_open
    }

    pub fn museum_id(&self) -> Option<u64> {
        self.museum.as_ref().map(|m| m.id)
    }

    /// The saved museum record this screen is linked to.
    pub fn museum(&self) -> Option<&Museum> {
        self.museum.as_ref()
    }

    /// Link this screen to an already saved museum.
    pub fn attach_museum(&mut self, museum: &Museum) {
        self.museum = Some(museum.clone());
        self.title = TitleEditor::new(museum.name.clone());
    }

    pub fn compositor(&self) -> &Arc<Compositor> {
        &self.compositor
    }
}

#[cfg(test)]
#[path = "../../tests/unit/screen/controller.rs"]
mod tests;
