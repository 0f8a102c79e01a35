//! Placement state for one open composition screen.
//!
//! Each slot is either empty or holds one artwork; at most one artwork is "picked up"
//! (selected) at a time. A single gesture, [`PlacementState::activate_slot`], both places
//! and clears, with a pending selection taking precedence over the slot's occupancy.

use crate::{
    catalog::artwork::{ArtworkRef, BackgroundRef},
    foundation::error::{MuseumError, MuseumResult},
    layout::slots::{SlotId, SlotTable},
};

/// Which branch of [`PlacementState::activate_slot`] fired.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SlotActivation {
    /// The pending selection was placed; `replaced` is the previous occupant, if any.
    Placed {
        slot: SlotId,
        artwork: ArtworkRef,
        replaced: Option<ArtworkRef>,
    },
    /// Nothing was selected and the slot was occupied, so it was emptied.
    Cleared { slot: SlotId, artwork: ArtworkRef },
    /// Nothing was selected and the slot was already empty.
    Ignored { slot: SlotId },
}

#[derive(Clone, Debug)]
pub struct PlacementState {
    slots: Vec<Option<ArtworkRef>>,
    selection: Option<ArtworkRef>,
    background: BackgroundRef,
    revision: u64,
}

impl PlacementState {
    /// All slots of `table` empty, nothing selected.
    pub fn new(table: &SlotTable, background: BackgroundRef) -> Self {
        Self {
            slots: vec![None; table.len()],
            selection: None,
            background,
            revision: 0,
        }
    }

    /// Pick up `artwork`, replacing any earlier pending selection.
    pub fn select_artwork(&mut self, artwork: ArtworkRef) {
        tracing::debug!(artwork_id = artwork.id, "select artwork");
        self.selection = Some(artwork);
        self.revision += 1;
    }

    /// Drop the pending selection without placing it.
    pub fn clear_selection(&mut self) {
        if self.selection.take().is_some() {
            self.revision += 1;
        }
    }

    /// The click-on-slot gesture.
    ///
    /// Order of precedence: a pending selection is placed (overwriting any occupant) and
    /// then cleared; otherwise an occupied slot is emptied; otherwise nothing happens.
    pub fn activate_slot(&mut self, slot: SlotId) -> MuseumResult<SlotActivation> {
        debug_assert!(slot.0 < self.slots.len(), "activate_slot: unknown {slot}");
        let Some(cell) = self.slots.get_mut(slot.0) else {
            return Err(MuseumError::configuration(format!("unknown {slot}")));
        };

        let outcome = match (self.selection.take(), cell.take()) {
            (Some(artwork), replaced) => {
                *cell = Some(artwork.clone());
                SlotActivation::Placed {
                    slot,
                    artwork,
                    replaced,
                }
            }
            (None, Some(artwork)) => SlotActivation::Cleared { slot, artwork },
            (None, None) => SlotActivation::Ignored { slot },
        };

        if !matches!(outcome, SlotActivation::Ignored { .. }) {
            self.revision += 1;
        }
        tracing::debug!(?outcome, "activate slot");
        Ok(outcome)
    }

    /// Replace the background; placements are untouched.
    pub fn change_background(&mut self, background: BackgroundRef) {
        tracing::debug!(background_id = background.id, "change background");
        self.background = background;
        self.revision += 1;
    }

    /// Empty every slot and drop the pending selection.
    pub fn reset_all(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = None);
        self.selection = None;
        self.revision += 1;
    }

    pub fn selection(&self) -> Option<&ArtworkRef> {
        self.selection.as_ref()
    }

    pub fn background(&self) -> &BackgroundRef {
        &self.background
    }

    pub fn occupant(&self, slot: SlotId) -> Option<&ArtworkRef> {
        self.slots.get(slot.0).and_then(Option::as_ref)
    }

    /// `(slot, occupant)` pairs in slot declaration order.
    pub fn placements(&self) -> impl Iterator<Item = (SlotId, Option<&ArtworkRef>)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .map(|(i, a)| (SlotId(i), a.as_ref()))
    }

    pub fn occupied_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Bumped by every mutation that changed something; previews are reused while it holds.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

#[cfg(test)]
#[path = "../../tests/unit/placement/state.rs"]
mod tests;
