//! Door lobby: one door per room, the caller's own room first.
//!
//! Door colors come from a seeded generator so the same seed always paints the same
//! lobby.

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::service::types::{Museum, Visibility};

/// Doors shown per lobby page (a 5×2 grid).
pub const DOORS_PER_PAGE: usize = 10;

/// Soft HSL door color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DoorColor {
    /// Hue in degrees, `0..360`.
    pub hue: u16,
    /// Saturation percent, `60..80`.
    pub saturation: u8,
    /// Lightness percent, `75..95`.
    pub lightness: u8,
}

impl DoorColor {
    fn sample(rng: &mut StdRng) -> Self {
        Self {
            hue: rng.random_range(0..360),
            saturation: rng.random_range(60..80),
            lightness: rng.random_range(75..95),
        }
    }

    /// CSS `hsl()` form.
    pub fn css(self) -> String {
        format!("hsl({}, {}%, {}%)", self.hue, self.saturation, self.lightness)
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Door {
    /// Museum behind the door; `None` for an own room that has not been saved yet.
    pub museum_id: Option<u64>,
    pub user_id: u64,
    pub name: String,
    pub color: DoorColor,
    pub is_mine: bool,
}

#[derive(Clone, Debug, Default, serde::Serialize)]
pub struct Lobby {
    doors: Vec<Door>,
}

impl Lobby {
    /// Build the lobby for `user_id`.
    ///
    /// `others` is the service's public listing; entries owned by `user_id` or not public
    /// are dropped so a stale listing cannot put someone else's private room on a door.
    pub fn build(
        user_id: u64,
        own_name: &str,
        own_museum_id: Option<u64>,
        others: &[Museum],
        seed: u64,
    ) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut doors = Vec::with_capacity(others.len() + 1);
        doors.push(Door {
            museum_id: own_museum_id,
            user_id,
            name: own_name.to_string(),
            color: DoorColor::sample(&mut rng),
            is_mine: true,
        });
        for m in others {
            if m.user_id == user_id || m.visibility != Visibility::Public {
                tracing::debug!(museum_id = m.id, "lobby skipped museum");
                continue;
            }
            doors.push(Door {
                museum_id: Some(m.id),
                user_id: m.user_id,
                name: m.name.clone(),
                color: DoorColor::sample(&mut rng),
                is_mine: false,
            });
        }
        Self { doors }
    }

    pub fn doors(&self) -> &[Door] {
        &self.doors
    }

    /// Number of pages, at least one.
    pub fn page_count(&self) -> usize {
        self.doors.len().div_ceil(DOORS_PER_PAGE).max(1)
    }

    /// Doors on 1-based page `page`; out-of-range pages are empty.
    pub fn page(&self, page: usize) -> &[Door] {
        if page == 0 {
            return &[];
        }
        let start = (page - 1).saturating_mul(DOORS_PER_PAGE);
        if start >= self.doors.len() {
            return &[];
        }
        let end = (start + DOORS_PER_PAGE).min(self.doors.len());
        &self.doors[start..end]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/lobby.rs"]
mod tests;
