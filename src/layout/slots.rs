use std::collections::HashSet;
use std::fmt;

use crate::foundation::{
    core::{CanvasSize, Point, Rect},
    error::{MuseumError, MuseumResult},
};

const UNIT_EPS: f64 = 1e-9;

/// Index of a slot in its [`SlotTable`], in declaration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotId(pub(crate) usize);

impl SlotId {
    /// Declaration-order index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slot#{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Configuration form of a slot. Exactly one of `left`/`right` anchors it horizontally.
pub struct SlotSpec {
    /// Unique slot name (`"A"`, `"B"`, ...).
    pub name: String,
    /// Distance of the left edge from the container's left edge, as a fraction of width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<f64>,
    /// Distance of the right edge from the container's right edge, as a fraction of width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<f64>,
    /// Top edge as a fraction of height.
    pub top: f64,
    /// Width as a fraction of container width.
    pub width: f64,
    /// Height as a fraction of container height.
    pub height: f64,
}

impl SlotSpec {
    /// Left-anchored spec.
    pub fn left(name: impl Into<String>, left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            name: name.into(),
            left: Some(left),
            right: None,
            top,
            width,
            height,
        }
    }

    /// Right-anchored spec.
    pub fn right(name: impl Into<String>, right: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            name: name.into(),
            left: None,
            right: Some(right),
            top,
            width,
            height,
        }
    }

    fn resolve(&self, slot: SlotId) -> MuseumResult<SlotGeometry> {
        let left = match (self.left, self.right) {
            (Some(l), None) => l,
            (None, Some(r)) => 1.0 - r - self.width,
            _ => {
                return Err(MuseumError::configuration(format!(
                    "slot '{}' must set exactly one of left/right",
                    self.name
                )));
            }
        };

        for (field, v) in [
            ("left/right", left),
            ("top", self.top),
            ("width", self.width),
            ("height", self.height),
        ] {
            if !v.is_finite() {
                return Err(MuseumError::configuration(format!(
                    "slot '{}' {field} must be finite",
                    self.name
                )));
            }
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(MuseumError::configuration(format!(
                "slot '{}' width/height must be > 0",
                self.name
            )));
        }
        if left < -UNIT_EPS
            || self.top < -UNIT_EPS
            || left + self.width > 1.0 + UNIT_EPS
            || self.top + self.height > 1.0 + UNIT_EPS
        {
            return Err(MuseumError::configuration(format!(
                "slot '{}' rectangle must lie within the unit square",
                self.name
            )));
        }

        Ok(SlotGeometry {
            slot,
            left,
            top: self.top,
            width: self.width,
            height: self.height,
        })
    }
}

/// A slot's rectangle relative to the background's rendered box, all fractions in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlotGeometry {
    pub slot: SlotId,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl SlotGeometry {
    /// Absolute pixel rectangle on a canvas of `canvas` size.
    pub fn pixel_rect(&self, canvas: CanvasSize) -> Rect {
        let w = f64::from(canvas.width);
        let h = f64::from(canvas.height);
        Rect::new(
            self.left * w,
            self.top * h,
            (self.left + self.width) * w,
            (self.top + self.height) * h,
        )
    }
}

/// Fixed mapping from slots to geometry. Loaded once, never mutated.
#[derive(Clone, Debug, PartialEq)]
pub struct SlotTable {
    names: Vec<String>,
    geometry: Vec<SlotGeometry>,
}

impl SlotTable {
    /// Validate and resolve `specs`; declaration order becomes draw order.
    pub fn new(specs: &[SlotSpec]) -> MuseumResult<Self> {
        if specs.is_empty() {
            return Err(MuseumError::configuration(
                "slot table must define at least one slot",
            ));
        }

        let mut seen = HashSet::new();
        let mut names = Vec::with_capacity(specs.len());
        let mut geometry = Vec::with_capacity(specs.len());
        for (i, spec) in specs.iter().enumerate() {
            let name = spec.name.trim();
            if name.is_empty() {
                return Err(MuseumError::configuration("slot name must be non-empty"));
            }
            if !seen.insert(name.to_string()) {
                return Err(MuseumError::configuration(format!(
                    "duplicate slot name '{name}'"
                )));
            }
            geometry.push(spec.resolve(SlotId(i))?);
            names.push(name.to_string());
        }

        Ok(Self { names, geometry })
    }

    /// The three-slot room layout used by the built-in backgrounds.
    pub fn standard_specs() -> Vec<SlotSpec> {
        vec![
            SlotSpec::left("A", 0.22, 0.51, 0.12, 0.25),
            SlotSpec::left("B", 0.38, 0.49, 0.18, 0.26),
            SlotSpec::right("C", 0.29, 0.52, 0.12, 0.25),
        ]
    }

    /// Table built from [`Self::standard_specs`].
    pub fn standard() -> MuseumResult<Self> {
        Self::new(&Self::standard_specs())
    }

    pub fn len(&self) -> usize {
        self.geometry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.geometry.is_empty()
    }

    /// Slot ids in declaration order.
    pub fn ids(&self) -> impl Iterator<Item = SlotId> + '_ {
        (0..self.geometry.len()).map(SlotId)
    }

    pub fn contains(&self, slot: SlotId) -> bool {
        slot.0 < self.geometry.len()
    }

    /// Resolve a slot by name.
    pub fn id_of(&self, name: &str) -> MuseumResult<SlotId> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(SlotId)
            .ok_or_else(|| MuseumError::configuration(format!("unknown slot name '{name}'")))
    }

    pub fn name_of(&self, slot: SlotId) -> MuseumResult<&str> {
        self.names
            .get(slot.0)
            .map(String::as_str)
            .ok_or_else(|| MuseumError::configuration(format!("unknown {slot}")))
    }

    /// Geometry for `slot`; ids from another table are a configuration error.
    pub fn geometry_of(&self, slot: SlotId) -> MuseumResult<SlotGeometry> {
        self.geometry
            .get(slot.0)
            .copied()
            .ok_or_else(|| MuseumError::configuration(format!("unknown {slot}")))
    }

    /// Topmost slot under a pixel point. Later slots draw on top, so they win.
    pub fn hit_test(&self, canvas: CanvasSize, point: Point) -> Option<SlotId> {
        self.geometry
            .iter()
            .rev()
            .find(|g| g.pixel_rect(canvas).contains(point))
            .map(|g| g.slot)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/slots.rs"]
mod tests;
