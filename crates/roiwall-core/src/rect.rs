//! Normalized rectangles and destination region lists.
//!
//! All rects use a bottom-left origin, matching GL texture space.

use crate::error::EngineError;
use crate::image::TexCoordMax;

/// A rectangle in normalized (0..1) texture or canvas space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedRect {
    pub top: f32,
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
}

impl Default for NormalizedRect {
    fn default() -> Self {
        Self::FULL
    }
}

impl NormalizedRect {
    /// The whole surface.
    pub const FULL: NormalizedRect = NormalizedRect {
        top: 1.0,
        left: 0.0,
        bottom: 0.0,
        right: 1.0,
    };

    pub const fn new(bottom: f32, left: f32, top: f32, right: f32) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    /// Build a rect from a pixel rectangle on a canvas.
    ///
    /// `x`/`y` address the rectangle's top-left corner with a top-left canvas
    /// origin (the way panel layouts are usually drawn up); the result is
    /// flipped into bottom-left normalized space.
    pub fn from_canvas_pixels(
        canvas_w: f32,
        canvas_h: f32,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
    ) -> Self {
        Self {
            top: 1.0 - y / canvas_h,
            left: x / canvas_w,
            bottom: 1.0 - (y + h) / canvas_h,
            right: (x + w) / canvas_w,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.top - self.bottom
    }

    /// Horizontal midpoint, `left + (right - left) / 2`.
    pub fn midpoint_x(&self) -> f32 {
        self.width() / 2.0 + self.left
    }

    /// Rejects non-finite values, values outside `[0,1]` and inverted edges.
    ///
    /// Zero-area rects are accepted.
    pub fn validate(&self) -> Result<(), EngineError> {
        let fields = [
            ("top", self.top),
            ("left", self.left),
            ("bottom", self.bottom),
            ("right", self.right),
        ];
        for (name, v) in fields {
            if !v.is_finite() || !(0.0..=1.0).contains(&v) {
                return Err(EngineError::InvalidRect(format!(
                    "{name}={v} is outside [0,1]"
                )));
            }
        }
        if self.right < self.left {
            return Err(EngineError::InvalidRect(format!(
                "right ({}) < left ({})",
                self.right, self.left
            )));
        }
        if self.top < self.bottom {
            return Err(EngineError::InvalidRect(format!(
                "top ({}) < bottom ({})",
                self.top, self.bottom
            )));
        }
        Ok(())
    }

    /// Rescale into texture-coordinate space for storage padded beyond the image.
    pub fn scaled(&self, max: TexCoordMax) -> Self {
        Self {
            top: self.top * max.t,
            left: self.left * max.s,
            bottom: self.bottom * max.t,
            right: self.right * max.s,
        }
    }

    /// Map every edge from `[0,1]` into clip space `[-1,1]`.
    pub fn to_clip(&self) -> ClipRect {
        ClipRect {
            top: self.top * 2.0 - 1.0,
            left: self.left * 2.0 - 1.0,
            bottom: self.bottom * 2.0 - 1.0,
            right: self.right * 2.0 - 1.0,
        }
    }
}

/// A rectangle in clip space (`[-1,1]` per axis).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipRect {
    pub top: f32,
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
}

impl ClipRect {
    pub fn midpoint_x(&self) -> f32 {
        (self.right - self.left) / 2.0 + self.left
    }
}

/// A destination region on the canvas, optionally labelled (e.g. "dj booth").
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub name: Option<String>,
    pub rect: NormalizedRect,
}

impl Region {
    pub fn new(rect: NormalizedRect) -> Self {
        Self { name: None, rect }
    }

    pub fn named(name: impl Into<String>, rect: NormalizedRect) -> Self {
        Self {
            name: Some(name.into()),
            rect,
        }
    }
}

/// Ordered, immutable list of destination regions. Order is render order.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionList {
    regions: Vec<Region>,
}

impl RegionList {
    /// Validates every region; the list is immutable afterwards.
    pub fn new(regions: Vec<Region>) -> Result<Self, EngineError> {
        for (i, r) in regions.iter().enumerate() {
            r.rect.validate().map_err(|e| match e {
                EngineError::InvalidRect(msg) => {
                    let label = r.name.as_deref().unwrap_or("unnamed");
                    EngineError::InvalidRect(format!("region {i} ({label}): {msg}"))
                }
                other => other,
            })?;
        }
        Ok(Self { regions })
    }

    /// Wrap regions that are valid by construction (built-in tables).
    pub(crate) fn from_trusted(regions: Vec<Region>) -> Self {
        debug_assert!(
            regions.iter().all(|r| r.rect.validate().is_ok()),
            "built-in region table contains an invalid rect"
        );
        Self { regions }
    }

    /// A single region covering the whole canvas.
    pub fn full() -> Self {
        Self {
            regions: vec![Region::new(NormalizedRect::FULL)],
        }
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter()
    }

    pub fn as_slice(&self) -> &[Region] {
        &self.regions
    }
}

impl<'a> IntoIterator for &'a RegionList {
    type Item = &'a Region;
    type IntoIter = std::slice::Iter<'a, Region>;

    fn into_iter(self) -> Self::IntoIter {
        self.regions.iter()
    }
}
