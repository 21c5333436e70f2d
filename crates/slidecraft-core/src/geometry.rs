//! Bounding boxes in canvas pixel space.

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Smallest width or height an element may have.
pub const MIN_ELEMENT_SIZE: f64 = 5.0;

/// Axis-aligned box `{x, y, width, height}`, pre-rotation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn as_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        self.as_rect().center()
    }

    /// Whether the size satisfies [`MIN_ELEMENT_SIZE`] and every field is finite.
    pub fn is_valid(&self) -> bool {
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
            && self.width >= MIN_ELEMENT_SIZE
            && self.height >= MIN_ELEMENT_SIZE
    }

    pub fn translated(&self, delta: Vec2) -> Self {
        Self::new(self.x + delta.x, self.y + delta.y, self.width, self.height)
    }

    /// Apply a partial update field by field.
    pub fn merge(&mut self, patch: &BBoxPatch) {
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(width) = patch.width {
            self.width = width;
        }
        if let Some(height) = patch.height {
            self.height = height;
        }
    }
}

impl Default for BBox {
    fn default() -> Self {
        Self::new(0.0, 0.0, 100.0, 100.0)
    }
}

/// Partial update of a [`BBox`]; `None` fields are left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BBoxPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl BBoxPatch {
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Default::default()
        }
    }

    pub fn size(width: f64, height: f64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Default::default()
        }
    }

    /// Patch that rewrites every field of `bbox`.
    pub fn full(bbox: BBox) -> Self {
        Self {
            x: Some(bbox.x),
            y: Some(bbox.y),
            width: Some(bbox.width),
            height: Some(bbox.height),
        }
    }
}

/// Union of a set of boxes, `None` when empty.
pub fn union_bounds<'a>(boxes: impl IntoIterator<Item = &'a BBox>) -> Option<Rect> {
    boxes
        .into_iter()
        .map(BBox::as_rect)
        .reduce(|acc, r| acc.union(r))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges() {
        let b = BBox::new(10.0, 20.0, 30.0, 40.0);
        assert!((b.right() - 40.0).abs() < f64::EPSILON);
        assert!((b.bottom() - 60.0).abs() < f64::EPSILON);
        assert_eq!(b.center(), Point::new(25.0, 40.0));
    }

    #[test]
    fn test_validity() {
        assert!(BBox::new(0.0, 0.0, 5.0, 5.0).is_valid());
        assert!(!BBox::new(0.0, 0.0, 4.9, 10.0).is_valid());
        assert!(!BBox::new(0.0, 0.0, 10.0, -1.0).is_valid());
        assert!(!BBox::new(f64::NAN, 0.0, 10.0, 10.0).is_valid());
    }

    #[test]
    fn test_merge_keeps_unset_fields() {
        let mut b = BBox::new(1.0, 2.0, 3.0, 4.0);
        b.merge(&BBoxPatch {
            x: Some(50.0),
            ..Default::default()
        });
        assert_eq!(b, BBox::new(50.0, 2.0, 3.0, 4.0));
    }

    #[test]
    fn test_union_bounds() {
        let boxes = [BBox::new(0.0, 0.0, 20.0, 20.0), BBox::new(100.0, 50.0, 20.0, 10.0)];
        let bounds = union_bounds(&boxes).unwrap();
        assert_eq!(bounds, Rect::new(0.0, 0.0, 120.0, 60.0));
        assert!(union_bounds(&[] as &[BBox]).is_none());
    }
}
