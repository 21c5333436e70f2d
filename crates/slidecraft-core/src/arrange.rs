//! Alignment, distribution, layering and transform helpers over a selection.
//!
//! Everything here is pure: functions read a slide's elements and return the
//! new values to apply through commands.

use crate::elements::{ElementId, SlideElement};
use crate::geometry::{union_bounds, BBox};
use crate::patch::{ContentPatch, ElementPatch, ImagePatch, ShapePatch};
use kurbo::Rect;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    Left,
    Center,
    Right,
    Top,
    Middle,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Layer movement within a slide's paint order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZOrder {
    BringToFront,
    SendToBack,
    BringForward,
    SendBackward,
}

fn selected<'a>(elements: &'a [SlideElement], ids: &[ElementId]) -> Vec<&'a SlideElement> {
    elements
        .iter()
        .filter(|e| ids.iter().any(|id| id == e.id()))
        .collect()
}

/// Union of the selected elements' boxes.
pub fn selection_bounds(elements: &[SlideElement], ids: &[ElementId]) -> Option<Rect> {
    let boxes: Vec<BBox> = selected(elements, ids).iter().map(|e| e.bbox()).collect();
    union_bounds(&boxes)
}

/// New boxes that line the selection up along one edge or center.
///
/// Only elements whose box actually moves are returned.
pub fn align(elements: &[SlideElement], ids: &[ElementId], alignment: Alignment) -> Vec<(ElementId, BBox)> {
    let Some(bounds) = selection_bounds(elements, ids) else {
        return Vec::new();
    };
    let center = bounds.center();
    let mut updates = Vec::new();
    for element in selected(elements, ids) {
        let bbox = element.bbox();
        let mut moved = bbox;
        match alignment {
            Alignment::Left => moved.x = bounds.x0,
            Alignment::Center => moved.x = center.x - bbox.width / 2.0,
            Alignment::Right => moved.x = bounds.x1 - bbox.width,
            Alignment::Top => moved.y = bounds.y0,
            Alignment::Middle => moved.y = center.y - bbox.height / 2.0,
            Alignment::Bottom => moved.y = bounds.y1 - bbox.height,
        }
        if moved != bbox {
            updates.push((element.id().to_string(), moved));
        }
    }
    updates
}

/// Even spacing between the selected elements along `axis`.
///
/// The outermost elements stay put and the interior ones are placed so that
/// every gap is equal. Fewer than three elements is a no-op.
pub fn distribute(elements: &[SlideElement], ids: &[ElementId], axis: Axis) -> Vec<(ElementId, BBox)> {
    let mut items: Vec<(ElementId, BBox)> = selected(elements, ids)
        .into_iter()
        .map(|e| (e.id().to_string(), e.bbox()))
        .collect();
    if items.len() < 3 {
        return Vec::new();
    }

    let lead = |b: &BBox| match axis {
        Axis::Horizontal => b.x,
        Axis::Vertical => b.y,
    };
    let extent = |b: &BBox| match axis {
        Axis::Horizontal => b.width,
        Axis::Vertical => b.height,
    };
    items.sort_by(|a, b| lead(&a.1).total_cmp(&lead(&b.1)));

    let first = &items[0].1;
    let last = &items[items.len() - 1].1;
    let span = lead(last) - (lead(first) + extent(first));
    let interior = &items[1..items.len() - 1];
    let occupied: f64 = interior.iter().map(|(_, b)| extent(b)).sum();
    let gap = (span - occupied) / (items.len() - 1) as f64;

    let mut cursor = lead(first) + extent(first) + gap;
    let mut updates = Vec::new();
    for (id, bbox) in interior {
        let mut moved = *bbox;
        match axis {
            Axis::Horizontal => moved.x = cursor,
            Axis::Vertical => moved.y = cursor,
        }
        cursor += extent(bbox) + gap;
        if moved != *bbox {
            updates.push((id.clone(), moved));
        }
    }
    updates
}

/// Move the element at `index` within the paint order. Returns whether the order changed.
pub fn reorder(elements: &mut Vec<SlideElement>, index: usize, target: ZOrder) -> bool {
    if index >= elements.len() {
        return false;
    }
    let last = elements.len() - 1;
    match target {
        ZOrder::BringToFront => {
            if index == last {
                return false;
            }
            let element = elements.remove(index);
            elements.push(element);
        }
        ZOrder::SendToBack => {
            if index == 0 {
                return false;
            }
            let element = elements.remove(index);
            elements.insert(0, element);
        }
        ZOrder::BringForward => {
            if index == last {
                return false;
            }
            elements.swap(index, index + 1);
        }
        ZOrder::SendBackward => {
            if index == 0 {
                return false;
            }
            elements.swap(index, index - 1);
        }
    }
    true
}

/// Rotate each selected element by `degrees`, normalizing to `[0, 360)`.
pub fn rotate_by(elements: &[SlideElement], ids: &[ElementId], degrees: f64) -> Vec<(ElementId, ElementPatch)> {
    selected(elements, ids)
        .into_iter()
        .map(|e| {
            let rotation = (e.base().rotation + degrees).rem_euclid(360.0);
            let patch = ElementPatch {
                rotation: Some(rotation),
                ..Default::default()
            };
            (e.id().to_string(), patch)
        })
        .collect()
}

/// Toggle the flip flag of selected shapes and images across `axis`.
///
/// `Axis::Horizontal` mirrors left-to-right.
pub fn mirror(elements: &[SlideElement], ids: &[ElementId], axis: Axis) -> Vec<(ElementId, ElementPatch)> {
    let flip = |h: bool, v: bool| match axis {
        Axis::Horizontal => (Some(!h), None),
        Axis::Vertical => (None, Some(!v)),
    };
    selected(elements, ids)
        .into_iter()
        .filter_map(|e| {
            let content = match e {
                SlideElement::Shape(s) => {
                    let (flip_h, flip_v) = flip(s.flip_h, s.flip_v);
                    ContentPatch::Shape(ShapePatch {
                        flip_h,
                        flip_v,
                        ..Default::default()
                    })
                }
                SlideElement::Image(i) => {
                    let (flip_h, flip_v) = flip(i.flip_h, i.flip_v);
                    ContentPatch::Image(ImagePatch {
                        flip_h,
                        flip_v,
                        ..Default::default()
                    })
                }
                SlideElement::Text(_) | SlideElement::Table(_) => return None,
            };
            Some((e.id().to_string(), ElementPatch::content(content)))
        })
        .collect()
}
