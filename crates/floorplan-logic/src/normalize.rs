//! Shift a layout so its minimum corner sits at `(margin, margin)`.

use crate::layout::Layout;

/// Translate every rect by one vector so the smallest `x` and smallest `y`
/// both equal `margin`. Rects on the minimum edge land exactly on `margin`
/// and nothing rounds below it, so a second pass computes a zero shift and
/// changes nothing.
pub fn normalize(layout: &mut Layout, margin: f64) {
    let Some(bb) = layout.bounding_box() else {
        return;
    };
    let (min_x, min_y) = (bb.min_x, bb.min_y);
    let (dx, dy) = (margin - min_x, margin - min_y);
    for rect in layout.rects_mut() {
        // The shift is uniform; `max` only absorbs rounding in `margin - min`.
        rect.x = if rect.x == min_x { margin } else { (rect.x + dx).max(margin) };
        rect.y = if rect.y == min_y { margin } else { (rect.y + dy).max(margin) };
    }
}

/// Normalized copy of `layout`.
pub fn normalized(layout: &Layout, margin: f64) -> Layout {
    let mut out = layout.clone();
    normalize(&mut out, margin);
    out
}
