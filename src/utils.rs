//! Rectangle helpers for detector output.

pub mod safe_cast;

use opencv::core::Rect;

/// Intersect `rect` with a `width` x `height` image, `None` if nothing remains
#[must_use]
pub fn clip_rect(rect: Rect, width: i32, height: i32) -> Option<Rect> {
    let x0 = rect.x.max(0);
    let y0 = rect.y.max(0);
    let x1 = rect.x.saturating_add(rect.width).min(width);
    let y1 = rect.y.saturating_add(rect.height).min(height);

    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some(Rect::new(x0, y0, x1 - x0, y1 - y0))
}

/// Largest rectangle by area; the first one wins ties
#[must_use]
pub fn largest_rect(rects: &[Rect]) -> Option<Rect> {
    rects.iter().copied().fold(None, |best: Option<Rect>, rect| match best {
        Some(b) if area(b) >= area(rect) => Some(b),
        _ => Some(rect),
    })
}

/// Translate a rectangle found inside `outer` into the coordinates of `outer`'s image
#[must_use]
pub fn offset_rect(inner: Rect, outer: Rect) -> Rect {
    Rect::new(outer.x + inner.x, outer.y + inner.y, inner.width, inner.height)
}

fn area(rect: Rect) -> i64 {
    i64::from(rect.width.max(0)) * i64::from(rect.height.max(0))
}
