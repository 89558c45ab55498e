//! Pure clamping helpers for window position and size.
//!
//! All math is saturating `i32`. Bounds that invert (a window larger than the usable area) never
//! panic; the lower bound wins, so minimum sizes always hold.

use crate::{
    config::WindowManagerConfig,
    model::{ResizeEdge, SnapSide, WindowRect},
};

/// Clamps `value` into `[min, max]`, preferring `min` when the range is empty.
pub fn clamp_axis(value: i32, min: i32, max: i32) -> i32 {
    if max < min {
        min
    } else {
        value.clamp(min, max)
    }
}

/// Viewport area available to windows once the edge margin is removed.
pub fn usable_area(config: &WindowManagerConfig, viewport: WindowRect) -> WindowRect {
    viewport.inset(config.edge_margin)
}

/// Bounds a size by the usable area, then raises it to the minimum (minimum wins).
pub fn fit_size(
    w: i32,
    h: i32,
    config: &WindowManagerConfig,
    viewport: WindowRect,
) -> (i32, i32) {
    let usable = usable_area(config, viewport);
    let (min_w, min_h) = config.min_size_for(viewport);
    (w.min(usable.w).max(min_w), h.min(usable.h).max(min_h))
}

/// Keeps `rect` inside `usable` without changing its size.
pub fn clamp_position(rect: WindowRect, usable: WindowRect) -> WindowRect {
    WindowRect {
        x: clamp_axis(rect.x, usable.x, usable.right().saturating_sub(rect.w)),
        y: clamp_axis(rect.y, usable.y, usable.bottom().saturating_sub(rect.h)),
        ..rect
    }
}

/// Applies size and position constraints to an arbitrary rect.
pub fn fit_rect(rect: WindowRect, config: &WindowManagerConfig, viewport: WindowRect) -> WindowRect {
    let (w, h) = fit_size(rect.w, rect.h, config, viewport);
    clamp_position(WindowRect { w, h, ..rect }, usable_area(config, viewport))
}

/// Centers a window of the requested size inside the usable area.
pub fn centered_rect(
    w: i32,
    h: i32,
    config: &WindowManagerConfig,
    viewport: WindowRect,
) -> WindowRect {
    let usable = usable_area(config, viewport);
    let (w, h) = fit_size(w, h, config, viewport);
    clamp_position(
        WindowRect {
            x: usable.x.saturating_add(usable.w.saturating_sub(w) / 2),
            y: usable.y.saturating_add(usable.h.saturating_sub(h) / 2),
            w,
            h,
        },
        usable,
    )
}

/// Geometry of a maximized window.
pub fn maximized_rect(config: &WindowManagerConfig, viewport: WindowRect) -> WindowRect {
    let (min_w, min_h) = config.min_size_for(viewport);
    usable_area(config, viewport).clamped_min(min_w, min_h)
}

/// Half of the usable area anchored to `side`, spanning its full height.
pub fn snap_rect(side: SnapSide, config: &WindowManagerConfig, viewport: WindowRect) -> WindowRect {
    let usable = usable_area(config, viewport);
    let (min_w, min_h) = config.min_size_for(viewport);
    let w = (usable.w / 2).max(min_w);
    let x = match side {
        SnapSide::Left => usable.x,
        SnapSide::Right => usable.right().saturating_sub(w),
    };
    WindowRect {
        x,
        y: usable.y,
        w,
        h: usable.h.max(min_h),
    }
}

/// Snap outcome for an unclamped drag rect released at `raw`, if snapping is enabled.
pub fn snap_side(
    raw: WindowRect,
    config: &WindowManagerConfig,
    viewport: WindowRect,
) -> Option<SnapSide> {
    if !config.snap_enabled {
        return None;
    }
    if raw.x < viewport.x.saturating_sub(config.snap_threshold) {
        Some(SnapSide::Left)
    } else if raw.right() > viewport.right().saturating_add(config.snap_threshold) {
        Some(SnapSide::Right)
    } else {
        None
    }
}

/// Resizes `start` by a pointer delta applied to `edge`.
///
/// Trailing edges (east/south) grow from the anchored top-left. Leading edges (west/north) move
/// with the size so the opposite edge stays put. When an axis reaches its minimum the leading
/// edge freezes while the other axis keeps tracking the pointer.
pub fn resize_rect(
    start: WindowRect,
    edge: ResizeEdge,
    dx: i32,
    dy: i32,
    config: &WindowManagerConfig,
    viewport: WindowRect,
) -> WindowRect {
    let usable = usable_area(config, viewport);
    let (min_w, min_h) = config.min_size_for(viewport);
    let mut rect = start.clamped_min(min_w, min_h);

    if edge.moves_east() {
        let max_w = usable.right().saturating_sub(start.x).max(start.w);
        rect.w = start.w.saturating_add(dx).min(max_w).max(min_w);
    } else if edge.moves_west() {
        let right = start.right();
        let x = start.x.saturating_add(dx).max(usable.x.min(start.x));
        let w = right.saturating_sub(x);
        if w < min_w {
            rect.x = right.saturating_sub(min_w);
            rect.w = min_w;
        } else {
            rect.x = x;
            rect.w = w;
        }
    }

    if edge.moves_south() {
        let max_h = usable.bottom().saturating_sub(start.y).max(start.h);
        rect.h = start.h.saturating_add(dy).min(max_h).max(min_h);
    } else if edge.moves_north() {
        let bottom = start.bottom();
        let y = start.y.saturating_add(dy).max(usable.y.min(start.y));
        let h = bottom.saturating_sub(y);
        if h < min_h {
            rect.y = bottom.saturating_sub(min_h);
            rect.h = min_h;
        } else {
            rect.y = y;
            rect.h = h;
        }
    }

    rect
}
