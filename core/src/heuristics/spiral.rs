//! The spiral heuristic: expanding square rings around the search origin.
//!
//! Cells are enumerated in order of non-decreasing Chebyshev distance from a
//! fixed center, so label characters assigned to later-discovered candidates
//! stay keyboard-adjacent to the first-typed key.
//!
//! The walk is split in two stages for testability: [`predict_xy_spiral`]
//! does pure ring geometry on an infinite grid, and [`validate_xy_spiral`]
//! folds an off-grid prediction back onto the nearest in-bounds edge of the
//! same ring, escalating to the next ring when a whole edge is off-grid.

use tracing::warn;

use super::KeyboardHeuristic;

const VALIDATE_LIMIT: u32 = 100;

/// Next cell on the current square ring, assuming an infinite grid.
///
/// Walks down the left edge, across the bottom, up the right edge and across
/// the top of the ring; once the walk returns to the ring's top-left corner
/// the radius grows by one and the walk restarts one ring out. Radius `<= 0`
/// bootstraps on the center itself; radius `<= 1` while still sitting on the
/// center steps to the ring's top-left corner.
pub fn predict_xy_spiral(pos: (i32, i32), mid: (i32, i32), r: i32) -> (i32, i32, i32) {
    let x0 = mid.0 - r;
    let y0 = mid.1 - r;
    let x1 = mid.0 + r;
    let y1 = mid.1 + r;
    let (x, y) = pos;

    if r <= 0 {
        // very beginning
        return (mid.0, mid.1, 1);
    }

    if r <= 1 && x == mid.0 && y == mid.1 {
        return (mid.0 - 1, mid.1 - 1, 1);
    }

    let (mut rx, mut ry) = (x, y);

    if x == x0 && y <= y1 && y > y0 {
        ry = y - 1;
        rx = x;
    } else if x == x1 && y >= y0 && y < y1 {
        ry = y + 1;
        rx = x;
    } else if y == y0 && x >= x0 && x < x1 {
        rx = x + 1;
        ry = y;
    } else if y == y1 && x <= x1 && x > x0 {
        rx = x - 1;
        ry = y;
    }

    if rx == x0 && ry == y0 {
        // back at the starting corner: next circle
        return (x0 - 1, y0 - 1, r + 1);
    }

    (rx, ry, r)
}

/// Fold an off-grid ring coordinate back onto the nearest in-bounds edge of
/// the same ring, or escalate to the next ring when the whole edge is
/// off-grid. Returns radius `-1` once the ring provably encloses the entire
/// grid on all four sides.
pub fn validate_xy_spiral(
    pos: (i32, i32),
    mid: (i32, i32),
    r: i32,
    w: i32,
    h: i32,
) -> (i32, i32, i32) {
    validate_inner(pos, mid, r, w, h, 0)
}

fn validate_inner(pos: (i32, i32), mid: (i32, i32), r: i32, w: i32, h: i32, n: u32) -> (i32, i32, i32) {
    let (mx, my) = mid;
    let (x, y) = pos;

    if x >= 0 && y >= 0 && x < w && y < h {
        return (x, y, r);
    }

    if (mx - r) < 0 && (mx + r) > w && (my - r) < 0 && (my + r) > h {
        return (mx, my, -1); // circle too big
    }

    if n > VALIDATE_LIMIT {
        // normally unreachable; bail out rather than recurse forever
        warn!(x, y, r, "spiral validation overflow");
        return (mx, my, -1);
    }

    let mut nx = x;
    let mut ny = y;
    let mut nr = r;

    if x < 0 {
        // anywhere but the ring's starting corner escalates first
        if !(x == mx - r && y == my - r) {
            nr = r + 1;
            nx = mx - nr;
            ny = my - nr;
        }
        if ny >= 0 {
            nx = 0;
        } else {
            nx = mx + nr;
        }
        return validate_inner((nx, ny), mid, nr, w, h, n + 1);
    }

    if y < 0 {
        nx = mx + nr;
        ny = if nx < w { 0 } else { my + nr };
        return validate_inner((nx, ny), mid, nr, w, h, n + 1);
    }

    if x >= w {
        ny = my + nr;
        if ny < h {
            nx = w - 1;
        } else {
            nx = mx - nr;
        }
        return validate_inner((nx, ny), mid, nr, w, h, n + 1);
    }

    if y >= h {
        nx = mx - nr;
        if nx >= 0 {
            ny = h - 1;
        }
        return validate_inner((nx, ny), mid, nr, w, h, n + 1);
    }

    (x, y, r)
}

/// Compose prediction and validation, additionally enforcing the configured
/// maximum search radius (`max_depth`; `<= 0` means unbounded).
pub fn next_spiral(
    pos: (i32, i32),
    mid: (i32, i32),
    radius: i32,
    w: i32,
    h: i32,
    max_depth: i32,
) -> (i32, i32, i32) {
    let (ux, uy, u_depth) = predict_xy_spiral(pos, mid, radius);
    let (nx, ny, depth) = validate_xy_spiral((ux, uy), mid, u_depth, w, h);

    if max_depth > 0 && depth > max_depth {
        return (mid.0, mid.1, -1);
    }

    (nx, ny, depth)
}

/// The default heuristic.
#[derive(Debug, Clone, Copy, Default)]
pub struct Spiral;

impl KeyboardHeuristic for Spiral {
    fn next_char(
        &self,
        pos: (i32, i32),
        mid: (i32, i32),
        radius: i32,
        width: i32,
        height: i32,
        max_depth: i32,
    ) -> (i32, i32, i32) {
        next_spiral(pos, mid, radius, width, height, max_depth)
    }
}
