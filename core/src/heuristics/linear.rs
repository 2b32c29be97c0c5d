//! Linear heuristics: simple row-major walks with wraparound.
//!
//! These alternates ignore the search origin entirely. They are useful for
//! layouts where proximity ordering is undesirable, e.g. boards whose rows
//! already encode a preferred assignment order. All of them report radius 1
//! on every step so the caller's per-node bookkeeping keeps advancing.

use super::KeyboardHeuristic;

/// Row-major step with wraparound to the top-left corner. The very first
/// call (radius `<= 0`) yields the current position unchanged.
fn next_wrapping(pos: (i32, i32), depth: i32, w: i32, h: i32) -> (i32, i32, i32) {
    let inc = if depth > 0 { 1 } else { 0 };
    let (px, py) = pos;
    if px + inc >= w || px >= w {
        if py + inc >= h || py >= h {
            (0, 0, 1)
        } else {
            (0, py + inc, 1)
        }
    } else {
        (px + inc, py, 1)
    }
}

/// Reverse row-major step, wrapping to the bottom-right corner.
fn next_wrapping_back(pos: (i32, i32), depth: i32, w: i32, h: i32) -> (i32, i32, i32) {
    let inc = if depth > 0 { 1 } else { 0 };
    let (px, py) = pos;
    if px - inc < 0 || px < 0 {
        if py - inc < 0 || py < 0 {
            (w - 1, h - 1, 1)
        } else {
            (w - 1, py - inc, 1)
        }
    } else {
        (px - inc, py, 1)
    }
}

/// Always restarts from the top-left corner, then walks row-major.
#[derive(Debug, Clone, Copy, Default)]
pub struct Plain;

impl KeyboardHeuristic for Plain {
    fn next_char(
        &self,
        pos: (i32, i32),
        _mid: (i32, i32),
        radius: i32,
        width: i32,
        height: i32,
        _max_depth: i32,
    ) -> (i32, i32, i32) {
        if radius <= 0 {
            return (0, 0, 1);
        }
        next_wrapping(pos, radius, width, height)
    }
}

/// Row-major from the current position.
#[derive(Debug, Clone, Copy, Default)]
pub struct Straight;

impl KeyboardHeuristic for Straight {
    fn next_char(
        &self,
        pos: (i32, i32),
        _mid: (i32, i32),
        radius: i32,
        width: i32,
        height: i32,
        _max_depth: i32,
    ) -> (i32, i32, i32) {
        next_wrapping(pos, radius, width, height)
    }
}

/// Same walk as [`Straight`]; registered separately so configurations can
/// name the direction they mean.
#[derive(Debug, Clone, Copy, Default)]
pub struct Forward;

impl KeyboardHeuristic for Forward {
    fn next_char(
        &self,
        pos: (i32, i32),
        _mid: (i32, i32),
        radius: i32,
        width: i32,
        height: i32,
        _max_depth: i32,
    ) -> (i32, i32, i32) {
        next_wrapping(pos, radius, width, height)
    }
}

/// Reverse row-major from the current position.
#[derive(Debug, Clone, Copy, Default)]
pub struct Backward;

impl KeyboardHeuristic for Backward {
    fn next_char(
        &self,
        pos: (i32, i32),
        _mid: (i32, i32),
        radius: i32,
        width: i32,
        height: i32,
        _max_depth: i32,
    ) -> (i32, i32, i32) {
        next_wrapping_back(pos, radius, width, height)
    }
}

/// Row-major walk that never resets its origin between candidates.
#[derive(Debug, Clone, Copy, Default)]
pub struct Continuous;

impl KeyboardHeuristic for Continuous {
    fn next_char(
        &self,
        pos: (i32, i32),
        _mid: (i32, i32),
        radius: i32,
        width: i32,
        height: i32,
        _max_depth: i32,
    ) -> (i32, i32, i32) {
        next_wrapping(pos, radius, width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_probe_stays_put() {
        // radius 0 means "probe the starting cell itself"
        assert_eq!(next_wrapping((2, 1), 0, 4, 3), (2, 1, 1));
        assert_eq!(next_wrapping_back((2, 1), 0, 4, 3), (2, 1, 1));
    }

    #[test]
    fn test_forward_wraps_rows_then_grid() {
        assert_eq!(next_wrapping((1, 0), 1, 3, 2), (2, 0, 1));
        assert_eq!(next_wrapping((2, 0), 1, 3, 2), (0, 1, 1));
        assert_eq!(next_wrapping((2, 1), 1, 3, 2), (0, 0, 1));
    }

    #[test]
    fn test_backward_wraps_to_bottom_right() {
        assert_eq!(next_wrapping_back((1, 1), 1, 3, 2), (0, 1, 1));
        assert_eq!(next_wrapping_back((0, 1), 1, 3, 2), (2, 0, 1));
        assert_eq!(next_wrapping_back((0, 0), 1, 3, 2), (2, 1, 1));
    }

    #[test]
    fn test_plain_restarts_from_origin() {
        let plain = Plain;
        assert_eq!(plain.next_char((2, 1), (0, 0), 0, 3, 2, -1), (0, 0, 1));
        assert_eq!(plain.next_char((0, 0), (0, 0), 1, 3, 2, -1), (1, 0, 1));
    }
}
