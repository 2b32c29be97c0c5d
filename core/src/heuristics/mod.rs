//! Pluggable keyboard geometry heuristics.
//!
//! A heuristic decides, given the last probed grid cell and the search
//! origin, which cell to probe next when hunting for a free label key. The
//! default spiral walks expanding square rings outward from the origin so
//! labels land on physically close keys first; the linear alternates provide
//! simpler row-major orders for layouts where proximity ordering is
//! undesirable.

use std::sync::Arc;

pub mod linear;
pub mod spiral;

pub use linear::{Backward, Continuous, Forward, Plain, Straight};
pub use spiral::Spiral;

/// A step of the key search: from `pos` (last probed cell) relative to `mid`
/// (the search origin) at the given ring `radius`, produce the next cell to
/// probe and the radius it sits on.
///
/// A returned radius of `-1` signals that the search space is exhausted at
/// or within `max_depth`; callers treat it as "no more candidates here".
pub trait KeyboardHeuristic: Send + Sync {
    fn next_char(
        &self,
        pos: (i32, i32),
        mid: (i32, i32),
        radius: i32,
        width: i32,
        height: i32,
        max_depth: i32,
    ) -> (i32, i32, i32);
}

/// Names accepted by [`provide_heuristic`], default first.
pub fn heuristic_names() -> &'static [&'static str] {
    &["spiral", "plain", "straight", "forward", "backward", "continuous"]
}

/// Look a heuristic up by name. Unknown names fall back to the spiral.
pub fn provide_heuristic(name: &str) -> Arc<dyn KeyboardHeuristic> {
    match name.to_lowercase().as_str() {
        "plain" => Arc::new(Plain),
        "straight" => Arc::new(Straight),
        "forward" => Arc::new(Forward),
        "backward" => Arc::new(Backward),
        "continuous" => Arc::new(Continuous),
        _ => Arc::new(Spiral),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_is_total() {
        for name in heuristic_names() {
            // every registered name resolves without falling back to a panic
            let h = provide_heuristic(name);
            let (_, _, d) = h.next_char((0, 0), (0, 0), 0, 4, 4, -1);
            assert!(d >= -1);
        }
    }

    #[test]
    fn test_unknown_name_falls_back_to_spiral() {
        let h = provide_heuristic("no-such-heuristic");
        // spiral bootstrap: radius 0 probes the origin itself
        assert_eq!(h.next_char((2, 2), (2, 2), 0, 5, 5, -1), (2, 2, 1));
    }
}
