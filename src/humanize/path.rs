//! Cubic-Bézier pointer paths.
//!
//! Synthesizes a natural-looking arc between two screen points so
//! injected pointer movement does not travel a mechanical straight line.

use crate::humanize::rng::next_int;

pub type Point = (i32, i32);

/// Smallest control-point scatter radius, in pixels.
const MIN_CONTROL_OFFSET: i32 = 20;

/// Two control points scattered around the midpoint of `start..end`.
///
/// The scatter radius grows with the travel distance (a quarter of the
/// larger axis span) so long moves arc visibly while short ones stay
/// tight.
pub fn bezier_control_points(start: Point, end: Point) -> (Point, Point) {
    let mid_x = (start.0 + end.0) / 2;
    let mid_y = (start.1 + end.1) / 2;

    let span = (end.0 - start.0).abs().max((end.1 - start.1).abs());
    let offset = (span / 4).max(MIN_CONTROL_OFFSET);

    let cp1 = (
        mid_x + next_int(-offset, offset),
        mid_y + next_int(-offset, offset),
    );
    let cp2 = (
        mid_x + next_int(-offset, offset),
        mid_y + next_int(-offset, offset),
    );
    (cp1, cp2)
}

/// Evaluate a cubic Bézier at `t` in [0, 1].
pub fn bezier_point(t: f64, p0: Point, p1: Point, p2: Point, p3: Point) -> Point {
    let u = 1.0 - t;
    let tt = t * t;
    let uu = u * u;
    let uuu = uu * u;
    let ttt = tt * t;

    let x = uuu * p0.0 as f64 + 3.0 * uu * t * p1.0 as f64 + 3.0 * u * tt * p2.0 as f64
        + ttt * p3.0 as f64;
    let y = uuu * p0.1 as f64 + 3.0 * uu * t * p1.1 as f64 + 3.0 * u * tt * p2.1 as f64
        + ttt * p3.1 as f64;

    (x as i32, y as i32)
}

/// Waypoints along a randomized Bézier arc from `start` to `end`.
///
/// Returns `steps` points ending exactly on `end`. Zero steps yields an
/// empty path.
pub fn mouse_path(start: Point, end: Point, steps: usize) -> Vec<Point> {
    if steps == 0 {
        return Vec::new();
    }

    let (cp1, cp2) = bezier_control_points(start, end);
    let mut path = Vec::with_capacity(steps);
    for i in 1..=steps {
        let t = i as f64 / steps as f64;
        path.push(bezier_point(t, start, cp1, cp2, end));
    }

    // Rounding can leave the final sample a pixel short.
    if let Some(last) = path.last_mut() {
        *last = end;
    }

    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bezier_endpoints() {
        let p0 = (0, 0);
        let p3 = (100, 50);
        let (cp1, cp2) = bezier_control_points(p0, p3);

        assert_eq!(bezier_point(0.0, p0, cp1, cp2, p3), p0);
        let (x, y) = bezier_point(1.0, p0, cp1, cp2, p3);
        assert!((x - p3.0).abs() <= 1 && (y - p3.1).abs() <= 1);
    }

    #[test]
    fn test_control_points_scale_with_distance() {
        let (cp1, cp2) = bezier_control_points((0, 0), (1000, 0));
        // Control points stay within the scatter radius of the midpoint
        let offset = 1000 / 4;
        for cp in [cp1, cp2] {
            assert!((cp.0 - 500).abs() <= offset);
            assert!((cp.1 - 0).abs() <= offset);
        }
    }

    #[test]
    fn test_path_reaches_target() {
        let path = mouse_path((10, 10), (300, 200), 25);
        assert_eq!(path.len(), 25);
        assert_eq!(*path.last().unwrap(), (300, 200));
    }

    #[test]
    fn test_path_zero_steps() {
        assert!(mouse_path((0, 0), (10, 10), 0).is_empty());
    }

    #[test]
    fn test_path_single_step_is_target() {
        let path = mouse_path((0, 0), (50, 50), 1);
        assert_eq!(path, vec![(50, 50)]);
    }

    #[test]
    fn test_path_stays_roughly_bounded() {
        // The arc may bow outside the bounding box, but only by the
        // control-point scatter radius.
        let path = mouse_path((0, 0), (200, 0), 50);
        let slack = (200 / 4).max(20) as i32;
        for (x, y) in path {
            assert!(x >= -slack && x <= 200 + slack);
            assert!(y >= -slack && y <= slack);
        }
    }
}
