//! Hourglass geometry.
//!
//! All coordinates are in the drawing's own units with the origin at the top
//! left of the glass body and `y` growing downwards. The glass body is a
//! 240 × 320 bow-tie; the sand lives in a 200 × 300 area centred inside it.
//!
//! Sand shapes interpolate linearly between an empty and a full hourglass as a
//! function of `elapsed = total - time`:
//!
//! - the top triangle shrinks from the full width towards the neck,
//! - the bottom shape grows from a flat line into a full triangle.
//!
//! ```rust
//! use hourglass_timer::geometry::{Dimensions, Frame};
//!
//! let dims = Dimensions::default();
//! let start = Frame::new(&dims, 10, 10);
//! let end = Frame::new(&dims, 0, 10);
//!
//! // Before the countdown the top is full...
//! assert!(start.is_sand(dims.center_x(), 40.0));
//! // ...and when it is over the sand has moved to the bottom.
//! assert!(!end.is_sand(dims.center_x(), 40.0));
//! assert!(end.is_sand(dims.center_x(), 280.0));
//! ```

/// A point in drawing units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position, growing downwards.
    pub y: f64,
}

impl Point {
    /// Creates a point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Rotates the point clockwise (on screen) around `center`.
    pub fn rotated_about(self, center: Point, degrees: f64) -> Point {
        let (sin, cos) = degrees.to_radians().sin_cos();
        let dx = self.x - center.x;
        let dy = self.y - center.y;
        Point {
            x: center.x + dx * cos - dy * sin,
            y: center.y + dx * sin + dy * cos,
        }
    }
}

/// A closed polygon built with `move_to` / `line_to`.
///
/// ```rust
/// use hourglass_timer::geometry::{Path, Point};
///
/// let square = Path::new()
///     .move_to(0.0, 0.0)
///     .line_to(10.0, 0.0)
///     .line_to(10.0, 10.0)
///     .line_to(0.0, 10.0)
///     .close();
///
/// assert!(square.contains(Point::new(5.0, 5.0)));
/// assert!(!square.contains(Point::new(15.0, 5.0)));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    points: Vec<Point>,
}

impl Path {
    /// Creates an empty path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the outline at `(x, y)`, discarding anything drawn before.
    pub fn move_to(mut self, x: f64, y: f64) -> Self {
        self.points.clear();
        self.points.push(Point::new(x, y));
        self
    }

    /// Adds a straight edge to `(x, y)`.
    pub fn line_to(mut self, x: f64, y: f64) -> Self {
        self.points.push(Point::new(x, y));
        self
    }

    /// Closes the outline. Paths are always treated as closed; this only
    /// reads like the drawing code it mirrors.
    pub fn close(self) -> Self {
        self
    }

    /// Vertices in drawing order.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Returns the path shifted by `(dx, dy)`.
    pub fn translate(&self, dx: f64, dy: f64) -> Path {
        Path {
            points: self
                .points
                .iter()
                .map(|p| Point::new(p.x + dx, p.y + dy))
                .collect(),
        }
    }

    /// Returns the path rotated around `center`.
    pub fn rotate(&self, center: Point, degrees: f64) -> Path {
        Path {
            points: self
                .points
                .iter()
                .map(|p| p.rotated_about(center, degrees))
                .collect(),
        }
    }

    /// Even-odd containment test. Degenerate paths contain nothing.
    pub fn contains(&self, p: Point) -> bool {
        if self.points.len() < 3 {
            return false;
        }

        let mut inside = false;
        let mut j = self.points.len() - 1;
        for i in 0..self.points.len() {
            let a = self.points[i];
            let b = self.points[j];
            if (a.y > p.y) != (b.y > p.y) {
                let cross_x = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if p.x < cross_x {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }
}

/// Sizes of the glass body and the sand area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimensions {
    /// Width of the glass body.
    pub body_width: f64,
    /// Height of the glass body.
    pub body_height: f64,
    /// Width of the sand area.
    pub content_width: f64,
    /// Height of the sand area.
    pub content_height: f64,
}

impl Default for Dimensions {
    fn default() -> Self {
        Self {
            body_width: 240.0,
            body_height: 320.0,
            content_width: 200.0,
            content_height: 300.0,
        }
    }
}

impl Dimensions {
    /// Offset of the sand area inside the body.
    pub fn content_offset(&self) -> Point {
        Point::new(
            (self.body_width - self.content_width) / 2.0,
            (self.body_height - self.content_height) / 2.0,
        )
    }

    /// Horizontal centre of the body.
    pub fn center_x(&self) -> f64 {
        self.body_width / 2.0
    }

    /// Centre of the body, the pivot for rotations.
    pub fn center(&self) -> Point {
        Point::new(self.center_x(), self.body_height / 2.0)
    }

    fn part_height(&self) -> f64 {
        self.content_height * 0.5
    }
}

/// Outline of the glass body, in body coordinates.
pub fn body_path(dims: &Dimensions) -> Path {
    let w = dims.body_width;
    let h = dims.body_height;
    Path::new()
        .move_to(0.0, 0.0)
        .line_to(w, 0.0)
        .line_to(w * 0.55, h * 0.5)
        .line_to(w, h)
        .line_to(0.0, h)
        .line_to(w * 0.45, h * 0.5)
        .close()
}

/// Returns `(time, total, elapsed)` with `total >= 1` and `time <= total`.
fn progress(time_ms: u64, total_ms: u64) -> (f64, f64, f64) {
    let total = total_ms.max(1);
    let time = time_ms.min(total);
    (time as f64, total as f64, (total - time) as f64)
}

/// Sand still in the top bulb, in sand-area coordinates.
pub fn top_sand_path(dims: &Dimensions, time_ms: u64, total_ms: u64) -> Path {
    let (_, total, elapsed) = progress(time_ms, total_ms);
    let part = dims.part_height();
    let base_x = (dims.content_width * 0.5) / total;
    let surface = part / total * elapsed;

    Path::new()
        .move_to(base_x * elapsed, surface)
        .line_to(dims.content_width * 0.5, part)
        .line_to(dims.content_width - base_x * elapsed, surface)
        .close()
}

/// Sand collected in the bottom bulb, in sand-area coordinates.
pub fn bottom_sand_path(dims: &Dimensions, time_ms: u64, total_ms: u64) -> Path {
    let (time, total, elapsed) = progress(time_ms, total_ms);
    let part = dims.part_height();
    let base_x = (dims.content_width * 0.5) / total;
    let surface = part + part / total * time;

    Path::new()
        .move_to(0.0, dims.content_height)
        .line_to(base_x * elapsed, surface)
        .line_to(dims.content_width - base_x * elapsed, surface)
        .line_to(dims.content_width, dims.content_height)
        .close()
}

/// All shapes of one hourglass frame, in body coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// The glass outline.
    pub body: Path,
    /// Sand in the top bulb.
    pub top: Path,
    /// Sand in the bottom bulb.
    pub bottom: Path,
}

impl Frame {
    /// Builds the frame for `time_ms` remaining out of `total_ms`.
    pub fn new(dims: &Dimensions, time_ms: u64, total_ms: u64) -> Self {
        let offset = dims.content_offset();
        Self {
            body: body_path(dims),
            top: top_sand_path(dims, time_ms, total_ms).translate(offset.x, offset.y),
            bottom: bottom_sand_path(dims, time_ms, total_ms).translate(offset.x, offset.y),
        }
    }

    /// Whether `(x, y)` is covered by sand.
    pub fn is_sand(&self, x: f64, y: f64) -> bool {
        let p = Point::new(x, y);
        self.top.contains(p) || self.bottom.contains(p)
    }

    /// Whether `(x, y)` is inside the glass.
    pub fn is_glass(&self, x: f64, y: f64) -> bool {
        self.body.contains(Point::new(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_point(actual: Point, x: f64, y: f64) {
        assert!(
            (actual.x - x).abs() < EPS && (actual.y - y).abs() < EPS,
            "expected ({x}, {y}), got ({}, {})",
            actual.x,
            actual.y
        );
    }

    #[test]
    fn test_body_outline() {
        let body = body_path(&Dimensions::default());
        let pts = body.points();
        assert_eq!(pts.len(), 6);
        assert_point(pts[2], 132.0, 160.0);
        assert_point(pts[5], 108.0, 160.0);
        assert!(body.contains(Point::new(120.0, 160.0)));
        assert!(!body.contains(Point::new(20.0, 160.0)));
        assert!(body.contains(Point::new(20.0, 5.0)));
    }

    #[test]
    fn test_top_sand_full_at_start() {
        let dims = Dimensions::default();
        let top = top_sand_path(&dims, 100, 100);
        let pts = top.points();
        assert_point(pts[0], 0.0, 0.0);
        assert_point(pts[1], 100.0, 150.0);
        assert_point(pts[2], 200.0, 0.0);
    }

    #[test]
    fn test_top_sand_collapses_at_end() {
        let dims = Dimensions::default();
        let top = top_sand_path(&dims, 0, 100);
        for p in top.points() {
            assert_point(*p, 100.0, 150.0);
        }
        assert!(!top.contains(Point::new(100.0, 149.0)));
    }

    #[test]
    fn test_bottom_sand_empty_at_start_full_at_end() {
        let dims = Dimensions::default();
        let empty = bottom_sand_path(&dims, 100, 100);
        assert_point(empty.points()[1], 0.0, 300.0);
        assert_point(empty.points()[2], 200.0, 300.0);
        assert!(!empty.contains(Point::new(100.0, 299.0)));

        let full = bottom_sand_path(&dims, 0, 100);
        assert_point(full.points()[1], 100.0, 150.0);
        assert_point(full.points()[2], 100.0, 150.0);
        assert!(full.contains(Point::new(100.0, 299.0)));
    }

    #[test]
    fn test_halfway_interpolation() {
        let dims = Dimensions::default();
        let top = top_sand_path(&dims, 50, 100);
        assert_point(top.points()[0], 50.0, 75.0);
        assert_point(top.points()[2], 150.0, 75.0);

        let bottom = bottom_sand_path(&dims, 50, 100);
        assert_point(bottom.points()[1], 50.0, 225.0);
        assert_point(bottom.points()[2], 150.0, 225.0);
    }

    #[test]
    fn test_zero_total_and_overflowing_time_are_clamped() {
        let dims = Dimensions::default();
        assert_eq!(top_sand_path(&dims, 0, 0), top_sand_path(&dims, 0, 1));
        assert_eq!(top_sand_path(&dims, 500, 100), top_sand_path(&dims, 100, 100));
    }

    #[test]
    fn test_frame_offsets_sand_into_body() {
        let dims = Dimensions::default();
        let frame = Frame::new(&dims, 1, 1);
        assert_point(frame.top.points()[0], 20.0, 10.0);
        assert!(frame.is_sand(120.0, 30.0));
        assert!(!frame.is_sand(120.0, 300.0));
        assert!(frame.is_glass(120.0, 300.0));
    }

    #[test]
    fn test_rotation_half_turn_swaps_bulbs() {
        let dims = Dimensions::default();
        let center = dims.center();
        let frame = Frame::new(&dims, 0, 10);
        let flipped = frame.bottom.rotate(center, 180.0);
        assert!(flipped.contains(Point::new(120.0, 30.0)));
        assert!(!flipped.contains(Point::new(120.0, 290.0)));
    }

    #[test]
    fn test_point_rotation() {
        let center = Point::new(0.0, 0.0);
        assert_point(Point::new(1.0, 0.0).rotated_about(center, 90.0), 0.0, 1.0);
        assert_point(Point::new(1.0, 0.0).rotated_about(center, 180.0), -1.0, 0.0);
    }

    #[test]
    fn test_move_to_resets_path() {
        let path = Path::new().move_to(1.0, 1.0).line_to(2.0, 2.0).move_to(5.0, 5.0);
        assert_eq!(path.points(), &[Point::new(5.0, 5.0)]);
        assert!(!path.contains(Point::new(5.0, 5.0)));
    }
}
