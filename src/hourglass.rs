//! Hourglass renderer for Bubble Tea applications.
//!
//! The renderer rasterizes the shapes from [`crate::geometry`] into a grid of
//! terminal cells. Each cell samples the drawing at its centre: sand cells use
//! the sand glyph, glass cells the glass glyph, everything else a space.
//!
//! When the countdown completes the hourglass receives an idle state with the
//! rotate flag set and plays a one-shot flip: the drawing turns to the
//! requested angle over half a second with fast-out-slow-in easing, driven by
//! its own [`FrameMsg`] ticks.
//!
//! ```rust
//! use hourglass_timer::countdown::HourglassState;
//! use hourglass_timer::hourglass::new;
//!
//! let mut hourglass = new(12, 8);
//! let cmd = hourglass.set_state(HourglassState::Running {
//!     remaining_ms: 500,
//!     total_ms: 1_000,
//! });
//! assert!(cmd.is_none());
//!
//! let view = hourglass.view();
//! assert_eq!(view.lines().count(), 8);
//! ```

use crate::countdown::HourglassState;
use crate::geometry::{Dimensions, Frame, Point};
use bubbletea_rs::{tick as bubbletea_tick, Cmd, Msg};
use lipgloss_extras::lipgloss;
use lipgloss_extras::prelude::*;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;
use tracing::debug;

/// Default number of terminal columns used for the hourglass.
pub const DEFAULT_WIDTH: usize = 24;

/// Default number of terminal rows used for the hourglass.
pub const DEFAULT_HEIGHT: usize = 16;

/// Length of the flip animation.
pub const FLIP_DURATION: Duration = Duration::from_millis(500);

const FPS: u32 = 30;

static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// Message that advances the flip animation by one frame.
#[derive(Debug, Clone)]
pub struct FrameMsg {
    id: i64,
    tag: i64,
}

/// Cubic bézier easing curve through `(0, 0)` and `(1, 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
}

/// Easing that starts quickly and settles gently.
pub const FAST_OUT_SLOW_IN: CubicBezier = CubicBezier::new(0.4, 0.0, 0.2, 1.0);

impl CubicBezier {
    /// Creates a curve from its two control points.
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    fn sample(a: f64, b: f64, t: f64) -> f64 {
        let u = 1.0 - t;
        3.0 * u * u * t * a + 3.0 * u * t * t * b + t * t * t
    }

    /// Maps linear progress in `[0, 1]` to eased progress.
    ///
    /// ```rust
    /// use hourglass_timer::hourglass::FAST_OUT_SLOW_IN;
    ///
    /// assert_eq!(FAST_OUT_SLOW_IN.transform(0.0), 0.0);
    /// assert_eq!(FAST_OUT_SLOW_IN.transform(1.0), 1.0);
    /// assert!(FAST_OUT_SLOW_IN.transform(0.5) > 0.5);
    /// ```
    pub fn transform(&self, fraction: f64) -> f64 {
        if fraction <= 0.0 {
            return 0.0;
        }
        if fraction >= 1.0 {
            return 1.0;
        }

        // x(t) is monotonic for control points inside the unit square.
        let (mut lo, mut hi) = (0.0, 1.0);
        let mut t = fraction;
        for _ in 0..32 {
            let x = Self::sample(self.x1, self.x2, t);
            if (x - fraction).abs() < 1e-7 {
                break;
            }
            if x < fraction {
                lo = t;
            } else {
                hi = t;
            }
            t = (lo + hi) / 2.0;
        }
        Self::sample(self.y1, self.y2, t)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Flip {
    frame: u32,
    frames: u32,
    target: f64,
}

/// Styles applied to the rasterized hourglass.
#[derive(Debug, Clone)]
pub struct Styles {
    /// Style of glass cells.
    pub glass: Style,
    /// Style of sand cells.
    pub sand: Style,
}

impl Default for Styles {
    fn default() -> Self {
        use lipgloss::AdaptiveColor;

        Self {
            glass: Style::new().foreground(AdaptiveColor {
                Light: "#7D56F4",
                Dark: "#5A3FC0",
            }),
            sand: Style::new().foreground(AdaptiveColor {
                Light: "#D9A441",
                Dark: "#F2C14E",
            }),
        }
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Cell {
    Empty,
    Glass,
    Sand,
}

/// The hourglass renderer.
#[derive(Debug, Clone)]
pub struct Model {
    /// Columns of the rendered hourglass.
    pub width: usize,
    /// Rows of the rendered hourglass.
    pub height: usize,
    /// Glyph for glass cells.
    pub glass_char: char,
    /// Glyph for sand cells.
    pub sand_char: char,
    /// Colours for glass and sand.
    pub styles: Styles,
    dimensions: Dimensions,
    state: HourglassState,
    angle: f64,
    flip: Option<Flip>,
    id: i64,
    tag: i64,
}

/// Creates an upright hourglass rendered into `width` × `height` cells.
pub fn new(width: usize, height: usize) -> Model {
    Model {
        width,
        height,
        glass_char: '░',
        sand_char: '█',
        styles: Styles::default(),
        dimensions: Dimensions::default(),
        state: HourglassState::default(),
        angle: 0.0,
        flip: None,
        id: next_id(),
        tag: 0,
    }
}

impl Default for Model {
    fn default() -> Self {
        new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

impl Model {
    /// The state currently drawn.
    pub fn state(&self) -> &HourglassState {
        &self.state
    }

    /// Current rotation in degrees.
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Whether the flip animation is playing.
    pub fn is_animating(&self) -> bool {
        self.flip.is_some()
    }

    /// Publishes a new state to the renderer.
    ///
    /// Returns the first animation frame when the state asks for a flip that
    /// is not already showing. An upright state cancels any running flip.
    pub fn set_state(&mut self, state: HourglassState) -> Option<Cmd> {
        if state == self.state {
            return None;
        }

        let was_rotated = self.state.rotation().is_some();
        self.state = state;

        match self.state.rotation() {
            Some(target) if !was_rotated => {
                self.tag += 1;
                self.angle = 0.0;
                self.flip = Some(Flip {
                    frame: 0,
                    frames: flip_frames(),
                    target,
                });
                debug!(id = self.id, target, "flip started");
                Some(self.next_frame())
            }
            Some(_) => None,
            None => {
                if self.flip.take().is_some() {
                    self.tag += 1;
                }
                self.angle = 0.0;
                None
            }
        }
    }

    /// Handles frame messages for this hourglass.
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        let frame_msg = msg.downcast_ref::<FrameMsg>()?;
        if frame_msg.id != self.id || frame_msg.tag != self.tag {
            return None;
        }

        let flip = self.flip.as_mut()?;
        flip.frame += 1;
        let linear = f64::from(flip.frame) / f64::from(flip.frames);
        self.angle = flip.target * FAST_OUT_SLOW_IN.transform(linear);

        if flip.frame >= flip.frames {
            self.angle = flip.target;
            self.flip = None;
            return None;
        }
        Some(self.next_frame())
    }

    fn next_frame(&self) -> Cmd {
        let id = self.id;
        let tag = self.tag;
        bubbletea_tick(frame_interval(), move |_| Box::new(FrameMsg { id, tag }) as Msg)
    }

    fn cells(&self) -> Vec<Vec<Cell>> {
        let frame = Frame::new(
            &self.dimensions,
            self.state.time_ms(),
            self.state.total_ms(),
        );
        let center = self.dimensions.center();
        let cell_w = self.dimensions.body_width / self.width as f64;
        let cell_h = self.dimensions.body_height / self.height as f64;

        (0..self.height)
            .map(|row| {
                (0..self.width)
                    .map(|col| {
                        let sample = Point::new(
                            (col as f64 + 0.5) * cell_w,
                            (row as f64 + 0.5) * cell_h,
                        );
                        // Rotating the sample backwards is the same as rotating the drawing forwards.
                        let p = sample.rotated_about(center, -self.angle);
                        if frame.is_sand(p.x, p.y) {
                            Cell::Sand
                        } else if frame.is_glass(p.x, p.y) {
                            Cell::Glass
                        } else {
                            Cell::Empty
                        }
                    })
                    .collect()
            })
            .collect()
    }

    fn render_run(&self, cell: Cell, len: usize) -> String {
        match cell {
            Cell::Empty => " ".repeat(len),
            Cell::Glass => self
                .styles
                .glass
                .clone()
                .inline(true)
                .render(&self.glass_char.to_string().repeat(len)),
            Cell::Sand => self
                .styles
                .sand
                .clone()
                .inline(true)
                .render(&self.sand_char.to_string().repeat(len)),
        }
    }

    /// Renders the hourglass, one line per row.
    pub fn view(&self) -> String {
        if self.width == 0 || self.height == 0 {
            return String::new();
        }

        let mut lines = Vec::with_capacity(self.height);
        for row in self.cells() {
            let mut line = String::new();
            let mut run_start = 0;
            for i in 1..=row.len() {
                if i == row.len() || row[i] != row[run_start] {
                    line.push_str(&self.render_run(row[run_start], i - run_start));
                    run_start = i;
                }
            }
            lines.push(line);
        }
        lines.join("\n")
    }
}

fn frame_interval() -> Duration {
    Duration::from_secs(1) / FPS
}

fn flip_frames() -> u32 {
    (FLIP_DURATION.as_millis() / frame_interval().as_millis()).max(1) as u32
}
