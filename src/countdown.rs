//! Countdown view model for the hourglass timer.
//!
//! This module owns the single millisecond counter behind the application and
//! derives the two states the renderers observe:
//!
//! - [`HourglassState`]: either `Idle` (the target time can be edited) or
//!   `Running` (ticking down at a fixed cadence).
//! - [`PanelState`]: the two-digit minute and second strings shown in the
//!   control panel.
//!
//! Adjustments wrap the counter into one hour, and are only effective while the
//! hourglass is idle.
//!
//! # Basic Usage
//!
//! ```rust
//! use hourglass_timer::countdown::new;
//!
//! let mut countdown = new();
//! countdown.add_minute();
//! countdown.add_seconds();
//! assert_eq!(countdown.time_ms(), 61_000);
//! assert_eq!(countdown.panel_state().minutes, "01");
//! assert_eq!(countdown.panel_state().seconds, "01");
//!
//! // Wraps around the hour
//! countdown.subtract_minute();
//! countdown.subtract_minute();
//! assert_eq!(countdown.time_ms(), 3_600_000 - 59_000);
//! ```
//!
//! # bubbletea-rs Integration
//!
//! ```rust
//! use bubbletea_rs::{Cmd, Model as BubbleTeaModel, Msg};
//! use hourglass_timer::countdown::{new, Model};
//!
//! struct MyApp {
//!     countdown: Model,
//! }
//!
//! impl BubbleTeaModel for MyApp {
//!     fn init() -> (Self, Option<Cmd>) {
//!         let mut countdown = new().with_time(5_000);
//!         let cmd = countdown.start();
//!         (Self { countdown }, cmd)
//!     }
//!
//!     fn update(&mut self, msg: Msg) -> Option<Cmd> {
//!         // Tick messages keep the countdown going until it reaches zero
//!         self.countdown.update(msg)
//!     }
//!
//!     fn view(&self) -> String {
//!         let panel = self.countdown.panel_state();
//!         format!("{}:{}", panel.minutes, panel.seconds)
//!     }
//! }
//! ```

use bubbletea_rs::{tick as bubbletea_tick, Cmd, Model as BubbleTeaModel, Msg};
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;
use tracing::{debug, info};

/// One hour in milliseconds. The counter always stays below this value.
pub const ONE_HOUR_MS: u64 = 60 * 60 * 1000;

/// Milliseconds added or removed by a minute adjustment.
pub const MINUTE_MS: i64 = 60 * 1000;

/// Milliseconds added or removed by a second adjustment.
pub const SECOND_MS: i64 = 1000;

/// Default cadence of countdown ticks.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(100);

/// Rotation applied to the hourglass when a countdown completes.
pub const ROTATION_DEGREES: f64 = 180.0;

const DEFAULT_TIME_VALUE: &str = "00";

static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// Wraps a signed millisecond value into `[0, ONE_HOUR_MS)`.
///
/// Negative values wrap from the top of the hour, so `-1000` becomes
/// `3_599_000`. Exact multiples of an hour, positive or negative, become zero.
///
/// # Examples
///
/// ```rust
/// use hourglass_timer::countdown::{wrap_to_hour, ONE_HOUR_MS};
///
/// assert_eq!(wrap_to_hour(61_000), 61_000);
/// assert_eq!(wrap_to_hour(-1_000), ONE_HOUR_MS - 1_000);
/// assert_eq!(wrap_to_hour(ONE_HOUR_MS as i64 + 5), 5);
/// assert_eq!(wrap_to_hour(-(ONE_HOUR_MS as i64)), 0);
/// ```
pub fn wrap_to_hour(value: i64) -> u64 {
    value.rem_euclid(ONE_HOUR_MS as i64) as u64
}

/// The observable state of the hourglass.
///
/// Exactly one variant is active at a time. User adjustments and `start` are
/// only honoured while the state is [`HourglassState::Idle`].
#[derive(Debug, Clone, PartialEq)]
pub enum HourglassState {
    /// The timer is waiting for input.
    Idle {
        /// Remaining time used to draw the sand. Defaults to 1 so a fresh
        /// hourglass renders with its top half full.
        time_ms: u64,
        /// Total duration of the last countdown, or 1 before any run.
        total_ms: u64,
        /// Set once a countdown has completed; asks the renderer to flip.
        rotate: bool,
        /// Angle the renderer rotates to when `rotate` is set.
        rotation_degrees: f64,
    },
    /// The timer is counting down.
    Running {
        /// Milliseconds left in the countdown.
        remaining_ms: u64,
        /// Duration the countdown started from.
        total_ms: u64,
    },
}

impl Default for HourglassState {
    fn default() -> Self {
        HourglassState::Idle {
            time_ms: 1,
            total_ms: 1,
            rotate: false,
            rotation_degrees: ROTATION_DEGREES,
        }
    }
}

impl HourglassState {
    /// Returns `true` for the `Idle` variant.
    pub fn is_idle(&self) -> bool {
        matches!(self, HourglassState::Idle { .. })
    }

    /// Time still to run, as drawn by the hourglass.
    pub fn time_ms(&self) -> u64 {
        match self {
            HourglassState::Idle { time_ms, .. } => *time_ms,
            HourglassState::Running { remaining_ms, .. } => *remaining_ms,
        }
    }

    /// Total duration the sand is proportioned against.
    pub fn total_ms(&self) -> u64 {
        match self {
            HourglassState::Idle { total_ms, .. } | HourglassState::Running { total_ms, .. } => {
                *total_ms
            }
        }
    }

    /// Rotation the renderer should settle on, or `None` when upright.
    pub fn rotation(&self) -> Option<f64> {
        match self {
            HourglassState::Idle {
                rotate: true,
                rotation_degrees,
                ..
            } => Some(*rotation_degrees),
            _ => None,
        }
    }
}

/// Minute and second strings shown by the control panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelState {
    /// Two-digit minute of the hour.
    pub minutes: String,
    /// Two-digit second of the minute.
    pub seconds: String,
}

impl Default for PanelState {
    fn default() -> Self {
        Self {
            minutes: DEFAULT_TIME_VALUE.to_string(),
            seconds: DEFAULT_TIME_VALUE.to_string(),
        }
    }
}

impl PanelState {
    /// Formats a millisecond value as `mm` / `ss`.
    ///
    /// ```rust
    /// use hourglass_timer::countdown::PanelState;
    ///
    /// let panel = PanelState::from_millis(125_900);
    /// assert_eq!(panel.minutes, "02");
    /// assert_eq!(panel.seconds, "05");
    /// ```
    pub fn from_millis(ms: u64) -> Self {
        Self {
            minutes: format!("{:02}", (ms / 60_000) % 60),
            seconds: format!("{:02}", (ms / 1000) % 60),
        }
    }
}

/// Message that advances a running countdown by one interval.
///
/// Tick messages are produced by the countdown itself. A tick is ignored when
/// it targets another countdown, when it belongs to an earlier run, or when the
/// countdown is idle.
#[derive(Debug, Clone)]
pub struct TickMsg {
    /// Identifier of the countdown that scheduled this tick.
    pub id: i64,
    tag: i64,
}

/// The countdown view model.
///
/// Holds the editable target time and drives the hourglass from `Idle` to
/// `Running` and back.
#[derive(Debug, Clone)]
pub struct Model {
    time_ms: u64,
    interval: Duration,
    hourglass: HourglassState,
    panel: PanelState,
    ticks_left: u64,
    id: i64,
    tag: i64,
}

/// Creates an idle countdown at zero with the default 100 ms cadence.
pub fn new() -> Model {
    new_with_interval(DEFAULT_INTERVAL)
}

/// Creates an idle countdown at zero that ticks every `interval`.
///
/// A zero interval is raised to one millisecond.
///
/// ```rust
/// use hourglass_timer::countdown::new_with_interval;
/// use std::time::Duration;
///
/// let countdown = new_with_interval(Duration::from_millis(250));
/// assert_eq!(countdown.interval(), Duration::from_millis(250));
/// assert!(countdown.is_idle());
/// ```
pub fn new_with_interval(interval: Duration) -> Model {
    Model {
        time_ms: 0,
        interval: interval.max(Duration::from_millis(1)),
        hourglass: HourglassState::default(),
        panel: PanelState::default(),
        ticks_left: 0,
        id: next_id(),
        tag: 0,
    }
}

impl Model {
    /// Sets the target time, wrapped into one hour, and republishes the panel.
    pub fn with_time(mut self, ms: u64) -> Self {
        self.time_ms = ms % ONE_HOUR_MS;
        self.post_panel_state(self.time_ms);
        self
    }

    /// Unique identifier used to route tick messages.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// The target time in milliseconds.
    ///
    /// While running this is still the time the countdown started from; it is
    /// reset to zero when the countdown completes.
    pub fn time_ms(&self) -> u64 {
        self.time_ms
    }

    /// Cadence of countdown ticks.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Current hourglass state.
    pub fn hourglass_state(&self) -> &HourglassState {
        &self.hourglass
    }

    /// Current panel state.
    pub fn panel_state(&self) -> &PanelState {
        &self.panel
    }

    /// Whether adjustments and start are currently accepted.
    pub fn is_idle(&self) -> bool {
        self.hourglass.is_idle()
    }

    /// Whether a countdown is in progress.
    pub fn is_running(&self) -> bool {
        !self.is_idle()
    }

    /// Adds one minute. Returns `false` if the countdown is running.
    pub fn add_minute(&mut self) -> bool {
        self.adjust(MINUTE_MS)
    }

    /// Removes one minute. Returns `false` if the countdown is running.
    pub fn subtract_minute(&mut self) -> bool {
        self.adjust(-MINUTE_MS)
    }

    /// Adds one second. Returns `false` if the countdown is running.
    pub fn add_seconds(&mut self) -> bool {
        self.adjust(SECOND_MS)
    }

    /// Removes one second. Returns `false` if the countdown is running.
    pub fn subtract_seconds(&mut self) -> bool {
        self.adjust(-SECOND_MS)
    }

    fn adjust(&mut self, delta: i64) -> bool {
        if !self.is_idle() {
            debug!(id = self.id, delta, "adjustment ignored while running");
            return false;
        }
        self.time_ms = wrap_to_hour(self.time_ms as i64 + delta);
        self.post_panel_state(self.time_ms);
        debug!(id = self.id, time_ms = self.time_ms, "target time adjusted");
        true
    }

    /// Starts the countdown.
    ///
    /// Does nothing and returns `None` when the target time is zero or a
    /// countdown is already running. Otherwise the hourglass switches to
    /// `Running` immediately and the returned command delivers the first tick.
    ///
    /// ```rust
    /// use hourglass_timer::countdown::new;
    ///
    /// let mut countdown = new();
    /// assert!(countdown.start().is_none());
    ///
    /// countdown.add_seconds();
    /// assert!(countdown.start().is_some());
    /// assert!(countdown.is_running());
    /// ```
    pub fn start(&mut self) -> Option<Cmd> {
        if self.time_ms == 0 || !self.is_idle() {
            debug!(id = self.id, time_ms = self.time_ms, "start ignored");
            return None;
        }

        let step = self.step_ms();
        self.ticks_left = self.time_ms.div_ceil(step);
        let total_ms = self.ticks_left * step;
        self.tag += 1;
        self.hourglass = HourglassState::Running {
            remaining_ms: total_ms,
            total_ms,
        };
        self.post_panel_state(total_ms);
        info!(id = self.id, total_ms, ticks = self.ticks_left, "countdown started");

        Some(self.tick_cmd())
    }

    /// Advances a running countdown by one interval.
    ///
    /// Returns `true` when this tick completed the countdown. Has no effect
    /// while idle.
    ///
    /// ```rust
    /// use hourglass_timer::countdown::new;
    ///
    /// let mut countdown = new().with_time(200);
    /// let _ = countdown.start();
    /// assert!(!countdown.tick());
    /// assert!(countdown.tick());
    /// assert_eq!(countdown.time_ms(), 0);
    /// assert_eq!(countdown.hourglass_state().rotation(), Some(180.0));
    /// ```
    pub fn tick(&mut self) -> bool {
        let total_ms = match self.hourglass {
            HourglassState::Running { total_ms, .. } => total_ms,
            HourglassState::Idle { .. } => return false,
        };

        self.ticks_left = self.ticks_left.saturating_sub(1);
        if self.ticks_left == 0 {
            self.finish(total_ms);
            return true;
        }

        let remaining_ms = self.ticks_left * self.step_ms();
        self.hourglass = HourglassState::Running {
            remaining_ms,
            total_ms,
        };
        self.post_panel_state(remaining_ms);
        false
    }

    fn finish(&mut self, total_ms: u64) {
        self.time_ms = 0;
        self.hourglass = HourglassState::Idle {
            time_ms: 1,
            total_ms,
            rotate: true,
            rotation_degrees: ROTATION_DEGREES,
        };
        self.post_panel_state(0);
        info!(id = self.id, total_ms, "countdown finished");
    }

    /// Handles tick messages addressed to this countdown.
    ///
    /// Returns the command for the next tick, or `None` once the countdown has
    /// finished or the message was not for this countdown.
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        let tick_msg = msg.downcast_ref::<TickMsg>()?;

        if tick_msg.id != 0 && tick_msg.id != self.id {
            return None;
        }

        // A tag from an earlier run would make the countdown tick twice as fast.
        if !self.is_running() || tick_msg.tag != self.tag {
            return None;
        }

        if self.tick() {
            return None;
        }
        Some(self.tick_cmd())
    }

    fn step_ms(&self) -> u64 {
        (self.interval.as_millis() as u64).max(1)
    }

    fn tick_cmd(&self) -> Cmd {
        let id = self.id;
        let tag = self.tag;
        bubbletea_tick(self.interval, move |_| Box::new(TickMsg { id, tag }) as Msg)
    }

    fn post_panel_state(&mut self, ms: u64) {
        self.panel = PanelState::from_millis(ms);
    }
}

impl Default for Model {
    fn default() -> Self {
        new()
    }
}

impl BubbleTeaModel for Model {
    fn init() -> (Self, Option<Cmd>) {
        (new(), None)
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        self.update(msg)
    }

    fn view(&self) -> String {
        format!("{}:{}", self.panel.minutes, self.panel.seconds)
    }
}
