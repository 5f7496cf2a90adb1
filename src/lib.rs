#![warn(missing_docs)]

//! # hourglass-timer
//!
//! A countdown timer for the terminal, drawn as an animated hourglass, built on
//! [bubbletea-rs](https://github.com/joshka/bubbletea-rs) and styled with lipgloss.
//!
//! ## Overview
//!
//! The crate is split the way an Elm-architecture application usually is:
//!
//! - **State**: [`countdown`] owns the single millisecond counter and derives
//!   the hourglass state (`Idle` / `Running`) and the panel digits.
//! - **Presentation**: [`geometry`] computes the glass and sand shapes,
//!   [`hourglass`] rasterizes them into terminal cells and plays the flip
//!   animation, [`panel`] shows `mm : ss`, and [`help`] lists the key bindings
//!   from [`key`].
//! - **Composition**: [`app`] maps key presses to intents and republishes
//!   state to the renderers after every change.
//!
//! Data flows one way: renderers read state and emit intents, the countdown
//! mutates its counter and publishes new state.
//!
//! ## Quick Start
//!
//! ```rust
//! use hourglass_timer::prelude::*;
//!
//! let mut app = App::default();
//! app.dispatch(Intent::AddMinute);
//! app.dispatch(Intent::AddSecond);
//! assert_eq!(app.countdown().time_ms(), 61_000);
//!
//! // Starting returns the command that delivers the first tick
//! assert!(app.dispatch(Intent::Start).is_some());
//! assert!(app.countdown().is_running());
//! ```
//!
//! Running it as a program:
//!
//! ```rust,no_run
//! use bubbletea_rs::Program;
//! use hourglass_timer::app::App;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let program = Program::<App>::builder().alt_screen(true).build()?;
//!     program.run().await?;
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod config;
pub mod countdown;
pub mod geometry;
pub mod help;
pub mod hourglass;
pub mod key;
pub mod panel;

pub use app::{App, Intent, KeyBindings};
pub use config::{Cli, ConfigError, Settings};
pub use countdown::{HourglassState, Model as Countdown, PanelState, TickMsg as CountdownTickMsg};
pub use hourglass::{FrameMsg as HourglassFrameMsg, Model as Hourglass};
pub use panel::Model as Panel;

/// Common imports.
pub mod prelude {
    pub use crate::app::{App, Intent, KeyBindings};
    pub use crate::config::{ConfigError, Settings};
    pub use crate::countdown::{
        new as countdown_new, new_with_interval as countdown_new_with_interval, HourglassState,
        Model as Countdown, PanelState, TickMsg as CountdownTickMsg,
    };
    pub use crate::help::Model as HelpModel;
    pub use crate::hourglass::{new as hourglass_new, Model as Hourglass};
    pub use crate::key::{Binding, Help as KeyHelp, KeyMap, KeyPress};
    pub use crate::panel::Model as Panel;
}
