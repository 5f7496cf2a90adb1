//! Application root: wires the countdown to the panel and the hourglass.
//!
//! Key presses become [`Intent`]s, intents drive the countdown, and after every
//! change the countdown's states are republished to the renderers.
//!
//! `bubbletea-rs` builds the root model through `Model::init()`, which takes no
//! arguments, so the binary installs its [`Settings`] once with
//! [`install_settings`] before the program starts.

use crate::config::Settings;
use crate::countdown::{self, HourglassState, TickMsg};
use crate::help;
use crate::hourglass::{self, FrameMsg};
use crate::key::{Binding, KeyMap};
use crate::panel;
use bubbletea_rs::{quit, Cmd, KeyMsg, Model as BubbleTeaModel, Msg};
use crossterm::event::{KeyCode, KeyModifiers};
use lipgloss_extras::lipgloss;
use lipgloss_extras::prelude::*;
use once_cell::sync::OnceCell;
use tracing::{debug, info};

static SETTINGS: OnceCell<Settings> = OnceCell::new();

/// Installs the settings used by [`App::init`].
///
/// Only the first call takes effect; later calls hand their settings back.
pub fn install_settings(settings: Settings) -> Result<(), Settings> {
    SETTINGS.set(settings)
}

/// The installed settings, or the defaults if none were installed.
pub fn settings() -> Settings {
    SETTINGS.get().cloned().unwrap_or_default()
}

/// What the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Add one minute to the target time.
    AddMinute,
    /// Remove one minute from the target time.
    SubtractMinute,
    /// Add one second to the target time.
    AddSecond,
    /// Remove one second from the target time.
    SubtractSecond,
    /// Start the countdown.
    Start,
    /// Switch between short and full help.
    ToggleHelp,
    /// Leave the application.
    Quit,
}

/// Key bindings of the application.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    /// Add a minute.
    pub add_minute: Binding,
    /// Remove a minute.
    pub subtract_minute: Binding,
    /// Add a second.
    pub add_second: Binding,
    /// Remove a second.
    pub subtract_second: Binding,
    /// Start the countdown.
    pub start: Binding,
    /// Toggle full help.
    pub help: Binding,
    /// Quit.
    pub quit: Binding,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            add_minute: Binding::new(vec![KeyCode::Up.into(), KeyCode::Char('k').into()])
                .with_help("↑/k", "add minute"),
            subtract_minute: Binding::new(vec![KeyCode::Down.into(), KeyCode::Char('j').into()])
                .with_help("↓/j", "subtract minute"),
            add_second: Binding::new(vec![KeyCode::Right.into(), KeyCode::Char('l').into()])
                .with_help("→/l", "add second"),
            subtract_second: Binding::new(vec![KeyCode::Left.into(), KeyCode::Char('h').into()])
                .with_help("←/h", "subtract second"),
            start: Binding::new(vec![KeyCode::Enter.into(), KeyCode::Char(' ').into()])
                .with_help("enter", "start"),
            help: Binding::new(vec![KeyCode::Char('?').into()]).with_help("?", "more"),
            quit: Binding::new(vec![
                KeyCode::Char('q').into(),
                KeyCode::Esc.into(),
                (KeyCode::Char('c'), KeyModifiers::CONTROL).into(),
            ])
            .with_help("q", "quit"),
        }
    }
}

impl KeyBindings {
    /// Maps a key press to an intent.
    pub fn intent_for(&self, msg: &KeyMsg) -> Option<Intent> {
        [
            (&self.quit, Intent::Quit),
            (&self.add_minute, Intent::AddMinute),
            (&self.subtract_minute, Intent::SubtractMinute),
            (&self.add_second, Intent::AddSecond),
            (&self.subtract_second, Intent::SubtractSecond),
            (&self.start, Intent::Start),
            (&self.help, Intent::ToggleHelp),
        ]
        .into_iter()
        .find(|(binding, _)| binding.matches(msg))
        .map(|(_, intent)| intent)
    }

    fn set_adjustments_enabled(&mut self, enabled: bool) {
        self.add_minute.set_enabled(enabled);
        self.subtract_minute.set_enabled(enabled);
        self.add_second.set_enabled(enabled);
        self.subtract_second.set_enabled(enabled);
        self.start.set_enabled(enabled);
    }
}

impl KeyMap for KeyBindings {
    fn short_help(&self) -> Vec<&Binding> {
        vec![&self.add_minute, &self.add_second, &self.start, &self.help, &self.quit]
    }

    fn full_help(&self) -> Vec<Vec<&Binding>> {
        vec![
            vec![&self.add_minute, &self.subtract_minute],
            vec![&self.add_second, &self.subtract_second],
            vec![&self.start, &self.help, &self.quit],
        ]
    }
}

/// The root model.
#[derive(Debug, Clone)]
pub struct App {
    countdown: countdown::Model,
    hourglass: hourglass::Model,
    panel: panel::Model,
    help: help::Model,
    keys: KeyBindings,
}

impl App {
    /// Builds the application from validated settings.
    pub fn new(settings: &Settings) -> Self {
        let countdown = countdown::new_with_interval(settings.tick).with_time(settings.initial_ms);
        let mut panel = panel::Model::new();
        panel.set_state(countdown.panel_state().clone());

        Self {
            countdown,
            hourglass: hourglass::new(settings.width, settings.height),
            panel,
            help: help::Model::new(),
            keys: KeyBindings::default(),
        }
    }

    /// The countdown view model.
    pub fn countdown(&self) -> &countdown::Model {
        &self.countdown
    }

    /// The hourglass renderer.
    pub fn hourglass(&self) -> &hourglass::Model {
        &self.hourglass
    }

    /// The panel renderer.
    pub fn panel(&self) -> &panel::Model {
        &self.panel
    }

    /// The key bindings.
    pub fn keys(&self) -> &KeyBindings {
        &self.keys
    }

    /// Whether the full help is shown.
    pub fn showing_full_help(&self) -> bool {
        self.help.show_all
    }

    /// Applies an intent and republishes state.
    pub fn dispatch(&mut self, intent: Intent) -> Option<Cmd> {
        debug!(?intent, "dispatch");
        let cmd = match intent {
            Intent::AddMinute => {
                self.countdown.add_minute();
                None
            }
            Intent::SubtractMinute => {
                self.countdown.subtract_minute();
                None
            }
            Intent::AddSecond => {
                self.countdown.add_seconds();
                None
            }
            Intent::SubtractSecond => {
                self.countdown.subtract_seconds();
                None
            }
            Intent::Start => self.countdown.start(),
            Intent::ToggleHelp => {
                self.help.show_all = !self.help.show_all;
                None
            }
            Intent::Quit => {
                info!("quit requested");
                return Some(quit());
            }
        };
        let flip = self.sync();
        cmd.or(flip)
    }

    /// Copies the countdown's states into the renderers. Returns the flip
    /// animation command when the countdown has just completed.
    fn sync(&mut self) -> Option<Cmd> {
        self.panel.set_state(self.countdown.panel_state().clone());
        self.panel.set_enabled(self.countdown.is_idle());
        self.keys.set_adjustments_enabled(self.countdown.is_idle());
        self.hourglass.set_state(self.countdown.hourglass_state().clone())
    }

    fn status(&self) -> &'static str {
        match self.countdown.hourglass_state() {
            HourglassState::Running { .. } => "running",
            HourglassState::Idle { rotate: true, .. } => "done",
            HourglassState::Idle { .. } => "ready",
        }
    }

    /// Handles a message: key presses, countdown ticks and animation frames.
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(key_msg) = msg.downcast_ref::<KeyMsg>() {
            return self
                .keys
                .intent_for(key_msg)
                .and_then(|intent| self.dispatch(intent));
        }

        if msg.downcast_ref::<TickMsg>().is_some() {
            let next_tick = self.countdown.update(msg);
            let flip = self.sync();
            return next_tick.or(flip);
        }

        if msg.downcast_ref::<FrameMsg>().is_some() {
            return self.hourglass.update(msg);
        }

        None
    }

    /// Renders panel, hourglass, status and help stacked vertically.
    pub fn view(&self) -> String {
        let status = Style::new()
            .foreground(Color::from("241"))
            .inline(true)
            .render(self.status());
        let panel = self.panel.view();
        let hourglass = self.hourglass.view();
        let help = self.help.view(&self.keys);

        lipgloss::join_vertical(
            lipgloss::CENTER,
            &[
                panel.as_str(),
                "",
                hourglass.as_str(),
                "",
                status.as_str(),
                help.as_str(),
            ],
        )
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}

impl BubbleTeaModel for App {
    fn init() -> (Self, Option<Cmd>) {
        let settings = settings();
        info!(?settings, "starting hourglass");
        (Self::new(&settings), None)
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        self.update(msg)
    }

    fn view(&self) -> String {
        self.view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::countdown::ONE_HOUR_MS;

    fn press(code: KeyCode) -> Msg {
        Box::new(KeyMsg {
            key: code,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn app_with(initial_ms: u64) -> App {
        App::new(&Settings {
            initial_ms,
            ..Settings::default()
        })
    }

    fn finish(app: &mut App) -> Option<Cmd> {
        let mut last = None;
        while app.countdown.is_running() {
            app.countdown.tick();
            last = app.sync();
        }
        last
    }

    #[test]
    fn test_intents_from_keys() {
        let keys = KeyBindings::default();
        let intent = |code| {
            keys.intent_for(&KeyMsg {
                key: code,
                modifiers: KeyModifiers::NONE,
            })
        };
        assert_eq!(intent(KeyCode::Up), Some(Intent::AddMinute));
        assert_eq!(intent(KeyCode::Char('j')), Some(Intent::SubtractMinute));
        assert_eq!(intent(KeyCode::Right), Some(Intent::AddSecond));
        assert_eq!(intent(KeyCode::Char('h')), Some(Intent::SubtractSecond));
        assert_eq!(intent(KeyCode::Enter), Some(Intent::Start));
        assert_eq!(intent(KeyCode::Char('?')), Some(Intent::ToggleHelp));
        assert_eq!(intent(KeyCode::Esc), Some(Intent::Quit));
        assert_eq!(intent(KeyCode::Char('x')), None);
        assert_eq!(
            keys.intent_for(&KeyMsg {
                key: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
            }),
            Some(Intent::Quit)
        );
    }

    #[test]
    fn test_keys_adjust_panel() {
        let mut app = App::default();
        assert!(app.update(press(KeyCode::Up)).is_none());
        assert!(app.update(press(KeyCode::Right)).is_none());
        assert!(app.update(press(KeyCode::Right)).is_none());
        assert_eq!(app.countdown().time_ms(), 62_000);
        assert_eq!(app.panel().state().minutes, "01");
        assert_eq!(app.panel().state().seconds, "02");
    }

    #[test]
    fn test_left_from_zero_wraps() {
        let mut app = App::default();
        app.update(press(KeyCode::Left));
        assert_eq!(app.countdown().time_ms(), ONE_HOUR_MS - 1_000);
        assert_eq!(app.panel().state().minutes, "59");
    }

    #[test]
    fn test_start_at_zero_does_nothing() {
        let mut app = App::default();
        assert!(app.update(press(KeyCode::Enter)).is_none());
        assert!(app.countdown().is_idle());
        assert!(app.panel().enabled());
    }

    #[test]
    fn test_start_locks_adjustments() {
        let mut app = app_with(2_000);
        assert!(app.update(press(KeyCode::Enter)).is_some());
        assert!(app.countdown().is_running());
        assert!(!app.panel().enabled());
        assert!(!app.keys().add_minute.enabled());

        app.update(press(KeyCode::Up));
        assert_eq!(app.countdown().time_ms(), 2_000);
        assert_eq!(
            app.hourglass().state(),
            app.countdown().hourglass_state()
        );
    }

    #[test]
    fn test_completion_flips_and_unlocks() {
        let mut app = app_with(1_000);
        let _ = app.dispatch(Intent::Start);
        let flip = finish(&mut app);

        assert!(flip.is_some());
        assert!(app.hourglass().is_animating());
        assert!(app.countdown().is_idle());
        assert_eq!(app.countdown().time_ms(), 0);
        assert!(app.panel().enabled());
        assert!(app.keys().add_minute.enabled());
        assert_eq!(app.status(), "done");
    }

    #[test]
    fn test_quit_returns_command() {
        let mut app = App::default();
        assert!(app.update(press(KeyCode::Char('q'))).is_some());
    }

    #[test]
    fn test_quit_works_while_running() {
        let mut app = app_with(1_000);
        let _ = app.dispatch(Intent::Start);
        assert!(app.update(press(KeyCode::Char('q'))).is_some());
    }

    #[test]
    fn test_toggle_help() {
        let mut app = App::default();
        assert!(!app.showing_full_help());
        app.update(press(KeyCode::Char('?')));
        assert!(app.showing_full_help());
        let view = lipgloss::strip_ansi(&app.view());
        assert!(view.contains("subtract second"));
    }

    #[test]
    fn test_view_contains_panel_and_status() {
        let app = app_with(90_000);
        let view = lipgloss::strip_ansi(&app.view());
        assert!(view.contains("01 : 30"));
        assert!(view.contains("ready"));
        assert!(view.contains("enter start"));
    }

    #[test]
    fn test_unrelated_messages_are_ignored() {
        let mut app = App::default();
        assert!(app.update(Box::new(42_u32)).is_none());
    }
}
