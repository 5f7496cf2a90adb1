//! Type-safe key bindings.
//!
//! A [`Binding`] pairs one or more key presses with the help text shown for
//! them. Components expose their bindings through the [`KeyMap`] trait so the
//! help view can render them.
//!
//! ```rust
//! use bubbletea_rs::KeyMsg;
//! use crossterm::event::{KeyCode, KeyModifiers};
//! use hourglass_timer::key::Binding;
//!
//! let quit = Binding::new(vec![
//!     KeyCode::Char('q').into(),
//!     (KeyCode::Char('c'), KeyModifiers::CONTROL).into(),
//! ])
//! .with_help("q", "quit");
//!
//! let msg = KeyMsg {
//!     key: KeyCode::Char('c'),
//!     modifiers: KeyModifiers::CONTROL,
//! };
//! assert!(quit.matches(&msg));
//! ```

use bubbletea_rs::KeyMsg;
use crossterm::event::{KeyCode, KeyModifiers};

/// A single key press: a key code plus modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    /// The key.
    pub code: KeyCode,
    /// Modifiers that must be held.
    pub modifiers: KeyModifiers,
}

impl From<KeyCode> for KeyPress {
    fn from(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }
}

impl From<(KeyCode, KeyModifiers)> for KeyPress {
    fn from((code, modifiers): (KeyCode, KeyModifiers)) -> Self {
        Self { code, modifiers }
    }
}

/// Help text for a binding: the key label and what it does.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Help {
    /// Key label, e.g. `"↑/k"`.
    pub key: String,
    /// Description, e.g. `"add minute"`.
    pub desc: String,
}

/// A set of key presses that trigger one action.
#[derive(Debug, Clone)]
pub struct Binding {
    keys: Vec<KeyPress>,
    help: Help,
    disabled: bool,
}

impl Binding {
    /// Creates an enabled binding for `keys` with no help text.
    pub fn new(keys: Vec<KeyPress>) -> Self {
        Self {
            keys,
            help: Help::default(),
            disabled: false,
        }
    }

    /// Sets the help text.
    pub fn with_help(mut self, key: impl Into<String>, desc: impl Into<String>) -> Self {
        self.help = Help {
            key: key.into(),
            desc: desc.into(),
        };
        self
    }

    /// The key presses of this binding.
    pub fn keys(&self) -> &[KeyPress] {
        &self.keys
    }

    /// The help text of this binding.
    pub fn help(&self) -> &Help {
        &self.help
    }

    /// Whether the binding responds to input and shows up in help.
    pub fn enabled(&self) -> bool {
        !self.disabled && !self.keys.is_empty()
    }

    /// Enables or disables the binding.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.disabled = !enabled;
    }

    /// Whether `msg` is one of this binding's key presses.
    ///
    /// Disabled bindings never match. Shift is ignored for character keys,
    /// since terminals report it inconsistently.
    pub fn matches(&self, msg: &KeyMsg) -> bool {
        if !self.enabled() {
            return false;
        }
        self.keys.iter().any(|k| {
            if k.code != msg.key {
                return false;
            }
            match k.code {
                KeyCode::Char(_) => {
                    k.modifiers.difference(KeyModifiers::SHIFT)
                        == msg.modifiers.difference(KeyModifiers::SHIFT)
                }
                _ => k.modifiers == msg.modifiers,
            }
        })
    }
}

/// Bindings a component wants displayed by the help view.
pub trait KeyMap {
    /// Bindings for the single-line help.
    fn short_help(&self) -> Vec<&Binding>;

    /// Bindings for the full help, one inner `Vec` per column.
    fn full_help(&self) -> Vec<Vec<&Binding>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyMsg {
        KeyMsg {
            key: code,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_matches_any_key() {
        let b = Binding::new(vec![KeyCode::Up.into(), KeyCode::Char('k').into()]);
        assert!(b.matches(&key(KeyCode::Up)));
        assert!(b.matches(&key(KeyCode::Char('k'))));
        assert!(!b.matches(&key(KeyCode::Down)));
    }

    #[test]
    fn test_modifiers_must_match() {
        let b = Binding::new(vec![(KeyCode::Char('c'), KeyModifiers::CONTROL).into()]);
        assert!(!b.matches(&key(KeyCode::Char('c'))));
        assert!(b.matches(&KeyMsg {
            key: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
        }));
    }

    #[test]
    fn test_shift_ignored_for_chars() {
        let b = Binding::new(vec![KeyCode::Char('?').into()]);
        assert!(b.matches(&KeyMsg {
            key: KeyCode::Char('?'),
            modifiers: KeyModifiers::SHIFT,
        }));
    }

    #[test]
    fn test_disabled_binding() {
        let mut b = Binding::new(vec![KeyCode::Enter.into()]).with_help("enter", "start");
        assert!(b.enabled());
        b.set_enabled(false);
        assert!(!b.enabled());
        assert!(!b.matches(&key(KeyCode::Enter)));
        assert!(!Binding::new(Vec::new()).enabled());
    }

    #[test]
    fn test_help_text() {
        let b = Binding::new(vec![KeyCode::Enter.into()]).with_help("enter", "start");
        assert_eq!(b.help().key, "enter");
        assert_eq!(b.help().desc, "start");
        assert_eq!(b.keys().len(), 1);
    }
}
