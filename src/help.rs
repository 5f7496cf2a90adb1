//! Help view for key bindings.
//!
//! Renders the bindings of a [`KeyMap`] either as a single line
//! (`↑/k add minute • enter start • q quit`) or, with `show_all` set, as
//! columns of bindings. Output is truncated with an ellipsis when it does not
//! fit `width`.
//!
//! ```rust
//! use crossterm::event::KeyCode;
//! use hourglass_timer::help::Model;
//! use hourglass_timer::key::{Binding, KeyMap};
//!
//! struct Keys {
//!     start: Binding,
//!     quit: Binding,
//! }
//!
//! impl KeyMap for Keys {
//!     fn short_help(&self) -> Vec<&Binding> {
//!         vec![&self.start, &self.quit]
//!     }
//!     fn full_help(&self) -> Vec<Vec<&Binding>> {
//!         vec![vec![&self.start], vec![&self.quit]]
//!     }
//! }
//!
//! let keys = Keys {
//!     start: Binding::new(vec![KeyCode::Enter.into()]).with_help("enter", "start"),
//!     quit: Binding::new(vec![KeyCode::Char('q').into()]).with_help("q", "quit"),
//! };
//! let help = Model::new();
//! let view = help.view(&keys);
//! assert!(view.contains("enter"));
//! assert!(view.contains("quit"));
//! ```

use crate::key::{Binding, KeyMap};
use lipgloss_extras::lipgloss;
use lipgloss_extras::prelude::*;

/// Styles for the help view.
#[derive(Debug, Clone)]
pub struct Styles {
    /// Style of the ellipsis shown when output is truncated.
    pub ellipsis: Style,
    /// Key labels in the short view.
    pub short_key: Style,
    /// Descriptions in the short view.
    pub short_desc: Style,
    /// Separator between short items.
    pub short_separator: Style,
    /// Key labels in the full view.
    pub full_key: Style,
    /// Descriptions in the full view.
    pub full_desc: Style,
    /// Separator between full-view columns.
    pub full_separator: Style,
}

impl Default for Styles {
    fn default() -> Self {
        use lipgloss::AdaptiveColor;

        let key_style = Style::new().foreground(AdaptiveColor {
            Light: "#909090",
            Dark: "#626262",
        });
        let desc_style = Style::new().foreground(AdaptiveColor {
            Light: "#B2B2B2",
            Dark: "#4A4A4A",
        });
        let sep_style = Style::new().foreground(AdaptiveColor {
            Light: "#DDDADA",
            Dark: "#3C3C3C",
        });

        Self {
            ellipsis: sep_style.clone(),
            short_key: key_style.clone(),
            short_desc: desc_style.clone(),
            short_separator: sep_style.clone(),
            full_key: key_style,
            full_desc: desc_style,
            full_separator: sep_style,
        }
    }
}

/// The help model.
#[derive(Debug, Clone)]
pub struct Model {
    /// Show the full, multi-column help instead of the single line.
    pub show_all: bool,
    /// Maximum width; zero means unlimited.
    pub width: usize,
    /// Separator between short-view items.
    pub short_separator: String,
    /// Separator between full-view columns.
    pub full_separator: String,
    /// Marker appended when output is truncated.
    pub ellipsis: String,
    /// Styles.
    pub styles: Styles,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            show_all: false,
            width: 0,
            short_separator: " • ".to_string(),
            full_separator: "    ".to_string(),
            ellipsis: "…".to_string(),
            styles: Styles::default(),
        }
    }
}

impl Model {
    /// Creates a help model with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum width.
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Renders short or full help for `keymap` depending on `show_all`.
    pub fn view<K: KeyMap>(&self, keymap: &K) -> String {
        if self.show_all {
            self.full_help_view(keymap.full_help())
        } else {
            self.short_help_view(keymap.short_help())
        }
    }

    /// Renders bindings on a single line, skipping disabled ones.
    pub fn short_help_view(&self, bindings: Vec<&Binding>) -> String {
        let mut builder = String::new();
        let mut total_width = 0;
        let separator = self
            .styles
            .short_separator
            .clone()
            .inline(true)
            .render(&self.short_separator);

        for kb in bindings.iter().filter(|b| b.enabled()) {
            let sep = if total_width > 0 { separator.as_str() } else { "" };
            let help = kb.help();
            let key_part = self.styles.short_key.clone().inline(true).render(&help.key);
            let desc_part = self
                .styles
                .short_desc
                .clone()
                .inline(true)
                .render(&help.desc);
            let item_str = format!("{}{} {}", sep, key_part, desc_part);
            let item_width = lipgloss::width_visible(&item_str);

            if let Some(tail) = self.should_add_item(total_width, item_width) {
                builder.push_str(&tail);
                break;
            }

            total_width += item_width;
            builder.push_str(&item_str);
        }
        builder
    }

    /// Renders one column per group, skipping groups with no enabled bindings.
    pub fn full_help_view(&self, groups: Vec<Vec<&Binding>>) -> String {
        let mut columns = Vec::new();
        let mut total_width = 0;
        let separator = self
            .styles
            .full_separator
            .clone()
            .inline(true)
            .render(&self.full_separator);
        let separator_width = lipgloss::width_visible(&separator);

        for group in groups.iter() {
            let rows: Vec<String> = group
                .iter()
                .filter(|b| b.enabled())
                .map(|b| {
                    let help = b.help();
                    let key_part = self.styles.full_key.clone().inline(true).render(&help.key);
                    let desc_part = self
                        .styles
                        .full_desc
                        .clone()
                        .inline(true)
                        .render(&help.desc);
                    format!("{} {}", key_part, desc_part)
                })
                .collect();
            if rows.is_empty() {
                continue;
            }

            let col_str = rows.join("\n");
            let mut col_width = lipgloss::width_visible(&col_str);
            if !columns.is_empty() {
                col_width += separator_width;
            }

            if let Some(tail) = self.should_add_item(total_width, col_width) {
                if !tail.is_empty() {
                    columns.push(tail);
                }
                break;
            }

            total_width += col_width;
            columns.push(col_str);
        }

        let mut parts = Vec::new();
        for (i, col) in columns.iter().enumerate() {
            if i > 0 {
                parts.push(separator.as_str());
            }
            parts.push(col.as_str());
        }

        lipgloss::join_horizontal(lipgloss::TOP, &parts)
    }

    /// Returns `Some(tail)` when an item of `item_width` would overflow.
    /// The tail is the ellipsis if it still fits, otherwise empty.
    fn should_add_item(&self, total_width: usize, item_width: usize) -> Option<String> {
        if self.width > 0 && total_width + item_width > self.width {
            let tail = format!(
                " {}",
                self.styles
                    .ellipsis
                    .clone()
                    .inline(true)
                    .render(&self.ellipsis)
            );
            if total_width + lipgloss::width_visible(&tail) < self.width {
                return Some(tail);
            }
            return Some(String::new());
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyCode;

    struct Keys {
        up: Binding,
        down: Binding,
        quit: Binding,
    }

    impl KeyMap for Keys {
        fn short_help(&self) -> Vec<&Binding> {
            vec![&self.up, &self.down, &self.quit]
        }

        fn full_help(&self) -> Vec<Vec<&Binding>> {
            vec![vec![&self.up, &self.down], vec![&self.quit]]
        }
    }

    fn keys() -> Keys {
        Keys {
            up: Binding::new(vec![KeyCode::Up.into()]).with_help("↑", "add minute"),
            down: Binding::new(vec![KeyCode::Down.into()]).with_help("↓", "subtract minute"),
            quit: Binding::new(vec![KeyCode::Char('q').into()]).with_help("q", "quit"),
        }
    }

    fn plain(view: &str) -> String {
        lipgloss::strip_ansi(view)
    }

    #[test]
    fn test_short_view() {
        let help = Model::new();
        assert_eq!(
            plain(&help.view(&keys())),
            "↑ add minute • ↓ subtract minute • q quit"
        );
    }

    #[test]
    fn test_short_view_skips_disabled() {
        let mut keys = keys();
        keys.down.set_enabled(false);
        let help = Model::new();
        assert_eq!(plain(&help.view(&keys)), "↑ add minute • q quit");
    }

    #[test]
    fn test_short_view_truncates() {
        let help = Model::new().with_width(20);
        let out = plain(&help.view(&keys()));
        assert!(out.starts_with("↑ add minute"));
        assert!(out.ends_with('…'));
        assert!(!out.contains("quit"));
    }

    #[test]
    fn test_full_view_columns() {
        let mut help = Model::new();
        help.show_all = true;
        let out = plain(&help.view(&keys()));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("add minute"));
        assert!(lines[0].contains("q quit"));
        assert!(lines[1].contains("subtract minute"));
    }

    #[test]
    fn test_empty_bindings() {
        let help = Model::new();
        assert_eq!(help.short_help_view(Vec::new()), "");
    }
}
