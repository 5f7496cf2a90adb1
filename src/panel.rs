//! Control panel showing the target time.
//!
//! ```text
//!  ▲    ▲
//! 05 : 30
//!  ▼    ▼
//! ```
//!
//! The arrows hint at the adjust keys; they are dimmed while a countdown runs
//! because adjustments are ignored then.

use crate::countdown::PanelState;
use lipgloss_extras::lipgloss;
use lipgloss_extras::prelude::*;

/// Styles for the panel.
#[derive(Debug, Clone)]
pub struct Styles {
    /// Minute and second digits.
    pub digits: Style,
    /// The `:` between minutes and seconds.
    pub separator: Style,
    /// Arrows while adjustments are accepted.
    pub arrow: Style,
    /// Arrows while adjustments are ignored.
    pub disabled_arrow: Style,
}

impl Default for Styles {
    fn default() -> Self {
        Self {
            digits: Style::new().bold(true),
            separator: Style::new().foreground(Color::from("241")),
            arrow: Style::new().foreground(Color::from("212")),
            disabled_arrow: Style::new().foreground(Color::from("238")),
        }
    }
}

/// The panel model.
#[derive(Debug, Clone)]
pub struct Model {
    /// Glyph above each column.
    pub up_arrow: String,
    /// Glyph below each column.
    pub down_arrow: String,
    /// Styles.
    pub styles: Styles,
    state: PanelState,
    enabled: bool,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            up_arrow: "▲".to_string(),
            down_arrow: "▼".to_string(),
            styles: Styles::default(),
            state: PanelState::default(),
            enabled: true,
        }
    }
}

impl Model {
    /// Creates a panel showing `00 : 00`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes new digits.
    pub fn set_state(&mut self, state: PanelState) {
        self.state = state;
    }

    /// The digits currently shown.
    pub fn state(&self) -> &PanelState {
        &self.state
    }

    /// Marks whether adjustments are currently accepted.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Whether adjustments are currently accepted.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    fn column(&self, digits: &str) -> String {
        let arrow_style = if self.enabled {
            &self.styles.arrow
        } else {
            &self.styles.disabled_arrow
        };
        let up = arrow_style.clone().inline(true).render(&self.up_arrow);
        let down = arrow_style.clone().inline(true).render(&self.down_arrow);
        let digits = self.styles.digits.clone().inline(true).render(digits);
        lipgloss::join_vertical(lipgloss::CENTER, &[up.as_str(), digits.as_str(), down.as_str()])
    }

    /// Renders the panel as three lines.
    pub fn view(&self) -> String {
        let minutes = self.column(&self.state.minutes);
        let seconds = self.column(&self.state.seconds);
        let colon = self.styles.separator.clone().inline(true).render(":");
        let separator = format!("   \n {} \n   ", colon);
        lipgloss::join_horizontal(
            lipgloss::TOP,
            &[minutes.as_str(), separator.as_str(), seconds.as_str()],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_lines(model: &Model) -> Vec<String> {
        lipgloss::strip_ansi(&model.view())
            .lines()
            .map(|l| l.trim_end().to_string())
            .collect()
    }

    #[test]
    fn test_default_view() {
        let panel = Model::new();
        let lines = plain_lines(&panel);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "00 : 00");
        assert_eq!(lines[0].matches('▲').count(), 2);
        assert_eq!(lines[2].matches('▼').count(), 2);
    }

    #[test]
    fn test_set_state() {
        let mut panel = Model::new();
        panel.set_state(PanelState::from_millis(330_000));
        assert_eq!(panel.state().minutes, "05");
        assert_eq!(plain_lines(&panel)[1], "05 : 30");
    }

    #[test]
    fn test_disabled_keeps_layout() {
        let mut panel = Model::new();
        let enabled = plain_lines(&panel);
        panel.set_enabled(false);
        assert!(!panel.enabled());
        assert_eq!(plain_lines(&panel), enabled);
    }
}
