use crate::app::App;
use crate::state::Mode;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use vending_tokens::FetchState;

/// Status bar with fetch state, the last notice or failure, and shortcuts
pub struct StatusBarWidget<'a> {
    app: &'a App,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(app: &'a App) -> Self {
        Self { app }
    }

    fn state_indicator(&self) -> (String, Style) {
        let controller = self.app.container().controller();
        let label = controller.state().label().to_uppercase();
        let style = match controller.state() {
            FetchState::Idle | FetchState::Pending => Style::default().fg(Color::Yellow),
            FetchState::Success(_) => Style::default().fg(Color::Green),
            FetchState::Error(_) => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        };
        (label, style)
    }

    /// Failure wins over notice so a failed action is never hidden
    fn message(&self) -> Option<(String, Style)> {
        let catalog = self.app.catalog();
        if let Some(failure) = self.app.container().controller().last_failure() {
            return Some((
                format!(
                    "⚠ {} failed: {}",
                    failure.action,
                    catalog.translate(failure.error.message_key())
                ),
                Style::default().fg(Color::Red),
            ));
        }

        self.app
            .ui()
            .notice
            .as_ref()
            .map(|notice| (notice.clone(), Style::default().fg(Color::Cyan)))
    }

    fn shortcuts(&self) -> &'static str {
        match &self.app.ui().mode {
            Mode::Browse => "↑↓: Select • Enter: Open • n: New • x: Cancel token • r: Refresh • q: Quit",
            Mode::CreatePrompt => "Enter: Create • Esc: Cancel",
            Mode::ConfirmRevoke(_) => "Tab: Switch • Enter: Select • Esc: Back",
        }
    }
}

impl<'a> Widget for StatusBarWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (state_text, state_style) = self.state_indicator();
        let shortcuts = self.shortcuts();

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(state_text.len() as u16 + 2),
                Constraint::Min(20),
                Constraint::Length(shortcuts.chars().count() as u16),
            ])
            .split(area);

        Paragraph::new(format!(" {} ", state_text))
            .style(state_style)
            .render(chunks[0], buf);

        let middle = match self.message() {
            Some((text, style)) => Line::styled(format!(" {}", text), style),
            None => Line::styled(
                format!(" {}", self.app.app_id()),
                Style::default().fg(Color::Gray),
            ),
        };
        Paragraph::new(middle).render(chunks[1], buf);

        Paragraph::new(shortcuts)
            .style(Style::default().fg(Color::DarkGray))
            .render(chunks[2], buf);
    }
}
