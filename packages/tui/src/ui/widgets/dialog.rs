use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use vending_tokens::{TokenAction, TokenId};

use super::centered_rect;

/// Result of user interaction with the confirmation dialog
#[derive(Debug, Clone, PartialEq)]
pub enum DialogResult {
    Confirmed(TokenAction),
    Cancelled,
    /// Still waiting for input
    Pending,
}

/// Which button is currently focused
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DialogFocus {
    /// Default, so a stray Enter never confirms
    Cancel,
    Confirm,
}

/// Confirmation for a token action, typically a revoke
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmationDialog {
    pub title: String,
    pub message: String,
    pub confirm_text: String,
    pub cancel_text: String,
    pub focus: DialogFocus,
    pub action: TokenAction,
}

impl ConfirmationDialog {
    /// Dialog asking to revoke `token_id`
    pub fn revoke(token_id: TokenId, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            confirm_text: "Yes".to_string(),
            cancel_text: "No".to_string(),
            focus: DialogFocus::Cancel,
            action: TokenAction::Revoke(token_id),
        }
    }

    pub fn next_focus(&mut self) {
        self.focus = match self.focus {
            DialogFocus::Cancel => DialogFocus::Confirm,
            DialogFocus::Confirm => DialogFocus::Cancel,
        };
    }

    pub fn handle_key(&mut self, key: KeyCode) -> DialogResult {
        match key {
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Left | KeyCode::Right => {
                self.next_focus();
                DialogResult::Pending
            }
            KeyCode::Enter | KeyCode::Char(' ') => match self.focus {
                DialogFocus::Cancel => DialogResult::Cancelled,
                DialogFocus::Confirm => DialogResult::Confirmed(self.action.clone()),
            },
            KeyCode::Char('y') => DialogResult::Confirmed(self.action.clone()),
            KeyCode::Esc | KeyCode::Char('n') => DialogResult::Cancelled,
            _ => DialogResult::Pending,
        }
    }
}

/// Widget for rendering a confirmation dialog
pub struct ConfirmationDialogWidget<'a> {
    dialog: &'a ConfirmationDialog,
}

impl<'a> ConfirmationDialogWidget<'a> {
    pub fn new(dialog: &'a ConfirmationDialog) -> Self {
        Self { dialog }
    }

    fn button(&self, text: &str, focused: bool, color: Color) -> Span<'static> {
        let style = if focused {
            Style::default()
                .bg(color)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(color)
        };
        Span::styled(format!("[{}]", text), style)
    }
}

impl<'a> Widget for ConfirmationDialogWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let dialog_area = centered_rect(area, 50, 9);
        Clear.render(dialog_area, buf);

        let block = Block::default()
            .title(self.dialog.title.clone())
            .title_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red));

        let inner = block.inner(dialog_area);
        block.render(dialog_area, buf);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(2),    // Message
                Constraint::Length(1), // Buttons
                Constraint::Length(1), // Shortcuts
            ])
            .split(inner);

        Paragraph::new(self.dialog.message.as_str())
            .style(Style::default().fg(Color::White))
            .wrap(Wrap { trim: true })
            .render(chunks[0], buf);

        let buttons = Line::from(vec![
            self.button(
                &self.dialog.cancel_text,
                self.dialog.focus == DialogFocus::Cancel,
                Color::Blue,
            ),
            Span::raw("   "),
            self.button(
                &self.dialog.confirm_text,
                self.dialog.focus == DialogFocus::Confirm,
                Color::Red,
            ),
        ]);
        Paragraph::new(buttons)
            .alignment(Alignment::Center)
            .render(chunks[1], buf);

        Paragraph::new("Tab: Switch • Enter: Select • y/n")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .render(chunks[2], buf);
    }
}
