use ratatui::{
    layout::Position,
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::centered_rect;
use crate::input::InputBuffer;

/// Text prompt for the name of a new token
pub struct NamePromptWidget<'a> {
    title: &'a str,
    label: &'a str,
    input: &'a InputBuffer,
}

impl<'a> NamePromptWidget<'a> {
    pub fn new(title: &'a str, label: &'a str, input: &'a InputBuffer) -> Self {
        Self { title, label, input }
    }

    /// Where the terminal cursor belongs inside `area`
    pub fn cursor_position(&self, area: Rect) -> Position {
        let inner = Block::default().borders(Borders::ALL).inner(centered_rect(area, 50, 5));
        let label_width = self.label.chars().count() as u16 + 2;
        Position::new(
            (inner.x + label_width + self.input.cursor_column())
                .min(inner.right().saturating_sub(1)),
            inner.y,
        )
    }
}

impl<'a> Widget for NamePromptWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let prompt_area = centered_rect(area, 50, 5);
        Clear.render(prompt_area, buf);

        let block = Block::default()
            .title(self.title)
            .title_style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green));

        let lines = vec![
            Line::from(vec![
                Span::styled(
                    format!("{}: ", self.label),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ),
                Span::raw(self.input.content()),
            ]),
            Line::raw(""),
            Line::styled(
                "Enter: Create • Esc: Cancel",
                Style::default().fg(Color::DarkGray),
            ),
        ];

        Paragraph::new(lines).block(block).render(prompt_area, buf);
    }
}
