use crate::app::App;
use chrono::{DateTime, Utc};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use vending_tokens::{GatewayError, ListView, MessageCatalog, TokenItemView, TokenState};

/// Render the token list with specific area
pub fn render_with_area(frame: &mut Frame, app: &App, area: Rect) {
    let view = app.container().view();
    let catalog = app.catalog();

    match &view {
        ListView::Loading => render_loading(frame, app, area),
        ListView::Failed(error) => render_error(frame, catalog, error, area),
        ListView::Populated { items, .. } => {
            let title = format!("{} ({})", catalog.translate(heading(&view)), items.len());
            let block = Block::default()
                .title(title)
                .title_style(Style::default().fg(Color::Green))
                .borders(Borders::ALL);

            let mut rows: Vec<ListItem> = items
                .iter()
                .map(|item| ListItem::new(Text::from(token_lines(item, catalog))))
                .collect();
            rows.push(ListItem::new(Line::styled(
                format!("+ {}", catalog.translate("create-token")),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            )));

            let mut list_state = ListState::default();
            list_state.select(app.ui().selected);

            let list = List::new(rows)
                .block(block)
                .highlight_style(Style::default().bg(Color::Blue).add_modifier(Modifier::BOLD))
                .highlight_symbol(">> ");

            frame.render_stateful_widget(list, area, &mut list_state);
        }
    }
}

fn heading(view: &ListView<'_>) -> &'static str {
    view.heading_key().unwrap_or(vending_tokens::view::HEADING_KEY)
}

fn render_loading(frame: &mut Frame, app: &App, area: Rect) {
    let paragraph = Paragraph::new(format!("{} Loading…", app.ui().spinner()))
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

fn render_error(frame: &mut Frame, catalog: &dyn MessageCatalog, error: &GatewayError, area: Rect) {
    let block = Block::default()
        .title(catalog.translate(vending_tokens::view::HEADING_KEY))
        .title_style(Style::default().fg(Color::Red))
        .borders(Borders::ALL);

    let lines = vec![
        Line::styled(
            catalog.translate(error.message_key()),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Line::raw(""),
        Line::styled("Press r to retry", Style::default().fg(Color::DarkGray)),
    ];

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn state_color(state: TokenState) -> Color {
    match state {
        TokenState::Unredeemed => Color::Green,
        TokenState::Redeemed => Color::Cyan,
        TokenState::Cancelled => Color::DarkGray,
        TokenState::Unknown => Color::White,
    }
}

fn format_time(time: &DateTime<Utc>) -> String {
    time.format("%Y-%m-%d %H:%M UTC").to_string()
}

/// Summary line plus detail lines when the row is expanded
fn token_lines(item: &TokenItemView<'_>, catalog: &dyn MessageCatalog) -> Vec<Line<'static>> {
    let token = item.token;
    let marker = if item.expanded { "▾" } else { "▸" };

    let mut lines = vec![Line::from(vec![
        Span::raw(format!("{} ", marker)),
        Span::styled(
            token.name.clone(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            format!("({})", catalog.translate(token.state.message_key())),
            Style::default().fg(state_color(token.state)),
        ),
    ])];

    if item.expanded {
        let label = Style::default().fg(Color::Yellow);
        let mut detail = |name: &str, value: String| {
            lines.push(Line::from(vec![
                Span::raw("    "),
                Span::styled(format!("{}: ", name), label),
                Span::raw(value),
            ]));
        };

        detail("ID", token.id.to_string());
        detail("Created", format_time(&token.created));
        if let Some(changed) = &token.changed {
            detail("Changed", format_time(changed));
        }
        if let Some(secret) = &token.token {
            detail("Token", secret.clone());
        }
    }

    lines
}
