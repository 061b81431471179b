use chrono::{DateTime, Utc};
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, ContentArrangement, Table};
use vending_tokens::{MessageCatalog, Token, TokenCollection};

const NAME_WIDTH: usize = 30;

/// Table of tokens with translated states
pub fn tokens_table(tokens: &TokenCollection, catalog: &dyn MessageCatalog) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec!["ID", "Name", "State", "Created", "Changed"]);

    for token in tokens {
        table.add_row(vec![
            token.id.to_string(),
            truncate(&token.name, NAME_WIDTH),
            catalog.translate(token.state.message_key()),
            format_date(&token.created),
            token
                .changed
                .as_ref()
                .map(format_date)
                .unwrap_or_else(|| "—".to_string()),
        ]);
    }

    table
}

/// One-line report for a freshly created token, including its secret
pub fn created_summary(token: &Token, catalog: &dyn MessageCatalog) -> String {
    match &token.token {
        Some(secret) => format!(
            "{}: {} ({}) {}",
            catalog.translate("token-created"),
            token.name,
            token.id,
            secret
        ),
        None => format!("{}: {} ({})", catalog.translate("token-created"), token.name, token.id),
    }
}

pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%Y-%m-%d %H:%M").to_string()
}

pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
