pub mod tokens;
pub mod widgets;

use crate::app::App;
use crate::state::Mode;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use widgets::{ConfirmationDialogWidget, NamePromptWidget, StatusBarWidget};

/// Main UI rendering function
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Token list
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    tokens::render_with_area(frame, app, chunks[0]);
    frame.render_widget(StatusBarWidget::new(app), chunks[1]);

    // Overlays go on top of the list
    match &app.ui().mode {
        Mode::Browse => {}
        Mode::CreatePrompt => {
            let catalog = app.catalog();
            let title = catalog.translate("create-token");
            let label = catalog.translate("token-name");
            let prompt = NamePromptWidget::new(&title, &label, &app.ui().name_input);
            frame.set_cursor_position(prompt.cursor_position(chunks[0]));
            frame.render_widget(prompt, chunks[0]);
        }
        Mode::ConfirmRevoke(dialog) => {
            frame.render_widget(ConfirmationDialogWidget::new(dialog), chunks[0]);
        }
    }
}
