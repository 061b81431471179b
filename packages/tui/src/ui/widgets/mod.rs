pub mod dialog;
pub mod prompt;
pub mod status_bar;

pub use dialog::{ConfirmationDialog, ConfirmationDialogWidget, DialogFocus, DialogResult};
pub use prompt::NamePromptWidget;
pub use status_bar::StatusBarWidget;

use ratatui::layout::Rect;

/// Rect of at most `width`×`height` centered in `area`
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
