use crate::input::InputBuffer;
use crate::ui::widgets::ConfirmationDialog;

const SPINNER_FRAMES: [&str; 4] = ["|", "/", "-", "\\"];

/// What the keyboard currently drives
#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    /// Moving through the list
    Browse,
    /// Typing the name of a new token
    CreatePrompt,
    /// Confirming a revoke
    ConfirmRevoke(ConfirmationDialog),
}

/// Presentation state of the token screen
#[derive(Debug)]
pub struct UiState {
    /// Selected row; the row after the last token is the create affordance
    pub selected: Option<usize>,
    pub mode: Mode,
    pub name_input: InputBuffer,
    /// One-off message shown in the status bar until dismissed
    pub notice: Option<String>,
    spinner_frame: usize,
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}

impl UiState {
    pub fn new() -> Self {
        Self {
            selected: None,
            mode: Mode::Browse,
            name_input: InputBuffer::new(),
            notice: None,
            spinner_frame: 0,
        }
    }

    /// Navigate to previous row, wrapping to the bottom
    pub fn select_previous(&mut self, rows: usize) -> bool {
        if rows == 0 {
            return false;
        }

        self.selected = match self.selected {
            None | Some(0) => Some(rows - 1),
            Some(index) => Some(index.min(rows) - 1),
        };
        true
    }

    /// Navigate to next row, wrapping to the top
    pub fn select_next(&mut self, rows: usize) -> bool {
        if rows == 0 {
            return false;
        }

        self.selected = match self.selected {
            Some(index) if index + 1 < rows => Some(index + 1),
            _ => Some(0),
        };
        true
    }

    /// Keep the selection inside the list after it was replaced
    pub fn clamp_selection(&mut self, rows: usize) {
        self.selected = match self.selected {
            _ if rows == 0 => None,
            Some(index) if index >= rows => Some(rows - 1),
            None => Some(0),
            other => other,
        };
    }

    pub fn is_browsing(&self) -> bool {
        self.mode == Mode::Browse
    }

    pub fn open_create_prompt(&mut self) {
        self.name_input.clear();
        self.mode = Mode::CreatePrompt;
    }

    pub fn open_revoke_dialog(&mut self, dialog: ConfirmationDialog) {
        self.mode = Mode::ConfirmRevoke(dialog);
    }

    pub fn close_overlay(&mut self) {
        self.mode = Mode::Browse;
    }

    pub fn advance_spinner(&mut self) {
        self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_frame]
    }
}
