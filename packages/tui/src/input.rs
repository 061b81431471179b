use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Longest token name accepted by the create prompt, in graphemes
pub const MAX_NAME_LEN: usize = 64;

/// Single-line text input used for token names
#[derive(Debug, Clone, Default)]
pub struct InputBuffer {
    content: String,
    /// Cursor position as byte index in `content`
    cursor: usize,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Length in graphemes, not bytes
    pub fn len(&self) -> usize {
        self.content.graphemes(true).count()
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    /// Take the content out, leaving the buffer empty
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.content)
    }

    /// Insert at the cursor. Control characters and input past
    /// [`MAX_NAME_LEN`] are ignored.
    pub fn insert_char(&mut self, ch: char) -> bool {
        if ch.is_control() || self.len() >= MAX_NAME_LEN {
            return false;
        }
        self.content.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
        true
    }

    /// Delete the grapheme before the cursor
    pub fn backspace(&mut self) -> bool {
        match self.previous_boundary() {
            Some(start) => {
                self.content.drain(start..self.cursor);
                self.cursor = start;
                true
            }
            None => false,
        }
    }

    /// Delete the grapheme under the cursor
    pub fn delete_char(&mut self) -> bool {
        match self.next_boundary() {
            Some(end) => {
                self.content.drain(self.cursor..end);
                true
            }
            None => false,
        }
    }

    pub fn move_left(&mut self) -> bool {
        match self.previous_boundary() {
            Some(pos) => {
                self.cursor = pos;
                true
            }
            None => false,
        }
    }

    pub fn move_right(&mut self) -> bool {
        match self.next_boundary() {
            Some(pos) => {
                self.cursor = pos;
                true
            }
            None => false,
        }
    }

    pub fn move_to_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_to_end(&mut self) {
        self.cursor = self.content.len();
    }

    /// Display column of the cursor, accounting for wide characters
    pub fn cursor_column(&self) -> u16 {
        self.content[..self.cursor].width() as u16
    }

    fn previous_boundary(&self) -> Option<usize> {
        self.content
            .grapheme_indices(true)
            .map(|(idx, _)| idx)
            .take_while(|idx| *idx < self.cursor)
            .last()
    }

    fn next_boundary(&self) -> Option<usize> {
        self.content
            .grapheme_indices(true)
            .find(|(idx, _)| *idx >= self.cursor)
            .map(|(idx, grapheme)| idx + grapheme.len())
    }
}
