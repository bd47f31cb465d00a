//! The message composer: input text, send enablement, and height.

/// Default row limit for the auto-growing input.
pub const DEFAULT_MAX_ROWS: usize = 8;

/// A key press delivered to the composer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter { shift: bool },
    Char(char),
    Backspace,
}

/// What a key press asks the controller to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Plain Enter: send the current text.
    Submit,
    /// The text changed (or nothing happened).
    Edited,
}

/// Input control state.
///
/// Height follows the number of lines, clamped to `1..=max_rows`.
#[derive(Debug, Clone)]
pub struct Composer {
    text: String,
    send_enabled: bool,
    rows: usize,
    max_rows: usize,
}

impl Composer {
    pub fn new(max_rows: usize) -> Self {
        Self {
            text: String::new(),
            send_enabled: true,
            rows: 1,
            max_rows: max_rows.max(1),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.fit_rows();
    }

    pub fn send_enabled(&self) -> bool {
        self.send_enabled
    }

    pub(crate) fn set_send_enabled(&mut self, enabled: bool) {
        self.send_enabled = enabled;
    }

    /// Current visual height in rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn max_rows(&self) -> usize {
        self.max_rows
    }

    /// Empty the input and shrink it back to one row.
    pub fn clear(&mut self) {
        self.text.clear();
        self.rows = 1;
    }

    /// Apply a key press.
    ///
    /// Enter without Shift submits and leaves the text untouched; Shift+Enter
    /// inserts a newline.
    pub fn handle_key(&mut self, key: Key) -> KeyAction {
        match key {
            Key::Enter { shift: false } => return KeyAction::Submit,
            Key::Enter { shift: true } => self.text.push('\n'),
            Key::Char(c) => self.text.push(c),
            Key::Backspace => {
                self.text.pop();
            }
        }
        self.fit_rows();
        KeyAction::Edited
    }

    fn fit_rows(&mut self) {
        let lines = self.text.split('\n').count();
        self.rows = lines.clamp(1, self.max_rows);
    }
}

impl Default for Composer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ROWS)
    }
}
