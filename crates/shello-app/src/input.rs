//! Terminal-agnostic keyboard input and the line editor.

/// Keyboard input abstraction.
///
/// Decouples application logic from terminal libraries (crossterm, termion,
/// etc.) enabling deterministic tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Printable character.
    Char(char),
    /// Enter/Return key (submit line).
    Enter,
    /// Backspace key (delete character before cursor).
    Backspace,
    /// Delete key (delete character at cursor).
    Delete,
    /// Escape key (quit).
    Esc,
    /// Left arrow key.
    Left,
    /// Right arrow key.
    Right,
    /// Up arrow key (older history entry).
    Up,
    /// Down arrow key (newer history entry).
    Down,
    /// Home key (cursor to start).
    Home,
    /// End key (cursor to end).
    End,
}

/// Line editor state.
///
/// Cursor positions count characters, not bytes. Submitted lines are kept in
/// a history that Up/Down walk through.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    buffer: String,
    cursor: usize,
    history: Vec<String>,
    /// Index into `history` while browsing. `None` when editing a fresh line.
    recall: Option<usize>,
}

impl InputState {
    /// Create a new empty input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current text in the input buffer.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Cursor position in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Apply an editing key. Enter and Esc are handled by the caller.
    pub fn edit(&mut self, key: KeyInput) {
        match key {
            KeyInput::Char(c) => {
                let at = self.byte_offset(self.cursor);
                self.buffer.insert(at, c);
                self.cursor += 1;
            },
            KeyInput::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let at = self.byte_offset(self.cursor);
                    self.buffer.remove(at);
                }
            },
            KeyInput::Delete => {
                if self.cursor < self.len() {
                    let at = self.byte_offset(self.cursor);
                    self.buffer.remove(at);
                }
            },
            KeyInput::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyInput::Right => self.cursor = (self.cursor + 1).min(self.len()),
            KeyInput::Home => self.cursor = 0,
            KeyInput::End => self.cursor = self.len(),
            KeyInput::Up => self.recall_older(),
            KeyInput::Down => self.recall_newer(),
            KeyInput::Enter | KeyInput::Esc => {},
        }
    }

    /// Take the buffer for submission, recording non-blank lines in history.
    pub fn take_line(&mut self) -> String {
        let line = std::mem::take(&mut self.buffer);
        self.cursor = 0;
        self.recall = None;

        if !line.trim().is_empty() && self.history.last() != Some(&line) {
            self.history.push(line.clone());
        }
        line
    }

    fn recall_older(&mut self) {
        let index = match self.recall {
            None if self.history.is_empty() => return,
            None => self.history.len() - 1,
            Some(index) => index.saturating_sub(1),
        };
        self.show(Some(index));
    }

    fn recall_newer(&mut self) {
        match self.recall {
            Some(index) if index + 1 < self.history.len() => self.show(Some(index + 1)),
            Some(_) => self.show(None),
            None => {},
        }
    }

    fn show(&mut self, recall: Option<usize>) {
        self.recall = recall;
        self.buffer = recall.and_then(|index| self.history.get(index)).cloned().unwrap_or_default();
        self.cursor = self.len();
    }

    fn len(&self) -> usize {
        self.buffer.chars().count()
    }

    fn byte_offset(&self, chars: usize) -> usize {
        self.buffer.char_indices().nth(chars).map_or(self.buffer.len(), |(at, _)| at)
    }
}
