/// Keys the text field reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Char(char),
    Other,
}

/// What a key press inside the text field should do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Submit,
    InsertNewline,
    Insert(char),
    Ignore,
}

impl InputAction {
    /// Enter submits unless Shift is held, in which case it breaks the line
    pub fn from_key(key: Key, shift: bool) -> Self {
        match key {
            Key::Enter if shift => InputAction::InsertNewline,
            Key::Enter => InputAction::Submit,
            Key::Char(c) => InputAction::Insert(c),
            Key::Other => InputAction::Ignore,
        }
    }

    /// Map one line read from a terminal.
    ///
    /// A trailing backslash stands in for Shift+Enter. Returns the line
    /// content with the marker stripped and the action for its line break.
    pub fn from_line(line: &str) -> (&str, Self) {
        let line = line.trim_end_matches(['\r', '\n']);
        match line.strip_suffix('\\') {
            Some(content) => (content, Self::from_key(Key::Enter, true)),
            None => (line, Self::from_key(Key::Enter, false)),
        }
    }
}
