/// What a single raw input byte means to the line editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Ctrl+C: end the session
    Interrupt,
    /// Backspace / Ctrl+H / DEL
    Backspace,
    /// Ctrl+U: clear the whole line
    ClearLine,
    /// Ctrl+W: delete back to the last space or comma
    DeleteWord,
    /// Tab: accept the completion suggestion
    Tab,
    Space,
    Char(char),
}

impl Key {
    /// Classifies a raw byte. Anything outside the recognized control bytes
    /// and printable ASCII is `None` and must be ignored.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x03 => Some(Key::Interrupt),
            0x08 | 0x7f => Some(Key::Backspace),
            0x15 => Some(Key::ClearLine),
            0x17 => Some(Key::DeleteWord),
            b'\t' => Some(Key::Tab),
            b' ' => Some(Key::Space),
            0x21..=0x7e => Some(Key::Char(byte as char)),
            _ => None,
        }
    }
}
