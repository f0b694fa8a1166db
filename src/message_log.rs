//! Ordered diagnostics collected while reading an image.

use std::fmt;

/// Severity of a diagnostic entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    Warning,
    Error,
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageType::Warning => f.write_str("Warning"),
            MessageType::Error => f.write_str("Error"),
        }
    }
}

/// A single diagnostic entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub kind: MessageType,
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.text)
    }
}

/// Append-only log of warnings and errors.
///
/// Entries are added by the decoder only; callers can read or clear the log. Every entry
/// is mirrored to the `log` facade as it is added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageLog {
    messages: Vec<Message>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add(&mut self, text: impl Into<String>, kind: MessageType) {
        let text = text.into();
        match kind {
            MessageType::Warning => log::warn!("{}", text),
            MessageType::Error => log::error!("{}", text),
        }
        self.messages.push(Message { text, kind });
    }

    pub(crate) fn add_warning(&mut self, text: impl Into<String>) {
        self.add(text, MessageType::Warning);
    }

    pub(crate) fn add_error(&mut self, text: impl Into<String>) {
        self.add(text, MessageType::Error);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.kind == MessageType::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.messages.len() - self.error_count()
    }

    pub fn contains_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

impl fmt::Display for MessageLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for message in &self.messages {
            writeln!(f, "{}", message)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a MessageLog {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}
