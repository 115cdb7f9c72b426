use crate::chat::types::{Message, Role};
use std::io::{self, Write};

/// Renders messages as they are appended to a conversation.
///
/// Displays only ever receive new messages in order; earlier output is
/// never revised.
pub trait ConversationDisplay {
    fn append(&mut self, message: &Message) -> io::Result<()>;

    /// Called when the conversation is cleared
    fn reset(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Plain terminal rendering. Content is written verbatim, so markdown
/// passes through for the terminal or a pager to handle.
pub struct TerminalDisplay<W: Write> {
    out: W,
    show_system: bool,
}

impl TerminalDisplay<io::Stdout> {
    pub fn stdout(show_system: bool) -> Self {
        Self::new(io::stdout(), show_system)
    }
}

impl<W: Write> TerminalDisplay<W> {
    pub fn new(out: W, show_system: bool) -> Self {
        Self { out, show_system }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn label(role: Role) -> &'static str {
        match role {
            Role::User => "🧑 you",
            Role::Assistant => "🤖 assistant",
            Role::System => "⚙ system",
        }
    }
}

impl<W: Write> ConversationDisplay for TerminalDisplay<W> {
    fn append(&mut self, message: &Message) -> io::Result<()> {
        if message.role == Role::System && !self.show_system {
            return Ok(());
        }
        writeln!(self.out, "{}:", Self::label(message.role))?;
        writeln!(self.out, "{}", message.content)?;
        writeln!(self.out)?;
        self.out.flush()
    }

    fn reset(&mut self) -> io::Result<()> {
        writeln!(self.out, "--- conversation cleared ---")?;
        writeln!(self.out)?;
        self.out.flush()
    }
}

/// Collects appended messages in memory
#[derive(Debug, Default, Clone)]
pub struct RecordingDisplay {
    pub messages: Vec<Message>,
    pub resets: usize,
}

impl ConversationDisplay for RecordingDisplay {
    fn append(&mut self, message: &Message) -> io::Result<()> {
        self.messages.push(message.clone());
        Ok(())
    }

    fn reset(&mut self) -> io::Result<()> {
        self.messages.clear();
        self.resets += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_display_renders_verbatim() {
        let mut display = TerminalDisplay::new(Vec::new(), false);
        display.append(&Message::assistant("**bold**\n- item")).unwrap();

        let out = String::from_utf8(display.into_inner()).unwrap();
        assert!(out.contains("assistant"));
        assert!(out.contains("**bold**\n- item"));
    }

    #[test]
    fn test_terminal_display_hides_system_by_default() {
        let mut display = TerminalDisplay::new(Vec::new(), false);
        display.append(&Message::system("persona")).unwrap();
        assert!(display.into_inner().is_empty());

        let mut display = TerminalDisplay::new(Vec::new(), true);
        display.append(&Message::system("persona")).unwrap();
        assert!(String::from_utf8(display.into_inner()).unwrap().contains("persona"));
    }
}
