//! Terminal input for the chat loop.
//!
//! `InputBuffer` is the key-handling state machine: it owns only the
//! transient text being typed. `ChatInput` drives it from crossterm's
//! async `EventStream` in raw mode and keeps the prompt line drawn below
//! any output printed through it.

use std::io::{self, Write};

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{self, ClearType};
use crossterm::{cursor, queue};
use futures_util::StreamExt;

/// Events produced by the input handler.
#[derive(Debug, PartialEq)]
pub enum InputEvent {
    /// User submitted a message (already trimmed, never blank).
    Message(String),
    /// End of file (Ctrl+D on an empty line).
    Eof,
    /// Interrupt signal (Ctrl+C).
    Interrupted,
}

/// Result of feeding one key to the buffer.
#[derive(Debug, PartialEq)]
pub enum KeyOutcome {
    Submit(String),
    Edited,
    Ignored,
    Interrupted,
    Eof,
}

/// Text being composed.
#[derive(Debug, Default)]
pub struct InputBuffer {
    text: String,
}

impl InputBuffer {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn insert_str(&mut self, s: &str) {
        self.text.push_str(&s.replace("\r\n", "\n").replace('\r', "\n"));
    }

    /// Apply one key event.
    pub fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        if key.kind == KeyEventKind::Release {
            return KeyOutcome::Ignored;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Enter
                if key
                    .modifiers
                    .intersects(KeyModifiers::SHIFT | KeyModifiers::ALT) =>
            {
                self.text.push('\n');
                KeyOutcome::Edited
            }
            KeyCode::Enter => {
                let message = self.text.trim();
                if message.is_empty() {
                    return KeyOutcome::Ignored;
                }
                let message = message.to_string();
                self.text.clear();
                KeyOutcome::Submit(message)
            }
            KeyCode::Char('c') if ctrl => {
                self.text.clear();
                KeyOutcome::Interrupted
            }
            KeyCode::Char('d') if ctrl => {
                if self.text.is_empty() {
                    KeyOutcome::Eof
                } else {
                    KeyOutcome::Ignored
                }
            }
            // Ctrl+J is a bare line feed in most terminals.
            KeyCode::Char('j') if ctrl => {
                self.text.push('\n');
                KeyOutcome::Edited
            }
            KeyCode::Char('u') if ctrl => {
                self.text.clear();
                KeyOutcome::Edited
            }
            KeyCode::Char(_) if ctrl => KeyOutcome::Ignored,
            KeyCode::Char(c) => {
                self.text.push(c);
                KeyOutcome::Edited
            }
            KeyCode::Tab => {
                self.text.push(' ');
                KeyOutcome::Edited
            }
            KeyCode::Backspace => {
                if self.text.pop().is_some() {
                    KeyOutcome::Edited
                } else {
                    KeyOutcome::Ignored
                }
            }
            _ => KeyOutcome::Ignored,
        }
    }
}

/// Raw-mode prompt over crossterm's event stream.
///
/// All output during the chat session goes through [`ChatInput::print`]
/// so it lands above the prompt instead of inside it. Raw mode is
/// disabled again on drop.
pub struct ChatInput {
    events: EventStream,
    buffer: InputBuffer,
    prompt: String,
    status: Option<String>,
    /// Terminal rows the prompt currently occupies.
    drawn_rows: u16,
}

impl ChatInput {
    /// Enter raw mode and draw the prompt.
    pub fn new(prompt: String) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut input = Self {
            events: EventStream::new(),
            buffer: InputBuffer::default(),
            prompt,
            status: None,
            drawn_rows: 0,
        };
        input.redraw()?;
        Ok(input)
    }

    /// Show a status line (spinner, hint) above the prompt, or remove it.
    pub fn set_status(&mut self, status: Option<String>) -> io::Result<()> {
        if self.status != status {
            self.status = status;
            self.redraw()?;
        }
        Ok(())
    }

    /// Print a block of text above the prompt.
    pub fn print(&mut self, text: &str) -> io::Result<()> {
        let mut out = io::stdout();
        self.clear_prompt(&mut out)?;
        let mut block = text.replace('\n', "\r\n");
        if !block.ends_with("\r\n") {
            block.push_str("\r\n");
        }
        out.write_all(block.as_bytes())?;
        self.draw_prompt(&mut out)?;
        out.flush()
    }

    /// Wait for the next submitted message, interrupt, or EOF.
    ///
    /// Cancel safe: edits already applied stay in the buffer.
    pub async fn next_event(&mut self) -> io::Result<InputEvent> {
        loop {
            let event = match self.events.next().await {
                Some(event) => event?,
                None => return Ok(InputEvent::Eof),
            };
            match event {
                Event::Key(key) => match self.buffer.handle_key(key) {
                    KeyOutcome::Submit(message) => {
                        self.redraw()?;
                        return Ok(InputEvent::Message(message));
                    }
                    KeyOutcome::Edited => self.redraw()?,
                    KeyOutcome::Ignored => {}
                    KeyOutcome::Interrupted => {
                        self.redraw()?;
                        return Ok(InputEvent::Interrupted);
                    }
                    KeyOutcome::Eof => return Ok(InputEvent::Eof),
                },
                Event::Paste(text) => {
                    self.buffer.insert_str(&text);
                    self.redraw()?;
                }
                Event::Resize(..) => self.redraw()?,
                _ => {}
            }
        }
    }

    fn redraw(&mut self) -> io::Result<()> {
        let mut out = io::stdout();
        self.clear_prompt(&mut out)?;
        self.draw_prompt(&mut out)?;
        out.flush()
    }

    fn clear_prompt(&mut self, out: &mut impl Write) -> io::Result<()> {
        if self.drawn_rows > 1 {
            queue!(out, cursor::MoveUp(self.drawn_rows - 1))?;
        }
        queue!(
            out,
            cursor::MoveToColumn(0),
            terminal::Clear(ClearType::FromCursorDown)
        )?;
        self.drawn_rows = 0;
        Ok(())
    }

    fn draw_prompt(&mut self, out: &mut impl Write) -> io::Result<()> {
        let mut rows: u16 = 1;
        if let Some(status) = &self.status {
            write!(out, "{status}\r\n")?;
            rows += 1;
        }
        write!(out, "{}", self.prompt)?;
        let continuation = " ".repeat(console::measure_text_width(&self.prompt));
        for (i, line) in self.buffer.text().split('\n').enumerate() {
            if i > 0 {
                write!(out, "\r\n{continuation}")?;
                rows += 1;
            }
            write!(out, "{line}")?;
        }
        self.drawn_rows = rows;
        Ok(())
    }
}

impl Drop for ChatInput {
    fn drop(&mut self) {
        let mut out = io::stdout();
        let _ = self.clear_prompt(&mut out);
        let _ = out.flush();
        let _ = terminal::disable_raw_mode();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn with(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    fn type_text(buffer: &mut InputBuffer, text: &str) {
        for c in text.chars() {
            buffer.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn enter_submits_trimmed_text() {
        let mut buffer = InputBuffer::default();
        type_text(&mut buffer, "  pizza  ");
        assert_eq!(
            buffer.handle_key(key(KeyCode::Enter)),
            KeyOutcome::Submit("pizza".to_string())
        );
        assert_eq!(buffer.text(), "");
    }

    #[test]
    fn blank_enter_is_ignored() {
        let mut buffer = InputBuffer::default();
        type_text(&mut buffer, "   ");
        assert_eq!(buffer.handle_key(key(KeyCode::Enter)), KeyOutcome::Ignored);
        assert_eq!(buffer.text(), "   ");
    }

    #[test]
    fn modified_enter_inserts_newline() {
        let mut buffer = InputBuffer::default();
        type_text(&mut buffer, "line one");
        buffer.handle_key(with(KeyCode::Enter, KeyModifiers::SHIFT));
        type_text(&mut buffer, "line two");
        buffer.handle_key(with(KeyCode::Enter, KeyModifiers::ALT));
        assert_eq!(buffer.text(), "line one\nline two\n");
        assert_eq!(
            buffer.handle_key(key(KeyCode::Enter)),
            KeyOutcome::Submit("line one\nline two".to_string())
        );
    }

    #[test]
    fn backspace_deletes() {
        let mut buffer = InputBuffer::default();
        type_text(&mut buffer, "sushj");
        buffer.handle_key(key(KeyCode::Backspace));
        type_text(&mut buffer, "i");
        assert_eq!(buffer.text(), "sushi");
        let mut empty = InputBuffer::default();
        assert_eq!(empty.handle_key(key(KeyCode::Backspace)), KeyOutcome::Ignored);
    }

    #[test]
    fn ctrl_c_interrupts_and_clears() {
        let mut buffer = InputBuffer::default();
        type_text(&mut buffer, "half typed");
        assert_eq!(
            buffer.handle_key(with(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            KeyOutcome::Interrupted
        );
        assert_eq!(buffer.text(), "");
    }

    #[test]
    fn ctrl_d_is_eof_only_when_empty() {
        let mut buffer = InputBuffer::default();
        type_text(&mut buffer, "x");
        let ctrl_d = with(KeyCode::Char('d'), KeyModifiers::CONTROL);
        assert_eq!(buffer.handle_key(ctrl_d), KeyOutcome::Ignored);
        buffer.handle_key(key(KeyCode::Backspace));
        assert_eq!(buffer.handle_key(ctrl_d), KeyOutcome::Eof);
    }

    #[test]
    fn shifted_characters_are_typed() {
        let mut buffer = InputBuffer::default();
        buffer.handle_key(with(KeyCode::Char('T'), KeyModifiers::SHIFT));
        assert_eq!(buffer.text(), "T");
    }

    #[test]
    fn release_events_are_ignored() {
        let mut buffer = InputBuffer::default();
        let mut release = key(KeyCode::Char('a'));
        release.kind = KeyEventKind::Release;
        assert_eq!(buffer.handle_key(release), KeyOutcome::Ignored);
        assert_eq!(buffer.text(), "");
    }

    #[test]
    fn paste_normalizes_line_endings() {
        let mut buffer = InputBuffer::default();
        buffer.insert_str("a\r\nb\rc");
        assert_eq!(buffer.text(), "a\nb\nc");
    }
}
