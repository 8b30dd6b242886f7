//! Transcript rendering for the chat loop.
//!
//! `TranscriptView` remembers which messages it has already printed, so each
//! state update renders only newly appended messages. Printed output cannot
//! be taken back: a message removed from the transcript gets a one-line
//! notice instead.
//! Assistant replies are rendered as terminal markdown through `termimad`.

use std::collections::HashSet;

use chrono::Local;
use console::style;
use termimad::MadSkin;
use termimad::crossterm::style::Color;
use uuid::Uuid;

use forkful_types::chat::{ChatMessage, MessageRole};

use super::banner::welcome_text;

/// Incremental transcript printer.
pub struct TranscriptView {
    skin: Option<MadSkin>,
    /// Ids of messages already printed.
    printed: HashSet<Uuid>,
    last_role: Option<MessageRole>,
    welcome_shown: bool,
}

impl TranscriptView {
    /// View that renders assistant replies as markdown.
    pub fn new() -> Self {
        let mut skin = MadSkin::default_dark();
        skin.bold.set_fg(Color::Cyan);
        skin.headers[0].set_fg(Color::Cyan);
        skin.headers[1].set_fg(Color::Cyan);
        skin.inline_code.set_fg(Color::Yellow);
        Self::with_skin(Some(skin))
    }

    /// View that prints message text verbatim.
    pub fn plain() -> Self {
        Self::with_skin(None)
    }

    fn with_skin(skin: Option<MadSkin>) -> Self {
        Self {
            skin,
            printed: HashSet::new(),
            last_role: None,
            welcome_shown: false,
        }
    }

    /// Render whatever changed since the previous call.
    ///
    /// An empty transcript renders the welcome text once. A transcript that
    /// shares no message with what was printed starts the view over.
    pub fn update(&mut self, messages: &[ChatMessage]) -> String {
        if messages.is_empty() {
            self.reset();
            if self.welcome_shown {
                return String::new();
            }
            self.welcome_shown = true;
            return welcome_text();
        }

        let kept = messages
            .iter()
            .filter(|m| self.printed.contains(&m.id))
            .count();
        if kept == 0 {
            self.reset();
        }
        self.welcome_shown = false;

        let mut out = String::new();
        let removed = self.printed.len() - kept;
        if removed > 0 {
            out.push_str(&removed_notice(removed));
            self.last_role = None;
        }
        for message in messages.iter().filter(|m| !self.printed.contains(&m.id)) {
            if self.last_role != Some(message.role) {
                out.push('\n');
                out.push_str(&role_header(message));
                self.last_role = Some(message.role);
            }
            out.push_str(&self.render_body(message));
        }
        self.printed = messages.iter().map(|m| m.id).collect();
        out
    }

    fn reset(&mut self) {
        self.printed.clear();
        self.last_role = None;
    }

    fn render_body(&self, message: &ChatMessage) -> String {
        let time = message.timestamp.with_timezone(&Local).format("%H:%M");
        let body = match (&self.skin, message.role) {
            (Some(skin), MessageRole::Assistant) => skin.term_text(&message.content).to_string(),
            _ => message.content.clone(),
        };

        let mut out = String::new();
        for line in body.trim_end().lines() {
            out.push_str("    ");
            out.push_str(line);
            out.push('\n');
        }
        out.push_str(&format!("    {}\n", style(time).dim()));
        out
    }
}

impl Default for TranscriptView {
    fn default() -> Self {
        Self::new()
    }
}

fn removed_notice(count: usize) -> String {
    let text = if count == 1 {
        "1 unsent message removed".to_string()
    } else {
        format!("{count} unsent messages removed")
    };
    format!("  {}\n", style(text).dim().italic())
}

fn role_header(message: &ChatMessage) -> String {
    match message.role {
        MessageRole::User => format!("  {}\n", style("You").green().bold()),
        MessageRole::Assistant => format!("  {}\n", style("Forkful").cyan().bold()),
        MessageRole::System => format!("  {}\n", style("System").dim().bold()),
    }
}
