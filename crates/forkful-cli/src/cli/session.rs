//! Backend session commands: show, delete.

use anyhow::{Context, Result};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use forkful_types::chat::{MessageRole, SessionData};

use crate::state::AppState;

use super::Output;

/// Print the transcript the backend holds for a session.
///
/// # Examples
///
/// ```bash
/// forkful session show 3f0c...
/// forkful session show 3f0c... --json
/// ```
pub async fn show_session(state: &AppState, session_id: &str, out: Output) -> Result<()> {
    let session = state.client.get_session(session_id).await.map_err(|e| {
        if e.is_not_found() {
            anyhow::anyhow!("Session '{session_id}' not found (it may have expired)")
        } else {
            anyhow::Error::new(e).context("Failed to load session")
        }
    })?;

    if out.json {
        println!("{}", serde_json::to_string_pretty(&session)?);
        return Ok(());
    }

    println!();
    println!("  Session {}", style(&session.session_id).cyan().bold());
    println!(
        "  {}",
        style(format!(
            "created {} · updated {}",
            session.created_at.format("%Y-%m-%d %H:%M"),
            session.updated_at.format("%Y-%m-%d %H:%M")
        ))
        .dim()
    );
    if let Some(location) = &session.location {
        println!("  📍 {location}");
    }
    println!();

    if session.messages.is_empty() {
        println!("  {} No messages in this session", style("i").blue().bold());
    } else {
        println!("{}", transcript_table(&session));
    }
    println!();
    Ok(())
}

/// Ask the backend to discard a session.
pub async fn delete_session(state: &AppState, session_id: &str, out: Output) -> Result<()> {
    state
        .client
        .clear_session(session_id)
        .await
        .with_context(|| format!("Failed to delete session '{session_id}'"))?;

    if out.json {
        let result = serde_json::json!({ "session_id": session_id, "deleted": true });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if !out.quiet {
        println!();
        println!(
            "  {} Session {} deleted",
            style("✓").green().bold(),
            style(session_id).cyan()
        );
        println!();
    }
    Ok(())
}

fn transcript_table(session: &SessionData) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Time").fg(Color::White),
        Cell::new("Role").fg(Color::White),
        Cell::new("Message").fg(Color::White),
    ]);

    for message in &session.messages {
        let role = match message.role {
            MessageRole::User => Cell::new("you").fg(Color::Green),
            MessageRole::Assistant => Cell::new("forkful").fg(Color::Cyan),
            MessageRole::System => Cell::new("system").fg(Color::DarkGrey),
        };
        table.add_row(vec![
            Cell::new(message.timestamp.format("%H:%M:%S").to_string()).fg(Color::DarkGrey),
            role,
            Cell::new(&message.content),
        ]);
    }
    table
}
