//! Slash command parsing and help text for the chat loop.
//!
//! Commands start with `/` and control the conversation, the location,
//! and restaurant lookups without sending anything to the assistant.

use console::style;

/// What `/location` should do.
#[derive(Debug, PartialEq)]
pub enum LocationAction {
    /// Look up the current position.
    Detect,
    /// Use a typed address.
    Set(String),
    /// Forget the location.
    Clear,
    /// Print the current location.
    Show,
}

/// Target of `/details`.
#[derive(Debug, PartialEq)]
pub enum DetailsTarget {
    /// 1-based position in the last restaurant list.
    Index(usize),
    /// Backend restaurant id.
    Id(String),
}

/// Available slash commands in the chat loop.
#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    /// Show available commands.
    Help,
    /// Clear the conversation and the restaurant list.
    Clear,
    /// Exit the chat session.
    Exit,
    /// Location controls.
    Location(LocationAction),
    /// Send the n-th suggestion (1-based).
    Suggest(usize),
    /// Show one restaurant in full.
    Details(DetailsTarget),
    /// Show restaurants near the current location.
    Nearby,
    /// Show the restaurant list from the last reply again.
    Restaurants,
    /// Show session information.
    Session,
    /// Unknown command or bad arguments.
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let (cmd, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((cmd, rest)) => (cmd.to_lowercase(), rest.trim()),
        None => (trimmed.to_lowercase(), ""),
    };

    let command = match cmd.as_str() {
        "/help" | "/h" | "/?" => ChatCommand::Help,
        "/clear" | "/new" => ChatCommand::Clear,
        "/exit" | "/quit" | "/q" => ChatCommand::Exit,
        "/location" | "/loc" => parse_location(arg),
        "/suggest" | "/s" => match arg.parse::<usize>() {
            Ok(n) if n >= 1 => ChatCommand::Suggest(n),
            _ => ChatCommand::Unknown("/suggest requires a number, e.g. /suggest 1".to_string()),
        },
        "/details" | "/d" => {
            if arg.is_empty() {
                ChatCommand::Unknown("/details requires a number or restaurant id".to_string())
            } else {
                match arg.parse::<usize>() {
                    Ok(n) if n >= 1 => ChatCommand::Details(DetailsTarget::Index(n)),
                    _ => ChatCommand::Details(DetailsTarget::Id(arg.to_string())),
                }
            }
        }
        "/nearby" => ChatCommand::Nearby,
        "/restaurants" | "/list" => ChatCommand::Restaurants,
        "/session" => ChatCommand::Session,
        other => ChatCommand::Unknown(other.to_string()),
    };
    Some(command)
}

fn parse_location(arg: &str) -> ChatCommand {
    let (sub, rest) = match arg.split_once(char::is_whitespace) {
        Some((sub, rest)) => (sub.to_lowercase(), rest.trim()),
        None => (arg.to_lowercase(), ""),
    };
    match sub.as_str() {
        "" | "detect" => ChatCommand::Location(LocationAction::Detect),
        "clear" => ChatCommand::Location(LocationAction::Clear),
        "show" => ChatCommand::Location(LocationAction::Show),
        "set" if !rest.is_empty() => ChatCommand::Location(LocationAction::Set(rest.to_string())),
        "set" => ChatCommand::Unknown("/location set requires an address".to_string()),
        _ => ChatCommand::Unknown(format!("unknown /location action '{sub}'")),
    }
}

/// Help text listing all available commands.
pub fn help_text() -> String {
    let rows = [
        ("/help", "Show this help message"),
        ("/clear", "Clear the conversation and restaurant list"),
        ("/exit", "End the chat session"),
        ("/location", "Detect your current location"),
        ("/location set <addr>", "Use a typed address"),
        ("/location clear", "Forget the location"),
        ("/suggest <n>", "Send the n-th suggestion"),
        ("/details <n|id>", "Show a restaurant in full"),
        ("/nearby", "Restaurants near your location"),
        ("/restaurants", "Show the last restaurant list again"),
        ("/session", "Show the current session"),
    ];
    let width = rows.iter().map(|(cmd, _)| cmd.len()).max().unwrap_or(0);

    let mut out = format!("  {}\n\n", style("Available commands:").bold());
    for (cmd, description) in rows {
        out.push_str(&format!(
            "  {}{}  {description}\n",
            style(cmd).cyan(),
            " ".repeat(width - cmd.len())
        ));
    }
    out.push('\n');
    out.push_str(&format!(
        "  {}\n",
        style("Enter sends, Alt+Enter adds a line, Ctrl+C clears the input, Ctrl+D exits").dim()
    ));
    out
}
