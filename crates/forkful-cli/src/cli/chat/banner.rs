//! Welcome banner and empty-transcript text.

use console::style;

/// Example prompts shown while the transcript is empty.
pub const EXAMPLE_PROMPTS: [&str; 4] = [
    "Find me Italian restaurants nearby",
    "Show me cheap sushi places",
    "Best rated restaurants in San Francisco",
    "Vegan-friendly cafes with outdoor seating",
];

/// Print the banner at the start of a chat session.
///
/// Shows the backend address and how to get help. Printed before the
/// terminal enters raw mode.
pub fn print_welcome_banner(backend: &str, location_source: &str) {
    println!();
    println!("  🍴 {}", style("Forkful").cyan().bold());
    println!("  {}", style("AI-powered restaurant recommendations").dim());
    println!();
    println!("  {}  {}", style("Backend:").bold(), style(backend).dim());
    println!("  {} {}", style("Location:").bold(), style(location_source).dim());
    println!();
    println!(
        "  {}",
        style("Enter to send, Alt+Enter for a new line. /help for commands, Ctrl+D to exit").dim()
    );
    println!("  {}", style("---").dim());
    println!();
}

/// Text shown whenever the transcript is empty.
pub fn welcome_text() -> String {
    let mut out = String::new();
    out.push_str(&format!("  {}\n", style("Welcome! 👋").bold()));
    out.push_str(&format!("  {}\n\n", style("Ask me to find restaurants near you.").dim()));
    out.push_str(&format!("  {}\n", style("Try asking:").bold()));
    for prompt in EXAMPLE_PROMPTS {
        out.push_str(&format!("    {} \"{prompt}\"\n", style("•").dim()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_welcome_lists_examples() {
        console::set_colors_enabled(false);
        let text = welcome_text();
        assert!(text.contains("Welcome!"));
        for prompt in EXAMPLE_PROMPTS {
            assert!(text.contains(prompt));
        }
    }
}
