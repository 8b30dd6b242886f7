//! Backend health check command.

use anyhow::{Context, Result};
use console::style;

use crate::state::AppState;

use super::{Output, spinner};

/// Probe the backend and report each dependency.
///
/// Fails (non-zero exit) when the backend is unreachable or not healthy.
pub async fn health(state: &AppState, out: Output) -> Result<()> {
    let spinner = spinner(out, "Checking backend...");
    let result = state.client.health().await;
    spinner.finish_and_clear();
    let health = result.with_context(|| format!("Backend at {} is unreachable", state.client.base_url()))?;

    if out.json {
        println!("{}", serde_json::to_string_pretty(&health)?);
    } else if !out.quiet {
        let check_mark = |ok: bool| {
            if ok {
                format!("{}", style("✓").green())
            } else {
                format!("{}", style("✗").red())
            }
        };

        println!();
        println!(
            "  {} Forkful backend at {}",
            style("🍴").bold(),
            style(state.client.base_url()).cyan()
        );
        println!();
        println!(
            "  {} Status: {}",
            check_mark(health.is_healthy()),
            style(&health.status).bold()
        );
        if !health.version.is_empty() {
            println!("    Version:     {}", health.version);
        }
        if !health.environment.is_empty() {
            println!("    Environment: {}", health.environment);
        }
        if !health.services.is_empty() {
            println!();
            println!("  {}", style("── Services ──").dim());
            for (name, status) in &health.services {
                println!("  {} {name}: {status}", check_mark(status == "healthy"));
            }
        }
        println!();
        println!(
            "  {}",
            style(format!("Config: {}", state.data_dir.join("config.toml").display())).dim()
        );
        println!();
    }

    if !health.is_healthy() {
        anyhow::bail!(
            "Backend reports '{}' (degraded: {})",
            health.status,
            health.degraded_services().join(", ")
        );
    }
    Ok(())
}
