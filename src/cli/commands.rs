use crate::SessionConfig;
use crate::browser::page::Page;
use crate::browser::session::BrowserSession;
use crate::flow::walker::item_identity;
use crate::oracle::client::{OllamaHttpOracle, OllamaProcessOracle, Oracle, ScriptedOracle};
use crate::run_session;

// ============================================================================
// apply subcommand
// ============================================================================

pub fn cmd_apply(
    session_config: &SessionConfig,
    driver: &str,
    oracle_name: &str,
    verbose: u8,
    ollama_endpoint: Option<&str>,
    ollama_model: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let oracle = build_oracle(oracle_name, ollama_endpoint, ollama_model);
    let mut session = BrowserSession::launch(driver)?;

    if verbose > 0 {
        eprintln!(
            "Applying (marker='{}', oracle={}, records={})...",
            session_config.marker, oracle_name, session_config.records_path
        );
    }

    let summary = run_session(&mut session, oracle.as_ref(), session_config)?;
    session.quit()?;

    println!(
        "{} page(s) walked, {} submitted, {} abandoned",
        summary.pages, summary.submitted, summary.abandoned
    );
    Ok(())
}

// ============================================================================
// scan subcommand
// ============================================================================

/// Enumerate the rendered cards and report which would be applied to,
/// without opening anything.
pub fn cmd_scan(
    driver: &str,
    marker: &str,
    verbose: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = BrowserSession::launch(driver)?;

    if verbose > 0 {
        eprintln!("Scanning rendered cards (marker='{}')...", marker);
    }

    session.wait_for_cards(15_000)?;
    let cards = session.read_cards()?;

    println!("{} card(s) rendered", cards.len());
    for card in &cards {
        let id = item_identity(card);
        let eligible = card.text.contains(marker);
        let title = card.text.lines().next().unwrap_or("");
        println!(
            "  [{}] {} — {}",
            if eligible { "apply" } else { " skip" },
            id,
            title
        );
    }

    session.quit()?;
    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

/// Build the oracle backend by name.
fn build_oracle(
    name: &str,
    ollama_endpoint: Option<&str>,
    ollama_model: Option<&str>,
) -> Box<dyn Oracle> {
    match name {
        "http" => {
            let endpoint = ollama_endpoint.unwrap_or("http://localhost:11434/api/generate");
            let model = ollama_model.unwrap_or("qwen2.5:1.5b");
            Box::new(OllamaHttpOracle::new(endpoint, model))
        }
        "scripted" => Box::new(ScriptedOracle::unknown()),
        _ => {
            let model = ollama_model.unwrap_or("qwen2.5:1.5b");
            Box::new(OllamaProcessOracle::new(model))
        }
    }
}
