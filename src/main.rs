use clap::Parser;
use quick_apply::cli::commands::{cmd_apply, cmd_scan};
use quick_apply::cli::config::{Cli, Commands, build_session_config, load_config};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());

    // Resolve Ollama settings: CLI > config > defaults
    let ollama_endpoint = cli
        .ollama_endpoint
        .as_deref()
        .or(config.ollama.endpoint.as_deref());
    let ollama_model = cli
        .ollama_model
        .as_deref()
        .or(config.ollama.model.as_deref());

    match cli.command {
        Commands::Apply {
            marker,
            max_pages,
            out,
            oracle,
            driver,
        } => {
            let session_config = build_session_config(
                &config.session,
                marker.as_deref(),
                max_pages,
                out.as_deref(),
            );
            let driver = driver.as_deref().unwrap_or(&config.session.driver);
            cmd_apply(
                &session_config,
                driver,
                &oracle,
                cli.verbose,
                ollama_endpoint,
                ollama_model,
            )?;
        }
        Commands::Scan { marker, driver } => {
            let marker = marker.as_deref().unwrap_or(&config.session.marker);
            let driver = driver.as_deref().unwrap_or(&config.session.driver);
            cmd_scan(driver, marker, cli.verbose)?;
        }
    }

    Ok(())
}
