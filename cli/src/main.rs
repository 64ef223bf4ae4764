use anyhow::Result;
use canvassist_core::error::ConfigError;
use canvassist_core::{AgentLoop, CanvasClient, Config, ContextBuilder, OpenAIProvider, ToolRegistry};
use clap::Parser;
use console::style;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, info};

mod repl;

use crate::repl::ConsoleCommand;

#[derive(Parser)]
#[command(name = "canvassist")]
#[command(about = "canvassist - a terminal assistant for Canvas LMS", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Process a single message and exit
    #[arg(short, long)]
    message: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let dotenv_path = dotenvy::dotenv().ok();

    let filter = if cli.debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Some(path) = dotenv_path {
        debug!("Loaded environment from {}", path.display());
    }

    let config = match Config::load() {
        Ok(config) => config,
        Err(ConfigError::MissingRequired(keys)) => {
            eprint!("{}", missing_config_report(&keys));
            return ExitCode::from(1);
        }
        Err(e) => {
            eprintln!("{} {}", style("✗").red().bold(), e);
            return ExitCode::from(1);
        }
    };

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} Error: {}", style("✗").red().bold(), e);
            ExitCode::from(1)
        }
    }
}

fn missing_config_report(keys: &[String]) -> String {
    let mut report = format!("{} Missing required configuration:\n", style("✗").red().bold());
    for key in keys {
        report.push_str(&format!("  - {}\n", key));
    }
    report.push_str(
        "Set them in a .env file, in the environment or in ~/.canvassist/config.toml.\n",
    );
    report
}

fn build_agent(config: &Config) -> AgentLoop {
    let provider = OpenAIProvider::new(&config.openai_api_key)
        .with_model(&config.openai_model)
        .with_base_url(&config.openai_base_url)
        .with_temperature(config.temperature);

    let lms = Arc::new(CanvasClient::from_config(config));
    let tool_registry = Arc::new(ToolRegistry::new(lms));
    let context_builder = ContextBuilder::new(&config.system_prompt);

    AgentLoop::new(Arc::new(provider), context_builder, tool_registry)
        .with_max_history(config.max_history)
}

async fn run(cli: Cli, config: Config) -> Result<()> {
    debug!(
        "Using model {} against Canvas at {}",
        config.openai_model, config.canvas_api_url
    );
    let mut agent = build_agent(&config);

    if let Some(message) = cli.message {
        let response = agent.process(&message).await;
        repl::print_response(&response);
        return Ok(());
    }

    repl::print_welcome();
    let mut editor = DefaultEditor::new()?;

    loop {
        let line = match editor.readline("> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                println!("\nOperation cancelled by user. Exiting...");
                break;
            }
            Err(ReadlineError::Eof) => {
                repl::print_goodbye();
                break;
            }
            Err(e) => return Err(e.into()),
        };

        let Some(command) = ConsoleCommand::parse(&line) else {
            continue;
        };
        let _ = editor.add_history_entry(line.trim());

        match command {
            ConsoleCommand::Exit => {
                repl::print_goodbye();
                break;
            }
            ConsoleCommand::Reset => {
                agent.reset();
                info!("Conversation reset by user");
                println!("{}", style("Conversation history has been reset.").green());
            }
            ConsoleCommand::Help => repl::print_welcome(),
            ConsoleCommand::Message(message) => {
                println!("{}", style("Processing...").dim());
                let response = agent.process(&message).await;
                repl::print_response(&response);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_config_report_lists_keys_and_points_at_dotenv() {
        let report = missing_config_report(&[
            "OPENAI_API_KEY".to_string(),
            "CANVAS_ACCESS_TOKEN".to_string(),
        ]);
        assert!(report.contains("  - OPENAI_API_KEY\n"));
        assert!(report.contains("  - CANVAS_ACCESS_TOKEN\n"));
        assert!(report.contains(".env file"));
    }

    #[test]
    fn dotenv_file_feeds_config_lookup() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "CANVASSIST_DOTENV_CHECK_TOKEN=from-dotenv").unwrap();
        dotenvy::from_path(file.path()).unwrap();

        let mut config = Config::default();
        config
            .apply_env_with(|key| match key {
                "CANVAS_ACCESS_TOKEN" => std::env::var("CANVASSIST_DOTENV_CHECK_TOKEN").ok(),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.canvas_access_token, "from-dotenv");
    }
}
