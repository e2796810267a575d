use anyhow::Result;
use clap::Parser;
use resume_analyzer::app_log;
use resume_analyzer::cli::{handle_analyze_command, Cli, Command};
use resume_analyzer::logging::init_tracing;
use resume_analyzer::{start_web_server, ConfigManager};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs)?;

    let config = ConfigManager::load()?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            app_log!(
                info,
                "Environment: {}",
                std::env::var("ENVIRONMENT").unwrap_or_else(|_| "local".to_string())
            );
            start_web_server(config).await
        }
        Command::Analyze { file, json, pdf } => {
            handle_analyze_command(&config, file, json, pdf).await
        }
    }
}
