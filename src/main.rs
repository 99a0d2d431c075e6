use clap::Parser;
use playbook_qa::cli::*;
use playbook_qa::config::AppConfig;
use playbook_qa::QaError;
use playbook_qa::Result;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Environment from .env (GOOGLE_API_KEY etc.), if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) if !path.is_file() => {
            return Err(QaError::ConfigError(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        Some(path) => AppConfig::load_with_env(path)?,
        None => AppConfig::load()?,
    };

    // Initialize logging
    let _guard = if cli.verbose {
        playbook_qa::logging::init_logging_with_level("debug")?
    } else {
        playbook_qa::logging::init_logging_with_config(&config)?
    };
    info!("Configuration loaded successfully");

    match cli.command {
        Commands::Serve {
            host,
            port,
            placeholder,
        } => handle_serve_api(&config, host, port, placeholder).await?,
        Commands::Index(IndexCommands::Build { force }) => {
            handle_index_build(&config, force).await?;
        }
        Commands::Index(IndexCommands::Info) => handle_index_info(&config).await?,
        Commands::Ask {
            question,
            sources_only,
        } => handle_ask(&config, &question, sources_only).await?,
        Commands::Config => handle_config_command(&config).await?,
    }

    Ok(())
}
