use std::sync::Arc;
use clap::Parser;
use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use crate::llm::{Analyzer, LLMConfig};
use crate::llm::config::{DEFAULT_API_URL, DEFAULT_MODEL_NAME};

mod llm;
mod web;

/// Web form that asks a chat-completions model to explain release notes, logs or configuration
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Base URL of the model-serving endpoint
    #[arg(long, env = "MODEL_API_URL", default_value = DEFAULT_API_URL)]
    model_api_url: String,

    /// Model identifier sent with every request
    #[arg(long, env = "MODEL_NAME", default_value = DEFAULT_MODEL_NAME)]
    model_name: String,

    /// Address to listen on
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 8000)]
    port: u16,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    setup_logging(&args.log_level)?;

    let analyzer = Arc::new(Analyzer::new(setup_llm_config(&args))?);
    info!(
        "Using model {} at {}",
        analyzer.config().model_name,
        analyzer.config().completions_url()
    );

    let addr = format!("{}:{}", args.host, args.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, web::create_routes(analyzer))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server exited with an error")?;

    info!("Server stopped");
    Ok(())
}

fn parse_level(log_level: &str) -> Level {
    match log_level.to_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn setup_logging(log_level: &str) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(parse_level(log_level))
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_thread_names(false)
        .with_ansi(true)
        .with_timer(tracing_subscriber::fmt::time::LocalTime::rfc_3339())
        .with_level(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install tracing subscriber")?;

    Ok(())
}

fn setup_llm_config(args: &Args) -> LLMConfig {
    LLMConfig::new(args.model_api_url.clone(), args.model_name.clone())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("DEBUG"), Level::DEBUG);
        assert_eq!(parse_level("warn"), Level::WARN);
        assert_eq!(parse_level("error"), Level::ERROR);
        assert_eq!(parse_level("verbose"), Level::INFO);
    }

    #[test]
    fn test_flags_build_llm_config() {
        let args = Args::try_parse_from([
            "release-explainer",
            "--model-api-url",
            "http://models.internal/v1/",
            "--model-name",
            "ai/llama3.2",
            "--port",
            "9000",
        ])
        .unwrap();

        assert_eq!(args.port, 9000);
        let config = setup_llm_config(&args);
        assert_eq!(config.model_name, "ai/llama3.2");
        assert_eq!(config.completions_url(), "http://models.internal/v1/chat/completions");
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
