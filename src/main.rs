//! Stackdriver trace propagation toolkit.
//!
//! # Commands
//!
//! ```text
//! stackdriver-trace [--config FILE] config
//!     Print the effective configuration (file + environment) as JSON.
//!
//! stackdriver-trace [--config FILE] extract -H "Name: value" [-H ...] [--style STYLE ...]
//!     Run the extractor chain over the given headers and print the result.
//!
//! stackdriver-trace [--config FILE] serve [--bind ADDR]
//!     Serve GET /context, echoing the context extracted from each request.
//! ```

use std::path::PathBuf;

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;

use stackdriver_trace::config::{self, AppConfig};
use stackdriver_trace::http::{context_json, HttpServer};
use stackdriver_trace::observability::logging;
use stackdriver_trace::propagation::{extractor_for_styles, PropagationStyle};

#[derive(Parser)]
#[command(name = "stackdriver-trace")]
#[command(about = "Stackdriver trace context extraction and storage settings", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the effective configuration
    Config,
    /// Extract a trace context from headers
    Extract {
        /// Header as "Name: value"; repeatable
        #[arg(short = 'H', long = "header")]
        headers: Vec<String>,

        /// Propagation styles to try, in order (overrides the config)
        #[arg(short, long = "style")]
        styles: Vec<PropagationStyle>,
    },
    /// Run the diagnostic HTTP server
    Serve {
        /// Bind address (overrides the config)
        #[arg(short, long)]
        bind: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let app_config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => {
            let mut defaults = AppConfig::default();
            config::loader::apply_env_overrides(&mut defaults, |name| std::env::var(name).ok())?;
            defaults
        }
    };

    logging::init_logging(&app_config.observability)?;
    tracing::debug!(
        project_id = ?app_config.storage.stackdriver.project_id(),
        api_host = ?app_config.storage.stackdriver.api_host(),
        "Configuration loaded"
    );

    match cli.command {
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&app_config)?);
        }
        Commands::Extract { headers, styles } => {
            let styles = if styles.is_empty() {
                app_config.propagation.extract.clone()
            } else {
                styles
            };
            let extractor = extractor_for_styles::<HeaderMap>(&styles)?;
            let carrier = parse_headers(&headers)?;
            let extracted = extractor.extract(&carrier)?;
            println!("{}", serde_json::to_string_pretty(&context_json(&extracted))?);
        }
        Commands::Serve { bind } => {
            let bind_address = bind.unwrap_or_else(|| app_config.listener.bind_address.clone());
            let server = HttpServer::new(&app_config)?;
            let listener = TcpListener::bind(&bind_address).await?;
            server.run(listener).await?;
        }
    }

    Ok(())
}

fn parse_headers(raw: &[String]) -> Result<HeaderMap, Box<dyn std::error::Error>> {
    let mut headers = HeaderMap::new();
    for entry in raw {
        let (name, value) = entry
            .split_once(':')
            .ok_or_else(|| format!("header {:?} is not \"Name: value\"", entry))?;
        headers.append(
            HeaderName::from_bytes(name.trim().as_bytes())?,
            HeaderValue::from_str(value.trim())?,
        );
    }
    Ok(headers)
}
