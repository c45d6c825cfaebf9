//! estester command line
//!
//! Seeds or tears down search-service test indices described by a JSON data
//! file, and runs one-off lookups against them. Responses are printed to
//! stdout as JSON; logs go to stderr.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use estester::{
    DEFAULT_HOST, EsClient, IndexLifecycle, MultiIndexConfig, MultiIndexTestCase, ServiceConfig,
    indices, load_data_file,
};
use serde_json::Value;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "estester-cli")]
#[command(about = "Elasticsearch test index scaffolding")]
struct Cli {
    /// Base URL of the search service.
    #[arg(long, env = "ESTESTER_HOST", default_value = DEFAULT_HOST)]
    host: String,

    /// Proxy for http URLs.
    #[arg(long, env = "ESTESTER_HTTP_PROXY")]
    http_proxy: Option<String>,

    /// Proxy for https URLs.
    #[arg(long, env = "ESTESTER_HTTPS_PROXY")]
    https_proxy: Option<String>,

    /// Per-request timeout, e.g. `30s`.
    #[arg(long, env = "ESTESTER_REQUEST_TIMEOUT", value_parser = humantime::parse_duration)]
    request_timeout: Option<Duration>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "ESTESTER_LOG_LEVEL", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create every index in a data file, attach aliases and load fixtures.
    Setup {
        /// JSON file mapping index names to settings, mappings, fixtures and aliases.
        #[arg(long)]
        data: PathBuf,

        /// Keep indices that already exist instead of recreating them.
        #[arg(long)]
        no_reset: bool,

        /// Wait after loading fixtures, e.g. `5s`; `0s` disables the wait.
        #[arg(long, default_value = "5s", value_parser = humantime::parse_duration)]
        settle: Duration,
    },

    /// Delete every index in a data file.
    Teardown {
        #[arg(long)]
        data: PathBuf,
    },

    /// Search an index or alias, or every index when none is given.
    Search {
        #[arg(long)]
        index: Option<String>,

        /// Query body as JSON; defaults to match_all.
        #[arg(long)]
        query: Option<String>,
    },

    /// Fetch one document.
    Get {
        index: String,
        doc_type: String,
        id: String,
    },

    /// Refresh an index, or every index when none is given.
    Refresh { index: Option<String> },

    /// Run text through an analyzer and print the tokens.
    Analyze {
        #[arg(long, default_value = "standard")]
        analyzer: String,
        text: String,
    },

    /// List the aliases of an index.
    Aliases { index: String },
}

impl Cli {
    fn service_config(&self) -> ServiceConfig {
        let mut proxies = BTreeMap::new();
        if let Some(proxy) = &self.http_proxy {
            proxies.insert("http".to_string(), proxy.clone());
        }
        if let Some(proxy) = &self.https_proxy {
            proxies.insert("https".to_string(), proxy.clone());
        }
        ServiceConfig {
            host: self.host.clone(),
            proxies,
            request_timeout: self.request_timeout,
        }
    }
}

fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("estester={},estester_cli={}", level, level)));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn print_json(value: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn multi_case(
    service: ServiceConfig,
    data: &Path,
    reset_index: bool,
    settle: Duration,
) -> anyhow::Result<MultiIndexTestCase> {
    let data = load_data_file(data)?;
    let case = MultiIndexTestCase::new(MultiIndexConfig {
        service,
        data,
        reset_index,
        timeout: Some(settle).filter(|d| !d.is_zero()),
        delete_on_teardown: true,
        ..Default::default()
    })?;
    Ok(case)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let service = cli.service_config();
    if let Err(errors) = service.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    info!(host = %service.host, "Using search service");

    match &cli.command {
        Command::Setup {
            data,
            no_reset,
            settle,
        } => {
            let case = multi_case(service, data, !no_reset, *settle)?;
            case.setup().await?;
            info!(indices = ?case.index_names(), "Setup complete");
        }
        Command::Teardown { data } => {
            let case = multi_case(service, data, true, Duration::ZERO)?;
            case.teardown().await?;
            info!(indices = ?case.index_names(), "Teardown complete");
        }
        Command::Search { index, query } => {
            let client = EsClient::new(&service)?;
            let query = query.as_deref().map(serde_json::from_str::<Value>).transpose()?;
            let response = indices::search(&client, index.as_deref(), query.as_ref()).await?;
            print_json(&response)?;
        }
        Command::Get {
            index,
            doc_type,
            id,
        } => {
            let client = EsClient::new(&service)?;
            print_json(&indices::get_document(&client, index, doc_type, id).await?)?;
        }
        Command::Refresh { index } => {
            let client = EsClient::new(&service)?;
            print_json(&indices::refresh(&client, index.as_deref()).await?)?;
        }
        Command::Analyze { analyzer, text } => {
            let client = EsClient::new(&service)?;
            let tokens = indices::tokenize(&client, text, analyzer).await?;
            print_json(&serde_json::to_value(tokens)?)?;
        }
        Command::Aliases { index } => {
            let client = EsClient::new(&service)?;
            let aliases = indices::get_aliases(&client, index).await?;
            print_json(&serde_json::to_value(aliases)?)?;
        }
    }

    Ok(())
}
