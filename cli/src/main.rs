// ./cli/src/main.rs
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, level_filters::LevelFilter};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use application::{ApplicationError, DocumentManager, ManagerConfig};
use domain::{Document, SearchRequest};
use infrastructure::{InMemoryDocumentRepository, UuidIdGenerator};

const USAGE: &str = "usage: docstore <documents.json> [search.json]";

#[derive(Error, Debug)]
enum CliError {
    #[error("{0}")]
    Usage(&'static str),
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid JSON in '{path}': {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Failed to encode results: {0}")]
    Output(#[from] serde_json::Error),
    #[error(transparent)]
    Application(#[from] ApplicationError),
}

/// Positional arguments: a documents file and an optional search request file.
#[derive(Debug, PartialEq)]
struct Args {
    documents: PathBuf,
    search: Option<PathBuf>,
}

impl Args {
    fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<Self, CliError> {
        let mut args = args.into_iter();
        let documents = args.next().ok_or(CliError::Usage(USAGE))?;
        let search = args.next();
        if args.next().is_some() {
            return Err(CliError::Usage(USAGE));
        }
        Ok(Self {
            documents: documents.into(),
            search: search.map(PathBuf::from),
        })
    }
}

// Application entry point
#[tokio::main]
async fn main() {
    // --- Logger Initialization ---
    // Logs go to stderr so stdout only carries the JSON results.
    let filter: EnvFilter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let result = match Args::parse(env::args().skip(1)) {
        Ok(args) => run(args, ManagerConfig::from_env()).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(output) => println!("{}", output),
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}

/// Loads the documents into a fresh store, runs the search (or lists everything)
/// and returns the matching documents as pretty-printed JSON.
async fn run(args: Args, config: ManagerConfig) -> Result<String, CliError> {
    // --- Dependency Injection ---
    let manager = DocumentManager::new(
        Arc::new(InMemoryDocumentRepository::new()),
        Arc::new(UuidIdGenerator::new()),
        config,
    );

    let documents: Vec<Document> = read_json(&args.documents).await?;
    for document in documents {
        manager.save(document).await?;
    }
    info!(
        documents = manager.count().await?,
        source = %args.documents.display(),
        "Documents loaded"
    );

    let request = match &args.search {
        Some(path) => read_json(path).await?,
        None => SearchRequest::new(),
    };
    let hits = manager.search(&request).await?;
    info!(hits = hits.len(), "Search completed");

    Ok(serde_json::to_string_pretty(&hits)?)
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    serde_json::from_str(&raw).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}
