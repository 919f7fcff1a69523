use async_trait::async_trait;
use chrono::Utc;
use domain::{Document, DocumentId, DomainError, SearchRequest};
use std::env;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};

// --- Application Errors ---
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Domain validation error: {0}")]
    DomainError(#[from] DomainError), // Propagate domain errors cleanly
    #[error("Could not generate a unique document id after {attempts} attempts")]
    IdGenerationExhausted { attempts: usize },
    #[error("Infrastructure error: {0}")]
    InfrastructureError(String),
}

// --- Infrastructure Interfaces (Traits) ---

/// Interface for storing and retrieving documents.
/// Implementations must keep insertion order and hold at most one document per id.
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Adds a document, or replaces the stored one with the same id in place.
    /// The document must already carry an id.
    async fn save(&self, document: &Document) -> Result<(), ApplicationError>;
    /// Retrieves a document by its ID.
    async fn get(&self, id: &DocumentId) -> Result<Option<Document>, ApplicationError>;
    /// Lists every stored document in insertion order.
    async fn list(&self) -> Result<Vec<Document>, ApplicationError>;
    /// Returns the number of stored documents.
    async fn count(&self) -> Result<usize, ApplicationError> {
        Ok(self.list().await?.len())
    }
}

/// Source of candidate document ids. Uniqueness against storage is checked by the manager.
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> DocumentId;
}

// --- Configuration ---

const DEFAULT_MAX_ID_ATTEMPTS: usize = 8;
const MAX_ID_ATTEMPTS_ENV: &str = "DOCSTORE_MAX_ID_ATTEMPTS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerConfig {
    /// How many generated ids are tried before `save` gives up on a collision streak.
    pub max_id_attempts: usize,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            max_id_attempts: DEFAULT_MAX_ID_ATTEMPTS,
        }
    }
}

impl ManagerConfig {
    /// Reads `DOCSTORE_MAX_ID_ATTEMPTS`, falling back to the default when unset or invalid.
    pub fn from_env() -> Self {
        Self::from_value(env::var(MAX_ID_ATTEMPTS_ENV).ok().as_deref())
    }

    fn from_value(value: Option<&str>) -> Self {
        let max_id_attempts = match value {
            Some(raw) => match usize::from_str(raw.trim()) {
                Ok(attempts) if attempts > 0 => {
                    info!(
                        "Using {} id generation attempts from environment variable {}.",
                        attempts, MAX_ID_ATTEMPTS_ENV
                    );
                    attempts
                }
                _ => {
                    warn!(
                        "Invalid {} value '{}'. Using default of {} attempts.",
                        MAX_ID_ATTEMPTS_ENV, raw, DEFAULT_MAX_ID_ATTEMPTS
                    );
                    DEFAULT_MAX_ID_ATTEMPTS
                }
            },
            None => {
                info!(
                    "{} not set. Using default of {} attempts.",
                    MAX_ID_ATTEMPTS_ENV, DEFAULT_MAX_ID_ATTEMPTS
                );
                DEFAULT_MAX_ID_ATTEMPTS
            }
        };
        Self { max_id_attempts }
    }
}

// --- Application Services (Use Cases) ---

/// In-memory document store service: upsert, filtered search and lookup by id.
pub struct DocumentManager {
    repo: Arc<dyn DocumentRepository>,
    id_generator: Arc<dyn IdGenerator>,
    config: ManagerConfig,
}

impl DocumentManager {
    pub fn new(
        repo: Arc<dyn DocumentRepository>,
        id_generator: Arc<dyn IdGenerator>,
        config: ManagerConfig,
    ) -> Self {
        Self {
            repo,
            id_generator,
            config,
        }
    }

    /// Upserts a document.
    ///
    /// A missing or empty id is replaced by a freshly generated one that does not
    /// collide with any stored document. `created` is set to the current time only
    /// when the document has never been stored and carries no timestamp; once a
    /// document is stored its creation time never changes.
    #[instrument(skip(self, document), fields(title = %document.title))]
    pub async fn save(&self, mut document: Document) -> Result<Document, ApplicationError> {
        document.validate()?;

        let stored = match document.assigned_id() {
            Some(id) => self.repo.get(id).await?,
            None => {
                document.id = Some(self.generate_unique_id().await?);
                None
            }
        };

        match stored.and_then(|previous| previous.created) {
            Some(original) => {
                if document.created.is_some_and(|created| created != original) {
                    warn!(
                        doc_id = ?document.id,
                        "Ignoring new creation time for an already stored document"
                    );
                }
                document.created = Some(original);
            }
            None => {
                if document.created.is_none() {
                    document.created = Some(Utc::now());
                }
            }
        }

        self.repo.save(&document).await.map_err(|e| {
            error!(doc_id = ?document.id, "Failed to save document to repository: {}", e);
            ApplicationError::InfrastructureError(format!("Repository save failed: {}", e))
        })?;
        info!(doc_id = ?document.id, "Document saved successfully");

        Ok(document)
    }

    /// Returns every stored document that satisfies the request, in insertion order.
    #[instrument(skip(self, request))]
    pub async fn search(&self, request: &SearchRequest) -> Result<Vec<Document>, ApplicationError> {
        if request.has_inverted_range() {
            warn!(
                created_from = ?request.created_from,
                created_to = ?request.created_to,
                "Search range starts after it ends; nothing can match"
            );
        }

        let documents = self.repo.list().await?;
        let total = documents.len();
        let hits: Vec<Document> = documents
            .into_iter()
            .filter(|doc| request.matches(doc))
            .collect();
        debug!(total, hits = hits.len(), "Search finished");
        Ok(hits)
    }

    /// Looks up a document by id. An unknown id is `Ok(None)`, not an error.
    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Document>, ApplicationError> {
        let found = self.repo.get(&DocumentId::new(id)).await?;
        debug!(found = found.is_some(), "Lookup by id finished");
        Ok(found)
    }

    /// Number of stored documents.
    pub async fn count(&self) -> Result<usize, ApplicationError> {
        self.repo.count().await
    }

    // Bounded check-then-regenerate loop.
    async fn generate_unique_id(&self) -> Result<DocumentId, ApplicationError> {
        let attempts = self.config.max_id_attempts;
        for attempt in 1..=attempts {
            let candidate = self.id_generator.generate();
            if candidate.is_empty() {
                warn!(attempt, "Id generator produced an empty id, regenerating");
                continue;
            }
            if self.repo.get(&candidate).await?.is_none() {
                debug!(attempt, doc_id = %candidate, "Generated unique document id");
                return Ok(candidate);
            }
            warn!(attempt, doc_id = %candidate, "Generated id collides with a stored document, regenerating");
        }
        error!(attempts, "Exhausted id generation attempts");
        Err(ApplicationError::IdGenerationExhausted { attempts })
    }
}
