// ./infrastructure/src/persistence/in_memory_repository.rs
use application::{ApplicationError, DocumentRepository};
use async_trait::async_trait;
use domain::{Document, DocumentId};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, instrument};

/// Documents in insertion order plus an id -> position map for O(1) lookup.
#[derive(Debug, Default)]
struct DocumentStore {
    documents: Vec<Document>,
    positions: HashMap<DocumentId, usize>,
}

// --- Document Repository Implementation ---

/// In-process, ordered document storage. A single lock guards the whole collection.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentRepository {
    store: Arc<RwLock<DocumentStore>>,
}

impl InMemoryDocumentRepository {
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(DocumentStore::default())),
        }
    }
}

#[async_trait]
impl DocumentRepository for InMemoryDocumentRepository {
    #[instrument(skip(self, document))]
    async fn save(&self, document: &Document) -> Result<(), ApplicationError> {
        let Some(id) = document.assigned_id().cloned() else {
            error!(title = %document.title, "Refusing to store a document without an id");
            return Err(ApplicationError::InfrastructureError(
                "Cannot store a document without an id".to_string(),
            ));
        };

        let mut store = self.store.write().await;
        match store.positions.get(&id).copied() {
            Some(position) => {
                debug!(doc_id = %id, position, "Replacing document in in-memory store");
                store.documents[position] = document.clone();
            }
            None => {
                debug!(doc_id = %id, "Appending document to in-memory store");
                let position = store.documents.len();
                store.documents.push(document.clone());
                store.positions.insert(id, position);
            }
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get(&self, id: &DocumentId) -> Result<Option<Document>, ApplicationError> {
        debug!(doc_id = %id, "Getting document from in-memory store");
        let store = self.store.read().await;
        let doc = store
            .positions
            .get(id)
            .and_then(|&position| store.documents.get(position))
            .cloned();
        Ok(doc)
    }

    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Document>, ApplicationError> {
        let store = self.store.read().await;
        debug!(count = store.documents.len(), "Listing documents from in-memory store");
        Ok(store.documents.clone())
    }

    async fn count(&self) -> Result<usize, ApplicationError> {
        Ok(self.store.read().await.documents.len())
    }
}
