// Module declarations
pub mod ids;
pub mod persistence;

// Re-export all implementations
pub use ids::UuidIdGenerator;
pub use persistence::InMemoryDocumentRepository;

// End-to-end checks of the manager running on the real in-memory stack.
#[cfg(test)]
mod tests {
    use super::*;
    use application::{DocumentManager, ManagerConfig};
    use chrono::{Duration, Utc};
    use domain::{Author, Document, SearchRequest};
    use std::collections::HashSet;
    use std::sync::Arc;

    fn manager() -> DocumentManager {
        DocumentManager::new(
            Arc::new(InMemoryDocumentRepository::new()),
            Arc::new(UuidIdGenerator::new()),
            ManagerConfig::default(),
        )
    }

    fn titles(docs: &[Document]) -> Vec<&str> {
        docs.iter().map(|d| d.title.as_str()).collect()
    }

    #[tokio::test]
    async fn alpha_beta_alphabet_scenario() {
        let manager = manager();
        let a1 = Author::new("A1", "Ada").unwrap();
        let a2 = Author::new("A2", "Brian").unwrap();

        manager
            .save(Document::new("Alpha", "first", a1.clone()))
            .await
            .unwrap();
        manager
            .save(Document::new("Beta", "second", a2))
            .await
            .unwrap();
        manager
            .save(Document::new("Alphabet", "third", a1))
            .await
            .unwrap();

        let alpha = manager
            .search(&SearchRequest::new().title_prefixes(["Alpha"]))
            .await
            .unwrap();
        assert_eq!(titles(&alpha), vec!["Alpha", "Alphabet"]);

        let by_a2 = manager
            .search(&SearchRequest::new().author_ids(["A2"]))
            .await
            .unwrap();
        assert_eq!(titles(&by_a2), vec!["Beta"]);

        let all = manager.search(&SearchRequest::new()).await.unwrap();
        assert_eq!(titles(&all), vec!["Alpha", "Beta", "Alphabet"]);
    }

    #[tokio::test]
    async fn saved_ids_are_unique_and_resolvable() {
        let manager = manager();
        let author = Author::new("A1", "Ada").unwrap();
        let mut ids = HashSet::new();
        for i in 0..50 {
            let saved = manager
                .save(Document::new(format!("Doc {}", i), "body", author.clone()))
                .await
                .unwrap();
            let id = saved.id.clone().unwrap();
            assert!(!id.is_empty());
            assert!(ids.insert(id.clone()));

            let found = manager.find_by_id(id.as_str()).await.unwrap();
            assert_eq!(found, Some(saved));
        }
        assert_eq!(manager.count().await.unwrap(), 50);
        assert_eq!(manager.find_by_id("nonexistent").await.unwrap(), None);
    }

    #[tokio::test]
    async fn update_keeps_created_and_position() {
        let manager = manager();
        let author = Author::new("A1", "Ada").unwrap();
        let first = manager
            .save(Document::new("Draft", "v1", author.clone()))
            .await
            .unwrap();
        manager
            .save(Document::new("Other", "x", author))
            .await
            .unwrap();

        let mut update = first.clone();
        update.content = "v2".to_string();
        update.created = Some(Utc::now() + Duration::days(1));
        let updated = manager.save(update).await.unwrap();

        assert_eq!(updated.id, first.id);
        assert_eq!(updated.created, first.created);
        let all = manager.search(&SearchRequest::new()).await.unwrap();
        assert_eq!(titles(&all), vec!["Draft", "Other"]);
        assert_eq!(all[0].content, "v2");
    }

    #[tokio::test]
    async fn created_bounds_are_inclusive() {
        let manager = manager();
        let saved = manager
            .save(Document::new("Timed", "body", Author::new("A1", "Ada").unwrap()))
            .await
            .unwrap();
        let created = saved.created.unwrap();

        let exact = manager
            .search(&SearchRequest::new().created_from(created).created_to(created))
            .await
            .unwrap();
        assert_eq!(titles(&exact), vec!["Timed"]);

        let later = manager
            .search(&SearchRequest::new().created_from(created + Duration::milliseconds(1)))
            .await
            .unwrap();
        assert!(later.is_empty());
    }
}
