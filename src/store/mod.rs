//! Read-only access to the document store.
//!
//! [`DocumentStore`] lists a collection as plain JSON documents.
//! [`FileStore`] reads local exports, [`FirestoreStore`] the hosted REST API.
//! [`load_ratings`] and [`load_professors`] turn documents into typed records.

mod file;
pub mod firestore;

pub use file::FileStore;
pub use firestore::FirestoreStore;

use anyhow::Result;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::ratings::RatingRecord;
use crate::search::Professor;

/// Lists every document of a collection.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    async fn list(&self, collection: &str) -> Result<Vec<Value>>;
}

/// Loads and converts the ratings collection.
pub async fn load_ratings<S>(store: &S, collection: &str) -> Result<Vec<RatingRecord>>
where
    S: DocumentStore + ?Sized,
{
    let documents = store.list(collection).await?;
    Ok(typed_documents(documents, collection))
}

/// Loads and converts the professors collection.
pub async fn load_professors<S>(store: &S, collection: &str) -> Result<Vec<Professor>>
where
    S: DocumentStore + ?Sized,
{
    let documents = store.list(collection).await?;
    Ok(typed_documents(documents, collection))
}

/// Converts documents into `T`, skipping anything that is not an object.
pub fn typed_documents<T: DeserializeOwned>(documents: Vec<Value>, collection: &str) -> Vec<T> {
    let total = documents.len();
    let records: Vec<T> = documents
        .into_iter()
        .enumerate()
        .filter_map(|(index, document)| {
            if !document.is_object() {
                warn!(collection, index, "Skipping non-object document");
                return None;
            }
            match serde_json::from_value(document) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(collection, index, error = %e, "Skipping unreadable document");
                    None
                }
            }
        })
        .collect();

    debug!(collection, total, kept = records.len(), "Documents converted");
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Fixed(Vec<Value>);

    #[async_trait::async_trait]
    impl DocumentStore for Fixed {
        async fn list(&self, _collection: &str) -> Result<Vec<Value>> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_typed_documents_skips_non_objects() {
        let docs = vec![json!({"quality": 4}), json!("oops"), json!([5, 4]), json!(null)];
        let records: Vec<RatingRecord> = typed_documents(docs, "ratings");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].quality, Some(4.0));
    }

    #[tokio::test]
    async fn test_load_ratings_from_store() {
        let store = Fixed(vec![
            json!({"professorId": "p1", "quality": 5, "tags": ["A"]}),
            json!({"professorId": "p1", "quality": "x"}),
        ]);
        let records = load_ratings(&store, "ratings").await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].quality, None);
    }

    #[tokio::test]
    async fn test_load_professors_through_trait_object() {
        let store: Box<dyn DocumentStore> = Box::new(Fixed(vec![json!({"id": "p1", "name": "Ana Ríos"})]));
        let professors = load_professors(store.as_ref(), "professors").await.unwrap();
        assert_eq!(professors[0].name, "Ana Ríos");
    }
}
