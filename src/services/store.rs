use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when talking to the document store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: invalid API key or token")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Document store API client
///
/// All persistence is delegated to a hosted document store. The operations
/// consumed are deliberately narrow: create with a generated id, create or
/// overwrite with an explicit id, fetch by id, fetch a whole collection,
/// patch fields by id, and query by equality. Every write is independent;
/// there are no transactions or batched writes.
pub struct StoreClient {
    base_url: String,
    api_key: String,
    project_id: String,
    database_id: String,
    client: Client,
    collections: StoreCollections,
}

/// Collection IDs in the document store
#[derive(Debug, Clone)]
pub struct StoreCollections {
    pub listings: String,
    pub seekers: String,
    pub users: String,
}

impl StoreClient {
    /// Create a new document store client
    pub fn new(
        base_url: String,
        api_key: String,
        project_id: String,
        database_id: String,
        collections: StoreCollections,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self { base_url, api_key, project_id, database_id, client, collections }
    }

    pub fn collections(&self) -> &StoreCollections {
        &self.collections
    }

    fn documents_url(&self, collection: &str) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.base_url.trim_end_matches('/'),
            self.database_id,
            collection
        )
    }

    fn auth_headers(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("X-Store-Key", &self.api_key)
            .header("X-Store-Project", &self.project_id)
    }

    /// Create a document with a generated id; returns the id.
    pub async fn create_document<T: Serialize>(
        &self,
        collection: &str,
        document: &T,
    ) -> Result<String, StoreError> {
        let id = uuid::Uuid::new_v4().to_string();
        self.set_document(collection, &id, document).await?;
        Ok(id)
    }

    /// Create or overwrite a document under an explicit id.
    pub async fn set_document<T: Serialize>(
        &self,
        collection: &str,
        id: &str,
        document: &T,
    ) -> Result<(), StoreError> {
        let url = self.documents_url(collection);

        let mut payload = serde_json::to_value(document)
            .map_err(|e| StoreError::InvalidResponse(format!("Failed to encode document: {}", e)))?;
        if let Some(obj) = payload.as_object_mut() {
            obj.insert("$id".to_string(), Value::String(id.to_string()));
        }

        let response = self
            .auth_headers(self.client.post(&url))
            .json(&payload)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(StoreError::Unauthorized);
        }
        if !response.status().is_success() {
            return Err(StoreError::ApiError(format!(
                "Failed to write document: {}",
                response.status()
            )));
        }

        tracing::debug!("Wrote document {} in {}", id, collection);

        Ok(())
    }

    /// Fetch a single document by id.
    pub async fn get_document<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<T, StoreError> {
        let url = format!("{}/{}", self.documents_url(collection), id);

        let response = self.auth_headers(self.client.get(&url)).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(format!("{}/{}", collection, id)));
        }
        if !response.status().is_success() {
            return Err(StoreError::ApiError(format!(
                "Failed to fetch document: {}",
                response.status()
            )));
        }

        let json: Value = response.json().await?;

        serde_json::from_value(document_data(&json))
            .map_err(|e| StoreError::InvalidResponse(format!("Failed to parse document: {}", e)))
    }

    /// Fetch every document in a collection.
    pub async fn list_documents<T: DeserializeOwned>(
        &self,
        collection: &str,
    ) -> Result<Vec<T>, StoreError> {
        let url = self.documents_url(collection);

        let response = self.auth_headers(self.client.get(&url)).send().await?;

        if !response.status().is_success() {
            return Err(StoreError::ApiError(format!(
                "Failed to list documents: {}",
                response.status()
            )));
        }

        let json: Value = response.json().await?;

        let documents = json
            .get("documents")
            .and_then(|d| d.as_array())
            .ok_or_else(|| StoreError::InvalidResponse("Missing documents array".into()))?;

        let parsed: Vec<T> = documents
            .iter()
            .filter_map(|doc| serde_json::from_value(document_data(doc)).ok())
            .collect();

        tracing::debug!("Listed {} documents from {}", parsed.len(), collection);

        Ok(parsed)
    }

    /// Patch individual fields of a document without touching the rest.
    pub async fn update_document(
        &self,
        collection: &str,
        id: &str,
        fields: Value,
    ) -> Result<(), StoreError> {
        let url = format!("{}/{}", self.documents_url(collection), id);

        let response = self
            .auth_headers(self.client.patch(&url))
            .json(&serde_json::json!({ "data": fields }))
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(format!("{}/{}", collection, id)));
        }
        if !response.status().is_success() {
            return Err(StoreError::ApiError(format!(
                "Failed to update document: {}",
                response.status()
            )));
        }

        tracing::debug!("Updated fields of {}/{}", collection, id);

        Ok(())
    }

    /// Check that the document store is reachable.
    pub async fn health_check(&self) -> bool {
        let url = format!("{}/health", self.base_url.trim_end_matches('/'));
        match self.auth_headers(self.client.get(&url)).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::warn!("Document store health check failed: {}", e);
                false
            }
        }
    }

    /// Query a collection by a single equality predicate.
    pub async fn query_equal<T: DeserializeOwned>(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<T>, StoreError> {
        let queries = vec![format!("equal(\"{}\", \"{}\")", field, value)];
        let queries_json = serde_json::to_string(&queries)
            .map_err(|e| StoreError::InvalidResponse(e.to_string()))?;
        let encoded = urlencoding::encode(&queries_json);

        let url = format!("{}?query={}", self.documents_url(collection), encoded);

        let response = self.auth_headers(self.client.get(&url)).send().await?;

        if !response.status().is_success() {
            return Err(StoreError::ApiError(format!(
                "Failed to query documents: {}",
                response.status()
            )));
        }

        let json: Value = response.json().await?;

        let documents = json
            .get("documents")
            .and_then(|d| d.as_array())
            .ok_or_else(|| StoreError::InvalidResponse("Missing documents array".into()))?;

        Ok(documents
            .iter()
            .filter_map(|doc| serde_json::from_value(document_data(doc)).ok())
            .collect())
    }
}

/// Extract a document's payload, folding the store-level `$id` into an
/// `id` field when the payload does not carry one of its own.
fn document_data(doc: &Value) -> Value {
    let mut data = doc.get("data").unwrap_or(doc).clone();
    if let Some(id) = doc.get("$id").and_then(|v| v.as_str()) {
        if let Some(obj) = data.as_object_mut() {
            obj.entry("id")
                .or_insert_with(|| Value::String(id.to_string()));
        }
    }
    data
}
