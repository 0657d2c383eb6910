use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::StoreConfig;
use crate::store::{DocumentList, DocumentStore, Filter, StoreError};

pub struct AppwriteStore {
    http: Client,
    endpoint: String,
    project_id: String,
    api_key: String,
    database_id: String,
}

impl AppwriteStore {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            http: Client::new(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            project_id: config.project_id.clone(),
            api_key: config.api_key.clone(),
            database_id: config.database_id.clone(),
        }
    }

    fn collection_url(&self, collection: &str) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.endpoint, self.database_id, collection
        )
    }

    fn document_url(&self, collection: &str, id: &str) -> String {
        format!("{}/{}", self.collection_url(collection), id)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, StoreError> {
        let response = request
            .header("X-Appwrite-Project", &self.project_id)
            .header("X-Appwrite-Key", &self.api_key)
            .send()
            .await?;
        Ok(response)
    }
}

/// Renders an equality predicate in Appwrite query syntax. Values are
/// JSON-encoded, so quotes in user input cannot break out of the list.
fn equal_query(filter: &Filter) -> String {
    let values = serde_json::to_string(&filter.values).unwrap_or_else(|_| "[]".to_string());
    format!("equal(\"{}\", {})", filter.field, values)
}

#[derive(Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
}

async fn api_error(response: Response) -> StoreError {
    let status = response.status().as_u16();
    let message = match response.json::<ApiErrorBody>().await {
        Ok(body) => body.message,
        Err(_) => String::new(),
    };
    log::warn!("Appwrite call failed with {status}: {message}");
    StoreError::Api { status, message }
}

#[async_trait]
impl DocumentStore for AppwriteStore {
    async fn list_documents(
        &self,
        collection: &str,
        filters: &[Filter],
    ) -> Result<DocumentList, StoreError> {
        let queries: Vec<(&str, String)> = filters
            .iter()
            .map(|filter| ("queries[]", equal_query(filter)))
            .collect();
        let response = self
            .send(self.http.get(self.collection_url(collection)).query(&queries))
            .await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        Ok(response.json::<DocumentList>().await?)
    }

    async fn get_document(&self, collection: &str, id: &str) -> Result<Value, StoreError> {
        let response = self
            .send(self.http.get(self.document_url(collection, id)))
            .await?;
        match response.status() {
            status if status.is_success() => Ok(response.json().await?),
            StatusCode::NOT_FOUND => Err(StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            }),
            _ => Err(api_error(response).await),
        }
    }

    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        data: Value,
    ) -> Result<Value, StoreError> {
        let response = self
            .send(
                self.http
                    .patch(self.document_url(collection, id))
                    .json(&json!({ "data": data })),
            )
            .await?;
        match response.status() {
            status if status.is_success() => Ok(response.json().await?),
            StatusCode::NOT_FOUND => Err(StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            }),
            _ => Err(api_error(response).await),
        }
    }
}
