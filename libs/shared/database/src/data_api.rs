use anyhow::{anyhow, Result};
use reqwest::{
    header::{HeaderMap, HeaderValue, CONTENT_TYPE},
    Client,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, error};

use shared_config::AppConfig;

/// Thin client for the MongoDB Atlas Data API. All persistence goes through
/// the JSON action endpoints, so the data layer stays a plain HTTP dependency.
pub struct DataApiClient {
    client: Client,
    base_url: String,
    api_key: String,
    data_source: String,
    database: String,
}

#[derive(Debug, Deserialize)]
struct FindOneResult<T> {
    document: Option<T>,
}

#[derive(Debug, Deserialize)]
struct FindResult<T> {
    documents: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct InsertOneResult {
    #[serde(rename = "insertedId")]
    inserted_id: String,
}

#[derive(Debug, Deserialize)]
struct DeleteResult {
    #[serde(rename = "deletedCount")]
    deleted_count: u64,
}

#[derive(Debug, Deserialize)]
struct UpdateResult {
    #[serde(rename = "matchedCount")]
    matched_count: u64,
    #[serde(rename = "modifiedCount")]
    #[allow(dead_code)]
    modified_count: u64,
}

impl DataApiClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.data_api_url.clone(),
            api_key: config.data_api_key.clone(),
            data_source: config.data_source.clone(),
            database: config.database_name.clone(),
        }
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Ok(key) = HeaderValue::from_str(&self.api_key) {
            headers.insert("api-key", key);
        }
        headers
    }

    async fn action<T>(&self, verb: &str, collection: &str, mut body: Value) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}/action/{}", self.base_url, verb);
        debug!("Data API {} on collection {}", verb, collection);

        if let Some(map) = body.as_object_mut() {
            map.insert("dataSource".to_string(), json!(self.data_source));
            map.insert("database".to_string(), json!(self.database));
            map.insert("collection".to_string(), json!(collection));
        }

        let response = self
            .client
            .post(&url)
            .headers(self.headers())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("Data API error ({}): {}", status, error_text);

            return Err(match status.as_u16() {
                401 | 403 => anyhow!("Authentication error: {}", error_text),
                404 => anyhow!("Resource not found: {}", error_text),
                _ => anyhow!("Data API error ({}): {}", status, error_text),
            });
        }

        let data = response.json::<T>().await?;
        Ok(data)
    }

    pub async fn find_one<T>(&self, collection: &str, filter: Value) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        let result: FindOneResult<T> = self
            .action("findOne", collection, json!({ "filter": filter }))
            .await?;
        Ok(result.document)
    }

    pub async fn find<T>(
        &self,
        collection: &str,
        filter: Value,
        sort: Option<Value>,
        limit: Option<i64>,
    ) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let mut body = json!({ "filter": filter });
        if let Some(sort) = sort {
            body["sort"] = sort;
        }
        if let Some(limit) = limit {
            body["limit"] = json!(limit);
        }

        let result: FindResult<T> = self.action("find", collection, body).await?;
        Ok(result.documents)
    }

    pub async fn insert_one(&self, collection: &str, document: Value) -> Result<String> {
        let result: InsertOneResult = self
            .action("insertOne", collection, json!({ "document": document }))
            .await?;
        Ok(result.inserted_id)
    }

    /// Returns the matched count; callers treat zero as "document not found".
    pub async fn update_one(&self, collection: &str, filter: Value, update: Value) -> Result<u64> {
        let result: UpdateResult = self
            .action(
                "updateOne",
                collection,
                json!({ "filter": filter, "update": update }),
            )
            .await?;
        Ok(result.matched_count)
    }

    pub async fn delete_one(&self, collection: &str, filter: Value) -> Result<u64> {
        let result: DeleteResult = self
            .action("deleteOne", collection, json!({ "filter": filter }))
            .await?;
        Ok(result.deleted_count)
    }
}
