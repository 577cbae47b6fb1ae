use super::{ChunkStrategy, DatabaseHandle, RagEngine};
use crate::error::{AfinaError, Result};
use crate::params::GenerationParameters;
use futures_util::future::BoxFuture;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Wire form of a chat query. Field order matches the engine's positional
/// calling convention: message, selection, then the five knobs.
#[derive(Serialize)]
struct QueryRequest<'a> {
    message: &'a str,
    selected_databases: &'a [usize],
    n_predict: u32,
    temperature: f32,
    top_k: u32,
    rag_k: u32,
    rag_sim_threshold: f32,
}

#[derive(Deserialize)]
struct QueryResponse {
    response: String,
}

#[derive(Serialize)]
struct CreateDatabaseRequest<'a> {
    name: &'a str,
    files: &'a [PathBuf],
    generator: ChunkStrategy,
}

/// JSON-over-HTTP client for the RAG engine sidecar.
///
/// The engine owns embedding, similarity search and model inference; this
/// client only moves the query/create/list payloads across the boundary.
/// Every failure is flattened to an opaque engine error and never retried.
pub struct RemoteEngine {
    client: Client,
    base_url: Url,
}

impl RemoteEngine {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| AfinaError::Config(format!("Invalid engine base URL {}: {}", base_url, e)))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| AfinaError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| AfinaError::Engine(format!("Invalid engine endpoint {}: {}", path, e)))
    }
}

impl RagEngine for RemoteEngine {
    fn query<'a>(
        &'a self,
        message: &'a str,
        selected: &'a [usize],
        params: &'a GenerationParameters,
    ) -> BoxFuture<'a, Result<String>> {
        Box::pin(async move {
            let url = self.endpoint("query")?;
            let request = QueryRequest {
                message,
                selected_databases: selected,
                n_predict: params.n_predict,
                temperature: params.temperature,
                top_k: params.top_k,
                rag_k: params.rag_k,
                rag_sim_threshold: params.rag_sim_threshold,
            };

            log::debug!(
                "Engine query: {} selected databases, n_predict={}",
                selected.len(),
                params.n_predict
            );

            let response = self
                .client
                .post(url)
                .json(&request)
                .send()
                .await
                .map_err(|e| AfinaError::Engine(format!("Query request failed: {}", e)))?
                .error_for_status()
                .map_err(|e| AfinaError::Engine(format!("Query rejected: {}", e)))?;

            let body: QueryResponse = response
                .json()
                .await
                .map_err(|e| AfinaError::Engine(format!("Invalid query response: {}", e)))?;

            Ok(body.response)
        })
    }

    fn create_database<'a>(
        &'a self,
        name: &'a str,
        files: &'a [PathBuf],
        strategy: ChunkStrategy,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            let url = self.endpoint("databases")?;
            let request = CreateDatabaseRequest {
                name,
                files,
                generator: strategy,
            };

            log::info!(
                "Requesting database \"{}\" from {} files ({} generator)",
                name,
                files.len(),
                strategy.as_str()
            );

            self.client
                .post(url)
                .json(&request)
                .send()
                .await
                .map_err(|e| AfinaError::Engine(format!("Create request failed: {}", e)))?
                .error_for_status()
                .map_err(|e| AfinaError::Engine(format!("Create rejected: {}", e)))?;

            Ok(())
        })
    }

    fn list_databases(&self) -> BoxFuture<'_, Result<Vec<DatabaseHandle>>> {
        Box::pin(async move {
            let url = self.endpoint("databases")?;

            let response = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|e| AfinaError::Engine(format!("List request failed: {}", e)))?
                .error_for_status()
                .map_err(|e| AfinaError::Engine(format!("List rejected: {}", e)))?;

            let handles: Vec<DatabaseHandle> = response
                .json()
                .await
                .map_err(|e| AfinaError::Engine(format!("Invalid list response: {}", e)))?;

            Ok(handles)
        })
    }
}
