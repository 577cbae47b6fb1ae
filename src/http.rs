use crate::catalog;
use crate::chat;
use crate::engine::{ChunkStrategy, RagEngine};
use crate::error::AfinaError;
use crate::ingest::{self, UploadedFile};
use crate::params::ParameterUpdate;
use crate::store::{ParameterStore, SelectionStore};
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Presentation page served at the root route
const INDEX_HTML: &str = include_str!("../assets/index.html");

/// Application state shared across handlers.
///
/// Parameters and selection are process-wide: every client reads and writes
/// the same instance, and the latest write wins.
#[derive(Clone)]
pub struct AppState {
    engine: Arc<dyn RagEngine>,
    parameters: Arc<ParameterStore>,
    selection: Arc<SelectionStore>,
    ref_folder: PathBuf,
}

impl AppState {
    pub fn new(engine: Arc<dyn RagEngine>, ref_folder: PathBuf) -> Self {
        Self {
            engine,
            parameters: Arc::new(ParameterStore::new()),
            selection: Arc::new(SelectionStore::new()),
            ref_folder,
        }
    }
}

/// Build the axum router
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handle_index))
        .route("/chat", post(handle_chat))
        .route("/upload", post(handle_upload))
        .route("/databases", get(handle_databases))
        .route("/selected_databases", post(handle_selected_databases))
        .route("/parameters", get(handle_get_parameters).post(handle_update_parameters))
        .route("/health", get(handle_health))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors))
        .with_state(state)
}

/// Map an error to its HTTP form: validation errors are the client's fault,
/// everything else is reported as a processing failure.
fn error_response(err: AfinaError) -> Response {
    let status = match err {
        AfinaError::Validation(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(serde_json::json!({ "error": err.to_string() }))).into_response()
}

async fn handle_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn handle_health() -> Response {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "ok",
            "service": "afina",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
        .into_response()
}

#[derive(Deserialize)]
struct ChatRequest {
    message: String,
    /// Explicit selection for this query; falls back to the shared selection
    #[serde(default)]
    selected_databases: Option<Vec<usize>>,
    /// Explicit parameter overrides for this query; falls back to the shared
    /// parameter store, which these do NOT modify
    #[serde(default)]
    rag_parameters: Option<ParameterUpdate>,
}

async fn handle_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Response {
    let selected = request
        .selected_databases
        .unwrap_or_else(|| state.selection.get());
    let base = state.parameters.get();
    let params = match request.rag_parameters {
        Some(update) => base.merged(update),
        None => base,
    };

    match chat::respond(state.engine.as_ref(), &request.message, &selected, &params).await {
        Ok(response) => Json(serde_json::json!({ "response": response })).into_response(),
        Err(e) => {
            log::error!("Chat query failed: {}", e);
            error_response(e)
        }
    }
}

async fn handle_upload(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let mut db_name = String::new();
    let mut strategy = ChunkStrategy::default();
    let mut files: Vec<UploadedFile> = Vec::new();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return error_response(AfinaError::Validation(format!("Invalid multipart body: {}", e)))
            }
        };

        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "db_name" => match field.text().await {
                Ok(text) => db_name = text,
                Err(e) => {
                    return error_response(AfinaError::Validation(format!("Invalid db_name field: {}", e)))
                }
            },
            "generator_type" => match field.text().await {
                Ok(text) => strategy = ChunkStrategy::parse(&text),
                Err(e) => {
                    return error_response(AfinaError::Validation(format!(
                        "Invalid generator_type field: {}",
                        e
                    )))
                }
            },
            "files" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                match field.bytes().await {
                    Ok(data) => files.push(UploadedFile {
                        name: file_name,
                        content_type,
                        data: data.to_vec(),
                    }),
                    Err(e) => {
                        return error_response(AfinaError::Validation(format!(
                            "Failed to read file {}: {}",
                            file_name, e
                        )))
                    }
                }
            }
            // Unknown fields are ignored
            _ => {}
        }
    }

    match ingest::ingest(state.engine.as_ref(), &state.ref_folder, &db_name, strategy, &files).await
    {
        Ok(receipt) => Json(serde_json::json!({ "message": receipt.message() })).into_response(),
        Err(e) => {
            log::error!("Upload rejected: {}", e);
            error_response(e)
        }
    }
}

async fn handle_databases(State(state): State<AppState>) -> Response {
    match catalog::list(state.engine.as_ref()).await {
        Ok(entries) => Json(entries).into_response(),
        Err(e) => {
            log::error!("Database listing failed: {}", e);
            error_response(e)
        }
    }
}

#[derive(Deserialize)]
struct SelectedDatabasesRequest {
    #[serde(default)]
    selected: Vec<usize>,
}

async fn handle_selected_databases(
    State(state): State<AppState>,
    Json(request): Json<SelectedDatabasesRequest>,
) -> Response {
    state.selection.set(request.selected);
    Json(serde_json::json!({ "message": "Selection updated" })).into_response()
}

async fn handle_get_parameters(State(state): State<AppState>) -> Response {
    Json(state.parameters.get()).into_response()
}

async fn handle_update_parameters(
    State(state): State<AppState>,
    Json(update): Json<ParameterUpdate>,
) -> Response {
    let parameters = state.parameters.update(update);
    Json(serde_json::json!({
        "message": "Parameters updated",
        "parameters": parameters
    }))
    .into_response()
}
