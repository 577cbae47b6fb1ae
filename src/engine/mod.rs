pub mod remote;

use crate::error::Result;
use crate::params::GenerationParameters;
use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use remote::RemoteEngine;

/// Policy for splitting a source document into retrievable units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkStrategy {
    /// Fixed-size chunks
    #[default]
    Chunk,
    /// Natural paragraph boundaries (split on blank lines)
    Paragraph,
}

impl ChunkStrategy {
    /// Parse the wire form used by the upload endpoint. Unknown values fall
    /// back to the default, matching the permissive form field.
    pub fn parse(s: &str) -> Self {
        match s {
            "paragraph" => Self::Paragraph,
            _ => Self::Chunk,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chunk => "chunk",
            Self::Paragraph => "paragraph",
        }
    }
}

/// Engine-reported identity of a previously built vector database.
///
/// Databases carry only a display name over the wire; their position in the
/// enumeration is assigned by the caller and is NOT stable across catalog
/// mutations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseHandle {
    pub filename: String,
}

/// The opaque RAG engine collaborator.
///
/// Embedding, similarity search, prompt construction and model inference all
/// live behind this boundary; only the data crossing it is specified here.
/// Implementations must tolerate concurrent invocation. Failures surface as
/// opaque messages with no structured code, and no call is retried.
pub trait RagEngine: Send + Sync {
    /// Ask the engine to answer `message`, retrieving context from the
    /// databases named in `selected`. Returns the raw markdown answer.
    fn query<'a>(
        &'a self,
        message: &'a str,
        selected: &'a [usize],
        params: &'a GenerationParameters,
    ) -> BoxFuture<'a, Result<String>>;

    /// Build a new named vector database from the given source files.
    fn create_database<'a>(
        &'a self,
        name: &'a str,
        files: &'a [PathBuf],
        strategy: ChunkStrategy,
    ) -> BoxFuture<'a, Result<()>>;

    /// Enumerate the databases the engine currently knows about, in the
    /// engine's own order.
    fn list_databases(&self) -> BoxFuture<'_, Result<Vec<DatabaseHandle>>>;
}
