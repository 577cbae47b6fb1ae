use crate::engine::{ChunkStrategy, RagEngine};
use crate::error::{AfinaError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Extension accepted for uploaded sources
const TEXT_EXTENSION: &str = ".txt";
/// Content type accepted for uploaded sources
const TEXT_CONTENT_TYPE: &str = "text/plain";

/// A source file received from the client, held in memory until the whole
/// batch has been validated.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Original filename, which keys the stored copy
    pub name: String,
    /// Content type declared by the client, if any
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// Acknowledgment for a completed ingestion.
#[derive(Debug, Clone)]
pub struct IngestReceipt {
    pub database: String,
    pub files: usize,
    pub strategy: ChunkStrategy,
}

impl IngestReceipt {
    pub fn message(&self) -> String {
        format!(
            "Database \"{}\" created successfully with {} files using {} generator",
            self.database,
            self.files,
            self.strategy.as_str()
        )
    }
}

/// Validate, stage, and ingest a batch of source files into a new named
/// vector database.
///
/// The batch is atomic: every file is validated before anything touches disk,
/// all writes go to a unique staging directory under the storage root, and the
/// staged files are committed to final storage (keyed by original name,
/// overwriting any previous upload) only after the engine has built the
/// database from them. Any failure discards the staging directory, so final
/// storage never holds files from a failed batch.
pub async fn ingest(
    engine: &dyn RagEngine,
    ref_folder: &Path,
    db_name: &str,
    strategy: ChunkStrategy,
    files: &[UploadedFile],
) -> Result<IngestReceipt> {
    if db_name.is_empty() {
        return Err(AfinaError::Validation("Database name is required".to_string()));
    }
    if files.is_empty() || files.iter().all(|f| f.name.is_empty()) {
        return Err(AfinaError::Validation("No files selected".to_string()));
    }

    // Validate the whole set before any persistence begins. The first
    // offender fails the batch, naming the file.
    for file in files {
        if file.name.is_empty() {
            return Err(AfinaError::Validation(
                "Upload batch contains a file without a name".to_string(),
            ));
        }
        if !is_bare_filename(&file.name) {
            return Err(AfinaError::Validation(format!(
                "Invalid file name {}. Names must not contain path components",
                file.name
            )));
        }
        if !is_plain_text(file) {
            return Err(AfinaError::Validation(format!(
                "Invalid file type for {}. Only .txt files allowed",
                file.name
            )));
        }
    }

    let staging = ref_folder.join(format!(".staging-{}", Uuid::new_v4()));
    fs::create_dir_all(&staging).map_err(|e| AfinaError::Processing(e.to_string()))?;

    let result = ingest_staged(engine, ref_folder, &staging, db_name, strategy, files).await;

    // The staging directory is discarded on success and failure alike; only
    // committed copies outlive this call.
    if let Err(e) = fs::remove_dir_all(&staging) {
        log::warn!("Failed to clean staging directory {}: {}", staging.display(), e);
    }

    result
}

async fn ingest_staged(
    engine: &dyn RagEngine,
    ref_folder: &Path,
    staging: &Path,
    db_name: &str,
    strategy: ChunkStrategy,
    files: &[UploadedFile],
) -> Result<IngestReceipt> {
    let mut staged_paths: Vec<PathBuf> = Vec::with_capacity(files.len());
    for file in files {
        let path = staging.join(&file.name);
        fs::write(&path, &file.data).map_err(|e| AfinaError::Processing(e.to_string()))?;
        staged_paths.push(path);
    }

    engine.create_database(db_name, &staged_paths, strategy).await?;

    // Engine accepted the batch: commit the staged copies into final storage.
    // Same-name uploads overwrite previous content, no versioning.
    for (file, staged) in files.iter().zip(&staged_paths) {
        let final_path = ref_folder.join(&file.name);
        fs::copy(staged, &final_path).map_err(|e| AfinaError::Processing(e.to_string()))?;
    }

    log::info!(
        "Ingested {} files into database \"{}\" ({} generator)",
        files.len(),
        db_name,
        strategy.as_str()
    );

    Ok(IngestReceipt {
        database: db_name.to_string(),
        files: files.len(),
        strategy,
    })
}

fn is_plain_text(file: &UploadedFile) -> bool {
    file.name.ends_with(TEXT_EXTENSION)
        || file.content_type.as_deref() == Some(TEXT_CONTENT_TYPE)
}

/// Filenames key paths under the storage root, so they must be a single bare
/// name: anything carrying separators or `..` could stage or commit outside
/// the root.
fn is_bare_filename(name: &str) -> bool {
    !name.contains('/')
        && !name.contains('\\')
        && Path::new(name).file_name() == Some(std::ffi::OsStr::new(name))
}
