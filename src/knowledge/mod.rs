//! Knowledge-base retrieval for prompt assembly
//!
//! Documents are split into overlapping character windows, embedded, and kept in a
//! flat (brute-force) L2 index next to a JSON metadata sidecar, one directory per
//! knowledge base. Queries embed the question and return the nearest chunks.

pub mod chunker;
pub mod embedder;
pub mod manager;
pub mod processors;
pub mod store;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// A ranked chunk returned by a query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryHit {
    /// Position of the chunk in the knowledge base
    pub id: usize,
    /// The chunk text
    pub text: String,
    /// Squared L2 distance to the query (lower is more similar, not bounded)
    pub score: f32,
}

/// Where a source document's chunks ended up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Original path as given at ingestion time
    pub path: String,
    /// Contiguous chunk positions contributed by the document
    pub chunk_indices: Vec<usize>,
}

/// Contents of `metadata.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeBaseMetadata {
    /// Chunk position (as a string) to chunk text
    pub documents: BTreeMap<String, String>,
    /// Source file name to its chunk range
    pub doc_metadata: BTreeMap<String, DocumentMetadata>,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub embedding_model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl KnowledgeBaseMetadata {
    /// Text of the chunk at `id`
    pub fn chunk(&self, id: usize) -> Option<&str> {
        self.documents.get(&id.to_string()).map(String::as_str)
    }

    /// Number of stored chunks
    pub fn chunk_count(&self) -> usize {
        self.documents.len()
    }
}

/// Summary of a stored knowledge base
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeBaseInfo {
    pub name: String,
    pub chunk_count: usize,
    /// Source file names, sorted
    pub documents: Vec<String>,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub embedding_model: String,
    pub created_at: Option<String>,
}

/// Configuration for the knowledge-base manager
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeBaseConfig {
    /// Directory holding one sub-directory per knowledge base
    pub base_path: PathBuf,
    /// Characters per chunk
    pub chunk_size: usize,
    /// Characters shared by consecutive chunks
    pub chunk_overlap: usize,
    /// Results returned by `query_default`
    pub top_k: usize,
    /// Directories skipped when ingesting a whole directory
    pub ignore_dirs: Vec<String>,
}

impl Default for KnowledgeBaseConfig {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("knowledge_bases"),
            chunk_size: 1000,
            chunk_overlap: 200,
            top_k: 5,
            ignore_dirs: vec![
                ".git".to_string(),
                ".svn".to_string(),
                "node_modules".to_string(),
                "target".to_string(),
                "__pycache__".to_string(),
                ".venv".to_string(),
                ".idea".to_string(),
                ".vscode".to_string(),
            ],
        }
    }
}

/// Whether `name` can be used as a knowledge-base directory name
pub fn is_valid_kb_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}
