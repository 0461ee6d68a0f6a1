//! Knowledge-base retrieval for LLM-assisted novel writing
//!
//! The host application builds a [`KnowledgeBaseManager`] with an embedding
//! backend, creates knowledge bases from the author's notes, and pulls the
//! closest passages into its prompts. All calls are meant to run on a worker
//! task so the UI stays responsive.

pub mod knowledge;

pub use knowledge::chunker::chunk_text;
pub use knowledge::embedder::{EmbedderError, EmbeddingProvider, FastEmbedProvider};
pub use knowledge::manager::{BuildReport, KnowledgeBaseError, KnowledgeBaseManager};
pub use knowledge::processors::{
    DocumentProcessor, DocxProcessor, ExtractError, JsonProcessor, PdfProcessor,
    PlainTextProcessor,
};
pub use knowledge::store::{FlatIndex, Neighbor, StoreError, VectorStore};
pub use knowledge::{
    DocumentMetadata, KnowledgeBaseConfig, KnowledgeBaseInfo, KnowledgeBaseMetadata, QueryHit,
};
