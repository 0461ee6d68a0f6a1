//! Knowledge-base orchestration
//!
//! Routes files to processors by extension, chunks and embeds their text, and
//! answers nearest-chunk queries. The public entry points never fail loudly: a
//! failed build is `false`, a failed query is an empty list, and the reason is
//! logged. The `try_*` variants return the underlying error.

use super::chunker::{self, ChunkError};
use super::embedder::{EmbedderError, EmbeddingProvider};
use super::processors::{
    DocumentProcessor, DocxProcessor, JsonProcessor, PdfProcessor, PlainTextProcessor,
};
use super::store::{FlatIndex, StoreError, VectorStore};
use super::{
    is_valid_kb_name, DocumentMetadata, KnowledgeBaseConfig, KnowledgeBaseInfo,
    KnowledgeBaseMetadata, QueryHit,
};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum KnowledgeBaseError {
    #[error("Invalid knowledge base name: {0:?}")]
    InvalidName(String),
    #[error(transparent)]
    Chunking(#[from] ChunkError),
    #[error("No text could be extracted from the given documents")]
    NoChunks,
    #[error(transparent)]
    Embedding(#[from] EmbedderError),
    #[error("Embedding backend returned {actual} vectors for {expected} chunks")]
    EmbeddingCount { expected: usize, actual: usize },
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Knowledge base not found: {0}")]
    NotFound(String),
    #[error("Directory does not exist: {0}")]
    MissingDirectory(String),
}

/// Outcome of a successful build
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub documents_indexed: usize,
    pub documents_skipped: usize,
    pub chunks: usize,
}

/// Owns the extension table, the vector store and the embedding backend
pub struct KnowledgeBaseManager {
    config: KnowledgeBaseConfig,
    store: VectorStore,
    embedder: Arc<dyn EmbeddingProvider>,
    processors: HashMap<String, Arc<dyn DocumentProcessor>>,
}

impl KnowledgeBaseManager {
    /// Create a manager with the plain text, JSON, PDF and DOCX processors registered
    pub fn new(config: KnowledgeBaseConfig, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        let store = VectorStore::new(config.base_path.clone());
        let mut manager = Self {
            config,
            store,
            embedder,
            processors: HashMap::new(),
        };
        manager.register_processor(PlainTextProcessor);
        manager.register_processor(JsonProcessor);
        manager.register_processor(PdfProcessor);
        manager.register_processor(DocxProcessor);
        manager
    }

    pub fn config(&self) -> &KnowledgeBaseConfig {
        &self.config
    }

    pub fn store(&self) -> &VectorStore {
        &self.store
    }

    /// Route every extension the processor supports to it; later registrations win
    pub fn register_processor<P: DocumentProcessor + 'static>(&mut self, processor: P) {
        let processor: Arc<dyn DocumentProcessor> = Arc::new(processor);
        for extension in processor.supported_extensions() {
            let extension = normalize_extension(extension);
            if let Some(previous) = self.processors.insert(extension.clone(), processor.clone()) {
                log::debug!(
                    "Processor {} replaces {} for .{}",
                    processor.name(),
                    previous.name(),
                    extension
                );
            }
        }
    }

    /// Extensions with a registered processor, sorted
    pub fn registered_extensions(&self) -> Vec<String> {
        let mut extensions: Vec<String> = self.processors.keys().cloned().collect();
        extensions.sort();
        extensions
    }

    fn processor_for(&self, path: &Path) -> Option<&Arc<dyn DocumentProcessor>> {
        let extension = path.extension()?.to_str()?;
        self.processors.get(&normalize_extension(extension))
    }

    /// Build (or rebuild) `name` from `document_paths`; false on any failure
    pub async fn create_knowledge_base<P: AsRef<Path>>(
        &self,
        name: &str,
        document_paths: &[P],
        chunk_size: usize,
        chunk_overlap: usize,
    ) -> bool {
        match self
            .try_create_knowledge_base(name, document_paths, chunk_size, chunk_overlap)
            .await
        {
            Ok(report) => {
                log::info!(
                    "Created knowledge base {}: {} chunks from {} documents ({} skipped)",
                    name,
                    report.chunks,
                    report.documents_indexed,
                    report.documents_skipped
                );
                true
            }
            Err(e) => {
                log::error!("Failed to create knowledge base {}: {}", name, e);
                false
            }
        }
    }

    /// Same pipeline as `create_knowledge_base`, with the failure reason
    pub async fn try_create_knowledge_base<P: AsRef<Path>>(
        &self,
        name: &str,
        document_paths: &[P],
        chunk_size: usize,
        chunk_overlap: usize,
    ) -> Result<BuildReport, KnowledgeBaseError> {
        if !is_valid_kb_name(name) {
            return Err(KnowledgeBaseError::InvalidName(name.to_string()));
        }
        chunker::validate_window(chunk_size, chunk_overlap)?;

        let mut report = BuildReport::default();
        let mut chunks: Vec<String> = Vec::new();
        let mut doc_metadata: BTreeMap<String, DocumentMetadata> = BTreeMap::new();

        for path in document_paths {
            let path = path.as_ref();
            let Some(processor) = self.processor_for(path) else {
                log::warn!("Skipping {}: unsupported file type", path.display());
                report.documents_skipped += 1;
                continue;
            };

            let text = match processor.extract(path) {
                Some(text) if !text.is_empty() => text,
                _ => {
                    log::warn!("Skipping {}: no text extracted", path.display());
                    report.documents_skipped += 1;
                    continue;
                }
            };

            let doc_chunks = chunker::chunk_text(&text, chunk_size, chunk_overlap)?;
            let start = chunks.len();
            chunks.extend(doc_chunks);
            log::debug!("{}: {} chunks", path.display(), chunks.len() - start);

            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.to_string_lossy().into_owned());
            doc_metadata.insert(
                file_name,
                DocumentMetadata {
                    path: path.to_string_lossy().into_owned(),
                    chunk_indices: (start..chunks.len()).collect(),
                },
            );
            report.documents_indexed += 1;
        }

        if chunks.is_empty() {
            return Err(KnowledgeBaseError::NoChunks);
        }

        let embeddings = self.embedder.embed_batch(&chunks).await?;
        if embeddings.len() != chunks.len() {
            return Err(KnowledgeBaseError::EmbeddingCount {
                expected: chunks.len(),
                actual: embeddings.len(),
            });
        }

        // Nothing touches disk until every vector has been accepted
        let dimension = embeddings.first().map(Vec::len).unwrap_or_default();
        let mut index = FlatIndex::new(dimension)?;
        index.add(&embeddings)?;

        report.chunks = chunks.len();
        let metadata = KnowledgeBaseMetadata {
            documents: chunks
                .into_iter()
                .enumerate()
                .map(|(i, chunk)| (i.to_string(), chunk))
                .collect(),
            doc_metadata,
            chunk_size,
            chunk_overlap,
            embedding_model: self.embedder.model_name().to_string(),
            created_at: Some(chrono::Utc::now().to_rfc3339()),
        };

        self.store.save_index(name, &index, &metadata)?;
        Ok(report)
    }

    /// Every file under `directory` with a registered processor, sorted
    pub fn collect_documents(&self, directory: &Path) -> Result<Vec<PathBuf>, KnowledgeBaseError> {
        if !directory.is_dir() {
            return Err(KnowledgeBaseError::MissingDirectory(
                directory.display().to_string(),
            ));
        }

        let mut paths: Vec<PathBuf> = WalkDir::new(directory)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| {
                let name = e.file_name().to_string_lossy();
                // Skip ignored directories
                !(e.file_type().is_dir() && self.config.ignore_dirs.iter().any(|d| name == *d))
            })
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|path| self.processor_for(path).is_some())
            .collect();
        paths.sort();
        Ok(paths)
    }

    /// Build `name` from every supported file under `directory`
    pub async fn create_knowledge_base_from_directory(
        &self,
        name: &str,
        directory: &Path,
        chunk_size: usize,
        chunk_overlap: usize,
    ) -> bool {
        let paths = match self.collect_documents(directory) {
            Ok(paths) => paths,
            Err(e) => {
                log::error!("Failed to create knowledge base {}: {}", name, e);
                return false;
            }
        };
        self.create_knowledge_base(name, &paths, chunk_size, chunk_overlap)
            .await
    }

    /// The `top_k` chunks closest to `query_text`, or an empty list on any failure
    pub async fn query(&self, name: &str, query_text: &str, top_k: usize) -> Vec<QueryHit> {
        match self.try_query(name, query_text, top_k).await {
            Ok(hits) => hits,
            Err(e) => {
                log::warn!("Query against knowledge base {} failed: {}", name, e);
                vec![]
            }
        }
    }

    /// `query` with the configured `top_k`
    pub async fn query_default(&self, name: &str, query_text: &str) -> Vec<QueryHit> {
        self.query(name, query_text, self.config.top_k).await
    }

    /// Same as `query`, but distinguishes failures from empty results
    pub async fn try_query(
        &self,
        name: &str,
        query_text: &str,
        top_k: usize,
    ) -> Result<Vec<QueryHit>, KnowledgeBaseError> {
        if !is_valid_kb_name(name) {
            return Err(KnowledgeBaseError::InvalidName(name.to_string()));
        }
        if !self.store.exists(name) {
            return Err(KnowledgeBaseError::NotFound(name.to_string()));
        }
        if top_k == 0 {
            return Ok(vec![]);
        }

        let query_vector = self.embedder.embed(query_text).await?;
        let (index, metadata) = self.store.read_index(name)?;

        index
            .search(&query_vector, top_k)?
            .into_iter()
            .map(|neighbor| -> Result<QueryHit, KnowledgeBaseError> {
                let text = metadata.chunk(neighbor.id).ok_or_else(|| {
                    StoreError::Corrupt(format!("no chunk stored for id {}", neighbor.id))
                })?;
                Ok(QueryHit {
                    id: neighbor.id,
                    text: text.to_string(),
                    score: neighbor.distance,
                })
            })
            .collect()
    }

    /// Numbered passages for prompt assembly, or `None` when nothing matched
    pub async fn build_context(&self, name: &str, query_text: &str, top_k: usize) -> Option<String> {
        let hits = self.query(name, query_text, top_k).await;
        if hits.is_empty() {
            return None;
        }

        Some(
            hits.iter()
                .enumerate()
                .map(|(rank, hit)| format!("[{}] {}", rank + 1, hit.text.trim()))
                .collect::<Vec<_>>()
                .join("\n\n"),
        )
    }

    pub fn knowledge_base_info(&self, name: &str) -> Option<KnowledgeBaseInfo> {
        if !self.store.exists(name) {
            return None;
        }
        let metadata = self.store.load_metadata(name)?;

        Some(KnowledgeBaseInfo {
            name: name.to_string(),
            chunk_count: metadata.chunk_count(),
            documents: metadata.doc_metadata.keys().cloned().collect(),
            chunk_size: metadata.chunk_size,
            chunk_overlap: metadata.chunk_overlap,
            embedding_model: metadata.embedding_model,
            created_at: metadata.created_at,
        })
    }

    pub fn list_knowledge_bases(&self) -> Vec<String> {
        self.store.list_knowledge_bases()
    }

    pub fn delete_knowledge_base(&self, name: &str) -> bool {
        self.store.delete_knowledge_base(name)
    }
}

fn normalize_extension(extension: &str) -> String {
    extension.trim_start_matches('.').to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::embedder::testing::{
        FailingEmbedder, LetterHistogramEmbedder, MixedWidthEmbedder,
    };
    use crate::knowledge::processors::ExtractError;
    use std::fs;
    use tempfile::TempDir;

    fn manager_in(dir: &TempDir) -> KnowledgeBaseManager {
        manager_with(dir, Arc::new(LetterHistogramEmbedder))
    }

    fn manager_with(dir: &TempDir, embedder: Arc<dyn EmbeddingProvider>) -> KnowledgeBaseManager {
        let config = KnowledgeBaseConfig {
            base_path: dir.path().join("kbs"),
            ..KnowledgeBaseConfig::default()
        };
        KnowledgeBaseManager::new(config, embedder)
    }

    fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// 2500 characters of filler with a marker word only chunk 2 contains in full
    fn scenario_text() -> String {
        let mut text = ".".repeat(2500);
        text.replace_range(2000..2005, "zebra");
        text
    }

    struct UpperCaseProcessor;

    impl DocumentProcessor for UpperCaseProcessor {
        fn name(&self) -> &str {
            "upper"
        }

        fn supported_extensions(&self) -> &[&str] {
            &["TXT", ".note"]
        }

        fn extract_text(&self, path: &Path) -> Result<String, ExtractError> {
            Ok(fs::read_to_string(path)?.to_uppercase())
        }
    }

    #[tokio::test]
    async fn test_end_to_end_scenario() {
        let dir = TempDir::new().unwrap();
        let manager = manager_in(&dir);
        let text = scenario_text();
        let path = write_file(&dir, "story.txt", &text);

        assert!(manager.create_knowledge_base("kb1", &[&path], 1000, 200).await);

        let (index, metadata) = manager.store().load_index("kb1").unwrap();
        assert_eq!(index.len(), 4);
        let lengths: Vec<usize> = (0..4)
            .map(|i| metadata.chunk(i).unwrap().chars().count())
            .collect();
        assert_eq!(lengths, vec![1000, 1000, 900, 100]);
        assert_eq!(metadata.doc_metadata["story.txt"].chunk_indices, vec![0, 1, 2, 3]);
        assert_eq!(metadata.embedding_model, "letter-histogram");
        assert!(metadata.created_at.is_some());

        let hits = manager.query("kb1", "zebra", 1).await;
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 2);
        assert_eq!(hits[0].text, text[1600..2500]);
        assert!(hits[0].score.abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_unsupported_file_scenario() {
        let dir = TempDir::new().unwrap();
        let manager = manager_in(&dir);
        let image = write_file(&dir, "image.png", "not really an image");

        assert!(!manager.create_knowledge_base("kb2", &[&image], 1000, 200).await);
        assert!(!manager.list_knowledge_bases().contains(&"kb2".to_string()));
        assert!(!dir.path().join("kbs").join("kb2").exists());
    }

    #[tokio::test]
    async fn test_empty_documents_leave_nothing_behind() {
        let dir = TempDir::new().unwrap();
        let manager = manager_in(&dir);
        let empty = write_file(&dir, "empty.txt", "");
        let broken = write_file(&dir, "broken.json", "{ nope");

        let result = manager
            .try_create_knowledge_base("kb", &[&empty, &broken], 1000, 200)
            .await;
        assert!(matches!(result, Err(KnowledgeBaseError::NoChunks)));
        assert!(!dir.path().join("kbs").join("kb").exists());
        assert!(manager.list_knowledge_bases().is_empty());
    }

    #[tokio::test]
    async fn test_skips_bad_files_and_tracks_ranges() {
        let dir = TempDir::new().unwrap();
        let manager = manager_in(&dir);
        let first = write_file(&dir, "a.txt", &"abc".repeat(10));
        let image = write_file(&dir, "cover.png", "binary");
        let missing = dir.path().join("missing.md");
        let second = write_file(&dir, "b.json", r#"{"name": "Aria"}"#);

        let report = manager
            .try_create_knowledge_base("kb", &[&first, &image, &missing, &second], 20, 5)
            .await
            .unwrap();
        assert_eq!(
            report,
            BuildReport {
                documents_indexed: 2,
                documents_skipped: 2,
                chunks: 3,
            }
        );

        let metadata = manager.store().load_metadata("kb").unwrap();
        assert_eq!(metadata.doc_metadata["a.txt"].chunk_indices, vec![0, 1]);
        assert_eq!(metadata.doc_metadata["b.json"].chunk_indices, vec![2]);
        assert_eq!(metadata.chunk(2), Some("name: Aria"));
        assert_eq!(metadata.chunk_size, 20);
        assert_eq!(metadata.chunk_overlap, 5);
    }

    #[tokio::test]
    async fn test_rejects_invalid_window_and_name() {
        let dir = TempDir::new().unwrap();
        let manager = manager_in(&dir);
        let path = write_file(&dir, "a.txt", "some text");

        let result = manager.try_create_knowledge_base("kb", &[&path], 100, 100).await;
        assert!(matches!(result, Err(KnowledgeBaseError::Chunking(_))));
        assert!(!manager.create_knowledge_base("../kb", &[&path], 100, 10).await);
        assert!(!manager.create_knowledge_base("", &[&path], 100, 10).await);
    }

    #[tokio::test]
    async fn test_embedding_failure_is_false() {
        let dir = TempDir::new().unwrap();
        let manager = manager_with(&dir, Arc::new(FailingEmbedder));
        let path = write_file(&dir, "a.txt", "some text");

        assert!(!manager.create_knowledge_base("kb", &[&path], 100, 10).await);
        assert!(manager.list_knowledge_bases().is_empty());
    }

    #[tokio::test]
    async fn test_search_ids_resolve_to_text() {
        let dir = TempDir::new().unwrap();
        let manager = manager_in(&dir);
        let path = write_file(
            &dir,
            "lore.md",
            "The river Anduin flows south. Dragons sleep under the Lonely Mountain. \
             Elves sing in the woods of Lorien. Dwarves mine mithril in Moria.",
        );
        assert!(manager.create_knowledge_base("lore", &[&path], 40, 10).await);

        let neighbors = manager
            .store()
            .search("lore", &LetterHistogramEmbedder::vector("dragon mountain"), 100)
            .unwrap();
        assert!(!neighbors.is_empty());
        for neighbor in &neighbors {
            assert!(manager.store().get_document("lore", neighbor.id).is_some());
        }

        let hits = manager.query("lore", "dragon mountain", 3).await;
        assert_eq!(hits.len(), 3);
        assert!(hits.windows(2).all(|w| w[0].score <= w[1].score));
    }

    #[tokio::test]
    async fn test_query_failures_are_empty() {
        let dir = TempDir::new().unwrap();
        let manager = manager_in(&dir);
        assert!(manager.query("missing", "anything", 5).await.is_empty());
        assert!(matches!(
            manager.try_query("missing", "anything", 5).await,
            Err(KnowledgeBaseError::NotFound(_))
        ));

        let path = write_file(&dir, "a.txt", "some text");
        assert!(manager.create_knowledge_base("kb", &[&path], 100, 10).await);
        assert!(manager.query("kb", "text", 0).await.is_empty());

        let failing = manager_with(&dir, Arc::new(FailingEmbedder));
        assert!(failing.query("kb", "text", 3).await.is_empty());
        assert!(matches!(
            failing.try_query("kb", "text", 3).await,
            Err(KnowledgeBaseError::Embedding(_))
        ));
    }

    #[tokio::test]
    async fn test_query_rejects_mismatched_index() {
        let dir = TempDir::new().unwrap();
        let manager = manager_in(&dir);
        let long = write_file(&dir, "long.txt", &"words ".repeat(100));
        let short = write_file(&dir, "short.txt", "tiny");
        assert!(manager.create_knowledge_base("big", &[&long], 50, 10).await);
        assert!(manager.create_knowledge_base("small", &[&short], 50, 10).await);

        // Pair the large index with the one-chunk metadata
        let kbs = dir.path().join("kbs");
        fs::copy(kbs.join("big").join("index.db"), kbs.join("small").join("index.db")).unwrap();

        assert!(matches!(
            manager.try_query("small", "words", 3).await,
            Err(KnowledgeBaseError::Store(StoreError::Corrupt(_)))
        ));
        assert!(manager.query("small", "words", 3).await.is_empty());
        assert!(manager.build_context("small", "words", 3).await.is_none());
    }

    #[tokio::test]
    async fn test_mixed_width_embeddings_leave_nothing_behind() {
        let dir = TempDir::new().unwrap();
        let manager = manager_with(&dir, Arc::new(MixedWidthEmbedder));
        let path = write_file(&dir, "a.txt", &"abc".repeat(20));

        let result = manager.try_create_knowledge_base("kb", &[&path], 20, 5).await;
        assert!(matches!(
            result,
            Err(KnowledgeBaseError::Store(StoreError::DimensionMismatch { .. }))
        ));
        assert!(!dir.path().join("kbs").join("kb").exists());
        assert!(manager.list_knowledge_bases().is_empty());
    }

    #[tokio::test]
    async fn test_rebuild_overwrites() {
        let dir = TempDir::new().unwrap();
        let manager = manager_in(&dir);
        let long = write_file(&dir, "long.txt", &"words ".repeat(100));
        let short = write_file(&dir, "short.txt", "tiny");

        assert!(manager.create_knowledge_base("kb", &[&long], 50, 10).await);
        assert!(manager.create_knowledge_base("kb", &[&short], 50, 10).await);

        let info = manager.knowledge_base_info("kb").unwrap();
        assert_eq!(info.chunk_count, 1);
        assert_eq!(info.documents, vec!["short.txt".to_string()]);
        assert_eq!(info.chunk_size, 50);
    }

    #[tokio::test]
    async fn test_register_processor_last_wins() {
        let dir = TempDir::new().unwrap();
        let mut manager = manager_in(&dir);
        manager.register_processor(UpperCaseProcessor);

        let extensions = manager.registered_extensions();
        assert_eq!(extensions, vec!["docx", "json", "md", "note", "pdf", "txt"]);

        let path = write_file(&dir, "Chapter.TXT", "quiet night");
        assert!(manager.create_knowledge_base("kb", &[&path], 100, 10).await);
        assert_eq!(
            manager.store().get_document("kb", 0).as_deref(),
            Some("QUIET NIGHT")
        );
    }

    #[tokio::test]
    async fn test_managers_do_not_share_processors() {
        let dir = TempDir::new().unwrap();
        let mut first = manager_in(&dir);
        let second = manager_in(&dir);
        first.register_processor(UpperCaseProcessor);

        assert!(first.registered_extensions().contains(&"note".to_string()));
        assert!(!second.registered_extensions().contains(&"note".to_string()));
    }

    #[tokio::test]
    async fn test_create_from_directory() {
        let dir = TempDir::new().unwrap();
        let manager = manager_in(&dir);
        write_file(&dir, "notes/b.txt", "second note");
        write_file(&dir, "notes/a.md", "first note");
        write_file(&dir, "notes/cover.png", "binary");
        write_file(&dir, "notes/.git/HEAD.txt", "ignored");

        let paths = manager.collect_documents(&dir.path().join("notes")).unwrap();
        let names: Vec<String> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.md", "b.txt"]);

        assert!(
            manager
                .create_knowledge_base_from_directory("notes", &dir.path().join("notes"), 100, 10)
                .await
        );
        assert_eq!(manager.knowledge_base_info("notes").unwrap().chunk_count, 2);
        assert!(
            !manager
                .create_knowledge_base_from_directory("x", &dir.path().join("nowhere"), 100, 10)
                .await
        );
    }

    #[tokio::test]
    async fn test_build_context_and_delete() {
        let dir = TempDir::new().unwrap();
        let manager = manager_in(&dir);
        let path = write_file(&dir, "a.txt", "The lighthouse keeper hums.");
        assert!(manager.create_knowledge_base("kb", &[&path], 100, 10).await);

        let context = manager.build_context("kb", "lighthouse", 3).await.unwrap();
        assert_eq!(context, "[1] The lighthouse keeper hums.");
        assert_eq!(manager.query_default("kb", "keeper").await.len(), 1);

        assert_eq!(manager.list_knowledge_bases(), vec!["kb".to_string()]);
        assert!(manager.delete_knowledge_base("kb"));
        assert!(!manager.delete_knowledge_base("kb"));
        assert!(manager.build_context("kb", "lighthouse", 3).await.is_none());
        assert!(manager.knowledge_base_info("kb").is_none());
    }
}
