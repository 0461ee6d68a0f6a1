//! Flat vector storage, one directory per knowledge base
//!
//! Each knowledge base keeps its vectors in `index.db` (SQLite, vectors stored
//! as little-endian f32 blobs and searched with sqlite-vec) and its chunk text in
//! `metadata.json`. Both files are always written and read together.

use super::{is_valid_kb_name, KnowledgeBaseMetadata};
use rusqlite::{ffi::sqlite3_auto_extension, params, Connection};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Once;
use thiserror::Error;

pub const INDEX_FILE: &str = "index.db";
pub const METADATA_FILE: &str = "metadata.json";
const TMP_SUFFIX: &str = ".tmp";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to serialize metadata: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Invalid knowledge base name: {0:?}")]
    InvalidName(String),
    #[error("Knowledge base not found: {0}")]
    NotFound(String),
    #[error("Vector has dimension {actual}, index expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("Index dimension must be positive")]
    ZeroDimension,
    #[error("Corrupt knowledge base: {0}")]
    Corrupt(String),
}

/// A search hit: chunk position and squared L2 distance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub id: usize,
    pub distance: f32,
}

/// In-memory brute-force L2 index
#[derive(Debug, Clone, PartialEq)]
pub struct FlatIndex {
    dimension: usize,
    vectors: Vec<f32>,
}

impl FlatIndex {
    pub fn new(dimension: usize) -> Result<Self, StoreError> {
        if dimension == 0 {
            return Err(StoreError::ZeroDimension);
        }
        Ok(Self {
            dimension,
            vectors: Vec::new(),
        })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.vectors.len() / self.dimension
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Append vectors; ids continue from the current length
    ///
    /// Nothing is added if any vector has the wrong width.
    pub fn add(&mut self, vectors: &[Vec<f32>]) -> Result<(), StoreError> {
        if let Some(bad) = vectors.iter().find(|v| v.len() != self.dimension) {
            return Err(StoreError::DimensionMismatch {
                expected: self.dimension,
                actual: bad.len(),
            });
        }
        self.vectors.reserve(vectors.len() * self.dimension);
        for vector in vectors {
            self.vectors.extend_from_slice(vector);
        }
        Ok(())
    }

    pub fn vector(&self, id: usize) -> Option<&[f32]> {
        let start = id.checked_mul(self.dimension)?;
        self.vectors.get(start..start + self.dimension)
    }

    /// The `top_k` nearest vectors to `query`, closest first
    ///
    /// Returns fewer than `top_k` neighbors when the index is smaller.
    pub fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<Neighbor>, StoreError> {
        if query.len() != self.dimension {
            return Err(StoreError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }

        let mut neighbors: Vec<Neighbor> = self
            .vectors
            .chunks_exact(self.dimension)
            .enumerate()
            .map(|(id, vector)| Neighbor {
                id,
                distance: squared_l2(vector, query),
            })
            .collect();
        neighbors.sort_by(|a, b| a.distance.total_cmp(&b.distance).then(a.id.cmp(&b.id)));
        neighbors.truncate(top_k);
        Ok(neighbors)
    }
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

fn vector_to_blob(vector: &[f32]) -> Vec<u8> {
    vector.iter().flat_map(|f| f.to_le_bytes()).collect()
}

fn blob_to_vector(blob: &[u8]) -> Vec<f32> {
    blob.chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect()
}

/// Register sqlite-vec for every connection opened afterwards
fn register_vec_extension() {
    static REGISTER: Once = Once::new();
    REGISTER.call_once(|| unsafe {
        sqlite3_auto_extension(Some(std::mem::transmute(
            sqlite_vec::sqlite3_vec_init as *const (),
        )));
    });
}

/// Persistent per-knowledge-base vector indexes
pub struct VectorStore {
    base_path: PathBuf,
}

impl VectorStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn kb_dir(&self, kb_name: &str) -> Result<PathBuf, StoreError> {
        if !is_valid_kb_name(kb_name) {
            return Err(StoreError::InvalidName(kb_name.to_string()));
        }
        Ok(self.base_path.join(kb_name))
    }

    fn open_index_db(path: &Path) -> Result<Connection, StoreError> {
        register_vec_extension();
        Ok(Connection::open(path)?)
    }

    /// Allocate an empty index and make sure the knowledge-base directory exists
    pub fn create_index(&self, kb_name: &str, dimension: usize) -> Result<FlatIndex, StoreError> {
        let index = FlatIndex::new(dimension)?;
        fs::create_dir_all(self.kb_dir(kb_name)?)?;
        Ok(index)
    }

    /// Write the index and its metadata, replacing any previous version
    ///
    /// Both files are written next to their final names and renamed into place
    /// once complete, so a failed write never leaves a half-written file behind.
    pub fn save_index(
        &self,
        kb_name: &str,
        index: &FlatIndex,
        metadata: &KnowledgeBaseMetadata,
    ) -> Result<(), StoreError> {
        let dir = self.kb_dir(kb_name)?;
        if index.len() != metadata.chunk_count() {
            return Err(StoreError::Corrupt(format!(
                "refusing to save {} vectors with {} chunks",
                index.len(),
                metadata.chunk_count()
            )));
        }
        fs::create_dir_all(&dir)?;

        let index_tmp = dir.join(format!("{}{}", INDEX_FILE, TMP_SUFFIX));
        let metadata_tmp = dir.join(format!("{}{}", METADATA_FILE, TMP_SUFFIX));
        for stale in [&index_tmp, &metadata_tmp] {
            if stale.exists() {
                fs::remove_file(stale)?;
            }
        }

        Self::write_index_db(&index_tmp, index)?;
        fs::write(&metadata_tmp, serde_json::to_string_pretty(metadata)?)?;

        fs::rename(&index_tmp, dir.join(INDEX_FILE))?;
        fs::rename(&metadata_tmp, dir.join(METADATA_FILE))?;

        log::debug!(
            "Saved knowledge base {} ({} vectors, dim {})",
            kb_name,
            index.len(),
            index.dimension()
        );
        Ok(())
    }

    fn write_index_db(path: &Path, index: &FlatIndex) -> Result<(), StoreError> {
        let mut conn = Self::open_index_db(path)?;
        conn.execute_batch(
            r#"
            CREATE TABLE index_info (
                dimension INTEGER NOT NULL
            );

            CREATE TABLE vectors (
                id INTEGER PRIMARY KEY,
                embedding BLOB NOT NULL
            );
            "#,
        )?;

        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO index_info (dimension) VALUES (?1)",
            params![index.dimension() as i64],
        )?;
        {
            let mut stmt = tx.prepare("INSERT INTO vectors (id, embedding) VALUES (?1, ?2)")?;
            for id in 0..index.len() {
                if let Some(vector) = index.vector(id) {
                    stmt.execute(params![id as i64, vector_to_blob(vector)])?;
                }
            }
        }
        tx.commit()?;

        // Close before the file is renamed
        conn.close().map_err(|(_, e)| StoreError::Database(e))?;
        Ok(())
    }

    fn read_metadata(&self, kb_name: &str) -> Result<KnowledgeBaseMetadata, StoreError> {
        let path = self.kb_dir(kb_name)?.join(METADATA_FILE);
        if !path.is_file() {
            return Err(StoreError::NotFound(kb_name.to_string()));
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn read_dimension(conn: &Connection) -> Result<usize, StoreError> {
        let dimension: i64 =
            conn.query_row("SELECT dimension FROM index_info LIMIT 1", [], |row| {
                row.get(0)
            })?;
        usize::try_from(dimension)
            .ok()
            .filter(|d| *d > 0)
            .ok_or_else(|| StoreError::Corrupt(format!("invalid dimension {}", dimension)))
    }

    fn open_existing_index(&self, kb_name: &str) -> Result<Connection, StoreError> {
        let path = self.kb_dir(kb_name)?.join(INDEX_FILE);
        if !path.is_file() {
            return Err(StoreError::NotFound(kb_name.to_string()));
        }
        Self::open_index_db(&path)
    }

    /// Read the index and metadata back, checking that every vector id has a chunk
    pub fn read_index(
        &self,
        kb_name: &str,
    ) -> Result<(FlatIndex, KnowledgeBaseMetadata), StoreError> {
        let metadata = self.read_metadata(kb_name)?;
        let conn = self.open_existing_index(kb_name)?;

        let mut index = FlatIndex::new(Self::read_dimension(&conn)?)?;
        let mut stmt = conn.prepare("SELECT embedding FROM vectors ORDER BY id")?;
        let vectors = stmt
            .query_map([], |row| row.get::<_, Vec<u8>>(0))?
            .map(|blob| blob.map(|b| blob_to_vector(&b)))
            .collect::<Result<Vec<_>, _>>()?;
        index.add(&vectors)?;

        if index.len() != metadata.chunk_count() {
            return Err(StoreError::Corrupt(format!(
                "{} vectors but {} chunks",
                index.len(),
                metadata.chunk_count()
            )));
        }

        Ok((index, metadata))
    }

    /// Read the index and metadata back, or `None` if either is missing or unreadable
    pub fn load_index(&self, kb_name: &str) -> Option<(FlatIndex, KnowledgeBaseMetadata)> {
        match self.read_index(kb_name) {
            Ok(loaded) => Some(loaded),
            Err(e) => {
                log::warn!("Failed to load knowledge base {}: {}", kb_name, e);
                None
            }
        }
    }

    pub fn load_metadata(&self, kb_name: &str) -> Option<KnowledgeBaseMetadata> {
        match self.read_metadata(kb_name) {
            Ok(metadata) => Some(metadata),
            Err(e) => {
                log::warn!("Failed to load metadata for {}: {}", kb_name, e);
                None
            }
        }
    }

    /// Brute-force search against the persisted index
    pub fn search_index(
        &self,
        kb_name: &str,
        query: &[f32],
        top_k: usize,
    ) -> Result<Vec<Neighbor>, StoreError> {
        let conn = self.open_existing_index(kb_name)?;
        let dimension = Self::read_dimension(&conn)?;
        if query.len() != dimension {
            return Err(StoreError::DimensionMismatch {
                expected: dimension,
                actual: query.len(),
            });
        }

        let mut stmt = conn.prepare(
            r#"
            SELECT id, vec_distance_l2(embedding, ?1) AS distance
            FROM vectors
            ORDER BY distance, id
            LIMIT ?2
            "#,
        )?;

        let neighbors = stmt
            .query_map(
                params![vector_to_blob(query), top_k.min(i64::MAX as usize) as i64],
                |row| {
                    let id: i64 = row.get(0)?;
                    let distance: f64 = row.get(1)?;
                    Ok((id, distance))
                },
            )?
            .map(|row| -> Result<Neighbor, StoreError> {
                let (id, distance) = row?;
                let id = usize::try_from(id)
                    .map_err(|_| StoreError::Corrupt(format!("negative vector id {}", id)))?;
                Ok(Neighbor {
                    id,
                    // vec_distance_l2 is the Euclidean distance; the index metric is its square
                    distance: (distance * distance) as f32,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(neighbors)
    }

    /// The `top_k` nearest stored vectors, or `None` if the index cannot be read
    pub fn search(&self, kb_name: &str, query: &[f32], top_k: usize) -> Option<Vec<Neighbor>> {
        match self.search_index(kb_name, query, top_k) {
            Ok(neighbors) => Some(neighbors),
            Err(e) => {
                log::warn!("Search failed for knowledge base {}: {}", kb_name, e);
                None
            }
        }
    }

    /// Chunk text stored under `doc_id`
    pub fn get_document(&self, kb_name: &str, doc_id: usize) -> Option<String> {
        self.load_metadata(kb_name)?
            .chunk(doc_id)
            .map(str::to_string)
    }

    /// Whether both sidecar files of `kb_name` are present
    pub fn exists(&self, kb_name: &str) -> bool {
        self.kb_dir(kb_name)
            .map(|dir| dir.join(INDEX_FILE).is_file() && dir.join(METADATA_FILE).is_file())
            .unwrap_or(false)
    }

    /// Names of all stored knowledge bases, sorted
    pub fn list_knowledge_bases(&self) -> Vec<String> {
        let entries = match fs::read_dir(&self.base_path) {
            Ok(entries) => entries,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    log::warn!(
                        "Failed to list knowledge bases in {}: {}",
                        self.base_path.display(),
                        e
                    );
                }
                return vec![];
            }
        };

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_dir())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| self.exists(name))
            .collect();
        names.sort();
        names
    }

    /// Remove every file of `kb_name`; false if it did not exist
    pub fn delete_knowledge_base(&self, kb_name: &str) -> bool {
        let dir = match self.kb_dir(kb_name) {
            Ok(dir) => dir,
            Err(e) => {
                log::warn!("Refusing to delete knowledge base: {}", e);
                return false;
            }
        };
        if !dir.is_dir() {
            return false;
        }

        match fs::remove_dir_all(&dir) {
            Ok(()) => {
                log::info!("Deleted knowledge base {}", kb_name);
                true
            }
            Err(e) => {
                log::error!("Failed to delete knowledge base {}: {}", kb_name, e);
                false
            }
        }
    }
}
