//! Text chunking for embedding generation
//!
//! Splits document text into fixed-size character windows that advance by
//! `chunk_size - chunk_overlap` characters, so neighbouring chunks share
//! `chunk_overlap` characters.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChunkError {
    #[error("chunk overlap ({overlap}) must be smaller than chunk size ({size})")]
    InvalidWindow { size: usize, overlap: usize },
}

/// Check that a window of `chunk_size` with `chunk_overlap` makes progress
pub fn validate_window(chunk_size: usize, chunk_overlap: usize) -> Result<(), ChunkError> {
    if chunk_size == 0 || chunk_overlap >= chunk_size {
        return Err(ChunkError::InvalidWindow {
            size: chunk_size,
            overlap: chunk_overlap,
        });
    }
    Ok(())
}

/// Split `text` into overlapping chunks of at most `chunk_size` characters
///
/// The last chunk always reaches the end of the text. Lengths are counted in
/// characters, and chunks never split a multi-byte character.
pub fn chunk_text(
    text: &str,
    chunk_size: usize,
    chunk_overlap: usize,
) -> Result<Vec<String>, ChunkError> {
    validate_window(chunk_size, chunk_overlap)?;

    if text.is_empty() {
        return Ok(vec![]);
    }

    // Byte offset of every character, plus the end of the string
    let boundaries: Vec<usize> = text
        .char_indices()
        .map(|(offset, _)| offset)
        .chain(std::iter::once(text.len()))
        .collect();
    let total_chars = boundaries.len() - 1;
    let step = chunk_size - chunk_overlap;

    let mut chunks = Vec::with_capacity(total_chars / step + 1);
    let mut start = 0;

    while start < total_chars {
        let end = (start + chunk_size).min(total_chars);
        chunks.push(text[boundaries[start]..boundaries[end]].to_string());
        start += step;
    }

    Ok(chunks)
}
