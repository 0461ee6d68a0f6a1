//! Format-specific text extraction
//!
//! Each processor turns one kind of file into a single text blob. The manager
//! picks a processor by file extension and skips files whose extraction fails.

use quick_xml::events::Event;
use quick_xml::Reader;
use serde_json::{Map, Value};
use std::fs::{self, File};
use std::io::Read;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to extract PDF text: {0}")]
    Pdf(String),
    #[error("Failed to read DOCX archive: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("Invalid DOCX markup: {0}")]
    Xml(#[from] quick_xml::Error),
}

/// Extracts plain text from files of one or more formats
pub trait DocumentProcessor: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Lower-case extensions without the leading dot
    fn supported_extensions(&self) -> &[&str];

    /// Extract the text of `path`
    fn extract_text(&self, path: &Path) -> Result<String, ExtractError>;

    /// Extract the text of `path`, logging and discarding any failure
    fn extract(&self, path: &Path) -> Option<String> {
        match self.extract_text(path) {
            Ok(text) => Some(text),
            Err(e) => {
                log::warn!(
                    "{} processor failed on {}: {}",
                    self.name(),
                    path.display(),
                    e
                );
                None
            }
        }
    }
}

/// Plain text and markdown, read verbatim
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextProcessor;

impl DocumentProcessor for PlainTextProcessor {
    fn name(&self) -> &str {
        "text"
    }

    fn supported_extensions(&self) -> &[&str] {
        &["txt", "md"]
    }

    fn extract_text(&self, path: &Path) -> Result<String, ExtractError> {
        Ok(fs::read_to_string(path)?)
    }
}

/// JSON documents, flattened into `key: value` lines
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonProcessor;

impl JsonProcessor {
    fn render(value: &Value) -> String {
        match value {
            Value::Object(map) => Self::render_object(map),
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::Object(map) => Self::render_object(map),
                    other => Self::render_scalar(other),
                })
                .collect::<Vec<_>>()
                .join("\n\n"),
            other => Self::render_scalar(other),
        }
    }

    fn render_object(map: &Map<String, Value>) -> String {
        map.iter()
            .map(|(key, value)| format!("{}: {}", key, Self::render_scalar(value)))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Strings verbatim, everything else as compact JSON
    fn render_scalar(value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl DocumentProcessor for JsonProcessor {
    fn name(&self) -> &str {
        "json"
    }

    fn supported_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn extract_text(&self, path: &Path) -> Result<String, ExtractError> {
        let content = fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&content)?;
        Ok(Self::render(&value))
    }
}

/// PDF documents, text of every page in page order
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfProcessor;

impl DocumentProcessor for PdfProcessor {
    fn name(&self) -> &str {
        "pdf"
    }

    fn supported_extensions(&self) -> &[&str] {
        &["pdf"]
    }

    fn extract_text(&self, path: &Path) -> Result<String, ExtractError> {
        let bytes = fs::read(path)?;
        // The PDF parser panics on some malformed inputs
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem(&bytes)
        }));

        match result {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(ExtractError::Pdf(e.to_string())),
            Err(_) => Err(ExtractError::Pdf("parser panicked".to_string())),
        }
    }
}

/// Word documents, one line per paragraph
#[derive(Debug, Default, Clone, Copy)]
pub struct DocxProcessor;

impl DocxProcessor {
    fn paragraphs(xml: &str) -> Result<Vec<String>, ExtractError> {
        let mut reader = Reader::from_str(xml);
        let mut paragraphs = Vec::new();
        let mut current: Option<String> = None;
        let mut in_run = false;
        let mut in_text = false;

        loop {
            match reader.read_event()? {
                Event::Start(e) => match e.name().as_ref() {
                    b"w:p" => current = Some(String::new()),
                    b"w:r" => in_run = true,
                    b"w:t" => in_text = true,
                    _ => {}
                },
                Event::Empty(e) => match e.name().as_ref() {
                    b"w:p" => paragraphs.push(String::new()),
                    // Outside a run these are tab-stop and layout definitions
                    b"w:tab" if in_run => {
                        if let Some(paragraph) = current.as_mut() {
                            paragraph.push('\t');
                        }
                    }
                    b"w:br" | b"w:cr" if in_run => {
                        if let Some(paragraph) = current.as_mut() {
                            paragraph.push('\n');
                        }
                    }
                    _ => {}
                },
                Event::Text(t) if in_text => {
                    if let Some(paragraph) = current.as_mut() {
                        paragraph.push_str(&t.unescape()?);
                    }
                }
                Event::End(e) => match e.name().as_ref() {
                    b"w:t" => in_text = false,
                    b"w:r" => in_run = false,
                    b"w:p" => {
                        if let Some(paragraph) = current.take() {
                            paragraphs.push(paragraph);
                        }
                    }
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(paragraphs)
    }
}

impl DocumentProcessor for DocxProcessor {
    fn name(&self) -> &str {
        "docx"
    }

    fn supported_extensions(&self) -> &[&str] {
        &["docx"]
    }

    fn extract_text(&self, path: &Path) -> Result<String, ExtractError> {
        let mut archive = zip::ZipArchive::new(File::open(path)?)?;
        let mut xml = String::new();
        archive.by_name("word/document.xml")?.read_to_string(&mut xml)?;
        Ok(Self::paragraphs(&xml)?.join("\n"))
    }
}
