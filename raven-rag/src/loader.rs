//! Loading source documents from a directory.
//!
//! The loader scans a single directory (non-recursive) for supported files:
//! PDFs are extracted page by page, one [`Document`] per page, so retrieval
//! results can point back to an exact page; plain-text and markdown files
//! load as a single document each. Unreadable files are skipped with a
//! warning and ingestion continues.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::document::Document;
use crate::error::Result;

/// Loads source documents from a configured directory.
#[derive(Debug, Clone)]
pub struct DocumentLoader {
    docs_dir: PathBuf,
}

impl DocumentLoader {
    /// Create a loader for the given documents directory.
    pub fn new(docs_dir: impl Into<PathBuf>) -> Self {
        Self { docs_dir: docs_dir.into() }
    }

    /// The directory this loader scans.
    pub fn docs_dir(&self) -> &Path {
        &self.docs_dir
    }

    /// Load every supported file in the documents directory.
    ///
    /// Returns an empty `Vec` (not an error) when the directory is missing or
    /// contains no supported files; deciding whether that is fatal belongs to
    /// the caller that needed the documents. Files are visited in filename
    /// order so chunk ids are reproducible across runs.
    pub fn load(&self) -> Result<Vec<Document>> {
        if !self.docs_dir.is_dir() {
            warn!(dir = %self.docs_dir.display(), "documents directory does not exist");
            return Ok(Vec::new());
        }

        let mut paths: Vec<PathBuf> = std::fs::read_dir(&self.docs_dir)
            .map_err(|e| crate::error::RagError::PipelineError(format!(
                "failed to read documents directory '{}': {e}",
                self.docs_dir.display()
            )))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file())
            .collect();
        paths.sort();

        let mut documents = Vec::new();
        for path in paths {
            let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("").to_ascii_lowercase();
            match ext.as_str() {
                "pdf" => self.load_pdf(&path, &mut documents),
                "txt" | "md" => self.load_text(&path, &mut documents),
                _ => debug!(file = %path.display(), "skipping unsupported file type"),
            }
        }

        info!(dir = %self.docs_dir.display(), count = documents.len(), "loaded documents");
        Ok(documents)
    }

    /// Extract a PDF page by page, appending one document per non-empty page.
    fn load_pdf(&self, path: &Path, documents: &mut Vec<Document>) {
        let stem = file_stem(path);
        match pdf_extract::extract_text_by_pages(path) {
            Ok(pages) => {
                let page_count = pages.len();
                for (i, page_text) in pages.into_iter().enumerate() {
                    let text = page_text.trim();
                    if text.is_empty() {
                        continue;
                    }
                    let mut metadata = HashMap::new();
                    metadata.insert("source".to_string(), file_name(path));
                    metadata.insert("page".to_string(), (i + 1).to_string());
                    documents.push(Document {
                        id: format!("{stem}_p{}", i + 1),
                        text: text.to_string(),
                        metadata,
                    });
                }
                debug!(file = %path.display(), pages = page_count, "loaded pdf");
            }
            Err(e) => warn!(file = %path.display(), error = %e, "failed to extract pdf, skipping"),
        }
    }

    /// Load a plain-text or markdown file as a single document.
    fn load_text(&self, path: &Path, documents: &mut Vec<Document>) {
        match std::fs::read_to_string(path) {
            Ok(text) if !text.trim().is_empty() => {
                let mut metadata = HashMap::new();
                metadata.insert("source".to_string(), file_name(path));
                documents.push(Document { id: file_stem(path), text, metadata });
            }
            Ok(_) => debug!(file = %path.display(), "skipping empty file"),
            Err(e) => warn!(file = %path.display(), error = %e, "failed to read file, skipping"),
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name().and_then(|s| s.to_str()).unwrap_or("unknown").to_string()
}

fn file_stem(path: &Path) -> String {
    path.file_stem().and_then(|s| s.to_str()).unwrap_or("unknown").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_directory_loads_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let loader = DocumentLoader::new(dir.path().join("nope"));
        assert!(loader.load().unwrap().is_empty());
    }

    #[test]
    fn text_files_load_in_filename_order_with_metadata() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b_second.txt"), "second body").unwrap();
        std::fs::write(dir.path().join("a_first.md"), "first body").unwrap();
        std::fs::write(dir.path().join("ignored.wav"), [0u8; 4]).unwrap();

        let documents = DocumentLoader::new(dir.path()).load().unwrap();
        assert_eq!(documents.len(), 2);
        assert_eq!(documents[0].id, "a_first");
        assert_eq!(documents[1].id, "b_second");
        assert_eq!(documents[0].metadata.get("source").unwrap(), "a_first.md");
    }

    #[test]
    fn empty_and_unreadable_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("empty.txt"), "   \n").unwrap();
        std::fs::write(dir.path().join("broken.pdf"), b"not a pdf").unwrap();

        let documents = DocumentLoader::new(dir.path()).load().unwrap();
        assert!(documents.is_empty());
    }
}
