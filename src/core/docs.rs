use crate::core::reader::file_stem;
use crate::core::scan::FileRef;
use rayon::prelude::*;
use regex::Regex;
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use tracing::warn;

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#[ \t]+(\S.*?)[ \t\r]*$").expect("title pattern compiles"));

/// A long-form (Markdown) document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LongFormDocument {
    pub path: String,
    pub id: String,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocFailure {
    pub path: String,
    pub cause: String,
}

/// Provenance attached to every emitted document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocMeta {
    pub path: String,
}

/// Manifest view of a long-form document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocEntry {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(rename = "_meta")]
    pub meta: DocMeta,
}

impl From<&LongFormDocument> for DocEntry {
    fn from(doc: &LongFormDocument) -> Self {
        DocEntry {
            id: doc.id.clone(),
            title: doc.title.clone(),
            content: doc.content.clone(),
            meta: DocMeta {
                path: doc.path.clone(),
            },
        }
    }
}

/// Text of the first level-one heading, if any.
pub fn extract_title(markdown: &str) -> Option<String> {
    TITLE_RE
        .captures(markdown)
        .map(|cap| cap[1].to_string())
}

/// Relative path without its extension, e.g. `guides/intro.md` -> `guides/intro`.
pub fn doc_id(rel_path: &str) -> String {
    match rel_path.rsplit_once('/') {
        Some((dir, name)) => format!("{}/{}", dir, file_stem(name)),
        None => file_stem(rel_path).to_string(),
    }
}

pub fn build_document(path: &str, name: &str, content: String) -> LongFormDocument {
    let title = extract_title(&content).unwrap_or_else(|| file_stem(name).to_string());
    LongFormDocument {
        path: path.to_string(),
        id: doc_id(path),
        title,
        content,
    }
}

/// Read long-form files concurrently; results keep the input order.
pub fn read_docs(root: &Path, files: &[&FileRef]) -> Vec<Result<LongFormDocument, DocFailure>> {
    files
        .par_iter()
        .map(|file| {
            fs::read_to_string(root.join(&file.path))
                .map(|content| build_document(&file.path, &file.name, content))
                .map_err(|e| {
                    warn!(path = %file.path, error = %e, "long-form document skipped");
                    DocFailure {
                        path: file.path.clone(),
                        cause: e.to_string(),
                    }
                })
        })
        .collect()
}
