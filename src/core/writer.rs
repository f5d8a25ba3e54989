//! Output writer. Every build clears the output directory and writes the full
//! artifact set again.

use crate::core::error::SpecError;
use crate::core::pipeline::Build;
use crate::core::reader::ReadOutcome;
use crate::core::scan::FileKind;
use serde::Serialize;
use serde_json::json;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const TREE_FILE: &str = "tree.json";
pub const CONTENT_DIR: &str = "content";
pub const ROUTES_FILE: &str = "routes.json";
pub const RELATIONS_FILE: &str = "relations.json";
pub const MANIFEST_FILE: &str = "manifest.json";
pub const STATUS_FILE: &str = "status.json";

/// Pretty JSON with a trailing newline; the exact bytes written to disk.
pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String, SpecError> {
    let mut out = serde_json::to_string_pretty(value)?;
    out.push('\n');
    Ok(out)
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), SpecError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, render_json(value)?)?;
    debug!(path = %path.display(), "wrote artifact");
    Ok(())
}

fn unwritable(path: &Path, source: io::Error) -> SpecError {
    SpecError::OutputUnwritable {
        path: path.to_path_buf(),
        source,
    }
}

/// Remove and recreate `out`. Refuses to clear a directory that contains `root`.
pub fn prepare_output_dir(out: &Path, root: &Path) -> Result<(), SpecError> {
    if out.exists() {
        let out_abs = fs::canonicalize(out).map_err(|e| unwritable(out, e))?;
        let root_abs = fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());
        if root_abs.starts_with(&out_abs) {
            return Err(unwritable(
                out,
                io::Error::other("output directory contains the specification root"),
            ));
        }
        fs::remove_dir_all(out).map_err(|e| unwritable(out, e))?;
    }
    fs::create_dir_all(out).map_err(|e| unwritable(out, e))
}

fn content_path(out: &Path, rel: &str) -> PathBuf {
    let mut path = out.join(CONTENT_DIR);
    for segment in rel.split('/') {
        path.push(segment);
    }
    let mut name = path.into_os_string();
    name.push(".json");
    PathBuf::from(name)
}

fn write_structured_content(out: &Path, outcome: &ReadOutcome) -> Result<(), SpecError> {
    let kind = FileKind::StructuredConfig;
    match outcome {
        Ok(doc) => write_json(
            &content_path(out, &doc.path),
            &json!({
                "path": doc.path,
                "kind": kind,
                "content": crate::core::reader::table_to_json(&doc.table),
                "raw": doc.raw,
            }),
        ),
        Err(failure) => write_json(
            &content_path(out, &failure.path),
            &json!({
                "path": failure.path,
                "kind": kind,
                "content": null,
                "raw": failure.raw,
                "error": failure.cause.to_string(),
            }),
        ),
    }
}

/// Write every artifact of `build` under `out`. Returns the number of files written.
pub fn write_artifacts(build: &Build, out: &Path) -> Result<usize, SpecError> {
    prepare_output_dir(out, &build.scan.root)?;
    let mut written = 0;

    write_json(&out.join(TREE_FILE), &build.scan.tree)?;
    written += 1;

    for outcome in &build.structured {
        write_structured_content(out, outcome)?;
        written += 1;
    }
    for doc in &build.docs {
        write_json(
            &content_path(out, &doc.path),
            &json!({
                "path": doc.path,
                "kind": FileKind::LongFormText,
                "title": doc.title,
                "content": doc.content,
            }),
        )?;
        written += 1;
    }
    for failure in &build.doc_failures {
        write_json(
            &content_path(out, &failure.path),
            &json!({
                "path": failure.path,
                "kind": FileKind::LongFormText,
                "content": null,
                "error": failure.cause,
            }),
        )?;
        written += 1;
    }

    write_json(&out.join(ROUTES_FILE), &build.routes)?;
    write_json(&out.join(RELATIONS_FILE), &build.graph)?;
    fs::write(out.join(MANIFEST_FILE), &build.manifest_json)?;
    write_json(&out.join(STATUS_FILE), &build.status)?;
    written += 4;

    info!(out = %out.display(), files = written, "artifacts written");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn content_path_mirrors_source_layout() {
        let path = content_path(Path::new("/out"), "roles/admin.toml");
        assert_eq!(path, PathBuf::from("/out/content/roles/admin.toml.json"));
    }

    #[test]
    fn render_json_ends_with_newline() {
        let rendered = render_json(&json!({"b": 1, "a": 2})).unwrap();
        assert!(rendered.ends_with("}\n"));
        assert!(rendered.find("\"a\"").unwrap() < rendered.find("\"b\"").unwrap());
    }

    #[test]
    fn prepare_clears_stale_files() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().join("spec");
        let out = tmp.path().join("generated");
        fs::create_dir_all(&root).unwrap();
        fs::create_dir_all(out.join("content")).unwrap();
        fs::write(out.join("content/stale.json"), "{}").unwrap();

        prepare_output_dir(&out, &root).unwrap();
        assert!(out.is_dir());
        assert!(!out.join("content").exists());
    }

    #[test]
    fn prepare_refuses_to_clear_the_root() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().join("spec");
        fs::create_dir_all(&root).unwrap();
        let err = prepare_output_dir(tmp.path(), &root).unwrap_err();
        assert!(matches!(err, SpecError::OutputUnwritable { .. }));
        assert!(root.exists());
    }
}
