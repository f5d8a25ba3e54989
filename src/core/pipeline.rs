//! One end-to-end compilation pass.
//!
//! Scan -> read (parallel per directory level) -> extract -> graph -> validate ->
//! manifest -> status. Everything up to the fan-in of one directory's reads is
//! parallel; everything after is sequential and operates on owned values, so the
//! pass is a pure function of the input tree.

use crate::core::config::BuildConfig;
use crate::core::docs::{DocFailure, LongFormDocument, read_docs};
use crate::core::error::SpecError;
use crate::core::extract::Entity;
use crate::core::graph::{IdCollision, RelationGraph, build_graph};
use crate::core::interview::{StatusSnapshot, Summary, assess};
use crate::core::manifest::{Manifest, ManifestInput, compile_manifest};
use crate::core::reader::{ParseFailure, ParsedDocument, ReadOutcome, read_all};
use crate::core::routes::route_lookup;
use crate::core::scan::{DirectoryNode, FileKind, FileRef, Scan, scan_tree};
use crate::core::validate::{DanglingReference, validate_graph};
use crate::core::writer::render_json;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone)]
pub struct Build {
    pub scan: Scan,
    /// Every structured read, success or failure, in scan order
    pub structured: Vec<ReadOutcome>,
    pub docs: Vec<LongFormDocument>,
    pub doc_failures: Vec<DocFailure>,
    pub entities: Vec<Entity>,
    pub graph: RelationGraph,
    pub collisions: Vec<IdCollision>,
    pub warnings: Vec<DanglingReference>,
    pub routes: BTreeMap<String, String>,
    pub manifest: Manifest,
    /// Serialized manifest, as written to disk
    pub manifest_json: String,
    pub status: StatusSnapshot,
}

impl Build {
    pub fn summary(&self) -> &Summary {
        &self.status.summary
    }

    pub fn parsed(&self) -> impl Iterator<Item = &ParsedDocument> {
        self.structured.iter().filter_map(|o| o.as_ref().ok())
    }

    pub fn parse_failures(&self) -> impl Iterator<Item = &ParseFailure> {
        self.structured.iter().filter_map(|o| o.as_ref().err())
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty() || !self.collisions.is_empty()
    }
}

fn files_of_kind(dir: &DirectoryNode, kind: FileKind) -> Vec<&FileRef> {
    dir.files.iter().filter(|f| f.kind == kind).collect()
}

fn fingerprint(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Compile using `config` (paths already resolved).
pub fn compile(config: &BuildConfig) -> Result<Build, SpecError> {
    compile_root(&config.root, &config.project_doc)
}

pub fn compile_root(root: &Path, project_doc: &str) -> Result<Build, SpecError> {
    let scan = scan_tree(root)?;
    info!(root = %root.display(), "scan complete");

    let mut structured = Vec::new();
    let mut docs = Vec::new();
    let mut doc_failures = Vec::new();
    for dir in scan.tree.walk_dirs() {
        structured.extend(read_all(root, &files_of_kind(dir, FileKind::StructuredConfig)));
        for outcome in read_docs(root, &files_of_kind(dir, FileKind::LongFormText)) {
            match outcome {
                Ok(doc) => docs.push(doc),
                Err(failure) => doc_failures.push(failure),
            }
        }
    }

    let documents: BTreeMap<String, ParsedDocument> = structured
        .iter()
        .filter_map(|o| o.as_ref().ok())
        .map(|doc| (doc.path.clone(), doc.clone()))
        .collect();
    let entities: Vec<Entity> = structured
        .iter()
        .filter_map(|o| o.as_ref().ok())
        .map(Entity::from_document)
        .collect();

    let graph_build = build_graph(&entities);
    let graph = graph_build.graph;
    let collisions = graph_build.collisions;
    let warnings = validate_graph(&graph);
    info!(
        entities = graph.by_id.len(),
        warnings = warnings.len(),
        "relation graph validated"
    );

    let routes = route_lookup(structured.iter().filter_map(|o| o.as_ref().ok()));

    let manifest = compile_manifest(&ManifestInput {
        tree: &scan.tree,
        documents: &documents,
        docs: &docs,
        graph: &graph,
        project_doc,
    });
    let manifest_json = render_json(&manifest)?;

    let parse_failures = structured.iter().filter(|o| o.is_err()).count() + doc_failures.len();
    let summary = Summary {
        documents: scan.tree.walk_files().len(),
        entities: graph.by_id.len(),
        relations: graph.relation_count(),
        backlinks: graph.backlink_count(),
        warnings: warnings.len(),
        id_collisions: collisions.len(),
        parse_failures,
        scan_failures: scan.failures.len(),
    };
    let project_id = manifest
        .project
        .as_ref()
        .and_then(|p| p.get("id"))
        .and_then(|id| id.as_str())
        .map(str::to_string);
    let status = StatusSnapshot {
        project: project_id,
        fingerprint: fingerprint(manifest_json.as_bytes()),
        interview: assess(manifest.project.as_ref()),
        summary,
        warnings: warnings.clone(),
        collisions: collisions.clone(),
    };

    Ok(Build {
        scan,
        structured,
        docs,
        doc_failures,
        entities,
        graph,
        collisions,
        warnings,
        routes,
        manifest,
        manifest_json,
        status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn fingerprint_is_hex_sha256() {
        let fp = fingerprint(b"abc");
        assert_eq!(
            fp,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn empty_root_compiles_to_empty_artifacts() {
        let tmp = tempdir().unwrap();
        let build = compile_root(tmp.path(), "knowledge/project.toml").unwrap();
        assert_eq!(build.summary().documents, 0);
        assert!(build.manifest.project.is_none());
        assert_eq!(build.manifest.layers.0.len(), crate::core::manifest::LAYERS.len());
        assert!(!build.has_warnings());
    }

    #[test]
    fn parse_failures_are_counted_not_fatal() {
        let tmp = tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("roles")).unwrap();
        fs::write(tmp.path().join("roles/bad.toml"), "[role\n").unwrap();
        fs::write(tmp.path().join("roles/ok.toml"), "[role]\nid = \"ok\"\n").unwrap();

        let build = compile_root(tmp.path(), "knowledge/project.toml").unwrap();
        assert_eq!(build.summary().parse_failures, 1);
        assert_eq!(build.parse_failures().count(), 1);
        assert_eq!(build.summary().entities, 1);
        assert_eq!(build.manifest.layers.get("roles").unwrap().len(), 1);
    }
}
