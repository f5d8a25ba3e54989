//! Manifest compiler: merges layers, long-form docs and the relation graph into
//! one artifact.
//!
//! Layer folders are walked recursively (unlike the flat per-directory buckets of
//! the relation graph). Each structured document is flattened: the highest-priority
//! wrapper is unwrapped, sibling keys are merged in, `relations` is dropped (it lives
//! in `relations.graph`), and `_meta` records where the entity came from.

use crate::core::docs::{DocEntry, LongFormDocument};
use crate::core::extract::{EntityShape, Relations, extract};
use crate::core::graph::{Location, RelationGraph};
use crate::core::reader::{ParsedDocument, to_json};
use crate::core::scan::{DirectoryNode, FileKind};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value as JsonValue};
use std::collections::BTreeMap;
use tracing::debug;

pub type JsonMap = Map<String, JsonValue>;

/// Layer names in emission order. Each maps to the same-named top-level folder.
pub const LAYERS: &[&str] = &[
    "entities",
    "components",
    "routes",
    "pages",
    "use-cases",
    "roles",
    "guards",
    "events",
    "platforms",
    "knowledge",
    "modules",
];

pub const META_KEY: &str = "_meta";

/// Layers in fixed order; serialized as a JSON object that keeps that order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layers(pub Vec<(String, Vec<JsonMap>)>);

impl Layers {
    pub fn get(&self, name: &str) -> Option<&[JsonMap]> {
        self.0
            .iter()
            .find(|(layer, _)| layer == name)
            .map(|(_, entities)| entities.as_slice())
    }

    pub fn entity_count(&self) -> usize {
        self.0.iter().map(|(_, entities)| entities.len()).sum()
    }
}

impl Serialize for Layers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, entities) in &self.0 {
            map.serialize_entry(name, entities)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relations: Option<Relations>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referenced_by: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestRelations {
    pub by_id: BTreeMap<String, Location>,
    pub graph: BTreeMap<String, GraphNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Manifest {
    pub project: Option<JsonMap>,
    pub layers: Layers,
    pub docs: Vec<DocEntry>,
    pub relations: ManifestRelations,
}

pub struct ManifestInput<'a> {
    pub tree: &'a DirectoryNode,
    /// Successfully parsed structured documents keyed by relative path
    pub documents: &'a BTreeMap<String, ParsedDocument>,
    pub docs: &'a [LongFormDocument],
    pub graph: &'a RelationGraph,
    /// Relative path of the project metadata document
    pub project_doc: &'a str,
}

/// Flatten one structured document into a manifest entity.
pub fn flatten(doc: &ParsedDocument, layer: &str) -> JsonMap {
    let table = &doc.table;
    let shape = EntityShape::detect(table);
    let mut fields = JsonMap::new();

    if let Some(body) = shape.body(table) {
        for (key, value) in body {
            if key != "relations" {
                fields.insert(key.clone(), to_json(value));
            }
        }
    }
    if let Some(wrapper) = shape.wrapper_key() {
        for (key, value) in table {
            if key == wrapper || key == "relations" || fields.contains_key(key) {
                continue;
            }
            fields.insert(key.clone(), to_json(value));
        }
    }

    // Same id the relation graph uses, so manifest entities and graph keys agree.
    let id = extract(table, &doc.name).id;
    fields.insert("id".to_string(), JsonValue::String(id));
    fields.insert(
        META_KEY.to_string(),
        serde_json::json!({ "path": doc.path, "layer": layer }),
    );
    fields
}

fn compile_layer(input: &ManifestInput<'_>, layer: &str) -> Vec<JsonMap> {
    let Some(node) = input.tree.find(layer) else {
        debug!(layer, "layer folder absent");
        return Vec::new();
    };
    node.walk_files()
        .into_iter()
        .filter(|file| file.kind == FileKind::StructuredConfig && file.path != input.project_doc)
        .filter_map(|file| input.documents.get(&file.path))
        .map(|doc| flatten(doc, layer))
        .collect()
}

fn compile_relations(graph: &RelationGraph) -> ManifestRelations {
    let nodes = graph
        .by_id
        .keys()
        .map(|id| {
            let node = GraphNode {
                relations: graph.relations.get(id).cloned(),
                referenced_by: graph.referenced_by.get(id).cloned(),
            };
            (id.clone(), node)
        })
        .collect();
    ManifestRelations {
        by_id: graph.by_id.clone(),
        graph: nodes,
    }
}

pub fn compile_manifest(input: &ManifestInput<'_>) -> Manifest {
    let project = input.documents.get(input.project_doc).map(|doc| {
        let layer = doc.path.split('/').next().unwrap_or_default();
        flatten(doc, layer)
    });

    let layers = Layers(
        LAYERS
            .iter()
            .map(|layer| (layer.to_string(), compile_layer(input, layer)))
            .collect(),
    );

    Manifest {
        project,
        layers,
        docs: input.docs.iter().map(DocEntry::from).collect(),
        relations: compile_relations(input.graph),
    }
}
