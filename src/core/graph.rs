//! Relation graph: id index, folder index, forward relations and computed backlinks.

use crate::core::extract::{Entity, Relations};
use rustc_hash::FxHashSet;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub path: String,
    pub folder: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationGraph {
    pub by_id: BTreeMap<String, Location>,
    /// folder -> ids, in scan order
    pub by_folder: BTreeMap<String, Vec<String>>,
    pub relations: BTreeMap<String, Relations>,
    /// target -> referencing ids, deduplicated, in order of first discovery
    pub referenced_by: BTreeMap<String, Vec<String>>,
}

/// Two documents resolved to the same id; the later one replaced the earlier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdCollision {
    pub id: String,
    pub kept: String,
    pub replaced: String,
}

#[derive(Debug, Clone, Default)]
pub struct GraphBuild {
    pub graph: RelationGraph,
    pub collisions: Vec<IdCollision>,
}

impl RelationGraph {
    pub fn relation_count(&self) -> usize {
        self.relations
            .values()
            .flat_map(|kinds| kinds.values())
            .map(Vec::len)
            .sum()
    }

    pub fn backlink_count(&self) -> usize {
        self.referenced_by.values().map(Vec::len).sum()
    }

    /// Every `(source, kind, target)` triple, in sorted source/kind order.
    pub fn triples(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.relations.iter().flat_map(|(source, kinds)| {
            kinds.iter().flat_map(move |(kind, targets)| {
                targets
                    .iter()
                    .map(move |target| (source.as_str(), kind.as_str(), target.as_str()))
            })
        })
    }
}

/// Build the graph from entities in scan order. Duplicate ids are last-write-wins;
/// each overwrite is reported as an `IdCollision`.
pub fn build_graph(entities: &[Entity]) -> GraphBuild {
    let mut graph = RelationGraph::default();
    let mut collisions = Vec::new();

    for entity in entities {
        let location = Location {
            path: entity.source_path.clone(),
            folder: entity.folder.clone(),
            title: entity.title.clone(),
        };
        if let Some(previous) = graph.by_id.insert(entity.id.clone(), location) {
            warn!(id = %entity.id, kept = %entity.source_path, replaced = %previous.path, "duplicate entity id");
            collisions.push(IdCollision {
                id: entity.id.clone(),
                kept: entity.source_path.clone(),
                replaced: previous.path,
            });
        }
        graph
            .by_folder
            .entry(entity.folder.clone())
            .or_default()
            .push(entity.id.clone());

        match &entity.relations {
            Some(relations) => {
                graph.relations.insert(entity.id.clone(), relations.clone());
            }
            None => {
                graph.relations.remove(&entity.id);
            }
        }
    }

    let mut seen: FxHashSet<(&str, &str)> = FxHashSet::default();
    for entity in entities {
        // Overwritten duplicates contribute no backlinks.
        let is_winner = graph
            .by_id
            .get(&entity.id)
            .is_some_and(|loc| loc.path == entity.source_path);
        if !is_winner || entity.relations.is_none() {
            continue;
        }
        let Some(relations) = graph.relations.get(&entity.id) else {
            continue;
        };
        for target in relations.values().flatten() {
            if seen.insert((target.as_str(), entity.id.as_str())) {
                graph
                    .referenced_by
                    .entry(target.clone())
                    .or_default()
                    .push(entity.id.clone());
            }
        }
    }

    GraphBuild { graph, collisions }
}
