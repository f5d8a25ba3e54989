//! Referential integrity checks over a built relation graph.
//!
//! Purely diagnostic: the graph is never pruned and a run with warnings still
//! emits every artifact.

use crate::core::graph::RelationGraph;
use serde::Serialize;
use std::fmt;

/// A relation whose target id is not defined by any document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DanglingReference {
    pub source_id: String,
    pub relation_kind: String,
    pub missing_target_id: String,
}

impl fmt::Display for DanglingReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -[{}]-> {} (missing)",
            self.source_id, self.relation_kind, self.missing_target_id
        )
    }
}

pub fn validate_graph(graph: &RelationGraph) -> Vec<DanglingReference> {
    graph
        .triples()
        .filter(|(_, _, target)| !graph.by_id.contains_key(*target))
        .map(|(source, kind, target)| DanglingReference {
            source_id: source.to_string(),
            relation_kind: kind.to_string(),
            missing_target_id: target.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::extract::Entity;
    use crate::core::graph::build_graph;

    fn entity(id: &str, targets: &[&str]) -> Entity {
        Entity {
            id: id.to_string(),
            title: None,
            folder: "guards".to_string(),
            source_path: format!("guards/{}.toml", id),
            relations: if targets.is_empty() {
                None
            } else {
                Some(
                    [(
                        "roles".to_string(),
                        targets.iter().map(|t| t.to_string()).collect(),
                    )]
                    .into_iter()
                    .collect(),
                )
            },
        }
    }

    #[test]
    fn clean_graph_has_no_warnings() {
        let graph = build_graph(&[entity("g", &["r"]), entity("r", &[])]).graph;
        assert!(validate_graph(&graph).is_empty());
    }

    #[test]
    fn reports_each_missing_target_without_pruning() {
        let graph = build_graph(&[entity("g", &["r", "ghost"]), entity("r", &[])]).graph;
        let warnings = validate_graph(&graph);
        assert_eq!(
            warnings,
            vec![DanglingReference {
                source_id: "g".to_string(),
                relation_kind: "roles".to_string(),
                missing_target_id: "ghost".to_string(),
            }]
        );
        assert_eq!(graph.relations["g"]["roles"], vec!["r", "ghost"]);
        assert_eq!(graph.referenced_by["ghost"], vec!["g"]);
        assert_eq!(warnings[0].to_string(), "g -[roles]-> ghost (missing)");
    }
}
