//! Entity extraction from heterogeneous structured documents.
//!
//! Documents carry no type tag. Their kind is recognised by which wrapper key holds
//! the payload (`[role]`, `[guard]`, `[route]`, ...). `EntityShape` is the single
//! table of known wrappers, tried in priority order, with bare top-level fields as
//! the lowest-priority shape.
//!
//! ```toml
//! [guard]
//! id = "auth-guard"
//! name = "Auth Guard"
//!
//! [relations]
//! roles = ["admin"]
//! ```

use crate::core::reader::{ParsedDocument, file_stem};
use serde::Serialize;
use std::collections::BTreeMap;

/// relation kind -> referenced ids
pub type Relations = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityShape {
    UseCase,
    Guard,
    Role,
    Route,
    Topic,
    Project,
    Entity,
    Status,
    Component,
    Module,
    /// Fields live directly at the top level.
    Bare,
}

impl EntityShape {
    /// Wrapped shapes in priority order. `Bare` is implied last.
    pub const WRAPPED: [EntityShape; 10] = [
        EntityShape::UseCase,
        EntityShape::Guard,
        EntityShape::Role,
        EntityShape::Route,
        EntityShape::Topic,
        EntityShape::Project,
        EntityShape::Entity,
        EntityShape::Status,
        EntityShape::Component,
        EntityShape::Module,
    ];

    pub fn wrapper_key(self) -> Option<&'static str> {
        match self {
            EntityShape::UseCase => Some("use_case"),
            EntityShape::Guard => Some("guard"),
            EntityShape::Role => Some("role"),
            EntityShape::Route => Some("route"),
            EntityShape::Topic => Some("topic"),
            EntityShape::Project => Some("project"),
            EntityShape::Entity => Some("entity"),
            EntityShape::Status => Some("status"),
            EntityShape::Component => Some("component"),
            EntityShape::Module => Some("module"),
            EntityShape::Bare => None,
        }
    }

    /// Fields consulted for the display title, in order.
    pub fn title_fields(self) -> &'static [&'static str] {
        match self {
            EntityShape::Route => &["title"],
            EntityShape::Bare => &["name", "title"],
            _ => &["name"],
        }
    }

    /// The payload table for this shape, if the document has one.
    pub fn body(self, doc: &toml::Table) -> Option<&toml::Table> {
        match self.wrapper_key() {
            Some(key) => doc.get(key).and_then(toml::Value::as_table),
            None => Some(doc),
        }
    }

    /// Highest-priority shape present in `doc`.
    pub fn detect(doc: &toml::Table) -> EntityShape {
        Self::WRAPPED
            .into_iter()
            .find(|shape| shape.body(doc).is_some())
            .unwrap_or(EntityShape::Bare)
    }

    /// Bare first, then every wrapper present, in priority order.
    fn candidates(doc: &toml::Table) -> impl Iterator<Item = (EntityShape, &toml::Table)> {
        std::iter::once(EntityShape::Bare)
            .chain(Self::WRAPPED)
            .filter_map(move |shape| shape.body(doc).map(|body| (shape, body)))
    }
}

/// What the extractor learns from one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    pub id: String,
    pub title: Option<String>,
    pub relations: Option<Relations>,
}

fn scalar_string(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        toml::Value::Integer(i) => Some(i.to_string()),
        _ => None,
    }
}

/// Top-level `id`, then `id` under each wrapper; `None` when absent everywhere.
pub fn resolve_id(doc: &toml::Table) -> Option<String> {
    EntityShape::candidates(doc).find_map(|(_, body)| body.get("id").and_then(scalar_string))
}

/// Route-shaped documents read `title` at every level, top level included.
pub fn resolve_title(doc: &toml::Table) -> Option<String> {
    let top_level = match EntityShape::detect(doc) {
        EntityShape::Route => EntityShape::Route.title_fields(),
        _ => EntityShape::Bare.title_fields(),
    };
    EntityShape::candidates(doc).find_map(|(shape, body)| {
        let fields = match shape {
            EntityShape::Bare => top_level,
            _ => shape.title_fields(),
        };
        fields
            .iter()
            .find_map(|field| body.get(*field).and_then(scalar_string))
    })
}

/// Top-level `relations` table first, then the first wrapper carrying one.
/// Non-array entries and non-string targets are dropped.
pub fn resolve_relations(doc: &toml::Table) -> Option<Relations> {
    let table = EntityShape::candidates(doc)
        .find_map(|(_, body)| body.get("relations").and_then(toml::Value::as_table))?;

    let relations: Relations = table
        .iter()
        .filter_map(|(kind, value)| {
            let items = value.as_array()?;
            let targets = items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect();
            Some((kind.clone(), targets))
        })
        .collect();

    if relations.is_empty() {
        None
    } else {
        Some(relations)
    }
}

pub fn extract(doc: &toml::Table, file_name: &str) -> Extracted {
    Extracted {
        id: resolve_id(doc).unwrap_or_else(|| file_stem(file_name).to_string()),
        title: resolve_title(doc),
        relations: resolve_relations(doc),
    }
}

/// One identified record in the relation graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub folder: String,
    pub source_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relations: Option<Relations>,
}

impl Entity {
    pub fn from_document(doc: &ParsedDocument) -> Self {
        let Extracted {
            id,
            title,
            relations,
        } = extract(&doc.table, &doc.name);
        Entity {
            id,
            title,
            folder: folder_of(&doc.path),
            source_path: doc.path.clone(),
            relations,
        }
    }
}

/// Directory portion of a relative path; `.` for files in the root.
pub fn folder_of(rel_path: &str) -> String {
    match rel_path.rsplit_once('/') {
        Some((dir, _)) => dir.to_string(),
        None => ".".to_string(),
    }
}
