use crate::core::reader::ParsedDocument;
use std::collections::BTreeMap;
use tracing::warn;

/// Map every `route.path` found in structured documents to the document's
/// relative path. Documents are visited in scan order; a repeated route path
/// keeps the last document.
pub fn route_lookup<'a>(
    documents: impl IntoIterator<Item = &'a ParsedDocument>,
) -> BTreeMap<String, String> {
    let mut routes = BTreeMap::new();
    for doc in documents {
        let Some(route_path) = doc
            .table
            .get("route")
            .and_then(toml::Value::as_table)
            .and_then(|route| route.get("path"))
            .and_then(toml::Value::as_str)
        else {
            continue;
        };
        if let Some(previous) = routes.insert(route_path.to_string(), doc.path.clone()) {
            warn!(route = route_path, kept = %doc.path, replaced = %previous, "duplicate route path");
        }
    }
    routes
}
