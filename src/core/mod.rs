//! Pipeline stages of the specification compiler.
//!
//! Leaves first: `scan` -> `reader`/`docs` -> `extract` -> `graph` -> `validate`
//! -> `manifest`/`routes`/`interview` -> `writer`, orchestrated by `pipeline`.

pub mod config;
pub mod docs;
pub mod error;
pub mod extract;
pub mod graph;
pub mod interview;
pub mod manifest;
pub mod output;
pub mod pipeline;
pub mod reader;
pub mod routes;
pub mod scan;
pub mod tui;
pub mod validate;
pub mod writer;
