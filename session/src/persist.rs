//! JSON codec for the persisted document shape.
//!
//! The pair table and index are never written; they are rebuilt on load.

use tracing::debug;
use vartab_core::{Document, EngineConfig};
use vartab_pairs::{rebuild_pairs, RebuildStats};

use crate::error::SessionResult;

/// Serialize the authoritative parts of a document.
pub fn to_json(document: &Document) -> SessionResult<String> {
    Ok(serde_json::to_string_pretty(document)?)
}

/// Parse a persisted document and validate its groups. The table is left empty.
pub fn parse_json(source: &str) -> SessionResult<Document> {
    let document: Document = serde_json::from_str(source)?;
    for group in &document.groups {
        group.validate()?;
    }
    Ok(document)
}

/// Parse a persisted document, validate its groups and rebuild the table.
///
/// Notes are kept as stored, even if their pair no longer exists.
pub fn from_json(source: &str, config: &EngineConfig) -> SessionResult<(Document, RebuildStats)> {
    let mut document = parse_json(source)?;
    let stats = rebuild_pairs(&mut document, config);
    debug!(
        entities = stats.entity_count,
        pairs = stats.pair_count,
        notes = document.notes.len(),
        "document loaded"
    );
    Ok((document, stats))
}
