/// Output snapshot writer.
///
/// The whole document is rendered in memory first and written with a single
/// call, so a serialization problem never leaves a half-written file behind.

use std::fs;
use std::path::Path;

use crate::model::{BatchResult, PreconditionError};

/// Renders the result as pretty-printed JSON (2-space indent, UTF-8 kept).
pub fn render(result: &BatchResult) -> Result<String, PreconditionError> {
    Ok(serde_json::to_string_pretty(result)?)
}

/// Writes the snapshot to `path`, replacing any previous one.
pub fn write_snapshot(result: &BatchResult, path: &Path) -> Result<(), PreconditionError> {
    let body = render(result)?;
    fs::write(path, body).map_err(|source| PreconditionError::OutputWrite {
        path: path.display().to_string(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
