use anyhow::{Context, Result};
use argscan::Schema;
use std::fs;
use std::path::Path;

/// Load a JSON schema file. No path means an empty schema.
pub fn load_schema(path: Option<&Path>) -> Result<Schema> {
    let Some(path) = path else {
        return Ok(Schema::default());
    };

    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read schema: {}", path.display()))?;
    let schema: Schema = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse schema JSON: {}", path.display()))?;

    tracing::debug!(path = %path.display(), flags = schema.len(), "loaded schema");
    Ok(schema)
}
