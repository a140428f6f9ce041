//! Decoding the generator's on-disk corpus formats.
//!
//! Accepted shapes:
//! - `var documenterSearchIndex = {"docs": [...]}` (any `var`/`let`/`const` binding)
//! - `{"docs": [...]}`
//! - `[...]`

use crate::error::LoadError;
use regex::Regex;
use serde_json::Value;
use std::path::Path;
use std::sync::LazyLock;

static JS_BINDING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:var|let|const)\s+[A-Za-z_$][A-Za-z0-9_$]*\s*=\s*")
        .expect("binding pattern is valid")
});

/// Extract the raw records from a corpus document.
pub fn parse_corpus(source: &str) -> Result<Vec<Value>, LoadError> {
    let payload = strip_js_binding(source);
    let value: Value = serde_json::from_str(payload)?;

    match value {
        Value::Array(records) => Ok(records),
        Value::Object(mut fields) => match fields.remove("docs") {
            Some(Value::Array(records)) => Ok(records),
            Some(other) => Err(LoadError::UnrecognizedFormat(format!(
                "`docs` is {}, expected an array",
                json_kind(&other)
            ))),
            None => Err(LoadError::UnrecognizedFormat(
                "object has no `docs` array".to_string(),
            )),
        },
        other => Err(LoadError::UnrecognizedFormat(format!(
            "top-level {}, expected an array or an object",
            json_kind(&other)
        ))),
    }
}

/// Read and decode a corpus file.
pub async fn read_corpus(path: &Path) -> Result<Vec<Value>, LoadError> {
    let source = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    let records = parse_corpus(&source)?;
    tracing::debug!("Read {} raw records from {}", records.len(), path.display());
    Ok(records)
}

fn strip_js_binding(source: &str) -> &str {
    let Some(binding) = JS_BINDING.find(source) else {
        return source.trim();
    };
    let rest = source[binding.end()..].trim_end();
    rest.strip_suffix(';').unwrap_or(rest)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
