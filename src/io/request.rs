//! Read engine requests from JSON files or stdin.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::domain::EngineRequest;
use crate::error::AppError;

/// Read a request from `path`, or from stdin when `path` is `-`.
pub fn read_request(path: &Path) -> Result<EngineRequest, AppError> {
    let mut text = String::new();
    if path == Path::new("-") {
        std::io::stdin()
            .read_to_string(&mut text)
            .map_err(|e| AppError::new(2, format!("Failed to read request from stdin: {e}")))?;
    } else {
        File::open(path)
            .and_then(|mut f| f.read_to_string(&mut text))
            .map_err(|e| AppError::new(2, format!("Failed to read request '{}': {e}", path.display())))?;
    }
    parse_request(&text)
}

pub fn parse_request(text: &str) -> Result<EngineRequest, AppError> {
    serde_json::from_str(text).map_err(|e| AppError::new(2, format!("Invalid request JSON: {e}")))
}
