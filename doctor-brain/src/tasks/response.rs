use crate::error::ParseError;
use crate::models::AnalysisResult;
use serde_json::Value;
use tracing::debug;

pub const PARSE_FAILURE_FINDINGS: &str = "AI Error: Could not parse response";

/// Turn raw model text into a validated result.
///
/// The reply is tried as strict JSON first, then with any markdown code
/// fence removed. The parsed value must carry all five result fields with
/// the right types.
pub fn parse_model_response(raw: &str) -> Result<AnalysisResult, ParseError> {
    let value = match serde_json::from_str::<Value>(raw.trim()) {
        Ok(value) => value,
        Err(_) => {
            debug!("Strict JSON parse failed, retrying without code fences");
            serde_json::from_str::<Value>(strip_code_fence(raw)).map_err(ParseError::Json)?
        }
    };

    serde_json::from_value(value).map_err(ParseError::Schema)
}

/// Remove a leading ```` ```json ```` or ```` ``` ```` marker and a trailing
/// ```` ``` ````, along with surrounding whitespace.
pub fn strip_code_fence(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```") {
        text = rest
            .strip_prefix("json")
            .or_else(|| rest.strip_prefix("JSON"))
            .unwrap_or(rest);
    }
    if let Some(rest) = text.trim_end().strip_suffix("```") {
        text = rest;
    }
    text.trim()
}
