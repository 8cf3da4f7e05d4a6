use serde_json::Value;

use ga_core::{ReviewError, ReviewResult};

/// Parse a model's raw text into a validated [`ReviewResult`].
///
/// Raw JSON is decoded as-is. Otherwise the object is pulled out of a
/// fenced code block or the surrounding chatter.
pub fn parse_review_response(raw: &str) -> Result<ReviewResult, ReviewError> {
    let value = extract_json(raw)?;
    let result: ReviewResult =
        serde_json::from_value(value).map_err(|e| ReviewError::Schema(e.to_string()))?;
    result.validate()?;
    Ok(result)
}

fn extract_json(raw: &str) -> Result<Value, ReviewError> {
    let trimmed = raw.trim();
    let direct_err = match serde_json::from_str::<Value>(trimmed) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    if let Some(value) = fenced_block(trimmed).and_then(|b| serde_json::from_str(b).ok()) {
        return Ok(value);
    }

    // First `{` that starts a complete object wins; earlier braces may sit
    // inside reasoning text.
    for (start, _) in trimmed.match_indices('{') {
        let mut stream =
            serde_json::Deserializer::from_str(&trimmed[start..]).into_iter::<Value>();
        if let Some(Ok(value @ Value::Object(_))) = stream.next() {
            return Ok(value);
        }
    }

    Err(ReviewError::MalformedResponse(direct_err.to_string()))
}

fn fenced_block(raw: &str) -> Option<&str> {
    let start = raw.find("```")?;
    let after = &raw[start + 3..];
    let body_start = after.find('\n')?;
    let body = &after[body_start + 1..];
    let end = body.find("```")?;
    Some(body[..end].trim())
}
