//! Gateway response parsing.
//!
//! The gateway reports rejected configuration lines under
//! `results.status.rejected` in its JSON response body.

use serde_json::Value;

/// Extract the rejected configuration lines from a gateway response.
///
/// Returns an empty list when the response carries no rejection details (a
/// clean acceptance, or a response in an unexpected shape).
pub fn rejected_lines(response: &Value) -> Vec<String> {
    let Some(rejected) = response
        .get("results")
        .and_then(|r| r.get("status"))
        .and_then(|s| s.get("rejected"))
        .and_then(|r| r.as_array())
    else {
        return Vec::new();
    };

    rejected
        .iter()
        .map(|line| match line {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect()
}
