use serde::{Deserialize, Serialize};

use crate::errors::ReviewError;

/// A single review finding tied to a change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewComment {
    pub filename: String,
    pub line_number: i64,
    pub comment: String,
    /// Change status the comment refers to (e.g., "added", "removed").
    pub status: String,
}

/// Structured output the model is instructed to produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewComments {
    /// List of code review issues found.
    pub issues: Vec<ReviewComment>,
}

impl ReviewComments {
    /// Parses a model reply into structured comments.
    ///
    /// Models wrap JSON in Markdown fences or surrounding prose often enough
    /// that a strict `serde_json::from_str` on the raw reply is not viable.
    /// The reply is tried as-is first, then with fences stripped, then
    /// reduced to the outermost `{...}` span.
    ///
    /// # Errors
    /// [`ReviewError::MalformedReply`] when no candidate decodes.
    pub fn parse(raw: &str) -> Result<Self, ReviewError> {
        let trimmed = raw.trim();
        if let Ok(v) = serde_json::from_str::<Self>(trimmed) {
            return Ok(v);
        }

        let unfenced = strip_code_fences(trimmed);
        if let Ok(v) = serde_json::from_str::<Self>(unfenced) {
            return Ok(v);
        }

        if let (Some(start), Some(end)) = (unfenced.find('{'), unfenced.rfind('}')) {
            if start < end {
                if let Ok(v) = serde_json::from_str::<Self>(&unfenced[start..=end]) {
                    return Ok(v);
                }
            }
        }

        Err(ReviewError::MalformedReply(
            llm_service::error_handler::make_snippet(trimmed),
        ))
    }

    /// Drops placeholder comments that reference no concrete line.
    pub fn into_filtered(self) -> Vec<ReviewComment> {
        self.issues
            .into_iter()
            .filter(|c| c.line_number != 0)
            .collect()
    }
}

/// Strips a leading/trailing Markdown code fence (```json ... ```), if any.
fn strip_code_fences(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Skip the info string ("json", "hcl", ...) on the opening fence line.
    let rest = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    rest.trim_end()
        .strip_suffix("```")
        .map(str::trim)
        .unwrap_or(text)
}
