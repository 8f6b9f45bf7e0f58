use serde::{Deserialize, Serialize};

/// Content of a context file: either a single blob or a sequence of lines.
///
/// Callers send both shapes in the wild, so deserialization is untagged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FileContent {
    Text(String),
    Lines(Vec<String>),
}

impl FileContent {
    /// Flattens the content into one printable block.
    pub fn as_text(&self) -> String {
        match self {
            FileContent::Text(s) => s.clone(),
            FileContent::Lines(lines) => lines.join("\n"),
        }
    }
}

/// One file giving the reviewer context about the code base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextFile {
    pub path: String,
    pub content: FileContent,
}

/// One changed file in the pull request under review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangedFile {
    pub file: String,
    /// Diff or full new content; accepts either key on the wire.
    #[serde(alias = "diff")]
    pub content: String,
}

/// Expected input format for the code reviewer.
///
/// `context_files` and `changes` must be present but may be empty ("no
/// context" / "no changes" are valid inputs). A missing analyzer report is
/// simply omitted from the prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRequest {
    pub context_files: Vec<ContextFile>,
    pub changes: Vec<ChangedFile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub static_analyzer_output: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_string_and_line_sequence_content() {
        let raw = r#"{
            "context_files": [
                {"path": "main.tf", "content": "resource \"aws_s3_bucket\" \"b\" {}"},
                {"path": "vars.tf", "content": ["variable \"a\" {}", "variable \"b\" {}"]}
            ],
            "changes": [{"file": "main.tf", "content": "acl = \"public-read\""}],
            "static_analyzer_output": "warning"
        }"#;
        let req: ReviewRequest = serde_json::from_str(raw).unwrap();
        assert_eq!(req.context_files[1].content.as_text(), "variable \"a\" {}\nvariable \"b\" {}");
    }

    #[test]
    fn accepts_diff_alias_for_changes() {
        let raw = r#"{
            "context_files": [],
            "changes": [{"file": "example.tf", "diff": "+ ingress {}"}]
        }"#;
        let req: ReviewRequest = serde_json::from_str(raw).unwrap();
        assert_eq!(req.changes[0].content, "+ ingress {}");
        assert_eq!(req.static_analyzer_output, None);
    }

    #[test]
    fn empty_sequences_are_valid() {
        let raw = r#"{"context_files": [], "changes": []}"#;
        assert!(serde_json::from_str::<ReviewRequest>(raw).is_ok());
    }

    #[test]
    fn missing_changes_is_rejected() {
        let raw = r#"{"context_files": []}"#;
        assert!(serde_json::from_str::<ReviewRequest>(raw).is_err());
    }
}
