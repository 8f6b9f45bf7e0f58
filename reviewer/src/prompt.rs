//! Deterministic prompt assembly for the Terraform reviewer.
//!
//! The prompt has a fixed shape: review guidelines, then `FILES:`,
//! `CHANGES:` and, only when an analyzer report is present,
//! `STATIC_ANALYZER_OUTPUT:` sections. An absent report is omitted
//! entirely rather than rendered as a null token.

use crate::request::{ChangedFile, ContextFile, ReviewRequest};

/// System message establishing the reviewer persona.
pub const SYSTEM_PROMPT: &str = "\
You are an expert in Terraform and a diligent code reviewer.
Your goal is to support the developer in writing safer, cleaner, and more maintainable Terraform code.
Provide your feedback in a clear, concise, constructive, professional manner with explicit details.";

/// Review instructions prepended to every user prompt.
const GUIDELINES: &str = r#"You will be given all files in the code base, the list of changed files and the static analyzer output (when available).

Provide feedback based on the following best-practice categories:
1. Security: secrets management, IAM roles/policies, network configurations.
2. Maintainability: code organization, DRY principle, module usage, variable naming, version pinning.
3. Scalability & Performance: resource sizing, autoscaling configurations, load balancing.
4. Reliability: redundancy, high availability, state management strategies.
5. Cost Optimization: potential oversizing of resources, cost-efficient resource types.
6. Compliance & Governance: organizational policies, tagging conventions, regulatory requirements.
7. Documentation & Observability: comments, usage docs, logging/monitoring configuration.

Here are some guidelines on providing feedback:
- Review all the files to understand the current state of the codebase.
- Review the changes to understand what was changed in this PR.
- Always check the changes in the CHANGES list and comment only on the changed lines. You MUST NOT comment on unchanged code.
- Check the status of the changes and comment accordingly ('added' means new code, 'removed' means deleted code).
- You DO NOT have to comment on every code change block; if you do not see an issue, ignore it and move on.
- Each comment MUST refer to a change and the change must be associated with the issue that the comment is mentioning.
- ONLY comment on changes that have actual code changes (variable definitions, resource definitions, etc.)
- DO NOT provide general or positive feedback.
- Use the static analyzer output to identify potential errors in the new code.
- Your comments should be brief, explicit, clear and professional.

Respond with a single JSON object and nothing else, in this exact shape:
{"issues": [{"filename": "<file>", "line_number": <line>, "comment": "<text>", "status": "<added|removed>"}]}
Use line_number 0 only when a comment cannot be tied to a concrete line."#;

/// Normalizes indentation across prompt blocks while preserving content
/// order and relative indentation.
pub fn wrap_prompt(parts: &[&str]) -> String {
    let mut lines: Vec<&str> = Vec::new();
    let mut min_indent = usize::MAX;

    for part in parts {
        for line in part.split('\n') {
            let stripped = line.trim_start();
            if !stripped.is_empty() {
                min_indent = min_indent.min(line.len() - stripped.len());
            }
            lines.push(line);
        }
    }
    if min_indent == usize::MAX {
        min_indent = 0;
    }

    let normalized: Vec<String> = lines
        .into_iter()
        .map(|line| {
            let stripped = line.trim_start();
            if stripped.is_empty() {
                String::new()
            } else {
                let relative = line.len() - stripped.len() - min_indent;
                format!("{}{}", " ".repeat(relative), stripped.trim_end())
            }
        })
        .collect();

    normalized.join("\n")
}

/// Builds the full user prompt for one review request.
pub fn build_review_prompt(request: &ReviewRequest) -> String {
    let files_block = format_context_files(&request.context_files);
    let changes_block = format_changes(&request.changes);

    let mut parts: Vec<&str> = vec![
        GUIDELINES,
        "",
        "FILES:",
        &files_block,
        "",
        "CHANGES:",
        &changes_block,
    ];
    if let Some(analyzer) = request.static_analyzer_output.as_deref() {
        parts.push("");
        parts.push("STATIC_ANALYZER_OUTPUT:");
        parts.push(analyzer);
    }

    wrap_prompt(&parts)
}

fn format_context_files(files: &[ContextFile]) -> String {
    files
        .iter()
        .map(|f| format!("--- {} ---\n{}", f.path, f.content.as_text()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_changes(changes: &[ChangedFile]) -> String {
    changes
        .iter()
        .map(|c| format!("--- {} ---\n{}", c.file, c.content))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::FileContent;

    fn request(analyzer: Option<&str>) -> ReviewRequest {
        ReviewRequest {
            context_files: vec![ContextFile {
                path: "main.tf".into(),
                content: FileContent::Text("resource \"aws_s3_bucket\" \"b\" {}".into()),
            }],
            changes: vec![ChangedFile {
                file: "example.tf".into(),
                content: "ingress { cidr_blocks = [\"0.0.0.0/0\"] }".into(),
            }],
            static_analyzer_output: analyzer.map(str::to_string),
        }
    }

    #[test]
    fn wrap_prompt_preserves_order_and_relative_indent() {
        let result = wrap_prompt(&["SECTION", "  some content", "", "CHANGES", "  change data"]);
        let lines: Vec<&str> = result.split('\n').collect();
        assert_eq!(lines[0], "SECTION");
        assert!(lines[1].starts_with("  "));
        assert_eq!(lines[2], "");
        assert!(lines[4].starts_with("  "));
    }

    #[test]
    fn wrap_prompt_dedents_uniform_indentation() {
        let result = wrap_prompt(&["    a", "      b"]);
        assert_eq!(result, "a\n  b");
    }

    #[test]
    fn analyzer_output_appears_verbatim_when_present() {
        let warning = "Security Warning: unrestricted ingress (0.0.0.0/0).";
        let prompt = build_review_prompt(&request(Some(warning)));
        assert!(prompt.contains("STATIC_ANALYZER_OUTPUT:"));
        assert!(prompt.contains(warning));
    }

    #[test]
    fn analyzer_section_is_omitted_when_absent() {
        let prompt = build_review_prompt(&request(None));
        assert!(!prompt.contains("STATIC_ANALYZER_OUTPUT"));
        assert!(!prompt.contains("null"));
        assert!(!prompt.contains("None"));
    }

    #[test]
    fn empty_request_still_renders_all_mandatory_sections() {
        let prompt = build_review_prompt(&ReviewRequest {
            context_files: vec![],
            changes: vec![],
            static_analyzer_output: None,
        });
        assert!(prompt.contains("FILES:"));
        assert!(prompt.contains("CHANGES:"));
    }

    #[test]
    fn prompt_is_deterministic() {
        let req = request(Some("warning"));
        assert_eq!(build_review_prompt(&req), build_review_prompt(&req));
    }
}
