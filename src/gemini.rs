use crate::changeset::ChangeStatus;
use crate::constants::{API_ENDPOINT, MAX_LINE_LENGTH};
use crate::context::CommitContext;
use crate::message::CandidateMessage;
use serde::Serialize;
use std::fmt::Write;
use std::time::Duration;
use thiserror::Error;

/// remote generation failures; the orchestrator recovers from all of these
/// by falling back to local generation
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("missing or rejected api credential")]
    Unauthorized,
    #[error("model endpoint unreachable: {0}")]
    Unreachable(String),
    #[error("malformed model response: {0}")]
    MalformedResponse(String),
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    top_p: f32,
    top_k: u32,
}

/// ask the remote model for a commit message
///
/// a missing credential returns `Unauthorized` without touching the
/// network. the single request is bounded by `timeout`; expiry counts as
/// `Unreachable`. this function never substitutes the local fallback —
/// that decision belongs to the orchestrator.
pub fn generate(
    context: &CommitContext,
    credential: Option<&str>,
    timeout: Duration,
) -> Result<CandidateMessage, GenerationError> {
    let credential = match credential {
        Some(key) if !key.trim().is_empty() => key,
        _ => return Err(GenerationError::Unauthorized),
    };

    let request = GenerateRequest {
        contents: vec![Content {
            parts: vec![Part {
                text: build_prompt(context),
            }],
        }],
        generation_config: GenerationConfig {
            temperature: 0.3,
            max_output_tokens: 200,
            top_p: 0.8,
            top_k: 40,
        },
    };

    let agent = ureq::Agent::config_builder()
        .timeout_global(Some(timeout))
        .build()
        .new_agent();

    let url = format!("{API_ENDPOINT}?key={credential}");
    let mut response = agent
        .post(&url)
        .send_json(&request)
        .map_err(|e| match e {
            ureq::Error::StatusCode(401 | 403) => GenerationError::Unauthorized,
            ureq::Error::StatusCode(code) => {
                GenerationError::Unreachable(format!("endpoint returned http {code}"))
            }
            other => GenerationError::Unreachable(other.to_string()),
        })?;

    let value: serde_json::Value = response
        .body_mut()
        .read_json()
        .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;

    let text = extract_text(&value)?;
    Ok(CandidateMessage::parse(&text))
}

/// the prompt sent alongside the change context
pub fn build_prompt(context: &CommitContext) -> String {
    let mut prompt = format!(
        r#"You are an expert software developer writing a git commit message.

Generate a commit message for the changes below, following these rules:
1. Use conventional commit format: type(scope): description
2. Types: feat, fix, docs, style, refactor, test, chore
3. Keep every line under {MAX_LINE_LENGTH} characters
4. Use imperative mood ("add feature", not "added feature")
5. Be specific about what changed; focus on the outcome

Output only the commit message, nothing else.
"#
    );

    prompt.push('\n');
    prompt.push_str(&describe_files(context));

    let _ = writeln!(prompt, "\nBranch: {}", context.branch);
    let _ = writeln!(prompt, "Change profile: {}", context.hint);

    if !context.recent_subjects.is_empty() {
        prompt.push_str("\nRecent commits:\n");
        for subject in &context.recent_subjects {
            let _ = writeln!(prompt, "  {subject}");
        }
    }

    let hunks: Vec<&str> = context
        .files
        .iter()
        .filter_map(|f| f.hunk.as_deref())
        .collect();
    if !hunks.is_empty() {
        prompt.push_str("\nCode changes:\n");
        for hunk in hunks {
            prompt.push_str(hunk);
            prompt.push('\n');
        }
    }

    prompt
}

/// list changed paths grouped by status, capped at five per group
fn describe_files(context: &CommitContext) -> String {
    let mut out = String::new();
    let groups = [
        (ChangeStatus::Added, "Added"),
        (ChangeStatus::Modified, "Modified"),
        (ChangeStatus::Deleted, "Deleted"),
        (ChangeStatus::Renamed, "Renamed"),
    ];

    for (status, label) in groups {
        let paths: Vec<&str> = context
            .files
            .iter()
            .filter(|f| f.status == status)
            .map(|f| f.path.as_str())
            .take(5)
            .collect();
        if !paths.is_empty() {
            let _ = writeln!(out, "{label} files: {}", paths.join(", "));
        }
    }
    out
}

/// pull the generated text out of a `generateContent` response
fn extract_text(value: &serde_json::Value) -> Result<String, GenerationError> {
    if let Some(error) = value.get("error") {
        let detail = error
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("unknown error");
        return Err(GenerationError::MalformedResponse(format!(
            "api error: {detail}"
        )));
    }

    let text = value
        .get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.get(0))
        .and_then(|p| p.get("text"))
        .and_then(|t| t.as_str())
        .ok_or_else(|| {
            GenerationError::MalformedResponse("no candidate text in response".to_string())
        })?;

    let text = text.trim();
    if text.is_empty() {
        return Err(GenerationError::MalformedResponse(
            "candidate text is empty".to_string(),
        ));
    }
    Ok(text.to_string())
}
