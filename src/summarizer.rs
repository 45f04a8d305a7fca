//! HTTP client for the OpenCode summarization server.
//!
//! Speaks the OpenCode session API: create a session, post the prompt as a
//! message, concatenate the text parts of the reply. Requests are synchronous
//! with a generous timeout since model responses can take a while.

use std::time::Duration;

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;
use crate::note::WorkItem;

// ---------------------------------------------------------------------------
// Client error
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum SummarizerError {
    #[error("request to OpenCode server failed: {message}")]
    #[diagnostic(
        code(worklog::summarizer::request),
        help("Is the OpenCode server running?")
    )]
    Request { message: String },

    #[error("unexpected response from OpenCode server: {message}")]
    #[diagnostic(code(worklog::summarizer::response), help("Server version mismatch?"))]
    Response { message: String },
}

pub type SummarizerResult<T> = Result<T, SummarizerError>;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct Session {
    id: String,
}

#[derive(Serialize)]
struct ModelSpec<'a> {
    #[serde(rename = "providerID")]
    provider_id: &'a str,
    #[serde(rename = "modelID")]
    model_id: &'a str,
}

#[derive(Serialize)]
struct TextPart<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    text: &'a str,
}

#[derive(Serialize)]
struct PromptRequest<'a> {
    model: ModelSpec<'a>,
    parts: Vec<TextPart<'a>>,
}

#[derive(Debug, Deserialize)]
struct MessagePart {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    #[serde(default)]
    parts: Vec<MessagePart>,
}

// ---------------------------------------------------------------------------
// SummarizerClient
// ---------------------------------------------------------------------------

/// Client for a running OpenCode server instance.
pub struct SummarizerClient {
    base_url: String,
    provider: String,
    model: String,
    http: ureq::Agent,
}

impl SummarizerClient {
    pub fn new(config: &Config) -> Self {
        SummarizerClient {
            base_url: config.opencode_server.trim_end_matches('/').to_string(),
            provider: config.ai_provider.clone(),
            model: config.ai_model.clone(),
            http: ureq::AgentBuilder::new()
                .timeout(Duration::from_secs(60))
                .build(),
        }
    }

    /// Quick health probe of the OpenCode server.
    pub fn check_connection(&self) -> SummarizerResult<()> {
        let url = format!("{}/global/health", self.base_url);
        let resp = ureq::get(&url)
            .timeout(Duration::from_secs(2))
            .call()
            .map_err(|e| SummarizerError::Request {
                message: e.to_string(),
            })?;
        if resp.status() != 200 {
            return Err(SummarizerError::Response {
                message: format!("OpenCode server returned status {}", resp.status()),
            });
        }
        Ok(())
    }

    /// Summarize completed work items in one or two sentences.
    ///
    /// An empty item list returns a canned string without touching the
    /// network at all.
    pub fn summarize_work_items(&self, items: &[WorkItem]) -> SummarizerResult<String> {
        if items.is_empty() {
            return Ok("No work items to summarize.".into());
        }
        let session_id = self.create_session()?;
        tracing::debug!(session = %session_id, items = items.len(), "requesting summary");
        self.send_message(&session_id, &build_prompt(items))
    }

    fn create_session(&self) -> SummarizerResult<String> {
        let url = format!("{}/session", self.base_url);
        let resp = self
            .http
            .post(&url)
            .send_json(serde_json::json!({}))
            .map_err(|e| SummarizerError::Request {
                message: e.to_string(),
            })?;
        let session: Session = resp.into_json().map_err(|e| SummarizerError::Response {
            message: format!("failed to parse JSON: {e}"),
        })?;
        if session.id.is_empty() {
            return Err(SummarizerError::Response {
                message: "server returned an empty session id".into(),
            });
        }
        Ok(session.id)
    }

    fn send_message(&self, session_id: &str, prompt: &str) -> SummarizerResult<String> {
        let url = format!("{}/session/{session_id}/message", self.base_url);
        let body = PromptRequest {
            model: ModelSpec {
                provider_id: &self.provider,
                model_id: &self.model,
            },
            parts: vec![TextPart {
                kind: "text",
                text: prompt,
            }],
        };
        let resp = self
            .http
            .post(&url)
            .send_json(&body)
            .map_err(|e| SummarizerError::Request {
                message: e.to_string(),
            })?;
        let message: MessageResponse = resp.into_json().map_err(|e| SummarizerError::Response {
            message: format!("failed to parse JSON: {e}"),
        })?;
        Ok(collect_text(&message))
    }
}

/// The assistant reply is a list of typed parts; only `text` parts carry
/// summary content.
fn collect_text(message: &MessageResponse) -> String {
    let mut out = String::new();
    for part in &message.parts {
        if part.kind == "text" {
            out.push_str(&part.text);
        }
    }
    out.trim().to_string()
}

fn build_prompt(items: &[WorkItem]) -> String {
    let mut prompt = String::from(
        "Summarize the following completed work items in 1-2 concise sentences. \
         Focus on the key accomplishments and outcomes. Keep it brief and professional:\n\n",
    );
    for item in items {
        prompt.push_str("- ");
        prompt.push_str(&item.text);
        prompt.push('\n');
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(text: &str) -> WorkItem {
        WorkItem {
            text: text.into(),
            completed: true,
        }
    }

    #[test]
    fn prompt_lists_each_item_on_its_own_line() {
        let prompt = build_prompt(&[item("shipped the release"), item("fixed login bug")]);
        assert!(prompt.starts_with("Summarize the following completed work items"));
        assert!(prompt.ends_with("- shipped the release\n- fixed login bug\n"));
    }

    #[test]
    fn reply_text_parts_are_concatenated_in_order() {
        let message: MessageResponse = serde_json::from_str(
            r#"{"parts": [
                {"type": "step-start"},
                {"type": "text", "text": "Shipped the release"},
                {"type": "text", "text": " and fixed the login bug.  "}
            ]}"#,
        )
        .unwrap();
        assert_eq!(
            collect_text(&message),
            "Shipped the release and fixed the login bug."
        );
    }

    #[test]
    fn prompt_request_serializes_with_wire_field_names() {
        let body = PromptRequest {
            model: ModelSpec {
                provider_id: "google",
                model_id: "gemini-2.0-flash",
            },
            parts: vec![TextPart {
                kind: "text",
                text: "hi",
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"]["providerID"], "google");
        assert_eq!(json["model"]["modelID"], "gemini-2.0-flash");
        assert_eq!(json["parts"][0]["type"], "text");
        assert_eq!(json["parts"][0]["text"], "hi");
    }

    #[test]
    fn empty_item_list_needs_no_server() {
        let client = SummarizerClient::new(&Config::default());
        assert_eq!(
            client.summarize_work_items(&[]).unwrap(),
            "No work items to summarize."
        );
    }
}
