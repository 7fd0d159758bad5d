//! Executive-tone rewriting of slide bullets through an external model.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::RewriterConfig;
use crate::error::{Error, Result};

#[async_trait]
pub trait ToneRewriter: Send + Sync {
    async fn rewrite(&self, text: &str) -> Result<String>;
}

/// Rewrites each bullet in order, one request at a time. A failed rewrite
/// keeps the original bullet and the rest continue.
pub async fn rewrite_bullets(rewriter: &dyn ToneRewriter, bullets: &[String]) -> Vec<String> {
    let mut adjusted = Vec::with_capacity(bullets.len());
    for bullet in bullets {
        match rewriter.rewrite(bullet).await {
            Ok(text) => adjusted.push(text.trim().to_string()),
            Err(e) => {
                warn!(error = %e, "tone rewrite failed, keeping original bullet");
                adjusted.push(bullet.clone());
            }
        }
    }
    adjusted
}

pub fn executive_prompt(raw_text: &str) -> String {
    format!(
        "You are an expert business communication assistant. \
Rewrite messy, technical, or casual team updates into clean, executive-friendly, action-focused language. \
Prioritize business outcomes, clarity, urgency, and professionalism.\n\n\
Rewrite the following internal update into a crisp, executive-friendly bullet point.\n\n\
Input:\n{raw_text}\n\n\
Rules:\n\
- 1-2 short sentences max\n\
- Executive tone\n\
- Focus on outcomes or urgent risks\n\
- No technical jargon unless essential\n\
- Keep the original prefix (e.g., \"Biggest Blocker:\", \"Top Risk:\", etc.)"
    )
}

/// Talks to any `/chat/completions` endpoint that follows the OpenAI schema.
pub struct OpenAiRewriter {
    config: RewriterConfig,
    api_key: String,
    client: reqwest::Client,
}

impl OpenAiRewriter {
    pub fn new(config: RewriterConfig, api_key: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .map_err(|e| Error::Rewrite(e.to_string()))?;

        Ok(Self {
            config: RewriterConfig {
                base_url: config.base_url.trim_end_matches('/').to_string(),
                ..config
            },
            api_key: api_key.into(),
            client,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    choices: Vec<ApiChoice>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiMessage,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    content: Option<String>,
}

fn first_content(response: ApiResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| Error::Rewrite("no content in response".into()))
}

#[async_trait]
impl ToneRewriter for OpenAiRewriter {
    async fn rewrite(&self, text: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.config.base_url);
        let body = serde_json::json!({
            "model": self.config.model,
            "messages": [{ "role": "user", "content": executive_prompt(text) }],
            "temperature": self.config.temperature,
            "max_tokens": self.config.max_tokens,
        });

        debug!(model = %self.config.model, "sending tone rewrite request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Rewrite(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(Error::Rewrite(format!("{status}: {error_body}")));
        }

        let parsed: ApiResponse = response
            .json()
            .await
            .map_err(|e| Error::Rewrite(format!("failed to parse response: {e}")))?;
        first_content(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Uppercase;

    #[async_trait]
    impl ToneRewriter for Uppercase {
        async fn rewrite(&self, text: &str) -> Result<String> {
            Ok(format!("  {}  ", text.to_uppercase()))
        }
    }

    /// Fails on "Top Risk" bullets and records every call.
    struct Flaky {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ToneRewriter for Flaky {
        async fn rewrite(&self, text: &str) -> Result<String> {
            self.calls.lock().unwrap().push(text.to_string());
            if text.contains("Risk") {
                Err(Error::Rewrite("upstream timeout".into()))
            } else {
                Ok(format!("{text}."))
            }
        }
    }

    fn bullets() -> Vec<String> {
        vec![
            "Biggest Blocker: API blocked".to_string(),
            "Top Risk: revenue below target".to_string(),
            "Major Win: retention up".to_string(),
        ]
    }

    #[tokio::test]
    async fn rewritten_bullets_are_trimmed() {
        let adjusted = rewrite_bullets(&Uppercase, &bullets()).await;
        assert_eq!(adjusted[0], "BIGGEST BLOCKER: API BLOCKED");
    }

    #[tokio::test]
    async fn failures_fall_back_per_item() {
        let rewriter = Flaky {
            calls: Mutex::new(Vec::new()),
        };
        let adjusted = rewrite_bullets(&rewriter, &bullets()).await;

        assert_eq!(
            adjusted,
            vec![
                "Biggest Blocker: API blocked.",
                "Top Risk: revenue below target",
                "Major Win: retention up.",
            ]
        );
        assert_eq!(*rewriter.calls.lock().unwrap(), bullets());
    }

    #[tokio::test]
    async fn empty_bullet_list_makes_no_calls() {
        let rewriter = Flaky {
            calls: Mutex::new(Vec::new()),
        };
        assert!(rewrite_bullets(&rewriter, &[]).await.is_empty());
        assert!(rewriter.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn prompt_embeds_input_and_prefix_rule() {
        let prompt = executive_prompt("Top Risk: churn");
        assert!(prompt.contains("Input:\nTop Risk: churn"));
        assert!(prompt.contains("Keep the original prefix"));
    }

    #[test]
    fn empty_choices_are_an_error() {
        let parsed: ApiResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(first_content(parsed).is_err());

        let parsed: ApiResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":"Top Risk: churn"}}]}"#)
                .unwrap();
        assert_eq!(first_content(parsed).unwrap(), "Top Risk: churn");
    }
}
