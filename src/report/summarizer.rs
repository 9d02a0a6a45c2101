use crate::error::{PipelineError, Result};
use async_openai::config::OpenAIConfig;
use async_openai::types::responses::{
    Content, CreateResponseArgs, Input, InputItem, InputMessageArgs, OutputContent, Role,
};
use async_openai::Client;
use log::{info, warn};

const SYSTEM_PROMPT: &str = "You summarize technical video transcripts for a knowledge base. \
Write one plain paragraph of at most five sentences covering the main topics, tools and takeaways. \
Use only what the transcript says.";

/// Transcript text beyond this many characters is not sent
const MAX_TRANSCRIPT_CHARS: usize = 12_000;
const MAX_OUTPUT_TOKENS: u32 = 512;

/// Short transcript summaries from an OpenAI model
pub struct Summarizer {
    client: Client<OpenAIConfig>,
    model: String,
}

impl Summarizer {
    /// Creates a summarizer, `None` without an API key
    pub fn new(api_key: Option<&str>, model: &str) -> Option<Self> {
        let key = api_key.map(str::trim).filter(|k| !k.is_empty())?;
        Some(Self {
            client: Client::with_config(OpenAIConfig::new().with_api_key(key)),
            model: model.to_string(),
        })
    }

    /// Asks the model for a summary of `transcript`
    pub async fn summarize(&self, title: &str, transcript: &str) -> Result<String> {
        let excerpt: String = transcript.chars().take(MAX_TRANSCRIPT_CHARS).collect();

        let request = CreateResponseArgs::default()
            .max_output_tokens(MAX_OUTPUT_TOKENS)
            .model(self.model.as_str())
            .input(Input::Items(vec![
                InputItem::Message(
                    InputMessageArgs::default()
                        .role(Role::System)
                        .content(SYSTEM_PROMPT.to_string())
                        .build()?,
                ),
                InputItem::Message(
                    InputMessageArgs::default()
                        .role(Role::User)
                        .content(format!("Video title: {}\n\n<TRANSCRIPT>\n{}\n</TRANSCRIPT>", title, excerpt))
                        .build()?,
                ),
            ]))
            .build()?;

        let response = self.client.responses().create(request).await?;

        let mut summary = String::new();
        for output in response.output {
            if let OutputContent::Message(message) = output {
                for content in message.content {
                    if let Content::OutputText(text) = content {
                        summary.push_str(&text.text);
                    }
                }
            }
        }

        let summary = summary.trim().to_string();
        if summary.is_empty() {
            return Err(PipelineError::Parse("model returned an empty summary".into()));
        }
        Ok(summary)
    }

    /// Like [`Summarizer::summarize`], logging failures and returning `None`
    pub async fn try_summarize(&self, title: &str, transcript: &str) -> Option<String> {
        if transcript.trim().is_empty() {
            return None;
        }
        match self.summarize(title, transcript).await {
            Ok(summary) => {
                info!("Generated transcript summary with {}", self.model);
                Some(summary)
            }
            Err(e) => {
                warn!("Skipping transcript summary: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarizer_requires_key() {
        assert!(Summarizer::new(None, "gpt-4o-mini").is_none());
        assert!(Summarizer::new(Some("  "), "gpt-4o-mini").is_none());
        assert!(Summarizer::new(Some("sk-test"), "gpt-4o-mini").is_some());
    }

    #[tokio::test]
    async fn test_empty_transcript_is_skipped_without_a_request() {
        let summarizer = Summarizer::new(Some("sk-test"), "gpt-4o-mini").unwrap();
        assert_eq!(summarizer.try_summarize("title", "   ").await, None);
    }
}
