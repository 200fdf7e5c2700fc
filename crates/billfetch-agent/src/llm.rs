use crate::history::StepRecord;
use crate::{Error, Result};
use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestMessageContentPartImage,
    ChatCompletionRequestMessageContentPartText, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, ChatCompletionRequestUserMessageContent,
    ChatCompletionRequestUserMessageContentPart, CreateChatCompletionRequestArgs, ImageDetail,
    ImageUrl,
};
use serde::Deserialize;

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gpt-4o";

const SYSTEM_PROMPT: &str = r#"You are a browser automation agent working on a login-and-download task.
On every turn you receive the task, the current page state and the actions taken so far, and you reply with EXACTLY ONE action as a single JSON object, no prose and no markdown.

Actions:
  {"action":"navigate","url":"https://..."}
  {"action":"click","selector":"<css selector>"}
  {"action":"type","selector":"<css selector>","text":"..."}
  {"action":"scroll","dy":<pixels, negative scrolls up>}
  {"action":"wait","ms":<milliseconds>}
  {"action":"done","success":true|false,"message":"<why, when not successful>"}

Credentials: use the literal placeholders x_name and x_password as the text to type into login fields. They are replaced with the real values locally; you never see them.

Declare done with success true only once the described task has actually been completed. If you are stuck, declare done with success false and say why."#;

/// One browser action chosen by the model.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Navigate { url: String },
    Click { selector: String },
    Type { selector: String, text: String },
    Scroll { dy: i64 },
    Wait { ms: u64 },
    Done {
        success: bool,
        #[serde(default)]
        message: String,
    },
}

impl Action {
    /// Short form for step transcripts; never includes typed text, which may
    /// hold substituted secrets downstream.
    pub fn describe(&self) -> String {
        match self {
            Action::Navigate { url } => format!("navigate to {url}"),
            Action::Click { selector } => format!("click {selector}"),
            Action::Type { selector, .. } => format!("type into {selector}"),
            Action::Scroll { dy } => format!("scroll by {dy}"),
            Action::Wait { ms } => format!("wait {ms}ms"),
            Action::Done { success, .. } => format!("done (success={success})"),
        }
    }
}

/// What the agent saw on the page before deciding the next action.
#[derive(Debug, Clone)]
pub struct PageObservation {
    pub url: String,
    pub title: String,
    pub text: String,
    /// PNG screenshot as a data URL, present when vision is on.
    pub screenshot: Option<String>,
}

/// Chat-completion client that turns a page observation into the next action.
pub struct LlmNavigator {
    client: Client<OpenAIConfig>,
    model: String,
}

impl LlmNavigator {
    /// Reads `OPENAI_API_KEY` from the environment.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            client: Client::with_config(OpenAIConfig::new()),
            model: model.into(),
        }
    }

    pub async fn decide(
        &self,
        instruction: &str,
        observation: &PageObservation,
        transcript: &[StepRecord],
    ) -> Result<Action> {
        let prompt = build_prompt(instruction, observation, transcript);

        let mut parts = vec![ChatCompletionRequestUserMessageContentPart::Text(
            ChatCompletionRequestMessageContentPartText { text: prompt },
        )];
        if let Some(data_url) = &observation.screenshot {
            parts.push(ChatCompletionRequestUserMessageContentPart::ImageUrl(
                ChatCompletionRequestMessageContentPartImage {
                    image_url: ImageUrl {
                        url: data_url.clone(),
                        detail: Some(ImageDetail::Low),
                    },
                },
            ));
        }

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .max_tokens(300u32)
            .messages([
                ChatCompletionRequestMessage::System(
                    ChatCompletionRequestSystemMessageArgs::default()
                        .content(SYSTEM_PROMPT.to_string())
                        .build()?,
                ),
                ChatCompletionRequestMessage::User(
                    ChatCompletionRequestUserMessageArgs::default()
                        .content(ChatCompletionRequestUserMessageContent::Array(parts))
                        .build()?,
                ),
            ])
            .build()?;

        let response = self.client.chat().create(request).await?;
        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| Error::Protocol("completion had no content".to_string()))?;

        parse_action(&content)
    }
}

fn build_prompt(
    instruction: &str,
    observation: &PageObservation,
    transcript: &[StepRecord],
) -> String {
    let mut prompt = format!(
        "Task: {instruction}\n\nCurrent page:\n  URL: {}\n  Title: {}\n\nVisible text:\n{}\n",
        observation.url, observation.title, observation.text
    );

    if !transcript.is_empty() {
        prompt.push_str("\nActions so far:\n");
        for (index, step) in transcript.iter().enumerate() {
            match &step.error {
                Some(error) => {
                    prompt.push_str(&format!("  {}. {} -> error: {error}\n", index + 1, step.action))
                }
                None => prompt.push_str(&format!("  {}. {} -> ok\n", index + 1, step.action)),
            }
        }
    }

    prompt.push_str("\nReply with the next action as one JSON object.");
    prompt
}

/// Parse the model reply, tolerating a markdown code fence around the JSON.
fn parse_action(content: &str) -> Result<Action> {
    let trimmed = content.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed);

    serde_json::from_str(body)
        .map_err(|e| Error::Protocol(format!("not a valid action ({e}): {body}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_action() {
        let action = parse_action(r##"{"action":"click","selector":"#login"}"##).unwrap();
        assert_eq!(action, Action::Click { selector: "#login".to_string() });
    }

    #[test]
    fn test_parse_fenced_action() {
        let reply = "```json\n{\"action\":\"done\",\"success\":true}\n```";
        let action = parse_action(reply).unwrap();
        assert_eq!(action, Action::Done { success: true, message: String::new() });
    }

    #[test]
    fn test_parse_done_default_message() {
        let action = parse_action(r#"{"action":"done","success":false}"#).unwrap();
        let Action::Done { success, message } = action else {
            panic!("expected done");
        };
        assert!(!success);
        assert!(message.is_empty());
    }

    #[test]
    fn test_parse_rejects_prose() {
        let err = parse_action("I think we should click the button").unwrap_err();
        assert!(matches!(err, Error::Protocol(_)));
    }

    #[test]
    fn test_type_action_description_hides_text() {
        let action = Action::Type {
            selector: "#password".to_string(),
            text: "x_password".to_string(),
        };
        assert_eq!(action.describe(), "type into #password");
    }

    #[test]
    fn test_prompt_includes_transcript_errors() {
        let observation = PageObservation {
            url: "https://acme.test/".to_string(),
            title: "Acme".to_string(),
            text: "Welcome".to_string(),
            screenshot: None,
        };
        let transcript = vec![StepRecord {
            action: "click #login".to_string(),
            error: Some("no such element".to_string()),
        }];

        let prompt = build_prompt("download invoice", &observation, &transcript);
        assert!(prompt.contains("download invoice"));
        assert!(prompt.contains("click #login -> error: no such element"));
    }
}
