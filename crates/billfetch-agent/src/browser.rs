use crate::llm::{Action, LlmNavigator, PageObservation};
use crate::task::AgentTask;
use crate::{Error, Result, RunHistory, SiteAgent, StepRecord};
use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::browser::{
    SetDownloadBehaviorBehavior, SetDownloadBehaviorParams,
};
use chromiumoxide::cdp::browser_protocol::emulation::SetUserAgentOverrideParams;
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::{Page, ScreenshotParams};
use futures::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;

const WINDOW_WIDTH: u32 = 1280;
const WINDOW_HEIGHT: u32 = 1100;
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/85.0.4183.102 Safari/537.36";
const ACCEPT_LANGUAGE: &str = "en-UK";

/// Let the page settle after an action before observing it.
const SETTLE_DELAY: Duration = Duration::from_millis(500);
/// Page text beyond this is cut before prompting.
const MAX_PAGE_TEXT: usize = 4000;
/// Upper bound on a model-requested wait.
const MAX_WAIT: Duration = Duration::from_secs(10);

/// LLM-driven browser agent. Each [`SiteAgent::run`] call owns a fresh
/// headless Chrome session for the duration of that task.
pub struct BrowserAgent {
    navigator: LlmNavigator,
}

impl BrowserAgent {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            navigator: LlmNavigator::new(model),
        }
    }

    /// Observe, ask the model for one action, apply it; repeat until the
    /// model declares done or the budget runs out. Action failures go into
    /// the step's error slot and the loop continues; model or transport
    /// faults abort the run.
    async fn drive(&self, page: &Page, task: &AgentTask, max_steps: usize) -> Result<RunHistory> {
        let mut history = RunHistory::default();

        page.goto(task.start_url.as_str()).await?;
        tokio::time::sleep(SETTLE_DELAY).await;

        for step in 0..max_steps {
            let observation = observe(page, task.use_vision).await;
            let action = self
                .navigator
                .decide(&task.instruction, &observation, history.steps())
                .await?;
            tracing::debug!(step, action = %action.describe(), "Agent step");

            if let Action::Done { success, message } = &action {
                history.push(StepRecord {
                    action: action.describe(),
                    error: (!*success).then(|| message.clone()),
                });
                history.finish(*success);
                return Ok(history);
            }

            let error = apply_action(page, task, &action).await.err();
            if let Some(e) = &error {
                tracing::debug!(step, error = %e, "Step action failed");
            }
            history.push(StepRecord {
                action: action.describe(),
                error,
            });
            tokio::time::sleep(SETTLE_DELAY).await;
        }

        tracing::warn!("Step budget of {max_steps} exhausted without done");
        Ok(history)
    }
}

#[async_trait]
impl SiteAgent for BrowserAgent {
    async fn run(&self, task: &AgentTask, max_steps: usize) -> Result<RunHistory> {
        let session = BrowserSession::launch(task).await?;
        let outcome = self.drive(&session.page, task, max_steps).await;
        // Teardown runs on the fault path too; a hung agent must not leak
        // the Chrome process into the next task.
        session.shutdown().await;
        outcome
    }
}

/// One Chrome process plus the task polling its CDP event stream.
struct BrowserSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
    page: Page,
}

impl BrowserSession {
    async fn launch(task: &AgentTask) -> Result<Self> {
        let config = BrowserConfig::builder()
            .window_size(WINDOW_WIDTH, WINDOW_HEIGHT)
            .build()
            .map_err(Error::Browser)?;

        let (browser, mut handler) = Browser::launch(config).await?;

        // The handler stream must be polled for any browser call to make
        // progress.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("CDP handler event error (continuing): {e}");
                }
            }
        });

        let page = browser.new_page("about:blank").await?;
        page.execute(
            SetUserAgentOverrideParams::builder()
                .user_agent(USER_AGENT)
                .accept_language(ACCEPT_LANGUAGE)
                .build()
                .map_err(Error::Browser)?,
        )
        .await?;
        page.execute(
            SetDownloadBehaviorParams::builder()
                .behavior(SetDownloadBehaviorBehavior::Allow)
                .download_path(task.download_dir.display().to_string())
                .build()
                .map_err(Error::Browser)?,
        )
        .await?;

        tracing::debug!(
            "Browser session ready, downloads routed to {}",
            task.download_dir.display()
        );
        Ok(Self {
            browser,
            handler_task,
            page,
        })
    }

    async fn shutdown(mut self) {
        if let Err(e) = self.browser.close().await {
            tracing::debug!("Browser close failed: {e}");
        }
        self.handler_task.abort();
    }
}

async fn observe(page: &Page, use_vision: bool) -> PageObservation {
    let url = page
        .url()
        .await
        .ok()
        .flatten()
        .unwrap_or_else(|| "about:blank".to_string());
    let title = page.get_title().await.ok().flatten().unwrap_or_default();
    let text = page
        .evaluate("document.body ? document.body.innerText : ''")
        .await
        .ok()
        .and_then(|value| value.into_value::<String>().ok())
        .map(|text| truncate_text(&text, MAX_PAGE_TEXT))
        .unwrap_or_default();

    let screenshot = if use_vision {
        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .build();
        match page.screenshot(params).await {
            Ok(png) => Some(format!(
                "data:image/png;base64,{}",
                general_purpose::STANDARD.encode(png)
            )),
            Err(e) => {
                tracing::debug!("Screenshot failed, continuing without vision: {e}");
                None
            }
        }
    } else {
        None
    };

    PageObservation {
        url,
        title,
        text,
        screenshot,
    }
}

async fn apply_action(
    page: &Page,
    task: &AgentTask,
    action: &Action,
) -> std::result::Result<(), String> {
    match action {
        Action::Navigate { url } => {
            page.goto(url.as_str()).await.map_err(|e| e.to_string())?;
        }
        Action::Click { selector } => {
            let element = page
                .find_element(selector.as_str())
                .await
                .map_err(|e| format!("'{selector}': {e}"))?;
            element.click().await.map_err(|e| e.to_string())?;
        }
        Action::Type { selector, text } => {
            let element = page
                .find_element(selector.as_str())
                .await
                .map_err(|e| format!("'{selector}': {e}"))?;
            element.click().await.map_err(|e| e.to_string())?;
            element
                .type_str(task.resolve_secrets(text))
                .await
                .map_err(|e| e.to_string())?;
        }
        Action::Scroll { dy } => {
            page.evaluate(format!("window.scrollBy(0, {dy})"))
                .await
                .map_err(|e| e.to_string())?;
        }
        Action::Wait { ms } => {
            tokio::time::sleep(Duration::from_millis(*ms).min(MAX_WAIT)).await;
        }
        Action::Done { .. } => {}
    }
    Ok(())
}

/// Cut on a char boundary at or below `max` bytes.
fn truncate_text(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &text[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text_short_input_untouched() {
        assert_eq!(truncate_text("hello", 10), "hello");
    }

    #[test]
    fn test_truncate_text_respects_char_boundaries() {
        let text = "aé".repeat(100);
        let truncated = truncate_text(&text, 15);
        assert!(truncated.len() <= 15 + '…'.len_utf8());
        assert!(truncated.ends_with('…'));
    }
}
