mod browser;
mod error;
mod history;
mod llm;
mod runner;
mod task;

pub use browser::BrowserAgent;
pub use error::{Error, Result};
pub use history::{RunHistory, StepRecord};
pub use llm::DEFAULT_MODEL;
pub use runner::{DEFAULT_MAX_STEPS, TaskRunner};
pub use task::AgentTask;

use async_trait::async_trait;

/// Narrow capability interface over the automation backend.
///
/// One call drives one site end to end within the given step budget. The run
/// owns its own browser session; implementations must release it on every
/// exit path.
#[async_trait]
pub trait SiteAgent {
    async fn run(&self, task: &AgentTask, max_steps: usize) -> Result<RunHistory>;
}
