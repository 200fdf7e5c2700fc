use crate::task::AgentTask;
use crate::{Error, Result, RunHistory, SiteAgent};
use billfetch_core::{InputTask, OutputResult, TaskStatus};
use std::path::{Path, PathBuf};

/// Step budget for one agent run.
pub const DEFAULT_MAX_STEPS: usize = 10;

/// Runs one validated task through an agent and maps the outcome to a
/// status. Faults never escape this boundary: anything the agent or the
/// setup raises degrades to a `Failed` status so the remaining rows still
/// get processed.
pub struct TaskRunner<'a> {
    run_dir: &'a Path,
    max_steps: usize,
}

impl<'a> TaskRunner<'a> {
    pub fn new(run_dir: &'a Path, max_steps: usize) -> Self {
        Self { run_dir, max_steps }
    }

    /// Execute exactly one agent run for `task`. No retries.
    pub async fn run(&self, agent: &dyn SiteAgent, task: &InputTask) -> OutputResult {
        tracing::info!(site = %task.site_name, url = %task.site_url, "Processing site");

        let status = match self.try_run(agent, task).await {
            Ok(history) => {
                if history.is_done() && history.is_successful() {
                    tracing::info!(site = %task.site_name, "Processed successfully");
                    TaskStatus::Success
                } else {
                    let errors = history.error_summary();
                    tracing::warn!(site = %task.site_name, errors = %errors, "Agent did not succeed");
                    TaskStatus::Failed(errors)
                }
            }
            Err(e) => {
                tracing::warn!(site = %task.site_name, error = %e, "Task run faulted");
                TaskStatus::Failed(e.to_string())
            }
        };

        OutputResult::new(task, status)
    }

    async fn try_run(&self, agent: &dyn SiteAgent, task: &InputTask) -> Result<RunHistory> {
        let download_dir = self.create_download_dir(&task.site_name)?;
        let agent_task = AgentTask::for_site(task, download_dir);
        agent.run(&agent_task, self.max_steps).await
    }

    /// Per-site download directory, `run_dir/<siteName>` with spaces
    /// underscored. Site names are unique per validated table, so an
    /// existing directory means a clash with earlier run state.
    fn create_download_dir(&self, site_name: &str) -> Result<PathBuf> {
        let dir = self.run_dir.join(site_name.replace(' ', "_"));
        std::fs::create_dir(&dir).map_err(|e| match e.kind() {
            std::io::ErrorKind::AlreadyExists => Error::DownloadDirExists(dir.clone()),
            _ => Error::Io(e),
        })?;
        Ok(dir)
    }
}
