/// One executed agent step.
#[derive(Debug, Clone, Default)]
pub struct StepRecord {
    /// Short description of the action taken.
    pub action: String,
    /// Error slot for this step; `None` when the step went through cleanly.
    pub error: Option<String>,
}

/// Transcript of one agent run.
#[derive(Debug, Clone, Default)]
pub struct RunHistory {
    steps: Vec<StepRecord>,
    done: bool,
    success: bool,
}

impl RunHistory {
    pub fn push(&mut self, step: StepRecord) {
        self.steps.push(step);
    }

    /// Mark the run finished. A run that exhausts its step budget without
    /// reaching this stays not-done.
    pub fn finish(&mut self, success: bool) {
        self.done = true;
        self.success = success;
    }

    /// Did the agent declare the task finished (either way)?
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Did the agent declare the task finished and achieved?
    pub fn is_successful(&self) -> bool {
        self.done && self.success
    }

    pub fn steps(&self) -> &[StepRecord] {
        &self.steps
    }

    /// One error slot per step, in step order.
    pub fn errors(&self) -> Vec<Option<&str>> {
        self.steps.iter().map(|s| s.error.as_deref()).collect()
    }

    /// Non-empty step errors joined with `-`.
    pub fn error_summary(&self) -> String {
        self.steps
            .iter()
            .filter_map(|s| s.error.as_deref())
            .filter(|e| !e.is_empty())
            .collect::<Vec<_>>()
            .join("-")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(action: &str, error: Option<&str>) -> StepRecord {
        StepRecord {
            action: action.to_string(),
            error: error.map(str::to_string),
        }
    }

    #[test]
    fn test_fresh_history_is_not_done() {
        let history = RunHistory::default();
        assert!(!history.is_done());
        assert!(!history.is_successful());
        assert!(history.errors().is_empty());
    }

    #[test]
    fn test_finish_failure_is_done_but_not_successful() {
        let mut history = RunHistory::default();
        history.finish(false);
        assert!(history.is_done());
        assert!(!history.is_successful());
    }

    #[test]
    fn test_error_summary_skips_empty_slots() {
        let mut history = RunHistory::default();
        history.push(step("click", Some("login failed")));
        history.push(step("type", None));
        history.push(step("click", Some("")));
        history.push(step("wait", Some("timeout")));

        assert_eq!(history.errors().len(), 4);
        assert_eq!(history.error_summary(), "login failed-timeout");
    }
}
