use billfetch_core::InputTask;
use std::collections::HashMap;
use std::path::PathBuf;
use url::Url;

/// Placeholder keys the model sees instead of raw credentials.
pub const USERNAME_KEY: &str = "x_name";
pub const PASSWORD_KEY: &str = "x_password";

const LOGIN_PREAMBLE: &str = "Login with x_name and x_password if required. ";

/// Everything an agent needs for one site run.
///
/// The instruction only ever references the placeholder keys; actual secret
/// values live in `secrets` and are substituted locally at type-time, never
/// sent to the model.
#[derive(Clone)]
pub struct AgentTask {
    pub start_url: Url,
    pub instruction: String,
    pub secrets: HashMap<String, String>,
    pub download_dir: PathBuf,
    pub use_vision: bool,
}

impl AgentTask {
    pub fn for_site(task: &InputTask, download_dir: PathBuf) -> Self {
        let secrets = HashMap::from([
            (USERNAME_KEY.to_string(), task.username.clone()),
            (PASSWORD_KEY.to_string(), task.password.clone()),
        ]);

        Self {
            start_url: task.site_url.clone(),
            instruction: format!("{LOGIN_PREAMBLE}{}", task.nav_helper),
            secrets,
            download_dir,
            use_vision: true,
        }
    }

    /// Replace placeholder keys in `text` with their secret values.
    pub fn resolve_secrets(&self, text: &str) -> String {
        let mut resolved = text.to_string();
        for (key, value) in &self.secrets {
            resolved = resolved.replace(key.as_str(), value);
        }
        resolved
    }
}

// Secret values stay out of logs.
impl std::fmt::Debug for AgentTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentTask")
            .field("start_url", &self.start_url.as_str())
            .field("instruction", &self.instruction)
            .field("secrets", &self.secrets.keys().collect::<Vec<_>>())
            .field("download_dir", &self.download_dir)
            .field("use_vision", &self.use_vision)
            .finish()
    }
}
