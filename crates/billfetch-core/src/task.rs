use crate::error::FieldError;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use url::Url;

/// Raw data row as read from the input table: column name to cell text.
pub type RawRow = HashMap<String, String>;

/// Input table column order.
pub const INPUT_COLUMNS: [&str; 5] =
    ["siteName", "siteURL", "username", "password", "navHelper"];

/// One validated unit of work: a site to log into and act on.
#[derive(Clone, PartialEq, Eq)]
pub struct InputTask {
    pub site_name: String,
    pub site_url: Url,
    pub username: String,
    pub password: String,
    pub nav_helper: String,
}

impl InputTask {
    /// Build a task from a raw row, collecting every field-level violation.
    ///
    /// `row` is the 1-indexed position in the source file (header is row 1,
    /// so the first data row is 2) and is only used for error reporting.
    pub fn from_record(record: &RawRow, row: usize) -> Result<Self, Vec<FieldError>> {
        let mut errors = Vec::new();

        let mut text_field = |name: &str| -> Option<String> {
            match record.get(name).map(|v| v.trim()) {
                Some(value) if !value.is_empty() => Some(value.to_string()),
                Some(_) => {
                    errors.push(FieldError {
                        row,
                        field: name.to_string(),
                        reason: "value must not be empty".to_string(),
                    });
                    None
                }
                None => {
                    errors.push(FieldError {
                        row,
                        field: name.to_string(),
                        reason: "missing column value".to_string(),
                    });
                    None
                }
            }
        };

        let site_name = text_field("siteName");
        let site_url_raw = text_field("siteURL");
        let username = text_field("username");
        let password = text_field("password");
        let nav_helper = text_field("navHelper");

        let site_url = site_url_raw.and_then(|raw| match Url::parse(&raw) {
            Ok(url) => Some(url),
            Err(e) => {
                errors.push(FieldError {
                    row,
                    field: "siteURL".to_string(),
                    reason: format!("not a valid URL: {e}"),
                });
                None
            }
        });

        if !errors.is_empty() {
            return Err(errors);
        }

        // All five options are Some once errors is empty.
        Ok(Self {
            site_name: site_name.unwrap(),
            site_url: site_url.unwrap(),
            username: username.unwrap(),
            password: password.unwrap(),
            nav_helper: nav_helper.unwrap(),
        })
    }
}

// Credentials are sensitive; keep them out of debug logs.
impl std::fmt::Debug for InputTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputTask")
            .field("site_name", &self.site_name)
            .field("site_url", &self.site_url.as_str())
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("nav_helper", &self.nav_helper)
            .finish()
    }
}

/// Terminal outcome of one task run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStatus {
    Success,
    Failed(String),
}

impl TaskStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, TaskStatus::Success)
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Success => write!(f, "Success"),
            TaskStatus::Failed(reason) => write!(f, "Failed: {reason}"),
        }
    }
}

impl Serialize for TaskStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TaskStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        Ok(match text.strip_prefix("Failed: ") {
            Some(reason) => TaskStatus::Failed(reason.to_string()),
            None if text == "Success" => TaskStatus::Success,
            None => TaskStatus::Failed(text),
        })
    }
}

/// One row of the results table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputResult {
    #[serde(rename = "siteName")]
    pub site_name: String,
    #[serde(rename = "siteURL")]
    pub site_url: Url,
    pub status: TaskStatus,
}

impl OutputResult {
    pub fn new(task: &InputTask, status: TaskStatus) -> Self {
        Self {
            site_name: task.site_name.clone(),
            site_url: task.site_url.clone(),
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_row() -> RawRow {
        [
            ("siteName", "Acme"),
            ("siteURL", "https://acme.test"),
            ("username", "u"),
            ("password", "p"),
            ("navHelper", "download latest invoice"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn test_from_record_valid_row() {
        let task = InputTask::from_record(&raw_row(), 2).unwrap();
        assert_eq!(task.site_name, "Acme");
        assert_eq!(task.site_url.as_str(), "https://acme.test/");
        assert_eq!(task.nav_helper, "download latest invoice");
    }

    #[test]
    fn test_from_record_collects_all_field_errors() {
        let mut record = raw_row();
        record.insert("siteURL".to_string(), "not a url".to_string());
        record.insert("password".to_string(), "".to_string());

        let errors = InputTask::from_record(&record, 3).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.row == 3));
        assert!(errors.iter().any(|e| e.field == "siteURL"));
        assert!(errors.iter().any(|e| e.field == "password"));
    }

    #[test]
    fn test_from_record_missing_column() {
        let mut record = raw_row();
        record.remove("password");

        let errors = InputTask::from_record(&record, 2).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "password");
        assert_eq!(errors[0].reason, "missing column value");
    }

    #[test]
    fn test_debug_redacts_password() {
        let task = InputTask::from_record(&raw_row(), 2).unwrap();
        let debug = format!("{task:?}");
        assert!(!debug.contains("\"p\""));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_status_rendering() {
        assert_eq!(TaskStatus::Success.to_string(), "Success");
        assert_eq!(
            TaskStatus::Failed("login failed".to_string()).to_string(),
            "Failed: login failed"
        );
    }
}
