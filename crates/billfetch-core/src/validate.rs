use crate::error::FieldError;
use crate::task::{InputTask, RawRow};
use crate::{Error, Result};
use std::collections::HashMap;

/// Validate every raw row into an [`InputTask`].
///
/// All-or-nothing: field errors are accumulated across the whole table, and a
/// single bad row fails the call with every collected error. Rows are
/// numbered from 2, the header being row 1. On success the returned tasks
/// match the input rows in order and length.
pub fn validate_rows(rows: &[RawRow]) -> Result<Vec<InputTask>> {
    let mut tasks = Vec::with_capacity(rows.len());
    let mut errors = Vec::new();
    // Site names key the per-site download directories, so a duplicate would
    // otherwise fail mid-run as an opaque directory collision.
    let mut seen_sites: HashMap<String, usize> = HashMap::new();

    for (index, record) in rows.iter().enumerate() {
        let row = index + 2;
        match InputTask::from_record(record, row) {
            Ok(task) => {
                if let Some(first_row) = seen_sites.get(&task.site_name) {
                    errors.push(FieldError {
                        row,
                        field: "siteName".to_string(),
                        reason: format!(
                            "duplicate site name '{}' (already used in row {first_row})",
                            task.site_name
                        ),
                    });
                } else {
                    seen_sites.insert(task.site_name.clone(), row);
                    tasks.push(task);
                }
            }
            Err(mut field_errors) => errors.append(&mut field_errors),
        }
    }

    if !errors.is_empty() {
        tracing::warn!("Validation failed with {} error(s)", errors.len());
        return Err(Error::Validation(errors));
    }

    Ok(tasks)
}
