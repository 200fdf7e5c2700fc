pub mod error;
pub mod layout;
pub mod table;
pub mod task;
pub mod validate;

pub use error::{Error, FieldError, Result};
pub use task::{InputTask, OutputResult, TaskStatus};
