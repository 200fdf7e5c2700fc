pub mod check;
pub mod run;

use billfetch_core::FieldError;

/// Print every accumulated validation error to the error stream, one line
/// per row/field pair.
pub(crate) fn report_validation_errors(errors: &[FieldError]) {
    eprintln!("\n--- Validation Errors ---");
    for error in errors {
        eprintln!("{error}");
    }
    eprintln!("-------------------------");
}
