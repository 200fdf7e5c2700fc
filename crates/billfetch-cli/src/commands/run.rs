use anyhow::Result;
use billfetch_agent::{BrowserAgent, TaskRunner};
use billfetch_core::layout::{RunId, RunLayout};
use billfetch_core::table::{TableReader, TableWriter};
use billfetch_core::validate::validate_rows;
use billfetch_core::{Error, OutputResult};
use console::style;
use indicatif::ProgressBar;
use std::path::Path;

pub async fn execute(
    base: &Path,
    run_id: Option<String>,
    max_steps: usize,
    model: &str,
) -> Result<()> {
    let run_id = run_id.map(RunId::from).unwrap_or_else(RunId::generate);
    tracing::debug!("Starting run {run_id} with model {model}");

    println!("{}", style("Setting up directories...").bold());
    let layout = RunLayout::prepare(base, &run_id)?;
    let input_file = layout.input_file();
    let output_file = layout.output_file();
    println!("Input file: {}", input_file.display());
    println!("Output file will be: {}", output_file.display());

    let rows = TableReader::from_file(&input_file)?;
    println!("Successfully read {} row(s).", rows.len());

    let tasks = match validate_rows(&rows) {
        Ok(tasks) => tasks,
        Err(Error::Validation(errors)) => {
            super::report_validation_errors(&errors);
            anyhow::bail!("validation failed with {} error(s)", errors.len());
        }
        Err(e) => return Err(e.into()),
    };
    println!(
        "{}",
        style(format!("All {} row(s) validated.", tasks.len())).green()
    );

    let agent = BrowserAgent::new(model);
    let runner = TaskRunner::new(layout.run_dir(), max_steps);

    // Strictly sequential: one browser session at a time, results in input
    // order.
    let progress = ProgressBar::new(tasks.len() as u64);
    let mut results: Vec<OutputResult> = Vec::with_capacity(tasks.len());
    for task in &tasks {
        progress.set_message(task.site_name.clone());
        let result = runner.run(&agent, task).await;
        let line = if result.status.is_success() {
            format!("  {} {}", style("✔").green(), task.site_name)
        } else {
            format!(
                "  {} {} ({})",
                style("✘").red(),
                task.site_name,
                result.status
            )
        };
        progress.println(line);
        results.push(result);
        progress.inc(1);
    }
    progress.finish_and_clear();

    TableWriter::to_file(&output_file, &results)?;

    let succeeded = results.iter().filter(|r| r.status.is_success()).count();
    let failed = results.len() - succeeded;
    println!(
        "\n{} {} succeeded, {} failed. Results written to {}",
        style("Run finished:").bold(),
        style(succeeded).green(),
        if failed > 0 {
            style(failed).red()
        } else {
            style(failed).dim()
        },
        output_file.display()
    );

    Ok(())
}
