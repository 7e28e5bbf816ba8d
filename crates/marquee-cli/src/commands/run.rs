use crate::app::App;
use crate::output::{Output, OutputFormat};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Cell, Table};
use media_acquire_core::PipelineRun;
use media_acquire_models::{JobKey, RunReport};
use serde_json::json;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

fn report_table(report: &RunReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new(report.job_key.to_string()).add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Items"),
    ]);
    let rows = [
        ("Fetched", report.fetched),
        ("Selected", report.selected),
        ("Requested", report.requested),
        ("Already exists", report.already_exists),
        ("Failed", report.failed),
        ("Not attempted", report.skipped),
    ];
    for (label, count) in rows {
        table.add_row(vec![Cell::new(label), Cell::new(count)]);
    }
    table
}

pub async fn run_job(job: &str, output: &Output) -> Result<()> {
    let key: JobKey = job.parse().map_err(|e: String| eyre!(e))?;
    let app = App::load()?;
    app.validate()?;
    let pipeline = app.pipeline();

    let spinner = indicatif::ProgressBar::new_spinner();
    if output.is_interactive() {
        spinner.set_style(
            indicatif::ProgressStyle::default_spinner()
                .template("{spinner:.blue} {msg}")
                .unwrap_or_else(|_| indicatif::ProgressStyle::default_spinner()),
        );
        spinner.set_message(format!("Running {}...", key));
        spinner.enable_steady_tick(Duration::from_millis(100));
    } else {
        spinner.set_draw_target(indicatif::ProgressDrawTarget::hidden());
    }

    let result = pipeline.run(key, &AtomicBool::new(false)).await;
    spinner.finish_and_clear();

    match result? {
        PipelineRun::Completed(report) => match output.format() {
            OutputFormat::Human => {
                output.table(report_table(&report));
                if report.failed > 0 {
                    output.warn(format!(
                        "{} request(s) failed; see the log for details",
                        report.failed
                    ));
                } else {
                    output.success(format!("{} finished", key));
                }
            }
            OutputFormat::Json | OutputFormat::JsonPretty => {
                output.json(&json!({ "status": "completed", "report": report }));
            }
        },
        PipelineRun::Skipped(reason) => match output.format() {
            OutputFormat::Human => output.warn(format!("{} skipped: {}", key, reason)),
            OutputFormat::Json | OutputFormat::JsonPretty => {
                output.json(&json!({ "status": "skipped", "job_key": key, "reason": reason }));
            }
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use media_acquire_models::{ListType, MediaKind};

    #[test]
    fn test_report_table_lists_every_counter() {
        let mut report = RunReport::empty(JobKey::new(MediaKind::Movie, ListType::Popular));
        report.requested = 3;
        let rendered = report_table(&report).to_string();
        assert!(rendered.contains("movie-popular"));
        assert!(rendered.contains("Requested"));
        assert!(rendered.contains("Not attempted"));
    }
}
