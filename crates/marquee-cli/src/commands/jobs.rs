use crate::app::App;
use crate::output::{Output, OutputFormat};
use color_eyre::Result;
use comfy_table::{Cell, Table};
use media_acquire_models::ListJobSpec;
use serde_json::json;

pub(crate) fn jobs_table(specs: &[ListJobSpec]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("Job").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("List"),
        Cell::new("Schedule (UTC)"),
        Cell::new("Quota"),
    ]);
    for spec in specs {
        table.add_row(vec![
            Cell::new(spec.key().to_string()).fg(comfy_table::Color::Cyan),
            Cell::new(format!("{} {}", spec.list.display_name(), spec.kind.label())),
            Cell::new(&spec.cron),
            Cell::new(spec.quota),
        ]);
    }
    table
}

pub fn list_jobs(output: &Output) -> Result<()> {
    let app = App::load()?;
    let specs = app.config.job_specs();

    match output.format() {
        OutputFormat::Human => {
            if specs.is_empty() {
                output.warn(
                    "No jobs configured. A job needs both a schedule and a quota above zero.",
                );
                return Ok(());
            }
            output.table(jobs_table(&specs));
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&json!({ "jobs": specs }));
        }
    }
    Ok(())
}
