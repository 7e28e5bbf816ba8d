use crate::app::App;
use crate::output::{Output, OutputFormat};
use color_eyre::Result;
use comfy_table::{Cell, Table};
use media_acquire_models::AcquiredMediaRecord;
use media_acquire_sources::HistoryStore;
use serde_json::json;

fn history_table(records: &[AcquiredMediaRecord]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("Added").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Kind"),
        Cell::new("Title"),
        Cell::new("Year"),
        Cell::new("IMDb"),
    ]);
    for record in records {
        table.add_row(vec![
            Cell::new(record.added_at.format("%Y-%m-%d %H:%M").to_string()),
            Cell::new(record.kind.label()),
            Cell::new(&record.title),
            Cell::new(record.year.map(|y| y.to_string()).unwrap_or_default()),
            Cell::new(record.imdb_id.as_deref().unwrap_or("-")),
        ]);
    }
    table
}

pub async fn show_history(limit: usize, output: &Output) -> Result<()> {
    let app = App::load()?;
    let store = app.history_store();
    let records = store.recent(limit).await?;

    match output.format() {
        OutputFormat::Human => {
            if records.is_empty() {
                output.info(format!("Nothing acquired yet ({})", store.path().display()));
                return Ok(());
            }
            output.table(history_table(&records));
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&json!({ "history": records }));
        }
    }
    Ok(())
}
