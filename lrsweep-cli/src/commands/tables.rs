use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use super::Session;
use crate::CliError;

/// List tables that carry `column`. These are the tables a deletion cascades into
/// when `column` is `image`.
pub(crate) fn run_tables(session: &Session, column: &str) -> Result<(), CliError> {
    let tables = session.library.tables_with_column(column)?;

    log::info!(
        "Tables with column {}: {}",
        column.if_supports_color(Stdout, |t| t.cyan()),
        tables.len()
    );
    for table in &tables {
        log::info!("  {}", table);
    }
    Ok(())
}
