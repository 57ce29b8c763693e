use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::WriterBuilder;

use crate::display::{format_substitutes, ScheduleTable};
use crate::schedule::Player;

/// Writes the transposed schedule as CSV: header row, one row per session,
/// then a trailing `Substitutes` row when there are any.
pub fn export_schedule_csv<W: Write>(
    table: &ScheduleTable,
    substitutes: &[Player],
    writer: W,
) -> Result<(), csv::Error> {
    let mut wtr = WriterBuilder::new().flexible(true).from_writer(writer);

    wtr.write_record(&table.header)?;
    for row in &table.rows {
        wtr.write_record(row)?;
    }
    if !substitutes.is_empty() {
        wtr.write_record(["Substitutes".to_string(), format_substitutes(substitutes)])?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn export_schedule_to_path(
    table: &ScheduleTable,
    substitutes: &[Player],
    csv_path: &Path,
) -> Result<(), csv::Error> {
    let file = File::create(csv_path)?;
    export_schedule_csv(table, substitutes, file)
}
