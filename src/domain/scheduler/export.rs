use std::fs::File;
use std::io::Write;

use crate::domain::scheduler::schedule::Schedule;
use crate::error::Result;

const HEADERS: [&str; 9] = ["kind", "task", "dest_task", "node", "dest_node", "start", "end", "source_link", "dest_link"];

/// Writes task placements followed by the hop transmissions as `;` separated CSV.
///
/// Columns that do not apply to a row kind are written as `NA`.
pub fn write_csv<W: Write>(schedule: &Schedule, writer: W) -> Result<()> {
    let mut csv_wtr = csv::WriterBuilder::new().delimiter(b';').from_writer(writer);
    csv_wtr.write_record(HEADERS)?;

    for placement in &schedule.placements {
        csv_wtr.write_record([
            "task".to_string(),
            placement.task.to_string(),
            "NA".to_string(),
            placement.node.to_string(),
            "NA".to_string(),
            placement.start.to_string(),
            placement.end.to_string(),
            "NA".to_string(),
            "NA".to_string(),
        ])?;
    }

    for transmission in &schedule.transmissions {
        csv_wtr.write_record([
            "transmission".to_string(),
            transmission.source_task.to_string(),
            transmission.dest_task.to_string(),
            transmission.source_node.to_string(),
            transmission.dest_node.to_string(),
            transmission.start.to_string(),
            transmission.end.to_string(),
            transmission.source_link.to_string(),
            transmission.dest_link.to_string(),
        ])?;
    }

    csv_wtr.flush()?;
    Ok(())
}

/// [`write_csv`] into a newly created file.
pub fn export_csv(schedule: &Schedule, file_path: &str) -> Result<()> {
    let file = File::create(file_path)?;
    write_csv(schedule, file)?;
    log::info!("Schedule exported to '{}'.", file_path);
    Ok(())
}
