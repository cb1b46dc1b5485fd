//! CSV export functionality

use std::path::Path;

use csv::Writer;

use crate::views::HistoryRow;
use crate::CommandError;

/// Write history rows to CSV, one record per transaction
pub fn write_history_csv(rows: &[HistoryRow], path: &Path) -> Result<(), CommandError> {
    let file = std::fs::File::create(path)
        .map_err(|e| CommandError::Internal(format!("Failed to create CSV file: {}", e)))?;

    let mut writer = Writer::from_writer(file);

    // Headers come from the first serialized record; write them by hand
    // so an empty history still yields a valid file
    if rows.is_empty() {
        writer
            .write_record(["transaction_id", "account_id", "transaction_type", "amount", "timestamp"])
            .map_err(|e| CommandError::Internal(format!("Failed to write CSV header: {}", e)))?;
    }

    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| CommandError::Internal(format!("Failed to write CSV record: {}", e)))?;
    }

    writer
        .flush()
        .map_err(|e| CommandError::Internal(format!("Failed to flush CSV: {}", e)))?;

    Ok(())
}
