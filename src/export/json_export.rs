//! JSON export functionality
//!
//! Keeps the rows as shown plus a small summary block.

use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::views::HistoryRow;
use crate::CommandError;

const EXPORT_VERSION: &str = "1.0.0";

/// Complete export structure for JSON
#[derive(Debug, Clone, Serialize)]
pub struct HistoryExportJson {
    pub export_date: String,
    pub export_version: &'static str,
    pub account_id: String,
    pub total_transactions: usize,
    pub summary: HistorySummary,
    pub transactions: Vec<HistoryRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HistorySummary {
    pub deposit_count: usize,
    pub withdrawal_count: usize,
    pub total_deposited: f64,
    pub total_withdrawn: f64,
}

impl HistorySummary {
    pub fn from_rows(rows: &[HistoryRow]) -> Self {
        rows.iter().fold(Self::default(), |mut acc, row| {
            if row.transaction_type == "Deposit" {
                acc.deposit_count += 1;
                acc.total_deposited += row.amount;
            } else {
                acc.withdrawal_count += 1;
                acc.total_withdrawn += row.amount;
            }
            acc
        })
    }
}

pub fn build_history_export(account_id: &str, rows: &[HistoryRow]) -> HistoryExportJson {
    HistoryExportJson {
        export_date: chrono::Utc::now().to_rfc3339(),
        export_version: EXPORT_VERSION,
        account_id: account_id.to_string(),
        total_transactions: rows.len(),
        summary: HistorySummary::from_rows(rows),
        transactions: rows.to_vec(),
    }
}

/// Write history rows to pretty-printed JSON
pub fn write_history_json(
    account_id: &str,
    rows: &[HistoryRow],
    path: &Path,
) -> Result<(), CommandError> {
    let export = build_history_export(account_id, rows);

    let json = serde_json::to_string_pretty(&export)
        .map_err(|e| CommandError::Internal(format!("Failed to serialize JSON: {}", e)))?;

    let mut file = std::fs::File::create(path)
        .map_err(|e| CommandError::Internal(format!("Failed to create JSON file: {}", e)))?;

    file.write_all(json.as_bytes())
        .map_err(|e| CommandError::Internal(format!("Failed to write JSON: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, kind: &str, amount: f64) -> HistoryRow {
        HistoryRow {
            transaction_id: id.to_string(),
            account_id: "A1".to_string(),
            transaction_type: kind.to_string(),
            amount,
            timestamp: None,
        }
    }

    #[test]
    fn test_summary() {
        let rows = vec![
            row("t1", "Deposit", 100.0),
            row("t2", "Withdrawal", 30.0),
            row("t3", "Deposit", 5.0),
        ];

        let summary = HistorySummary::from_rows(&rows);
        assert_eq!(summary.deposit_count, 2);
        assert_eq!(summary.withdrawal_count, 1);
        assert_eq!(summary.total_deposited, 105.0);
        assert_eq!(summary.total_withdrawn, 30.0);
    }

    #[test]
    fn test_write_history_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        let rows = vec![row("t1", "Deposit", 100.0), row("t2", "Withdrawal", 30.0)];

        write_history_json("A1", &rows, &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["account_id"], "A1");
        assert_eq!(value["export_version"], "1.0.0");
        assert_eq!(value["total_transactions"], 2);
        assert_eq!(value["transactions"][1]["transaction_type"], "Withdrawal");
        assert_eq!(value["summary"]["total_deposited"], 100.0);
    }
}
