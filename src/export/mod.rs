//! Export module for CSV and JSON export of transaction history
//!
//! Only rows already shown in the history dialog are written; export
//! never fetches.

pub mod csv_export;
pub mod json_export;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::views::HistoryRow;
use crate::CommandError;

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
}

impl std::str::FromStr for ExportFormat {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            _ => Err(CommandError::Internal(format!(
                "Invalid export format: {}. Use 'csv' or 'json'",
                s
            ))),
        }
    }
}

impl ExportFormat {
    /// Get file extension for format
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// Get the default export directory (Downloads folder or temp dir)
pub fn get_export_directory() -> PathBuf {
    dirs::download_dir()
        .or_else(dirs::document_dir)
        .unwrap_or_else(std::env::temp_dir)
}

/// Generate a timestamped filename for exports (millisecond resolution)
pub fn generate_export_filename(prefix: &str, extension: &str) -> String {
    let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S_%3f");
    format!("{}_{}.{}", prefix, timestamp, extension)
}

/// First path in `dir` that does not exist yet, numbering on collision
fn unused_export_path(dir: &Path, prefix: &str, extension: &str) -> PathBuf {
    let filename = generate_export_filename(prefix, extension);
    let path = dir.join(&filename);
    if !path.exists() {
        return path;
    }

    let stem = filename.trim_end_matches(&format!(".{}", extension)).to_string();
    (1u32..)
        .map(|n| dir.join(format!("{}_{}.{}", stem, n, extension)))
        .find(|candidate| !candidate.exists())
        .unwrap_or(path)
}

/// Write the history of one account into `dir`, returning the file path
pub fn export_history(
    account_id: &str,
    rows: &[HistoryRow],
    format: ExportFormat,
    dir: &Path,
) -> Result<PathBuf, CommandError> {
    std::fs::create_dir_all(dir)
        .map_err(|e| CommandError::Internal(format!("Failed to create export directory: {}", e)))?;

    let prefix = format!("history_{}", sanitize(account_id));
    let path = unused_export_path(dir, &prefix, format.extension());

    match format {
        ExportFormat::Csv => write_history_csv(rows, &path)?,
        ExportFormat::Json => write_history_json(account_id, rows, &path)?,
    }

    tracing::info!("Exported {} transactions to {}", rows.len(), path.display());
    Ok(path)
}

/// Account ids go into file names
fn sanitize(account_id: &str) -> String {
    account_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

pub use csv_export::*;
pub use json_export::*;

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
    fn test_export_format_from_str() {
        assert_eq!("csv".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert!("xml".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_export_format_extension() {
        assert_eq!(ExportFormat::Csv.extension(), "csv");
        assert_eq!(ExportFormat::Json.extension(), "json");
    }

    #[test]
    fn test_generate_export_filename_format() {
        let filename = generate_export_filename("history_A1", "csv");

        // history_A1_YYYYMMDD_HHMMSS_mmm.csv
        assert!(filename.starts_with("history_A1_"));
        assert!(filename.ends_with(".csv"));
        assert_eq!(filename.len(), "history_A1_".len() + 19 + ".csv".len());
    }

    #[test]
    fn test_sanitize_account_id() {
        assert_eq!(sanitize("acc 1/../x"), "acc_1____x");
        assert_eq!(sanitize("A-1_b"), "A-1_b");
    }

    #[test]
    fn test_export_history_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let rows = vec![row("t1", "Deposit", 10.0), row("t2", "Withdrawal", 4.0)];

        let csv_path = export_history("A1", &rows, ExportFormat::Csv, dir.path()).unwrap();
        let json_path = export_history("A1", &rows, ExportFormat::Json, dir.path()).unwrap();

        assert!(csv_path.starts_with(dir.path()));
        assert_eq!(csv_path.extension().unwrap(), "csv");
        assert!(std::fs::read_to_string(&csv_path).unwrap().contains("t2,A1,Withdrawal,4.0"));
        assert_eq!(json_path.extension().unwrap(), "json");
    }

    #[test]
    fn test_repeated_exports_never_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let rows = vec![row("t1", "Deposit", 10.0)];

        let paths: Vec<PathBuf> = (0..5)
            .map(|_| export_history("A1", &rows, ExportFormat::Json, dir.path()).unwrap())
            .collect();

        let mut unique = paths.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 5);
        assert!(paths.iter().all(|p| p.exists()));
    }

    #[test]
    fn test_unused_export_path_numbers_collisions() {
        let dir = tempfile::tempdir().unwrap();
        let first = unused_export_path(dir.path(), "history_A1", "csv");
        std::fs::write(&first, "taken").unwrap();

        let second = unused_export_path(dir.path(), "history_A1", "csv");

        // Either a new millisecond or a numbered suffix; never the taken file
        assert_ne!(first, second);
        assert!(!second.exists());
    }

    #[test]
    fn test_export_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");

        let path = export_history("A1", &[], ExportFormat::Json, &nested).unwrap();
        assert!(path.exists());
    }
}
