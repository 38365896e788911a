//! Flat-file report shared by the pipeline and the downstream batch flows.
//!
//! The pipeline overwrites the report on every run; nothing is merged across
//! runs. The append variant exists for callers that accumulate rows instead
//! (same header discipline, header written only when the file is new or
//! empty). Note the asymmetry: [`overwrite_report`] with zero rows is a
//! no-op and leaves any prior file untouched — callers that need a
//! guaranteed-clear must call [`clear_report`] explicitly.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Column order of the report file.
pub const REPORT_HEADER: [&str; 5] = [
    "convictional_order_id",
    "flagged_message",
    "buyer_order_code",
    "flip_order_state",
    "buyer_item_codes",
];

/// One line of the reconciliation report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciledRow {
    pub convictional_order_id: String,
    pub flagged_message: String,
    pub buyer_order_code: String,
    pub flip_order_state: String,
    pub buyer_item_codes: String,
}

/// Errors reading or writing the report file.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("I/O error for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error for {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
}

fn io_err(path: &Path, source: std::io::Error) -> ReportError {
    ReportError::Io {
        path: path.display().to_string(),
        source,
    }
}

fn csv_err(path: &Path, source: csv::Error) -> ReportError {
    ReportError::Csv {
        path: path.display().to_string(),
        source,
    }
}

fn ensure_parent_dir(path: &Path) -> Result<(), ReportError> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir).map_err(|e| io_err(path, e))?;
        }
    }
    Ok(())
}

/// Overwrites the report with `rows`, discarding any prior content.
///
/// Does nothing when `rows` is empty — an existing file is left untouched.
/// Use [`clear_report`] to explicitly reset the file to a header-only state.
///
/// # Errors
///
/// Returns [`ReportError`] if the parent directory cannot be created or the
/// file cannot be written.
pub fn overwrite_report(path: &Path, rows: &[ReconciledRow]) -> Result<(), ReportError> {
    if rows.is_empty() {
        tracing::debug!(path = %path.display(), "no rows provided; leaving report untouched");
        return Ok(());
    }
    write_rows(path, rows)
}

/// Resets the report to a header-only file, discarding any prior content.
///
/// # Errors
///
/// Returns [`ReportError`] if the parent directory cannot be created or the
/// file cannot be written.
pub fn clear_report(path: &Path) -> Result<(), ReportError> {
    write_rows(path, &[])
}

fn write_rows(path: &Path, rows: &[ReconciledRow]) -> Result<(), ReportError> {
    ensure_parent_dir(path)?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|e| csv_err(path, e))?;
    writer
        .write_record(REPORT_HEADER)
        .map_err(|e| csv_err(path, e))?;
    for row in rows {
        writer.serialize(row).map_err(|e| csv_err(path, e))?;
    }
    writer
        .flush()
        .map_err(|e| io_err(path, e))?;

    tracing::info!(path = %path.display(), rows = rows.len(), "wrote report");
    Ok(())
}

/// Appends `rows` to the report, writing the header first only when the file
/// is new or empty. Does nothing when `rows` is empty.
///
/// # Errors
///
/// Returns [`ReportError`] if the parent directory cannot be created or the
/// file cannot be written.
pub fn append_report(path: &Path, rows: &[ReconciledRow]) -> Result<(), ReportError> {
    if rows.is_empty() {
        tracing::debug!(path = %path.display(), "no rows provided; leaving report untouched");
        return Ok(());
    }

    ensure_parent_dir(path)?;

    let is_empty = fs::metadata(path).map_or(true, |m| m.len() == 0);
    let file = fs::OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .map_err(|e| io_err(path, e))?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    if is_empty {
        writer
            .write_record(REPORT_HEADER)
            .map_err(|e| csv_err(path, e))?;
    }
    for row in rows {
        writer.serialize(row).map_err(|e| csv_err(path, e))?;
    }
    writer
        .flush()
        .map_err(|e| io_err(path, e))?;

    tracing::info!(path = %path.display(), rows = rows.len(), "appended to report");
    Ok(())
}

/// Reads all rows from the report.
///
/// # Errors
///
/// Returns [`ReportError`] if the file cannot be opened or a record fails to
/// deserialize.
pub fn read_report(path: &Path) -> Result<Vec<ReconciledRow>, ReportError> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| csv_err(path, e))?;
    let mut rows = Vec::new();
    for record in reader.deserialize() {
        let row: ReconciledRow = record.map_err(|e| csv_err(path, e))?;
        rows.push(row);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, state: &str) -> ReconciledRow {
        ReconciledRow {
            convictional_order_id: id.to_owned(),
            flagged_message: "Item is out of stock unexpectedly".to_owned(),
            buyer_order_code: format!("BOC-{id}"),
            flip_order_state: state.to_owned(),
            buyer_item_codes: "SKU-1; SKU-2".to_owned(),
        }
    }

    #[test]
    fn overwrite_then_read_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("flagged_orders.csv");

        let rows = vec![row("a1", "Created"), row("a2", "Created")];
        overwrite_report(&path, &rows).expect("write");

        let read_back = read_report(&path).expect("read");
        assert_eq!(read_back, rows);
    }

    #[test]
    fn overwrite_replaces_prior_content() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("flagged_orders.csv");

        overwrite_report(&path, &[row("a1", "Created"), row("a2", "Created")]).expect("write");
        overwrite_report(&path, &[row("b1", "Created")]).expect("rewrite");

        let read_back = read_report(&path).expect("read");
        assert_eq!(read_back.len(), 1);
        assert_eq!(read_back[0].convictional_order_id, "b1");
    }

    #[test]
    fn overwrite_with_no_rows_leaves_file_untouched() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("flagged_orders.csv");

        overwrite_report(&path, &[row("a1", "Created")]).expect("write");
        overwrite_report(&path, &[]).expect("no-op");

        let read_back = read_report(&path).expect("read");
        assert_eq!(read_back.len(), 1, "prior rows must survive an empty write");
    }

    #[test]
    fn overwrite_with_no_rows_creates_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("flagged_orders.csv");

        overwrite_report(&path, &[]).expect("no-op");
        assert!(!path.exists());
    }

    #[test]
    fn clear_leaves_header_only_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("flagged_orders.csv");

        overwrite_report(&path, &[row("a1", "Created")]).expect("write");
        clear_report(&path).expect("clear");

        let content = std::fs::read_to_string(&path).expect("read file");
        assert_eq!(content.trim_end(), REPORT_HEADER.join(","));
        let read_back = read_report(&path).expect("read");
        assert!(read_back.is_empty());
    }

    #[test]
    fn creates_parent_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("reports/nested/flagged_orders.csv");

        overwrite_report(&path, &[row("a1", "Created")]).expect("write");
        assert!(path.exists());
    }

    #[test]
    fn append_writes_header_only_once() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("audit.csv");

        append_report(&path, &[row("a1", "Created")]).expect("append");
        append_report(&path, &[row("a2", "Cancelled")]).expect("append");

        let content = std::fs::read_to_string(&path).expect("read file");
        let header_lines = content
            .lines()
            .filter(|l| l.starts_with("convictional_order_id"))
            .count();
        assert_eq!(header_lines, 1);

        let read_back = read_report(&path).expect("read");
        assert_eq!(read_back.len(), 2);
    }

    #[test]
    fn fields_with_commas_survive_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("flagged_orders.csv");

        let mut tricky = row("a1", "Created");
        tricky.flagged_message = "Out of stock, unexpectedly \"again\"".to_owned();
        overwrite_report(&path, std::slice::from_ref(&tricky)).expect("write");

        let read_back = read_report(&path).expect("read");
        assert_eq!(read_back[0], tricky);
    }
}
