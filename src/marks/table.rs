use csv::ReaderBuilder;
use log::{debug, warn};

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::core::constants::columns;
use crate::core::error::{MarkdashError, Result};
use crate::core::types::{Grade, MarkTable, StudentRecord};
use crate::marks::parser::{normalize_header, normalize_id, parse_final_mark};

/// How a raw export is turned into a `MarkTable`
#[derive(Debug, Clone, PartialEq)]
pub struct TableOptions {
    pub id_column: String,
    pub mark_column: String,
    /// Metadata rows dropped directly after the header, such as the LMS
    /// "Points Possible" row. They are not validated and are not counted in
    /// `MarkTable::skipped_rows`.
    pub skip_rows: usize,
    /// Fill a missing grade from the mark's band
    pub infer_grades: bool,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            id_column: columns::DEFAULT_ID_COLUMN.to_string(),
            mark_column: columns::DEFAULT_MARK_COLUMN.to_string(),
            skip_rows: columns::DEFAULT_SKIP_ROWS,
            infer_grades: false,
        }
    }
}

impl MarkTable {
    /// Parse CSV content into a table of normalized student records.
    ///
    /// Rows whose ID and final mark cells are both blank are dropped and
    /// counted in `skipped_rows`. Ragged rows are tolerated.
    pub fn from_reader<R: Read>(
        reader: R,
        label: &str,
        source: &str,
        options: &TableOptions,
    ) -> Result<MarkTable> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let columns: Vec<String> = rdr.headers()?.iter().map(normalize_header).collect();
        if columns.iter().all(String::is_empty) {
            return Err(MarkdashError::EmptyTable(label.to_string()));
        }

        let id_idx = find_column(&columns, &options.id_column)?;
        let mark_idx = find_column(&columns, &options.mark_column)?;

        let mut records = Vec::new();
        let mut skipped_rows = 0;

        let mut rows = rdr.records();
        for (n, row) in rows.by_ref().take(options.skip_rows).enumerate() {
            if let Err(e) = row {
                debug!("{label}: ignoring unreadable metadata row {}: {e}", n + 1);
            }
        }

        for record in rows {
            let record = record?;
            let id = normalize_id(record.get(id_idx).unwrap_or(""));
            let raw = record.get(mark_idx).unwrap_or("").trim().to_string();
            let mut final_mark = parse_final_mark(&raw);

            if id.is_empty() && final_mark.is_blank() {
                skipped_rows += 1;
                continue;
            }

            if options.infer_grades
                && final_mark.grade.is_none()
                && let Some(mark) = final_mark.mark
            {
                final_mark.grade = Some(Grade::from_mark(mark));
            }

            records.push(StudentRecord {
                id,
                final_mark,
                raw,
            });
        }

        debug!(
            "Parsed {} record(s) from {source} ({skipped_rows} blank row(s) dropped)",
            records.len()
        );

        Ok(MarkTable {
            label: label.to_string(),
            source: source.to_string(),
            columns,
            records,
            skipped_rows,
        })
    }
}

/// Locate a column by trimmed, case-insensitive name
fn find_column(columns: &[String], wanted: &str) -> Result<usize> {
    let wanted = wanted.trim();
    columns
        .iter()
        .position(|c| c.eq_ignore_ascii_case(wanted))
        .ok_or_else(|| {
            warn!("Column '{wanted}' not found among {columns:?}");
            MarkdashError::MissingColumn {
                column: wanted.to_string(),
                available: columns.to_vec(),
            }
        })
}

/// Label used for a table read from `path`
pub fn label_for_path(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Load a local CSV export
pub fn load_table(path: &Path, options: &TableOptions) -> Result<MarkTable> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => MarkdashError::FileNotFound(path.display().to_string()),
        _ => MarkdashError::Io(e),
    })?;

    MarkTable::from_reader(
        io::BufReader::new(file),
        &label_for_path(path),
        &path.display().to_string(),
        options,
    )
}
