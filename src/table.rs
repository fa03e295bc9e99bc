//! Row and table representation for the flattened NGR entities

use std::io::Write;

use crate::error::NgrConvertError;

/// A single flattened record: an ordered mapping from column name to value.
///
/// `None` is a missing value; `Some("")` is a present-but-empty value. The
/// two are distinct throughout the pipeline — during merging an empty string
/// counts as present and wins over a null.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    fields: Vec<(String, Option<String>)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field. A duplicate name overwrites the value in place: last
    /// write wins, the original position is kept.
    pub fn insert(&mut self, name: impl Into<String>, value: Option<String>) {
        let name = name.into();
        if let Some(slot) = self.fields.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value;
        } else {
            self.fields.push((name, value));
        }
    }

    /// Look up a field. `None` means the column is absent from this row;
    /// `Some(&None)` means it is present but null.
    pub fn get(&self, name: &str) -> Option<&Option<String>> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// The value used when grouping rows on `name`. An absent column and an
    /// explicit null are the same (null) key.
    pub fn key(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|v| v.as_deref())
    }

    /// Column names in insertion order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// An ordered collection of rows with a reconciled column superset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    /// Build a table from rows, reconciling their column sets into a
    /// superset in first-seen order.
    pub fn from_rows(rows: Vec<Row>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for row in &rows {
            for col in row.columns() {
                if !columns.iter().any(|c| c == col) {
                    columns.push(col.to_string());
                }
            }
        }
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Serialize as CSV: a header row of column names, then one record per
    /// row. Null and absent cells become empty fields; values containing
    /// commas, quotes or newlines are quoted by the writer.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), NgrConvertError> {
        // A table with no columns has nothing to serialize, and the CSV
        // writer rejects zero-field records.
        if self.columns.is_empty() {
            return Ok(());
        }

        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(&self.columns)?;
        for row in &self.rows {
            let record: Vec<&str> = self
                .columns
                .iter()
                .map(|col| row.get(col).and_then(|v| v.as_deref()).unwrap_or(""))
                .collect();
            wtr.write_record(&record)?;
        }
        wtr.flush().map_err(|e| NgrConvertError::CsvError {
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Serialize as CSV into an in-memory buffer.
    pub fn to_csv_bytes(&self) -> Result<Vec<u8>, NgrConvertError> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;
        Ok(buf)
    }
}
