//! Write the four CSV artifacts and the bundled ZIP archive

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::error::NgrConvertError;
use crate::normalize::OutputTables;
use crate::table::Table;

/// Fixed artifact names, matched by the downstream import mappings.
pub const GRN_CSV: &str = "GRN_unique.csv";
pub const PAYEE_CSV: &str = "PAYEE_unique.csv";
pub const USER_CSV: &str = "USER_unique.csv";
pub const MAPPING_CSV: &str = "GRN_PAYEE_USER.csv";

/// The four artifacts as (file name, table) pairs, in write order.
pub fn artifacts(tables: &OutputTables) -> [(&'static str, &Table); 4] {
    [
        (GRN_CSV, &tables.grn),
        (PAYEE_CSV, &tables.payees),
        (USER_CSV, &tables.users),
        (MAPPING_CSV, &tables.mapping),
    ]
}

/// Write the four CSV files into `output_dir`, creating it if needed.
/// Returns the written paths in artifact order.
pub fn write_csv_files(tables: &OutputTables, output_dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir).map_err(|e| NgrConvertError::ArtifactWriteError {
        path: output_dir.to_path_buf(),
        source: e,
    })?;

    let mut written = Vec::with_capacity(4);
    for (name, table) in artifacts(tables) {
        let path = output_dir.join(name);
        let bytes = table.to_csv_bytes()?;
        std::fs::write(&path, bytes).map_err(|e| NgrConvertError::ArtifactWriteError {
            path: path.clone(),
            source: e,
        })?;
        written.push(path);
    }

    Ok(written)
}

/// Create the ZIP bundle containing the four CSVs under their fixed names.
pub fn create_bundle(tables: &OutputTables, output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| NgrConvertError::ArtifactWriteError {
            path: output_path.to_path_buf(),
            source: e,
        })?;
    }

    let file = File::create(output_path).map_err(|e| NgrConvertError::ArtifactWriteError {
        path: output_path.to_path_buf(),
        source: e,
    })?;

    let mut zip = ZipWriter::new(file);
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for (name, table) in artifacts(tables) {
        zip.start_file(name, options)?;
        zip.write_all(&table.to_csv_bytes()?)?;
    }

    zip.finish()?;

    Ok(())
}
